//! Checker configuration

use crate::claims::MAX_CLAIMS;
use crate::error::{CheckError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Environment variable overriding the consistency threshold
pub const THRESHOLD_ENV: &str = "NARRATIVE_CONSISTENCY_THRESHOLD";

pub const MIN_THRESHOLD: f64 = 0.5;
pub const MAX_THRESHOLD: f64 = 0.99;

/// Consistency checker settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// Minimum acceptable overall score
    pub consistency_threshold: f64,
    /// Claims extracted per narrative (1..=15)
    pub max_claims: usize,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            consistency_threshold: 0.85,
            max_claims: MAX_CLAIMS,
        }
    }
}

impl CheckerConfig {
    /// Load and validate a JSON config file; absent fields use defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        info!("Loading checker config from {:?}", path);
        let json = std::fs::read_to_string(path)?;
        let config: CheckerConfig = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(THRESHOLD_ENV) {
            self.consistency_threshold = raw.trim().parse().map_err(|_| {
                CheckError::Config(format!("{} must be a number, got '{}'", THRESHOLD_ENV, raw))
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_THRESHOLD..=MAX_THRESHOLD).contains(&self.consistency_threshold) {
            return Err(CheckError::Config(format!(
                "consistency_threshold must be between {} and {}, got {}",
                MIN_THRESHOLD, MAX_THRESHOLD, self.consistency_threshold
            )));
        }
        if !(1..=MAX_CLAIMS).contains(&self.max_claims) {
            return Err(CheckError::Config(format!(
                "max_claims must be between 1 and {}, got {}",
                MAX_CLAIMS, self.max_claims
            )));
        }
        Ok(())
    }
}
