//! Factual claims extracted from a narrative
//!
//! A claim is one sentence judged to assert something checkable about the
//! dataset, tagged with exactly one [`ClaimType`].

pub mod extractor;
pub mod lexicon;

use crate::error::{CheckError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use extractor::{extract_claims, ClaimExtractor, MAX_CLAIMS};

/// Kind of factual claim, in extraction precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimType {
    Price,
    PriceTrend,
    Percentage,
    PercentageTrend,
    DateSpecific,
    Trend,
    Volatility,
    Comparison,
}

impl ClaimType {
    pub const ALL: [ClaimType; 8] = [
        ClaimType::Price,
        ClaimType::PriceTrend,
        ClaimType::Percentage,
        ClaimType::PercentageTrend,
        ClaimType::DateSpecific,
        ClaimType::Trend,
        ClaimType::Volatility,
        ClaimType::Comparison,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimType::Price => "price",
            ClaimType::PriceTrend => "price_trend",
            ClaimType::Percentage => "percentage",
            ClaimType::PercentageTrend => "percentage_trend",
            ClaimType::DateSpecific => "date_specific",
            ClaimType::Trend => "trend",
            ClaimType::Volatility => "volatility",
            ClaimType::Comparison => "comparison",
        }
    }
}

impl fmt::Display for ClaimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable, typed factual claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawClaim")]
pub struct Claim {
    #[serde(rename = "claim_text")]
    text: String,
    claim_type: ClaimType,
}

/// Wire shape of a claim before validation
#[derive(Deserialize)]
struct RawClaim {
    claim_text: String,
    claim_type: ClaimType,
}

impl TryFrom<RawClaim> for Claim {
    type Error = CheckError;

    fn try_from(raw: RawClaim) -> Result<Self> {
        Claim::new(raw.claim_text, raw.claim_type)
    }
}

impl Claim {
    /// Create a claim; the text must not be blank
    pub fn new(text: impl Into<String>, claim_type: ClaimType) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(CheckError::InvalidClaim("claim text is empty".to_string()));
        }
        Ok(Self { text, claim_type })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn claim_type(&self) -> ClaimType {
        self.claim_type
    }
}
