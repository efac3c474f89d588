//! Consistency Service
//!
//! Runs the full check: summarize the dataset, extract claims, verify each
//! claim, aggregate. Dataset precondition faults abort the call before any
//! claim is verified.

use super::report_service::{ConsistencyReport, ReportService};
use super::summary_service::SummaryService;
use super::verification_service::VerificationService;
use crate::claims::ClaimExtractor;
use crate::config::CheckerConfig;
use crate::dataset::Dataset;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Overall score judged against the configured threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdAssessment {
    pub score: f64,
    pub threshold: f64,
    pub passed: bool,
}

/// Narrative consistency checker
#[derive(Debug, Clone, Default)]
pub struct ConsistencyChecker {
    config: CheckerConfig,
}

impl ConsistencyChecker {
    pub fn new(config: CheckerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Check a narrative against the dataset it was generated from
    pub fn check(&self, narrative: &str, dataset: &Dataset) -> Result<ConsistencyReport> {
        info!(
            "ConsistencyChecker::check - {} chars against {} rows",
            narrative.len(),
            dataset.len()
        );

        let stats = SummaryService::summarize(dataset)?;
        let claims = ClaimExtractor::new(self.config.max_claims).extract(narrative);
        let results = VerificationService::verify_all(&claims, &stats);

        Ok(ReportService::aggregate(results))
    }

    /// Compare a report's score with the configured threshold
    pub fn assess(&self, report: &ConsistencyReport) -> ThresholdAssessment {
        let threshold = self.config.consistency_threshold;
        ThresholdAssessment {
            score: report.overall_score,
            threshold,
            passed: report.meets_threshold(threshold),
        }
    }
}

/// Check with default settings, returning the report and its overall score
pub fn check_narrative_consistency(
    narrative: &str,
    dataset: &Dataset,
) -> Result<(ConsistencyReport, f64)> {
    let report = ConsistencyChecker::default().check(narrative, dataset)?;
    let score = report.overall_score;
    Ok((report, score))
}
