//! Report Service
//!
//! Aggregates per-claim results into the consistency report.

use super::verification_service::{Verdict, VerificationResult};
use crate::error::{CheckError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

/// Structured consistency report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawReport")]
pub struct ConsistencyReport {
    pub overall_score: f64,
    pub checked_claims: usize,
    pub claim_checks: Vec<VerificationResult>,
}

/// Wire shape of a report before validation
#[derive(Deserialize)]
struct RawReport {
    overall_score: f64,
    checked_claims: usize,
    claim_checks: Vec<VerificationResult>,
}

impl TryFrom<RawReport> for ConsistencyReport {
    type Error = CheckError;

    fn try_from(raw: RawReport) -> Result<Self> {
        if raw.checked_claims != raw.claim_checks.len() {
            return Err(CheckError::InvalidReport(format!(
                "checked_claims is {} but {} claim checks are present",
                raw.checked_claims,
                raw.claim_checks.len()
            )));
        }
        if !(0.0..=1.0).contains(&raw.overall_score) {
            return Err(CheckError::InvalidReport(format!(
                "overall_score {} is outside [0, 1]",
                raw.overall_score
            )));
        }
        Ok(Self {
            overall_score: raw.overall_score,
            checked_claims: raw.checked_claims,
            claim_checks: raw.claim_checks,
        })
    }
}

impl ConsistencyReport {
    /// True when the overall score reaches `threshold`
    pub fn meets_threshold(&self, threshold: f64) -> bool {
        self.overall_score >= threshold
    }

    /// Number of claims per verdict
    pub fn count_by_verdict(&self) -> BTreeMap<Verdict, usize> {
        let mut counts = BTreeMap::new();
        for check in &self.claim_checks {
            *counts.entry(check.verification_result).or_insert(0) += 1;
        }
        counts
    }

    /// Up to `n` checks, lowest score first; ties keep extraction order
    pub fn lowest_scoring(&self, n: usize) -> Vec<&VerificationResult> {
        let mut checks: Vec<&VerificationResult> = self.claim_checks.iter().collect();
        checks.sort_by(|a, b| a.consistency_score.total_cmp(&b.consistency_score));
        checks.truncate(n);
        checks
    }
}

/// Report service for business logic
pub struct ReportService;

impl ReportService {
    /// Mean of the claim scores, 0.0 when there are none
    pub fn aggregate(results: Vec<VerificationResult>) -> ConsistencyReport {
        let overall_score = if results.is_empty() {
            0.0
        } else {
            results.iter().map(|r| r.consistency_score).sum::<f64>() / results.len() as f64
        };

        info!(
            "ReportService::aggregate - {} claims, overall score {:.3}",
            results.len(),
            overall_score
        );

        ConsistencyReport {
            overall_score,
            checked_claims: results.len(),
            claim_checks: results,
        }
    }
}

/// Overall score of an existing report, 0.0 when there is none
pub fn compute_consistency_score(report: Option<&ConsistencyReport>) -> f64 {
    report.map(|r| r.overall_score).unwrap_or(0.0)
}
