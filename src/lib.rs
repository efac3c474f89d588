//! Narrative Consistency - Financial Claim Verification
//!
//! Extracts factual claims from generated financial narratives and checks
//! each one against statistics computed from the historical price data the
//! narrative was written about.

pub mod claims;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod sentiment;
pub mod services;

pub use claims::{extract_claims, Claim, ClaimExtractor, ClaimType};
pub use config::CheckerConfig;
pub use dataset::{Candle, Column, Dataset};
pub use error::{CheckError, ErrorResponse, Result};
pub use services::{
    check_narrative_consistency, compute_consistency_score, ConsistencyChecker,
    ConsistencyReport, ReferenceStatistics, SummaryService, ThresholdAssessment, Verdict,
    VerificationResult, VerificationService,
};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging on stderr
///
/// `RUST_LOG` takes precedence over `default_filter`. Calling this twice is
/// a no-op.
pub fn init_tracing(default_filter: &str) {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
