//! Services Layer
//!
//! The claim verification pipeline. Each service is a stateless unit struct
//! whose associated functions hold the business logic; the consistency
//! checker wires them together.
//!
//! # Architecture
//!
//! ```text
//! narrative ──> ClaimExtractor ──> claims ──┐
//!                                           ├──> VerificationService ──> ReportService ──> report
//! dataset ───> SummaryService ──> stats ────┘
//! ```
//!
//! # Services
//!
//! - `SummaryService` - Reference statistics from the dataset
//! - `VerificationService` - Per-claim rules and verdicts
//! - `ReportService` - Score aggregation
//! - `ConsistencyChecker` - End-to-end check with threshold assessment

pub mod consistency_service;
pub mod report_service;
pub mod summary_service;
pub mod verification_service;

// Re-export commonly used types and services
pub use consistency_service::{check_narrative_consistency, ConsistencyChecker, ThresholdAssessment};
pub use report_service::{compute_consistency_score, ConsistencyReport, ReportService};
pub use summary_service::{DateRange, PriceRange, ReferenceStatistics, SummaryService};
pub use verification_service::{Verdict, VerificationResult, VerificationService};
