//! Verification Service
//!
//! Checks one claim at a time against the reference statistics. A fault
//! while checking a claim is turned into an `error` result for that claim
//! only; the rest of the batch is unaffected.

use super::summary_service::ReferenceStatistics;
use crate::claims::lexicon::{
    contains_any, date_tokens, number_tokens, percentage_tokens, DOWNTREND_WORDS,
    HIGH_VOLATILITY_WORDS, LOW_VOLATILITY_WORDS, UPTREND_WORDS,
};
use crate::claims::{Claim, ClaimType};
use crate::error::{CheckError, Result};
use crate::sentiment::{Polarity, PolarityAnalyzer};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Daily volatility (percent) above which volatility counts as high
pub const HIGH_VOLATILITY_THRESHOLD_PCT: f64 = 2.0;

const DEFAULT_EXPLANATION: &str = "No specific data points found to verify this claim.";

/// Outcome of checking one claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "verified")]
    Verified,
    #[serde(rename = "partially verified")]
    PartiallyVerified,
    #[serde(rename = "contradicted")]
    Contradicted,
    #[serde(rename = "partially contradicted")]
    PartiallyContradicted,
    #[serde(rename = "unverified")]
    Unverified,
    #[serde(rename = "error")]
    Error,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Verified => "verified",
            Verdict::PartiallyVerified => "partially verified",
            Verdict::Contradicted => "contradicted",
            Verdict::PartiallyContradicted => "partially contradicted",
            Verdict::Unverified => "unverified",
            Verdict::Error => "error",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-claim verification result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub claim_text: String,
    pub claim_type: ClaimType,
    pub consistency_score: f64,
    pub verification_result: Verdict,
    pub explanation: String,
}

/// Score, verdict and explanation produced by a rule
#[derive(Debug, Clone, PartialEq)]
struct Outcome {
    score: f64,
    verdict: Verdict,
    explanation: String,
}

impl Outcome {
    fn new(score: f64, verdict: Verdict, explanation: String) -> Self {
        Self {
            score,
            verdict,
            explanation,
        }
    }

    fn unverified() -> Self {
        Self::new(0.5, Verdict::Unverified, DEFAULT_EXPLANATION.to_string())
    }
}

/// Verification service for business logic
pub struct VerificationService;

impl VerificationService {
    /// Verify a single claim; never fails, faults become `error` results
    pub fn verify(claim: &Claim, stats: &ReferenceStatistics) -> VerificationResult {
        let outcome = match Self::evaluate(claim, stats) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("VerificationService::verify - '{}' failed: {}", claim.text(), e);
                Outcome::new(0.0, Verdict::Error, format!("Error during verification: {}", e))
            }
        };

        debug!(
            "Verified {} claim as {} ({:.2})",
            claim.claim_type(),
            outcome.verdict,
            outcome.score
        );

        VerificationResult {
            claim_text: claim.text().to_string(),
            claim_type: claim.claim_type(),
            consistency_score: outcome.score,
            verification_result: outcome.verdict,
            explanation: outcome.explanation,
        }
    }

    /// Verify claims in order
    pub fn verify_all(claims: &[Claim], stats: &ReferenceStatistics) -> Vec<VerificationResult> {
        claims.iter().map(|claim| Self::verify(claim, stats)).collect()
    }

    fn evaluate(claim: &Claim, stats: &ReferenceStatistics) -> Result<Outcome> {
        let text = claim.text();
        match claim.claim_type() {
            ClaimType::Price | ClaimType::PriceTrend => check_price(text, stats),
            ClaimType::Percentage | ClaimType::PercentageTrend => check_percentage(text, stats),
            ClaimType::DateSpecific => Ok(check_date(text, stats)),
            ClaimType::Trend => check_trend(text, stats),
            ClaimType::Volatility => Ok(check_volatility(text, stats)),
            ClaimType::Comparison => check_comparison(text, stats),
        }
    }
}

fn parse_number(token: &str) -> Result<f64> {
    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(CheckError::MalformedNumber(token.to_string())),
    }
}

// Token scans stop at the first in-band token. An out-of-band token records
// a contradiction and the scan moves on.

fn check_price(text: &str, stats: &ReferenceStatistics) -> Result<Outcome> {
    let (min, max) = (stats.price_range.min, stats.price_range.max);
    let mut outcome = Outcome::unverified();

    for token in number_tokens(text) {
        let value = parse_number(token)?;
        if min * 0.9 <= value && value <= max * 1.1 {
            return Ok(Outcome::new(
                0.9,
                Verdict::Verified,
                format!(
                    "The price value {} is within the observed price range (${:.2} to ${:.2}).",
                    token, min, max
                ),
            ));
        }
        if min * 0.7 <= value && value <= max * 1.3 {
            return Ok(Outcome::new(
                0.7,
                Verdict::PartiallyVerified,
                format!(
                    "The price value {} is outside but close to the observed price range (${:.2} to ${:.2}).",
                    token, min, max
                ),
            ));
        }
        outcome = Outcome::new(
            0.2,
            Verdict::Contradicted,
            format!(
                "The price value {} is significantly outside the observed price range (${:.2} to ${:.2}).",
                token, min, max
            ),
        );
    }

    Ok(outcome)
}

fn check_percentage(text: &str, stats: &ReferenceStatistics) -> Result<Outcome> {
    let tokens = percentage_tokens(text);
    if tokens.is_empty() {
        return Ok(Outcome::unverified());
    }

    let actual = stats.checked_change_pct()?.abs();
    let mut outcome = Outcome::unverified();

    for token in tokens {
        let difference = (parse_number(token)? - actual).abs();
        if difference <= 2.0 {
            return Ok(Outcome::new(
                0.95,
                Verdict::Verified,
                format!(
                    "The percentage {}% closely matches the observed change of {:.2}%.",
                    token, actual
                ),
            ));
        }
        if difference <= 5.0 {
            return Ok(Outcome::new(
                0.7,
                Verdict::PartiallyVerified,
                format!(
                    "The percentage {}% is reasonably close to the observed change of {:.2}%.",
                    token, actual
                ),
            ));
        }
        outcome = Outcome::new(
            0.3,
            Verdict::Contradicted,
            format!(
                "The percentage {}% is significantly different from the observed change of {:.2}%.",
                token, actual
            ),
        );
    }

    Ok(outcome)
}

fn check_date(text: &str, stats: &ReferenceStatistics) -> Outcome {
    // ISO dates order lexicographically
    let start = stats.date_range.start_iso();
    let end = stats.date_range.end_iso();
    let mut outcome = Outcome::unverified();

    for token in date_tokens(text) {
        if start.as_str() <= token && token <= end.as_str() {
            return Outcome::new(
                0.9,
                Verdict::Verified,
                format!(
                    "The date {} falls within the analyzed period ({} to {}).",
                    token, start, end
                ),
            );
        }
        outcome = Outcome::new(
            0.1,
            Verdict::Contradicted,
            format!(
                "The date {} falls outside the analyzed period ({} to {}).",
                token, start, end
            ),
        );
    }

    outcome
}

fn check_trend(text: &str, stats: &ReferenceStatistics) -> Result<Outcome> {
    let lowered = text.to_lowercase();
    let claims_up = contains_any(&lowered, UPTREND_WORDS);
    let claims_down = contains_any(&lowered, DOWNTREND_WORDS);
    let actual_up = stats.price_change > 0.0;
    let change_pct = stats.checked_change_pct()?;

    if (claims_up && actual_up) || (claims_down && !actual_up) {
        Ok(Outcome::new(
            0.9,
            Verdict::Verified,
            format!(
                "The claimed trend direction matches the observed price movement ({:.2}%).",
                change_pct
            ),
        ))
    } else {
        Ok(Outcome::new(
            0.1,
            Verdict::Contradicted,
            format!(
                "The claimed trend direction contradicts the observed price movement ({:.2}%).",
                change_pct
            ),
        ))
    }
}

fn check_volatility(text: &str, stats: &ReferenceStatistics) -> Outcome {
    let Some(volatility) = stats.volatility_pct else {
        return Outcome::unverified();
    };

    let lowered = text.to_lowercase();
    let claims_high = contains_any(&lowered, HIGH_VOLATILITY_WORDS);
    let claims_low = contains_any(&lowered, LOW_VOLATILITY_WORDS);
    let actual_high = volatility > HIGH_VOLATILITY_THRESHOLD_PCT;

    if (claims_high && actual_high) || (claims_low && !actual_high) {
        Outcome::new(
            0.9,
            Verdict::Verified,
            format!(
                "The volatility claim is consistent with the observed volatility of {:.2}%.",
                volatility
            ),
        )
    } else {
        Outcome::new(
            0.2,
            Verdict::Contradicted,
            format!(
                "The volatility claim contradicts the observed volatility of {:.2}%.",
                volatility
            ),
        )
    }
}

fn check_comparison(text: &str, stats: &ReferenceStatistics) -> Result<Outcome> {
    let scores = PolarityAnalyzer::shared().polarity_scores(text);
    debug!(
        "Comparison sentiment: pos {:.3}, neg {:.3}, neu {:.3}, compound {:.3}",
        scores.positive, scores.negative, scores.neutral, scores.compound
    );
    let polarity = scores.polarity();
    let actual_positive = stats.checked_change_pct()? > 0.0;

    match (polarity, actual_positive) {
        (Polarity::Positive, true) | (Polarity::Negative, false) => Ok(Outcome::new(
            0.7,
            Verdict::PartiallyVerified,
            "The sentiment of the comparison appears to generally match the observed performance."
                .to_string(),
        )),
        _ => Ok(Outcome::new(
            0.3,
            Verdict::PartiallyContradicted,
            "The sentiment of the comparison appears to contradict the observed performance."
                .to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::summary_service::{DateRange, PriceRange};
    use chrono::NaiveDate;

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    fn stats() -> ReferenceStatistics {
        ReferenceStatistics {
            row_count: 250,
            date_range: DateRange {
                start: date("2022-01-01"),
                end: date("2022-12-31"),
            },
            price_range: PriceRange { min: 140.0, max: 160.0 },
            first_close: 142.0,
            last_close: 156.91,
            latest_close: Some(156.91),
            price_change: 14.91,
            price_change_pct: 10.5,
            avg_volume: 1_000_000.0,
            max_volume: 3_000_000.0,
            moving_average_20: Some(155.0),
            moving_average_50: Some(150.0),
            volatility_pct: Some(1.4),
        }
    }

    fn falling() -> ReferenceStatistics {
        ReferenceStatistics {
            last_close: 127.09,
            latest_close: Some(127.09),
            price_change: -14.91,
            price_change_pct: -10.5,
            ..stats()
        }
    }

    fn verify(text: &str, claim_type: ClaimType, stats: &ReferenceStatistics) -> VerificationResult {
        VerificationService::verify(&Claim::new(text, claim_type).unwrap(), stats)
    }

    #[test]
    fn test_price_within_range() {
        let result = verify("The price of $150.00 was recorded.", ClaimType::Price, &stats());
        assert_eq!(result.consistency_score, 0.9);
        assert_eq!(result.verification_result, Verdict::Verified);
        assert_eq!(
            result.explanation,
            "The price value 150.00 is within the observed price range ($140.00 to $160.00)."
        );
    }

    #[test]
    fn test_price_bands() {
        let partial = verify("It touched $110.", ClaimType::Price, &stats());
        assert_eq!(partial.consistency_score, 0.7);
        assert_eq!(partial.verification_result, Verdict::PartiallyVerified);

        let contradicted = verify("It touched $400.", ClaimType::PriceTrend, &stats());
        assert_eq!(contradicted.consistency_score, 0.2);
        assert_eq!(contradicted.verification_result, Verdict::Contradicted);
    }

    #[test]
    fn test_price_scan_continues_past_contradictions() {
        let result = verify(
            "On 2022-06-15 shares closed at $151.20.",
            ClaimType::Price,
            &stats(),
        );
        assert_eq!(result.verification_result, Verdict::Verified);
        assert!(result.explanation.contains("151.20"));

        let result = verify("Volume hit 9000 and 12000 shares.", ClaimType::Price, &stats());
        assert_eq!(result.verification_result, Verdict::Contradicted);
        assert!(result.explanation.contains("12000"));
    }

    #[test]
    fn test_percentage_bands() {
        let verified = verify("The stock increased by 12%.", ClaimType::PercentageTrend, &stats());
        assert_eq!(verified.consistency_score, 0.95);
        assert_eq!(verified.verification_result, Verdict::Verified);
        assert_eq!(
            verified.explanation,
            "The percentage 12% closely matches the observed change of 10.50%."
        );

        let partial = verify("Shares gained 14.5 %.", ClaimType::Percentage, &stats());
        assert_eq!(partial.consistency_score, 0.7);

        let contradicted = verify("Shares gained 30%.", ClaimType::Percentage, &stats());
        assert_eq!(contradicted.consistency_score, 0.3);
        assert_eq!(contradicted.verification_result, Verdict::Contradicted);
    }

    #[test]
    fn test_percentage_compares_magnitude() {
        let result = verify("The stock lost 10%.", ClaimType::Percentage, &falling());
        assert_eq!(result.verification_result, Verdict::Verified);
    }

    #[test]
    fn test_percentage_without_token_is_unverified() {
        let result = verify("Shares moved a lot.", ClaimType::Percentage, &stats());
        assert_eq!(result.consistency_score, 0.5);
        assert_eq!(result.verification_result, Verdict::Unverified);
        assert_eq!(result.explanation, DEFAULT_EXPLANATION);
    }

    #[test]
    fn test_date_in_and_out_of_range() {
        let claim = "On 2022-06-15, the stock surged.";
        let inside = verify(claim, ClaimType::DateSpecific, &stats());
        assert_eq!(inside.consistency_score, 0.9);
        assert_eq!(inside.verification_result, Verdict::Verified);

        let later = ReferenceStatistics {
            date_range: DateRange {
                start: date("2023-01-01"),
                end: date("2023-12-31"),
            },
            ..stats()
        };
        let outside = verify(claim, ClaimType::DateSpecific, &later);
        assert_eq!(outside.consistency_score, 0.1);
        assert_eq!(outside.verification_result, Verdict::Contradicted);
        assert_eq!(
            outside.explanation,
            "The date 2022-06-15 falls outside the analyzed period (2023-01-01 to 2023-12-31)."
        );
    }

    #[test]
    fn test_trend_direction() {
        let claim = "The stock showed a significant downward trend.";
        let down = verify(claim, ClaimType::Trend, &falling());
        assert_eq!(down.consistency_score, 0.9);
        assert_eq!(down.verification_result, Verdict::Verified);
        assert_eq!(
            down.explanation,
            "The claimed trend direction matches the observed price movement (-10.50%)."
        );

        let up = verify(claim, ClaimType::Trend, &stats());
        assert_eq!(up.consistency_score, 0.1);
        assert_eq!(up.verification_result, Verdict::Contradicted);
    }

    #[test]
    fn test_flat_price_counts_as_not_up() {
        let flat = ReferenceStatistics {
            last_close: 142.0,
            price_change: 0.0,
            price_change_pct: 0.0,
            ..stats()
        };
        let result = verify("Prices declined.", ClaimType::Trend, &flat);
        assert_eq!(result.verification_result, Verdict::Verified);
    }

    #[test]
    fn test_volatility_levels() {
        let low = verify("Trading showed minimal fluctuation.", ClaimType::Volatility, &stats());
        assert_eq!(low.verification_result, Verdict::Verified);
        assert_eq!(
            low.explanation,
            "The volatility claim is consistent with the observed volatility of 1.40%."
        );

        let high = verify("Significant variability persisted.", ClaimType::Volatility, &stats());
        assert_eq!(high.consistency_score, 0.2);
        assert_eq!(high.verification_result, Verdict::Contradicted);

        let choppy = ReferenceStatistics {
            volatility_pct: Some(3.1),
            ..stats()
        };
        let high = verify("Significant variability persisted.", ClaimType::Volatility, &choppy);
        assert_eq!(high.verification_result, Verdict::Verified);
    }

    #[test]
    fn test_volatility_unavailable_stays_unverified() {
        let no_volatility = ReferenceStatistics {
            volatility_pct: None,
            ..stats()
        };
        let result = verify("Trading was volatile.", ClaimType::Volatility, &no_volatility);
        assert_eq!(result.consistency_score, 0.5);
        assert_eq!(result.verification_result, Verdict::Unverified);
    }

    #[test]
    fn test_comparison_sentiment() {
        let claim = "AAPL has significantly outperformed the broader market.";
        let agrees = verify(claim, ClaimType::Comparison, &stats());
        assert_eq!(agrees.consistency_score, 0.7);
        assert_eq!(agrees.verification_result, Verdict::PartiallyVerified);

        let disagrees = verify(claim, ClaimType::Comparison, &falling());
        assert_eq!(disagrees.consistency_score, 0.3);
        assert_eq!(disagrees.verification_result, Verdict::PartiallyContradicted);

        let neutral = verify("Returns relative to the index.", ClaimType::Comparison, &stats());
        assert_eq!(neutral.verification_result, Verdict::PartiallyContradicted);
    }

    #[test]
    fn test_malformed_number_becomes_error_result() {
        let digits = "9".repeat(400);
        let result = verify(&format!("Price hit ${}.", digits), ClaimType::Price, &stats());
        assert_eq!(result.consistency_score, 0.0);
        assert_eq!(result.verification_result, Verdict::Error);
        assert!(result.explanation.starts_with("Error during verification: Malformed number"));
    }

    #[test]
    fn test_undefined_change_is_error_for_percentage_rules() {
        let zero_base = ReferenceStatistics {
            first_close: 0.0,
            price_change_pct: f64::INFINITY,
            ..stats()
        };
        let result = verify("Shares gained 30%.", ClaimType::Percentage, &zero_base);
        assert_eq!(result.verification_result, Verdict::Error);
        assert_eq!(result.consistency_score, 0.0);

        // price rules do not depend on the change
        let result = verify("It touched $150.", ClaimType::Price, &zero_base);
        assert_eq!(result.verification_result, Verdict::Verified);
    }

    #[test]
    fn test_verify_is_idempotent() {
        let claim = Claim::new("The stock increased by 12%.", ClaimType::PriceTrend).unwrap();
        let stats = stats();
        assert_eq!(
            VerificationService::verify(&claim, &stats),
            VerificationService::verify(&claim, &stats)
        );
    }

    #[test]
    fn test_scores_always_in_unit_interval() {
        let texts = [
            "The price of $150.00 was recorded.",
            "Up 99% on 1999-01-01.",
            "Nothing here.",
            "Prices fell against peers.",
        ];
        for text in texts {
            for claim_type in ClaimType::ALL {
                let result = verify(text, claim_type, &stats());
                assert!((0.0..=1.0).contains(&result.consistency_score));
                assert_eq!(result.claim_type, claim_type);
            }
        }
    }

    #[test]
    fn test_verdict_serialization() {
        let json = serde_json::to_string(&Verdict::PartiallyContradicted).unwrap();
        assert_eq!(json, "\"partially contradicted\"");
        assert_eq!(Verdict::PartiallyVerified.to_string(), "partially verified");
    }
}
