//! Rule-based claim extraction
//!
//! Sentences are classified by an ordered list of detectors; the first
//! detector that fires decides the claim type and later ones are not tried.

use super::lexicon::{
    contains_any, COMPARISON_KEYWORDS, DATE_PATTERN, NON_FACTUAL_MARKERS, NUMBER_PATTERN,
    PERCENTAGE_PATTERN, TREND_KEYWORDS, VOLATILITY_KEYWORDS,
};
use super::{Claim, ClaimType};
use crate::error::Result;
use tracing::{debug, warn};
use unicode_segmentation::UnicodeSegmentation;

/// Upper bound on claims returned for one narrative
pub const MAX_CLAIMS: usize = 15;

/// A detector sees the raw sentence and its lower-cased form
type Detector = fn(&str, &str) -> Option<ClaimType>;

const DETECTORS: [Detector; 6] = [
    detect_price,
    detect_percentage,
    detect_date,
    detect_trend,
    detect_volatility,
    detect_comparison,
];

fn detect_price(sentence: &str, lowered: &str) -> Option<ClaimType> {
    NUMBER_PATTERN.is_match(sentence).then(|| {
        if contains_any(lowered, TREND_KEYWORDS) {
            ClaimType::PriceTrend
        } else {
            ClaimType::Price
        }
    })
}

fn detect_percentage(sentence: &str, lowered: &str) -> Option<ClaimType> {
    PERCENTAGE_PATTERN.is_match(sentence).then(|| {
        if contains_any(lowered, TREND_KEYWORDS) {
            ClaimType::PercentageTrend
        } else {
            ClaimType::Percentage
        }
    })
}

fn detect_date(sentence: &str, _lowered: &str) -> Option<ClaimType> {
    DATE_PATTERN.is_match(sentence).then_some(ClaimType::DateSpecific)
}

fn detect_trend(_sentence: &str, lowered: &str) -> Option<ClaimType> {
    contains_any(lowered, TREND_KEYWORDS).then_some(ClaimType::Trend)
}

fn detect_volatility(_sentence: &str, lowered: &str) -> Option<ClaimType> {
    contains_any(lowered, VOLATILITY_KEYWORDS).then_some(ClaimType::Volatility)
}

fn detect_comparison(_sentence: &str, lowered: &str) -> Option<ClaimType> {
    contains_any(lowered, COMPARISON_KEYWORDS).then_some(ClaimType::Comparison)
}

/// Classify one sentence, `None` when it asserts nothing checkable
pub fn classify(sentence: &str) -> Option<ClaimType> {
    let lowered = sentence.to_lowercase();
    DETECTORS.iter().find_map(|detect| detect(sentence, &lowered))
}

/// Headers, disclaimers and notes are skipped
pub fn is_non_factual(sentence: &str) -> bool {
    if sentence.starts_with('#') {
        return true;
    }
    contains_any(&sentence.to_lowercase(), NON_FACTUAL_MARKERS)
}

/// Split text into trimmed, non-empty sentences
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.unicode_sentences()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Claim extractor with a configurable cap (never above [`MAX_CLAIMS`])
#[derive(Debug, Clone, Copy)]
pub struct ClaimExtractor {
    max_claims: usize,
}

impl Default for ClaimExtractor {
    fn default() -> Self {
        Self {
            max_claims: MAX_CLAIMS,
        }
    }
}

impl ClaimExtractor {
    pub fn new(max_claims: usize) -> Self {
        Self {
            max_claims: max_claims.min(MAX_CLAIMS),
        }
    }

    pub fn max_claims(&self) -> usize {
        self.max_claims
    }

    /// Extract claims in sentence order; faults degrade to no claims
    pub fn extract(&self, narrative: &str) -> Vec<Claim> {
        match self.try_extract(narrative) {
            Ok(claims) => claims,
            Err(e) => {
                warn!("ClaimExtractor::extract - degraded to no claims: {}", e);
                Vec::new()
            }
        }
    }

    fn try_extract(&self, narrative: &str) -> Result<Vec<Claim>> {
        let mut claims = Vec::new();

        for sentence in split_sentences(narrative) {
            if claims.len() == self.max_claims {
                break;
            }
            if is_non_factual(sentence) {
                continue;
            }
            if let Some(claim_type) = classify(sentence) {
                debug!("Extracted {} claim: {}", claim_type, sentence);
                claims.push(Claim::new(sentence, claim_type)?);
            }
        }

        Ok(claims)
    }
}

/// Extract at most [`MAX_CLAIMS`] claims from a narrative
pub fn extract_claims(narrative: &str) -> Vec<Claim> {
    ClaimExtractor::default().extract(narrative)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_precedence() {
        assert_eq!(classify("The price of $150.00 was recorded."), Some(ClaimType::Price));
        assert_eq!(classify("Shares increased to $150."), Some(ClaimType::PriceTrend));
        // a percentage always carries a number, so the price detector wins
        assert_eq!(classify("The stock increased by 12%."), Some(ClaimType::PriceTrend));
        assert_eq!(classify("The stock showed a downward trend."), Some(ClaimType::Trend));
        assert_eq!(classify("Trading was volatile."), Some(ClaimType::Volatility));
        assert_eq!(
            classify("It did better than its sector peers."),
            Some(ClaimType::Comparison)
        );
        assert_eq!(classify("Investors remain attentive."), None);
    }

    #[test]
    fn test_trend_keyword_beats_comparison() {
        assert_eq!(
            classify("It outperformed the market by a wide margin."),
            Some(ClaimType::Trend)
        );
    }

    #[test]
    fn test_percentage_and_date_detectors() {
        assert_eq!(detect_percentage("up 4 %", "up 4 %"), Some(ClaimType::Percentage));
        assert_eq!(
            detect_percentage("fell 4%", "fell 4%"),
            Some(ClaimType::PercentageTrend)
        );
        assert_eq!(detect_percentage("4 points", "4 points"), None);
        assert_eq!(detect_date("On 2022-06-15.", ""), Some(ClaimType::DateSpecific));
    }

    #[test]
    fn test_headers_and_disclaimers_skipped() {
        let narrative = "# AAPL Report\n\n## Executive Summary\n\n\
            The stock rose to $150.00 this quarter. \
            Disclaimer: past performance of $100 means nothing. \
            NOTE: figures of 12% are unaudited.\n\n\
            ### Outlook\n\nThe trend was bullish.";
        let claims = extract_claims(narrative);
        let texts: Vec<&str> = claims.iter().map(Claim::text).collect();
        assert_eq!(
            texts,
            vec!["The stock rose to $150.00 this quarter.", "The trend was bullish."]
        );
        assert!(claims
            .iter()
            .all(|c| !c.text().starts_with('#') && !c.text().to_lowercase().contains("disclaimer")));
    }

    #[test]
    fn test_bullet_lines_become_sentences() {
        let narrative = "## Key Highlights\n\n\
            - The highest price of $182.10 was reached on 2023-07-31\n\
            - The lowest price of $124.17 was recorded on 2023-01-03";
        let claims = extract_claims(narrative);
        assert_eq!(claims.len(), 2);
        assert!(claims.iter().all(|c| c.claim_type() == ClaimType::Price));
    }

    #[test]
    fn test_claim_cap_preserves_order() {
        let narrative: String = (1..=20)
            .map(|i| format!("Day {} closed at ${}.00. ", i, 100 + i))
            .collect();
        let claims = extract_claims(&narrative);
        assert_eq!(claims.len(), MAX_CLAIMS);
        assert!(claims[0].text().starts_with("Day 1 "));
        assert!(claims[14].text().starts_with("Day 15 "));
    }

    #[test]
    fn test_custom_cap_is_bounded() {
        assert_eq!(ClaimExtractor::new(3).max_claims(), 3);
        assert_eq!(ClaimExtractor::new(40).max_claims(), MAX_CLAIMS);

        let narrative = "Prices fell. Prices grew. Prices declined. Prices improved.";
        assert_eq!(ClaimExtractor::new(2).extract(narrative).len(), 2);
    }

    #[test]
    fn test_empty_and_plain_narratives() {
        assert!(extract_claims("").is_empty());
        assert!(extract_claims("Nothing to see here. Just words.").is_empty());
    }
}
