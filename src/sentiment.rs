//! Lexicon-based polarity scoring
//!
//! VADER-style scorer: per-token valences from a lexicon, shifted by
//! booster/dampener words and flipped by nearby negators, summed and squashed
//! into a compound score in [-1, 1].

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Normalization constant approximating the max expected sum
const ALPHA: f64 = 15.0;
/// Valence shift applied by a booster or dampener word
const BOOST: f64 = 0.293;
/// Scalar applied to a negated valence
const NEGATION_SCALAR: f64 = -0.74;
/// Tokens before a sentiment word that may modify it
const LOOKBACK: usize = 3;

/// Compound scores beyond this magnitude count as polar
pub const POLARITY_THRESHOLD: f64 = 0.1;

static SHARED: LazyLock<PolarityAnalyzer> = LazyLock::new(PolarityAnalyzer::new);

/// Polarity breakdown of a text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarityScores {
    pub negative: f64,
    pub neutral: f64,
    pub positive: f64,
    pub compound: f64,
}

/// Coarse polarity class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Positive,
    Negative,
    Neutral,
}

impl PolarityScores {
    pub fn polarity(&self) -> Polarity {
        if self.compound > POLARITY_THRESHOLD {
            Polarity::Positive
        } else if self.compound < -POLARITY_THRESHOLD {
            Polarity::Negative
        } else {
            Polarity::Neutral
        }
    }
}

/// Read-only polarity analyzer
pub struct PolarityAnalyzer {
    lexicon: HashMap<&'static str, f64>,
    boosters: HashMap<&'static str, f64>,
    negators: HashSet<&'static str>,
}

impl Default for PolarityAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl PolarityAnalyzer {
    pub fn new() -> Self {
        Self {
            lexicon: Self::build_lexicon(),
            boosters: Self::build_boosters(),
            negators: Self::build_negators(),
        }
    }

    /// Process-wide instance
    pub fn shared() -> &'static PolarityAnalyzer {
        &SHARED
    }

    /// Score a text
    pub fn polarity_scores(&self, text: &str) -> PolarityScores {
        let tokens = tokenize(text);
        let mut valences = Vec::with_capacity(tokens.len());

        for (i, token) in tokens.iter().enumerate() {
            let Some(&base) = self.lexicon.get(token.as_str()) else {
                valences.push(0.0);
                continue;
            };

            let mut valence = base;
            let start = i.saturating_sub(LOOKBACK);
            for (distance, prior) in tokens[start..i].iter().rev().enumerate() {
                if let Some(&shift) = self.boosters.get(prior.as_str()) {
                    let decay = 1.0 - 0.05 * distance as f64;
                    valence += shift * decay * valence.signum();
                }
            }
            if tokens[start..i].iter().any(|prior| self.is_negator(prior)) {
                valence *= NEGATION_SCALAR;
            }
            valences.push(valence);
        }

        score_valences(&valences)
    }

    fn is_negator(&self, token: &str) -> bool {
        self.negators.contains(token) || token.ends_with("n't")
    }

    fn build_lexicon() -> HashMap<&'static str, f64> {
        [
            // General positive
            ("good", 1.9), ("great", 3.1), ("better", 1.9), ("best", 3.2),
            ("excellent", 2.7), ("outstanding", 3.0), ("impressive", 2.3),
            ("positive", 2.6), ("favorable", 2.1), ("success", 2.7),
            ("successful", 2.8), ("win", 2.8), ("benefit", 2.0),
            ("opportunity", 1.8), ("advantage", 1.0), ("healthy", 1.7),
            ("confident", 2.2), ("optimistic", 1.3), ("resilient", 1.5),

            // Financial positive
            ("strong", 2.3), ("stronger", 2.1), ("strength", 2.2),
            ("gain", 2.4), ("gains", 1.8), ("gained", 1.6),
            ("growth", 1.6), ("improve", 1.9), ("improved", 2.1),
            ("improvement", 2.0), ("profit", 1.9), ("profitable", 1.9),
            ("outperform", 1.8), ("outperformed", 1.8), ("outperforming", 1.8),
            ("bullish", 1.8), ("robust", 1.7), ("solid", 1.6), ("rally", 1.5),
            ("surge", 1.3), ("surged", 1.3), ("upside", 1.3), ("exceeded", 1.4),
            ("stable", 1.2),

            // General negative
            ("bad", -2.5), ("worse", -2.1), ("worst", -3.1), ("poor", -2.1),
            ("negative", -2.7), ("disappointing", -2.2), ("fear", -2.2),
            ("concern", -1.3), ("risk", -1.1), ("risky", -1.4),
            ("uncertainty", -1.4), ("struggle", -1.4), ("struggled", -1.4),

            // Financial negative
            ("weak", -1.9), ("weaker", -1.9), ("weakness", -1.7),
            ("loss", -1.3), ("losses", -1.7), ("lost", -1.3),
            ("decline", -1.3), ("declined", -1.1), ("declining", -1.2),
            ("drop", -1.1), ("dropped", -1.0), ("fell", -1.2),
            ("underperform", -1.8), ("underperformed", -1.8), ("underperforming", -1.8),
            ("bearish", -1.8), ("crash", -1.7), ("plunge", -1.6), ("plunged", -1.6),
            ("slump", -1.5), ("downturn", -1.5), ("lagged", -1.2), ("volatile", -1.0),
        ]
        .into_iter()
        .collect()
    }

    fn build_boosters() -> HashMap<&'static str, f64> {
        [
            // Intensifiers
            ("very", BOOST), ("significantly", BOOST), ("substantially", BOOST),
            ("considerably", BOOST), ("sharply", BOOST), ("strongly", BOOST),
            ("extremely", BOOST), ("remarkably", BOOST), ("highly", BOOST),

            // Dampeners
            ("slightly", -BOOST), ("somewhat", -BOOST), ("marginally", -BOOST),
            ("barely", -BOOST), ("partly", -BOOST),
        ]
        .into_iter()
        .collect()
    }

    fn build_negators() -> HashSet<&'static str> {
        [
            "not", "no", "never", "none", "nor", "neither", "without", "nothing",
            "cannot", "hardly",
        ]
        .into_iter()
        .collect()
    }
}

/// Lower-cased word tokens with surrounding punctuation removed
fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|word| {
            word.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                .to_lowercase()
        })
        .filter(|word| !word.is_empty())
        .collect()
}

fn score_valences(valences: &[f64]) -> PolarityScores {
    let sum: f64 = valences.iter().sum();
    let compound = if sum == 0.0 {
        0.0
    } else {
        (sum / (sum * sum + ALPHA).sqrt()).clamp(-1.0, 1.0)
    };

    let positive_sum: f64 = valences.iter().filter(|v| **v > 0.0).map(|v| v + 1.0).sum();
    let negative_sum: f64 = valences.iter().filter(|v| **v < 0.0).map(|v| v - 1.0).sum();
    let neutral_count = valences.iter().filter(|v| **v == 0.0).count() as f64;

    let total = positive_sum + negative_sum.abs() + neutral_count;
    if total == 0.0 {
        return PolarityScores {
            negative: 0.0,
            neutral: 0.0,
            positive: 0.0,
            compound: 0.0,
        };
    }

    PolarityScores {
        negative: negative_sum.abs() / total,
        neutral: neutral_count / total,
        positive: positive_sum / total,
        compound,
    }
}
