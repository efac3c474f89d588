//! Keyword lexicons and token patterns shared by extraction and verification
//!
//! All keyword matching is a case-insensitive substring test against the
//! lower-cased sentence, so "up" also matches inside "upward".

use regex::Regex;
use std::sync::LazyLock;

/// Any number, optionally prefixed with a dollar sign
pub static NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$?(\d+(?:\.\d+)?)").expect("number pattern compiles"));

/// A number followed by a percent sign
pub static PERCENTAGE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*%").expect("percentage pattern compiles"));

/// ISO calendar date
pub static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}").expect("date pattern compiles"));

pub const TREND_KEYWORDS: &[&str] = &[
    "increased", "decreased", "risen", "fell", "grew", "declined", "improved",
    "deteriorated", "higher", "lower", "upward", "downward", "bullish", "bearish",
    "outperformed", "underperformed",
];

pub const VOLATILITY_KEYWORDS: &[&str] = &[
    "volatile", "stability", "fluctuation", "variability", "deviation",
];

pub const COMPARISON_KEYWORDS: &[&str] = &[
    "compared to", "relative to", "versus", "against", "outperformed",
    "underperformed", "better than", "worse than", "higher than", "lower than",
];

/// Sentences containing these are never claims
pub const NON_FACTUAL_MARKERS: &[&str] = &["disclaimer", "note:"];

pub const UPTREND_WORDS: &[&str] = &[
    "increase", "increased", "rise", "risen", "grew", "growth", "upward", "higher", "up",
    "bullish",
];

pub const DOWNTREND_WORDS: &[&str] = &[
    "decrease", "decreased", "fall", "fell", "decline", "declined", "downward", "lower",
    "down", "bearish",
];

pub const HIGH_VOLATILITY_WORDS: &[&str] = &["high", "significant", "increased", "substantial"];

pub const LOW_VOLATILITY_WORDS: &[&str] = &["low", "decreased", "minimal", "limited", "reduced"];

/// True when `lowered` contains any of `words`
pub fn contains_any(lowered: &str, words: &[&str]) -> bool {
    words.iter().any(|word| lowered.contains(word))
}

/// Captured numeric tokens, in order of appearance
pub fn number_tokens(text: &str) -> Vec<&str> {
    captures(&NUMBER_PATTERN, text)
}

/// Captured percentage values (without the `%`), in order of appearance
pub fn percentage_tokens(text: &str) -> Vec<&str> {
    captures(&PERCENTAGE_PATTERN, text)
}

/// ISO date tokens, in order of appearance
pub fn date_tokens(text: &str) -> Vec<&str> {
    DATE_PATTERN.find_iter(text).map(|m| m.as_str()).collect()
}

fn captures<'t>(pattern: &Regex, text: &'t str) -> Vec<&'t str> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect()
}
