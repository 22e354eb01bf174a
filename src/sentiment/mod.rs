//! Lexicon-based sentiment scoring.
//!
//! Deterministic heuristic, not a learned model: each token is checked
//! against a positive/negative lexicon, with the three preceding tokens
//! scanned for intensifiers (×1.5 magnitude) and negators (sign flip). The
//! per-word average is mapped onto the 1–5 rating scale around a neutral 3.0.

pub mod analyze;
pub mod lexicon;

pub use analyze::SentimentResult;

use once_cell::sync::Lazy;
use regex::Regex;

use lexicon::{INTENSIFIERS, NEGATIVE_WORDS, NEGATORS, POSITIVE_WORDS};

/// Score returned when a text contains no lexicon words.
pub const NEUTRAL_SCORE: f64 = 3.0;

/// Tokens scanned backwards from a lexicon word for modifiers.
const MODIFIER_WINDOW: usize = 3;

const INTENSIFIER_MULTIPLIER: f64 = 1.5;

static NON_WORD_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());
static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Normalize free text for scoring: lowercase, accents stripped by explicit
/// substitution, punctuation replaced with spaces, whitespace collapsed.
/// Idempotent; empty or blank input normalizes to the empty string.
pub fn normalize(text: &str) -> String {
    let mut text = text.to_lowercase();
    for (accented, plain) in [
        ('á', 'a'),
        ('é', 'e'),
        ('í', 'i'),
        ('ó', 'o'),
        ('ú', 'u'),
        ('ü', 'u'),
        ('ñ', 'n'),
    ] {
        if text.contains(accented) {
            text = text.replace(accented, &plain.to_string());
        }
    }
    let text = NON_WORD_REGEX.replace_all(&text, " ");
    WHITESPACE_REGEX.replace_all(text.trim(), " ").to_string()
}

/// Compute a sentiment score in [1.0, 5.0] for a comment.
///
/// The ±2.0 scaling around 3.0 maps the bounded per-word average (roughly
/// [-1.5, 1.5] with the intensifier multiplier) onto the full rating scale;
/// the final clamp guarantees the range even with stacked modifiers.
pub fn score(text: &str) -> f64 {
    let normalized = normalize(text);
    let tokens: Vec<&str> = normalized.split_whitespace().collect();
    if tokens.is_empty() {
        return NEUTRAL_SCORE;
    }

    let mut total = 0.0;
    let mut relevant_words = 0usize;

    for (i, token) in tokens.iter().enumerate() {
        let window = &tokens[i.saturating_sub(MODIFIER_WINDOW)..i];
        let multiplier = if window.iter().any(|w| INTENSIFIERS.contains(w)) {
            INTENSIFIER_MULTIPLIER
        } else {
            1.0
        };
        let sign = if window.iter().any(|w| NEGATORS.contains(w)) {
            -1.0
        } else {
            1.0
        };

        if POSITIVE_WORDS.contains(token) {
            total += multiplier * sign;
            relevant_words += 1;
        } else if NEGATIVE_WORDS.contains(token) {
            total -= multiplier * sign;
            relevant_words += 1;
        }
    }

    if relevant_words == 0 {
        return NEUTRAL_SCORE;
    }

    let mean = total / relevant_words as f64;
    (NEUTRAL_SCORE + mean * 2.0).clamp(1.0, 5.0)
}
