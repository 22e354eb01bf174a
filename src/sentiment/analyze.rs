//! Per-product sentiment aggregation.

use serde::Serialize;

use crate::extractor::ProductRecord;
use crate::sentiment::{NEUTRAL_SCORE, score};

/// Aggregate sentiment for one product: mean computed score and mean original
/// reviewer rating across its attached comments, rounded to two decimals for
/// presentation. Derived per analysis pass, never stored on the product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SentimentResult {
    /// Mean lexicon score, 1.0–5.0; 3.0 when the product has no comments.
    pub score: f64,
    /// Mean rating the reviewers themselves gave.
    pub mean_rating: f64,
    pub comment_count: usize,
}

pub fn analyze_product(product: &ProductRecord) -> SentimentResult {
    let comments = &product.comments;
    if comments.is_empty() {
        return SentimentResult {
            score: NEUTRAL_SCORE,
            mean_rating: NEUTRAL_SCORE,
            comment_count: 0,
        };
    }

    let score_sum: f64 = comments.iter().map(|c| score(&c.text)).sum();
    let rating_sum: f64 = comments.iter().map(|c| c.rating as f64).sum();
    let count = comments.len();

    SentimentResult {
        score: round2(score_sum / count as f64),
        mean_rating: round2(rating_sum / count as f64),
        comment_count: count,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
