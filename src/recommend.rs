//! Rule-based recommendation over aggregated sentiment and aspects.
//!
//! Six rules evaluated top-down, first match wins. An explicit decision list
//! rather than a rule engine: stateless, and exactly one label per product.

use std::fmt;

use serde::Serialize;

use crate::aspects::AspectFlags;

/// Coarse sentiment bucket derived from a numeric score by fixed thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SentimentCategory {
    Positive,
    Negative,
    Neutral,
}

impl SentimentCategory {
    /// `>= 4.0` positive, `<= 2.5` negative, else neutral. Unparseable input
    /// (NaN) is neutral.
    pub fn from_score(score: f64) -> Self {
        if score.is_nan() {
            Self::Neutral
        } else if score >= 4.0 {
            Self::Positive
        } else if score <= 2.5 {
            Self::Negative
        } else {
            Self::Neutral
        }
    }
}

/// The closed label set a product can receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Recommendation {
    AromaAndValue,
    FastShipping,
    Aroma,
    NotRecommended,
    GeneralPositive,
    Neutral,
}

impl Recommendation {
    pub fn label(&self) -> &'static str {
        match self {
            Self::AromaAndValue => "RECOMMENDED: good aroma and good price-quality ratio.",
            Self::FastShipping => "RECOMMENDED: fast shipping and positive sentiment.",
            Self::Aroma => "RECOMMENDED: primarily for its aroma.",
            Self::NotRecommended => "NOT RECOMMENDED: negative evaluation.",
            Self::GeneralPositive => "RECOMMENDED: general positive evaluation.",
            Self::Neutral => "NEUTRAL: review product details.",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A recommendation together with the inputs that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecommendationResult {
    pub recommendation: Recommendation,
    pub category: SentimentCategory,
    pub aspects: AspectFlags,
}

/// Apply the ordered rule list.
pub fn recommend(category: SentimentCategory, aspects: AspectFlags) -> Recommendation {
    use SentimentCategory::{Negative, Positive};

    if category == Positive && aspects.aroma && aspects.price {
        return Recommendation::AromaAndValue;
    }
    if category == Positive && aspects.shipping {
        return Recommendation::FastShipping;
    }
    if category == Positive && aspects.aroma {
        return Recommendation::Aroma;
    }
    if category == Negative {
        return Recommendation::NotRecommended;
    }
    if category == Positive {
        return Recommendation::GeneralPositive;
    }
    Recommendation::Neutral
}

/// Categorize a numeric score and run the rules in one step.
pub fn evaluate(score: f64, aspects: AspectFlags) -> RecommendationResult {
    let category = SentimentCategory::from_score(score);
    RecommendationResult {
        recommendation: recommend(category, aspects),
        category,
        aspects,
    }
}
