//! The analysis pass: sentiment aggregation, aspect detection and the
//! recommendation rules applied product by product.
//!
//! Pure and stateless: the scorer and detector never mutate the products,
//! so the pass can be re-run whenever upstream data changes.

use serde::Serialize;

use crate::aspects;
use crate::extractor::ProductRecord;
use crate::recommend::{RecommendationResult, evaluate};
use crate::sentiment::analyze::{SentimentResult, analyze_product};

/// Everything the presentation layer needs for one product.
#[derive(Debug, Clone, Serialize)]
pub struct ProductReport {
    pub product: ProductRecord,
    pub sentiment: SentimentResult,
    pub verdict: RecommendationResult,
}

pub fn analyze_products(products: &[ProductRecord]) -> Vec<ProductReport> {
    products
        .iter()
        .map(|product| {
            let sentiment = analyze_product(product);
            let flags = aspects::detect_all(product.comments.iter().map(|c| c.text.as_str()));
            ProductReport {
                product: product.clone(),
                sentiment,
                verdict: evaluate(sentiment.score, flags),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::CommentRecord;
    use crate::extractor::model::SHIPPING_VERIFY_ON_SITE;
    use crate::recommend::{Recommendation, SentimentCategory};

    fn product(comments: Vec<CommentRecord>) -> ProductRecord {
        let mut product = ProductRecord {
            id: Some("MLA123".to_string()),
            name: "Vino Malbec Reserva".to_string(),
            price: 8500.0,
            stars: 4.7,
            rating_count: 342,
            shipping: SHIPPING_VERIFY_ON_SITE.to_string(),
            url: "https://articulo.mercadolibre.com.ar/MLA-123".to_string(),
            comments: Vec::new(),
        };
        product.attach_comments(comments);
        product
    }

    #[test]
    fn positive_aroma_comment_recommends_for_aroma() {
        let comments =
            vec![CommentRecord::new("Excelente vino, muy buen aroma frutal y equilibrado.", 5)
                .unwrap()];
        let reports = analyze_products(&[product(comments)]);
        let report = &reports[0];

        assert!(report.sentiment.score > 4.0);
        assert_eq!(report.verdict.category, SentimentCategory::Positive);
        assert!(report.verdict.aspects.aroma);
        assert!(!report.verdict.aspects.price);
        assert!(!report.verdict.aspects.shipping);
        assert_eq!(report.verdict.recommendation, Recommendation::Aroma);
        assert_eq!(
            report.verdict.recommendation.label(),
            "RECOMMENDED: primarily for its aroma."
        );
    }

    #[test]
    fn negative_comment_is_not_recommended_regardless_of_aspects() {
        let comments =
            vec![CommentRecord::new("Muy malo, sabor desagradable. No lo recomiendo.", 1).unwrap()];
        let reports = analyze_products(&[product(comments)]);
        let report = &reports[0];

        assert!(report.sentiment.score < 2.5);
        assert_eq!(report.verdict.category, SentimentCategory::Negative);
        assert_eq!(
            report.verdict.recommendation,
            Recommendation::NotRecommended
        );
        assert_eq!(
            report.verdict.recommendation.label(),
            "NOT RECOMMENDED: negative evaluation."
        );
    }

    #[test]
    fn commentless_product_lands_neutral() {
        let reports = analyze_products(&[product(Vec::new())]);
        let report = &reports[0];
        assert_eq!(report.sentiment.score, 3.0);
        assert_eq!(report.verdict.recommendation, Recommendation::Neutral);
    }

    #[test]
    fn aspects_union_across_comments_feeds_the_rules() {
        let comments = vec![
            CommentRecord::new("Excelente aroma frutal.", 5).unwrap(),
            CommentRecord::new("Muy buena relacion precio calidad.", 5).unwrap(),
        ];
        let reports = analyze_products(&[product(comments)]);
        let report = &reports[0];

        assert!(report.verdict.aspects.aroma);
        assert!(report.verdict.aspects.price);
        assert_eq!(
            report.verdict.recommendation,
            Recommendation::AromaAndValue
        );
    }
}
