//! Structured-data phase: extraction from the machine-readable JSON the site
//! embeds in its listing pages, either as a linked-data script block or as the
//! client-side preloaded-state assignment.
//!
//! The absence of a block, or a block without the expected product graph, is
//! an empty result rather than an error so the caller can fall back to the
//! pattern phase. Only malformed JSON inside a located block surfaces as a
//! `ParseError`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::extractor::errors::ParseError;
use crate::extractor::model::{NAME_UNAVAILABLE, ProductRecord, SHIPPING_VERIFY_ON_SITE};

static JSON_LD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<script type="application/ld\+json">(.*?)</script>"#).unwrap()
});

static PRELOADED_STATE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)window\.__PRELOADED_STATE__\s*=\s*(\{.*?\});").unwrap());

static CANONICAL_URL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(https://[^#?]*)").unwrap());

/// Extract products from an embedded JSON product graph, if the page has one.
pub fn extract_products(html: &str) -> Result<Vec<ProductRecord>, ParseError> {
    let Some(block) = locate_json_block(html) else {
        return Ok(Vec::new());
    };

    let data: Value = serde_json::from_str(block.trim())?;

    let Some(graph) = data.get("@graph").and_then(Value::as_array) else {
        return Ok(Vec::new());
    };

    let products = graph
        .iter()
        .filter(|item| item.get("@type").and_then(Value::as_str) == Some("Product"))
        .map(product_from_graph_entry)
        .collect();

    Ok(products)
}

fn locate_json_block(html: &str) -> Option<&str> {
    JSON_LD_REGEX
        .captures(html)
        .or_else(|| PRELOADED_STATE_REGEX.captures(html))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn product_from_graph_entry(item: &Value) -> ProductRecord {
    let rating = item.get("aggregateRating");
    let offers = item.get("offers");

    let url = offers
        .and_then(|o| o.get("url"))
        .and_then(Value::as_str)
        .map(canonicalize_url)
        .unwrap_or_default();

    ProductRecord {
        id: item
            .get("productID")
            .and_then(Value::as_str)
            .map(str::to_string),
        name: item
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(NAME_UNAVAILABLE)
            .to_string(),
        price: offers
            .and_then(|o| o.get("price"))
            .and_then(numeric_value)
            .unwrap_or(0.0),
        stars: rating
            .and_then(|r| r.get("ratingValue"))
            .and_then(numeric_value)
            .unwrap_or(0.0),
        rating_count: rating
            .and_then(|r| r.get("ratingCount"))
            .and_then(numeric_value)
            .unwrap_or(0.0) as u32,
        shipping: SHIPPING_VERIFY_ON_SITE.to_string(),
        url,
        comments: Vec::new(),
    }
}

/// Strip fragment and query, keeping the absolute product URL.
fn canonicalize_url(raw: &str) -> String {
    CANONICAL_URL_REGEX
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// JSON-LD emits numbers both as JSON numbers and as quoted strings.
fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
