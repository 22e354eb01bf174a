//! Pattern phase: fallback extraction from raw markup when no structured
//! data block is present.
//!
//! The page structure changes often, so every field is tried against an
//! ordered list of patterns and the first hit wins; a field with no hit falls
//! back to its documented default. Block patterns are only trusted when they
//! match a plausible number of blocks, which filters out patterns that happen
//! to match stray page chrome.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::extractor::errors::{ParseError, parse_decimal};
use crate::extractor::model::{
    NAME_UNAVAILABLE, ProductRecord, SHIPPING_STANDARD, collapse_whitespace, strip_tags,
};

static BLOCK_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(
            r#"(?s)<div[^>]*class="[^"]*ui-search-result[^"]*"[^>]*>.*?</div>\s*</div>\s*</div>\s*</div>"#,
        )
        .unwrap(),
        Regex::new(r#"(?s)<li[^>]*class="[^"]*ui-search-layout__item[^"]*"[^>]*>.*?</li>"#)
            .unwrap(),
    ]
});

static URL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r##"<a[^>]*href="(https://[^"]*?/p/[^"#]*)[#"]"##).unwrap(),
        Regex::new(r##"<a[^>]*href="(https://articulo\.mercadolibre\.[^/]*/[^"#]*)[#"]"##).unwrap(),
    ]
});

static TITLE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r#"(?s)<a[^>]*class="[^"]*poly-component__title[^"]*"[^>]*>(.*?)</a>"#)
            .unwrap(),
        Regex::new(r#"(?s)<h2[^>]*class="[^"]*ui-search-item__title[^"]*"[^>]*>(.*?)</h2>"#)
            .unwrap(),
    ]
});

static PRICE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r#"<meta[^>]*itemprop="price"[^>]*content="(\d+)""#).unwrap(),
        Regex::new(r#"<span[^>]*class="[^"]*price-tag-fraction[^"]*"[^>]*>(.*?)</span>"#).unwrap(),
    ]
});

static STARS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<p[^>]*class="[^"]*ui-review-capability__rating__average[^"]*"[^>]*>(.*?)</p>"#)
        .unwrap()
});

static RATING_COUNT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"<p[^>]*class="[^"]*ui-review-capability__rating__label[^"]*"[^>]*>([^<]*?)calificaciones</p>"#,
    )
    .unwrap()
});

static RATING_COUNT_VALUE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+[,.]?\d*)").unwrap());

/// Extract products by running the ordered block patterns over the raw page.
///
/// The first pattern matching at least `min_blocks` blocks is the
/// authoritative block set; if none reaches the threshold the page is not a
/// recognizable listing and the result is `ParseError::NoMatchingPattern`.
pub fn extract_products(html: &str, min_blocks: usize) -> Result<Vec<ProductRecord>, ParseError> {
    let blocks = BLOCK_PATTERNS
        .iter()
        .map(|pattern| {
            pattern
                .find_iter(html)
                .map(|m| m.as_str())
                .collect::<Vec<_>>()
        })
        .find(|blocks| blocks.len() >= min_blocks)
        .ok_or(ParseError::NoMatchingPattern {
            min_blocks,
        })?;

    Ok(blocks.iter().map(|block| extract_block(block)).collect())
}

fn extract_block(block: &str) -> ProductRecord {
    let url = first_capture(&URL_PATTERNS, block).unwrap_or_default();

    let name = first_capture(&TITLE_PATTERNS, block)
        .map(|raw| collapse_whitespace(&strip_tags(&raw)))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| NAME_UNAVAILABLE.to_string());

    let price = first_capture(&PRICE_PATTERNS, block)
        .and_then(|raw| parse_decimal("price", &raw).ok())
        .unwrap_or(0.0);

    let stars = STARS_PATTERN
        .captures(block)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().trim().replace(',', ".").parse().ok())
        .unwrap_or(0.0);

    let rating_count = RATING_COUNT_PATTERN
        .captures(block)
        .and_then(|caps| caps.get(1))
        .and_then(|label| RATING_COUNT_VALUE.captures(label.as_str().trim()))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().replace(['.', ','], "").parse().ok())
        .unwrap_or(0);

    ProductRecord {
        id: None,
        name,
        price,
        stars,
        rating_count,
        shipping: SHIPPING_STANDARD.to_string(),
        url,
        comments: Vec::new(),
    }
}

/// Try each pattern in order, returning the first capture. The ordered-
/// alternatives chain is the backbone of this phase: patterns earlier in a
/// list match the current markup, later entries cover older revisions.
fn first_capture(patterns: &[Regex], haystack: &str) -> Option<String> {
    patterns.iter().find_map(|pattern| {
        pattern
            .captures(haystack)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
    })
}
