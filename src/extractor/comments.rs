//! Review extraction from a product page.
//!
//! Same ordered-pattern discipline as the listing pattern phase, but with a
//! laxer acceptance rule: the first block pattern yielding any matches wins,
//! since a product legitimately may have only one or two reviews.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::extractor::model::{CommentRecord, collapse_whitespace, strip_tags};

const DEFAULT_RATING: u8 = 3;

static COMMENT_BLOCK_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(
            r#"(?s)<div[^>]*class="ui-review-capability-comments__comment[^"]*"[^>]*>.*?</div>\s*</div>\s*</div>"#,
        )
        .unwrap(),
        Regex::new(
            r#"(?s)<article[^>]*class="[^"]*ui-review-capability-reviews__review[^"]*"[^>]*>.*?</article>"#,
        )
        .unwrap(),
        Regex::new(
            r#"(?s)<div[^>]*class="ui-review-capability__review[^"]*"[^>]*>.*?</div>\s*</div>"#,
        )
        .unwrap(),
    ]
});

static TEXT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(
            r#"(?s)<p[^>]*class="ui-review-capability-comments__comment__content[^"]*"[^>]*>(.*?)</p>"#,
        )
        .unwrap(),
        Regex::new(
            r#"(?s)<p[^>]*class="ui-review-capability__summary__plain_text__summary_container"[^>]*>(.*?)</p>"#,
        )
        .unwrap(),
    ]
});

static RATING_LABEL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<p class="andes-visually-hidden">Calificación (\d+) de 5</p>"#).unwrap()
});

static STAR_ICON_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<svg class="ui-review-capability-comments__comment__rating__star""#).unwrap()
});

/// Extract up to `max_comments` reviews from a fetched product page.
/// Blocks with no recoverable text are dropped silently; a block that fails
/// per-field extraction never aborts the batch.
pub fn extract_comments(html: &str, max_comments: usize) -> Vec<CommentRecord> {
    let blocks = COMMENT_BLOCK_PATTERNS
        .iter()
        .map(|pattern| {
            pattern
                .find_iter(html)
                .map(|m| m.as_str())
                .collect::<Vec<_>>()
        })
        .find(|blocks| !blocks.is_empty())
        .unwrap_or_default();

    blocks
        .iter()
        .take(max_comments)
        .filter_map(|block| extract_comment(block))
        .collect()
}

fn extract_comment(block: &str) -> Option<CommentRecord> {
    let text = TEXT_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(block)
            .and_then(|caps| caps.get(1))
            .map(|m| collapse_whitespace(&strip_tags(m.as_str())))
    })?;

    CommentRecord::new(text, extract_rating(block))
}

/// Rating from the accessibility label, else by counting rating icons, else
/// the neutral default.
fn extract_rating(block: &str) -> u8 {
    if let Some(rating) = RATING_LABEL_PATTERN
        .captures(block)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u8>().ok())
    {
        return rating;
    }

    let star_count = STAR_ICON_PATTERN.find_iter(block).count();
    if (1..=5).contains(&star_count) {
        return star_count as u8;
    }

    DEFAULT_RATING
}
