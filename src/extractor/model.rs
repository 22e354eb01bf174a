use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Sentinel name when no title pattern matched a block.
pub const NAME_UNAVAILABLE: &str = "unavailable";

/// Shipping category for structured-phase records; the product graph carries
/// no shipping data, so the buyer has to check the listing itself.
pub const SHIPPING_VERIFY_ON_SITE: &str = "verify on site";

/// Shipping category for pattern-phase records.
pub const SHIPPING_STANDARD: &str = "standard";

/// One product from a listing page. Emitted by the extractor and immutable
/// afterwards, except for comment attachment which only the comment-extraction
/// stage performs via [`ProductRecord::attach_comments`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRecord {
    /// Site identifier; absent for pattern-phase extractions.
    pub id: Option<String>,
    pub name: String,
    /// Currency-less decimal; 0 means unknown.
    pub price: f64,
    /// 0.0–5.0; 0 means unknown.
    pub stars: f64,
    pub rating_count: u32,
    /// Free-text shipping category.
    pub shipping: String,
    /// Absolute canonical URL, fragment and query stripped. Empty when the
    /// block exposed no product link.
    pub url: String,
    pub comments: Vec<CommentRecord>,
}

impl ProductRecord {
    pub fn attach_comments(&mut self, comments: Vec<CommentRecord>) {
        self.comments = comments;
    }
}

/// One review attached to a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentRecord {
    pub text: String,
    /// Rating the reviewer gave, 1–5. Defaults to 3 when unparseable.
    pub rating: u8,
}

impl CommentRecord {
    /// Build a record, dropping blank comments. Ratings are clamped to 1–5.
    pub fn new(text: impl Into<String>, rating: u8) -> Option<Self> {
        let text = text.into().trim().to_string();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            text,
            rating: rating.clamp(1, 5),
        })
    }
}

static TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Remove markup tags from an extracted fragment.
pub fn strip_tags(fragment: &str) -> String {
    TAG_REGEX.replace_all(fragment, "").to_string()
}

/// Collapse runs of whitespace to single spaces and trim.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text.trim(), " ").to_string()
}
