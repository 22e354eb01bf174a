//! Scrape configuration and request-pacing policy.
//!
//! `ScrapeConfig` is what a caller asks for (search term, page count, whether
//! to pull comments). `ScrapePolicy` carries the tunables that govern how the
//! session behaves against the remote site: delay ranges, the pattern-phase
//! plausibility threshold and the per-product comment cap. Keeping those as
//! policy rather than constants lets tests run with zero delays.

use std::env;
use std::time::Duration;

use rand::Rng;
use thiserror::Error;

use crate::fetcher::FetchPolicy;

/// Environment variable names used by `ScrapeConfig::from_env`.
pub const ENV_SEARCH_TERM: &str = "CATADOR_SEARCH_TERM";
pub const ENV_MAX_PAGES: &str = "CATADOR_MAX_PAGES";
pub const ENV_FETCH_COMMENTS: &str = "CATADOR_FETCH_COMMENTS";
pub const ENV_COMMENT_PRODUCTS: &str = "CATADOR_COMMENT_PRODUCTS";

const DEFAULT_SEARCH_TERM: &str = "vinos";
const DEFAULT_MAX_PAGES: u32 = 1;
const DEFAULT_FETCH_COMMENTS: bool = true;
const DEFAULT_COMMENT_PRODUCTS: usize = 10;

/// What to scrape. Validated on construction; an empty search term or a zero
/// page count is rejected before any request is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeConfig {
    pub search_term: String,
    pub max_pages: u32,
    pub fetch_comments: bool,
    /// Number of products (from the front of the result list) to fetch
    /// comments for. Clamped to the actual product count at run time.
    pub max_comment_products: usize,
}

impl ScrapeConfig {
    pub fn new(
        search_term: impl Into<String>,
        max_pages: u32,
        fetch_comments: bool,
        max_comment_products: usize,
    ) -> Result<Self, ConfigError> {
        let search_term = search_term.into();
        if search_term.trim().is_empty() {
            return Err(ConfigError::EmptySearchTerm);
        }
        if max_pages == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_pages",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(Self {
            search_term,
            max_pages,
            fetch_comments,
            max_comment_products,
        })
    }

    /// Load from environment variables, falling back to development defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let search_term =
            env::var(ENV_SEARCH_TERM).unwrap_or_else(|_| DEFAULT_SEARCH_TERM.to_string());
        let max_pages = parse_env(ENV_MAX_PAGES, DEFAULT_MAX_PAGES)?;
        let fetch_comments = parse_env(ENV_FETCH_COMMENTS, DEFAULT_FETCH_COMMENTS)?;
        let max_comment_products = parse_env(ENV_COMMENT_PRODUCTS, DEFAULT_COMMENT_PRODUCTS)?;
        Self::new(search_term, max_pages, fetch_comments, max_comment_products)
    }
}

fn parse_env<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
            field: key,
            reason: format!("could not parse {raw:?}"),
        }),
        Err(_) => Ok(default),
    }
}

/// An inclusive delay range sampled uniformly per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayRange {
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    /// Zero-length range, used by tests to disable pacing.
    pub const fn none() -> Self {
        Self { min_ms: 0, max_ms: 0 }
    }

    pub fn sample(&self) -> Duration {
        if self.max_ms <= self.min_ms {
            return Duration::from_millis(self.min_ms);
        }
        let ms = rand::thread_rng().gen_range(self.min_ms..=self.max_ms);
        Duration::from_millis(ms)
    }
}

/// Request pacing and extraction thresholds.
#[derive(Debug, Clone)]
pub struct ScrapePolicy {
    /// Delay between listing page fetches.
    pub page_delay: DelayRange,
    /// Delay between per-product comment fetches.
    pub product_delay: DelayRange,
    /// Settle delay after fetching a product page, before parsing comments.
    pub comment_delay: DelayRange,
    /// Minimum block-pattern match count for the pattern phase to trust a
    /// pattern as the authoritative block set.
    pub min_pattern_blocks: usize,
    /// Comments attached per product.
    pub max_comments_per_product: usize,
    pub fetch: FetchPolicy,
}

impl Default for ScrapePolicy {
    fn default() -> Self {
        Self {
            page_delay: DelayRange::new(2000, 3000),
            product_delay: DelayRange::new(2000, 3000),
            comment_delay: DelayRange::new(1000, 2000),
            min_pattern_blocks: 5,
            max_comments_per_product: 5,
            fetch: FetchPolicy::default(),
        }
    }
}

impl ScrapePolicy {
    /// Policy with all delays disabled, for tests.
    pub fn immediate() -> Self {
        Self {
            page_delay: DelayRange::none(),
            product_delay: DelayRange::none(),
            comment_delay: DelayRange::none(),
            ..Self::default()
        }
    }
}

/// Errors building a configuration. The only hard failures in the crate.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("search term must not be empty")]
    EmptySearchTerm,

    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}
