//! Scrape session: sequential page and product fetching with pacing.
//!
//! One logical thread of control per session. Requests are issued strictly
//! sequentially with randomized delays between them; this is backpressure
//! against the remote service, not performance throttling, and every bit of
//! pacing in the crate lives here. Individual page or product failures are
//! logged and skipped; a partial result set is an expected outcome.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::{ScrapeConfig, ScrapePolicy};
use crate::extractor::{ProductRecord, extract_comments, extract_listing};
use crate::fetcher::fetch;

/// Production listing host.
pub const LISTING_BASE: &str = "https://listado.mercadolibre.com.ar";

/// Characters escaped inside the query-filter fragment of a listing URL.
const TERM_ENCODE: &AsciiSet = &CONTROLS.add(b' ').add(b'#').add(b'[').add(b']');

pub struct ScrapeSession {
    config: ScrapeConfig,
    policy: ScrapePolicy,
    listing_base: String,
    cancel: CancellationToken,
}

impl ScrapeSession {
    pub fn new(config: ScrapeConfig, policy: ScrapePolicy) -> Self {
        Self {
            config,
            policy,
            listing_base: LISTING_BASE.to_string(),
            cancel: CancellationToken::new(),
        }
    }

    /// Point the session at a different listing host (tests use a mock
    /// server).
    pub fn with_listing_base(mut self, base: impl Into<String>) -> Self {
        self.listing_base = base.into();
        self
    }

    /// Token checked at page and product loop boundaries; cancelling mid-fetch
    /// takes effect at the next boundary.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Run the session to completion, returning whatever was extracted.
    pub async fn run(&self) -> Vec<ProductRecord> {
        let listing_url = build_listing_url(&self.listing_base, &self.config.search_term);
        info!(url = %listing_url, pages = self.config.max_pages, "starting scrape");

        let mut products = Vec::new();

        for page in 1..=self.config.max_pages {
            if self.cancel.is_cancelled() {
                info!(page, "scrape cancelled before page fetch");
                break;
            }
            if page > 1 {
                sleep(self.policy.page_delay.sample()).await;
            }

            let url = page_url(&listing_url, page);
            match fetch(&url, &self.policy.fetch).await {
                Ok(html) => {
                    let page_products = extract_listing(&html, self.policy.min_pattern_blocks);
                    if page_products.is_empty() {
                        warn!(page, "no extractable products on page");
                    } else {
                        info!(page, count = page_products.len(), "extracted products");
                    }
                    products.extend(page_products);
                }
                Err(err) if err.is_access_blocked() => {
                    warn!(page, "got 403, the site is likely blocking scraper traffic");
                }
                Err(err) => {
                    warn!(page, %err, "failed to fetch listing page");
                }
            }
        }

        if self.config.fetch_comments && !products.is_empty() {
            self.attach_comments(&mut products).await;
        }

        products
    }

    /// Fetch review comments for the first N products, sequentially.
    async fn attach_comments(&self, products: &mut [ProductRecord]) {
        let limit = self.config.max_comment_products.min(products.len());

        for (index, product) in products.iter_mut().take(limit).enumerate() {
            if self.cancel.is_cancelled() {
                info!("scrape cancelled before comment fetch");
                break;
            }
            if index > 0 {
                sleep(self.policy.product_delay.sample()).await;
            }
            if product.url.is_empty() {
                debug!(name = %product.name, "product has no url, skipping comments");
                continue;
            }

            match fetch(&product.url, &self.policy.fetch).await {
                Ok(html) => {
                    // Settle delay between the fetch and the parse
                    sleep(self.policy.comment_delay.sample()).await;
                    let comments =
                        extract_comments(&html, self.policy.max_comments_per_product);
                    debug!(name = %product.name, count = comments.len(), "extracted comments");
                    product.attach_comments(comments);
                }
                Err(err) => {
                    warn!(url = %product.url, %err, "failed to fetch product page");
                }
            }
        }
    }
}

/// Build the listing URL for a search term. Multi-word terms become a
/// hyphenated path slug plus the site's query-filter fragment; single words
/// use the short form.
pub fn build_listing_url(base: &str, term: &str) -> String {
    let term = term.trim();
    if term.contains(' ') {
        let slug = term.replace(' ', "-");
        let encoded = utf8_percent_encode(term, TERM_ENCODE);
        format!("{base}/{slug}?sb=all_mercadolibre#D[A:{encoded}]")
    } else {
        format!("{base}/{term}#D[A:{term}]")
    }
}

/// URL for page n of a listing. The page parameter goes into the query
/// string, before the `#D[A:…]` filter fragment, so the server actually sees
/// it.
fn page_url(listing_url: &str, page: u32) -> String {
    if page == 1 {
        return listing_url.to_string();
    }
    let (head, fragment) = match listing_url.split_once('#') {
        Some((head, fragment)) => (head, Some(fragment)),
        None => (listing_url, None),
    };
    let sep = if head.contains('?') { '&' } else { '?' };
    match fragment {
        Some(fragment) => format!("{head}{sep}page={page}#{fragment}"),
        None => format!("{head}{sep}page={page}"),
    }
}
