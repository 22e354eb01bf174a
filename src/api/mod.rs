//! Official-API data path: product search and per-product reviews over the
//! site's JSON endpoints.
//!
//! An alternative to markup scraping that emits the same record shapes. The
//! API carries less listing detail (no star rating unless the search result
//! embeds a review summary) but is stable and needs no browser disguise, so
//! requests here are plain JSON GETs without identity rotation.

use std::time::Duration;

use once_cell::sync::Lazy;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, ClientBuilder};
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use crate::extractor::model::NAME_UNAVAILABLE;
use crate::extractor::{CommentRecord, ProductRecord};
use crate::fetcher::FetchError;

/// Production API host.
pub const API_BASE: &str = "https://api.mercadolibre.com";

/// Argentina site.
const SITE_ID: &str = "MLA";

/// Shipping categories the search endpoint distinguishes.
pub const SHIPPING_FREE: &str = "free";
pub const SHIPPING_PAID: &str = "paid";

const API_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_RATING: u8 = 3;

const QUERY_ENCODE: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'#').add(b'&').add(b'+').add(b'?');

static API_CLIENT: Lazy<Client> = Lazy::new(|| {
    let mut headers = HeaderMap::new();
    headers.insert(
        reqwest::header::ACCEPT,
        HeaderValue::from_static("application/json"),
    );
    ClientBuilder::new()
        .default_headers(headers)
        .build()
        .expect("Failed to build API client")
});

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("api response is not valid json: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: Option<String>,
    title: Option<String>,
    price: Option<f64>,
    permalink: Option<String>,
    shipping: Option<ShippingInfo>,
    reviews: Option<ReviewSummary>,
}

#[derive(Debug, Deserialize)]
struct ShippingInfo {
    #[serde(default)]
    free_shipping: bool,
}

#[derive(Debug, Deserialize)]
struct ReviewSummary {
    rating_average: Option<f64>,
    total: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ReviewsResponse {
    #[serde(default)]
    reviews: Vec<ReviewEntry>,
}

#[derive(Debug, Deserialize)]
struct ReviewEntry {
    content: Option<String>,
    rate: Option<u8>,
}

pub struct ApiClient {
    base_url: String,
    timeout: Duration,
}

impl ApiClient {
    pub fn new() -> Self {
        Self {
            base_url: API_BASE.to_string(),
            timeout: API_TIMEOUT,
        }
    }

    /// Point the client at a different API host (tests use a mock server).
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        self.base_url = base.into();
        self
    }

    /// Search for products, up to `limit` results.
    #[instrument(skip(self))]
    pub async fn search_products(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<ProductRecord>, ApiError> {
        let url = search_url(&self.base_url, query, limit);
        let body = self.get_text(&url).await?;
        let parsed: SearchResponse = serde_json::from_str(&body)?;
        Ok(parsed.results.into_iter().map(product_from_item).collect())
    }

    /// Fetch up to `max_reviews` reviews for a product identifier. Products
    /// without reviews resolve to an empty list; the endpoint 404s for them.
    #[instrument(skip(self))]
    pub async fn product_reviews(
        &self,
        product_id: &str,
        max_reviews: usize,
    ) -> Result<Vec<CommentRecord>, ApiError> {
        let url = format!("{}/reviews/item/{}", self.base_url, product_id);
        let body = match self.get_text(&url).await {
            Ok(body) => body,
            Err(ApiError::Fetch(FetchError::HttpStatus(_))) => return Ok(Vec::new()),
            Err(err) => return Err(err),
        };
        let parsed: ReviewsResponse = serde_json::from_str(&body)?;
        Ok(parsed
            .reviews
            .into_iter()
            .take(max_reviews)
            .filter_map(|review| {
                CommentRecord::new(
                    review.content.unwrap_or_default(),
                    review.rate.unwrap_or(DEFAULT_RATING),
                )
            })
            .collect())
    }

    async fn get_text(&self, url: &str) -> Result<String, ApiError> {
        let response = API_CLIENT
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status).into());
        }

        response
            .text()
            .await
            .map_err(|e| ApiError::Fetch(FetchError::Transport(e.to_string())))
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

fn search_url(base: &str, query: &str, limit: usize) -> String {
    let encoded = utf8_percent_encode(query.trim(), QUERY_ENCODE);
    format!("{base}/sites/{SITE_ID}/search?q={encoded}&limit={limit}")
}

fn product_from_item(item: SearchItem) -> ProductRecord {
    let (stars, rating_count) = item
        .reviews
        .map(|summary| (summary.rating_average.unwrap_or(0.0), summary.total.unwrap_or(0)))
        .unwrap_or((0.0, 0));
    let shipping = if item.shipping.is_some_and(|s| s.free_shipping) {
        SHIPPING_FREE
    } else {
        SHIPPING_PAID
    };

    ProductRecord {
        id: item.id,
        name: item.title.unwrap_or_else(|| NAME_UNAVAILABLE.to_string()),
        price: item.price.unwrap_or(0.0),
        stars,
        rating_count,
        shipping: shipping.to_string(),
        url: item.permalink.unwrap_or_default(),
        comments: Vec::new(),
    }
}
