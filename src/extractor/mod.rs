pub mod comments;
pub mod errors;
pub mod model;
pub mod patterns;
pub mod structured;

pub use comments::extract_comments;
pub use errors::{ParseError, ValidationError};
pub use model::{CommentRecord, ProductRecord};

use tracing::{debug, warn};

/// Extract products from a listing page: structured phase first, pattern
/// phase only when the structured phase yielded nothing.
///
/// Parse failures at either phase are logged and resolve to an empty page;
/// zero products is a valid outcome, not an error.
pub fn extract_listing(html: &str, min_pattern_blocks: usize) -> Vec<ProductRecord> {
    match structured::extract_products(html) {
        Ok(products) if !products.is_empty() => {
            debug!(count = products.len(), "structured phase extracted products");
            return products;
        }
        Ok(_) => debug!("no structured product graph, trying pattern phase"),
        Err(err) => warn!(%err, "structured phase failed, trying pattern phase"),
    }

    match patterns::extract_products(html, min_pattern_blocks) {
        Ok(products) => {
            debug!(count = products.len(), "pattern phase extracted products");
            products
        }
        Err(err) => {
            warn!(%err, "pattern phase found no listing blocks");
            Vec::new()
        }
    }
}
