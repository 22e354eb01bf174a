use thiserror::Error;

/// Page-level parse failures. Never fatal to a scrape: the caller logs them
/// and treats the page as yielding zero products.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("structured data block is not valid JSON: {0}")]
    MalformedStructuredData(#[from] serde_json::Error),

    #[error("no block pattern matched at least {min_blocks} product blocks")]
    NoMatchingPattern { min_blocks: usize },
}

/// Field-level numeric parse failure. Callers fall back to the documented
/// default (0 or 3) rather than propagating.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("invalid numeric field '{field}': {raw:?}")]
    InvalidNumericField { field: &'static str, raw: String },
}

/// Parse a decimal field after stripping currency symbols and separators.
pub fn parse_decimal(field: &'static str, raw: &str) -> Result<f64, ValidationError> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    cleaned
        .parse()
        .map_err(|_| ValidationError::InvalidNumericField {
            field,
            raw: raw.to_string(),
        })
}
