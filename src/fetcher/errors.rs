use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("request timeout after {0:?}")]
    Timeout(Duration),

    #[error("http status {0}")]
    HttpStatus(StatusCode),

    #[error("transport error: {0}")]
    Transport(String),
}

impl FetchError {
    /// True for HTTP 403, which on the target site almost always means the
    /// scraper has been detected and blocked rather than a missing page.
    pub fn is_access_blocked(&self) -> bool {
        matches!(self, Self::HttpStatus(status) if *status == StatusCode::FORBIDDEN)
    }

    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else if let Some(status) = err.status() {
            Self::HttpStatus(status)
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Whether an error looks like a TLS/certificate failure. reqwest does not
/// expose a dedicated predicate, so walk the source chain and inspect the
/// messages. Gates the one no-verification retry in the client.
pub fn is_tls_failure(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(current) = source {
        let msg = current.to_string().to_lowercase();
        if msg.contains("certificate") || msg.contains("tls") || msg.contains("ssl") {
            return true;
        }
        source = current.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use std::fmt;

    use super::*;

    #[derive(Debug)]
    struct ChainError {
        msg: &'static str,
        source: Option<Box<dyn std::error::Error + 'static>>,
    }

    impl ChainError {
        fn new(msg: &'static str) -> Self {
            Self { msg, source: None }
        }

        fn wrapping(msg: &'static str, source: ChainError) -> Self {
            Self {
                msg,
                source: Some(Box::new(source)),
            }
        }
    }

    impl fmt::Display for ChainError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.msg)
        }
    }

    impl std::error::Error for ChainError {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            self.source.as_deref()
        }
    }

    #[test]
    fn tls_failure_detected_at_top_level() {
        assert!(is_tls_failure(&ChainError::new(
            "certificate verify failed"
        )));
        assert!(is_tls_failure(&ChainError::new("tls handshake eof")));
        assert!(is_tls_failure(&ChainError::new("SSL routines error")));
    }

    #[test]
    fn tls_failure_detected_deep_in_source_chain() {
        let err = ChainError::wrapping(
            "error sending request",
            ChainError::wrapping("client error", ChainError::new("invalid peer certificate")),
        );
        assert!(is_tls_failure(&err));
    }

    #[test]
    fn non_tls_transport_errors_are_not_tls_failures() {
        assert!(!is_tls_failure(&ChainError::new("connection reset by peer")));

        let err = ChainError::wrapping("error sending request", ChainError::new("dns failure"));
        assert!(!is_tls_failure(&err));
    }

    #[test]
    fn forbidden_is_access_blocked() {
        let err = FetchError::HttpStatus(StatusCode::FORBIDDEN);
        assert!(err.is_access_blocked());

        let err = FetchError::HttpStatus(StatusCode::NOT_FOUND);
        assert!(!err.is_access_blocked());

        let err = FetchError::Transport("connection reset".to_string());
        assert!(!err.is_access_blocked());
    }
}
