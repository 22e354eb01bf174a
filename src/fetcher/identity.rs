//! Browser-like request identity: header set and rotating user agents.
//!
//! The target site fingerprints clients aggressively; a bare reqwest default
//! request is blocked almost immediately. Every request therefore carries a
//! full desktop-browser header set and a user agent drawn pseudo-randomly
//! from a pool spanning OS/browser combinations.

use std::time::Duration;

use rand::seq::SliceRandom;
use reqwest::header::{HeaderMap, HeaderValue};

/// Desktop user agents rotated per request.
pub const USER_AGENTS: [&str; 4] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/92.0.4515.107 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:90.0) Gecko/20100101 Firefox/90.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.1.1 Safari/605.1.15",
];

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Per-request fetch behavior. The user-agent pool is part of the policy so
/// tests can pin a single deterministic identity.
#[derive(Debug, Clone)]
pub struct FetchPolicy {
    pub timeout: Duration,
    pub user_agents: Vec<String>,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agents: USER_AGENTS.iter().map(|ua| ua.to_string()).collect(),
        }
    }
}

impl FetchPolicy {
    pub fn pick_user_agent(&self) -> &str {
        self.user_agents
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
            .unwrap_or(USER_AGENTS[0])
    }
}

/// Static headers sent with every request. Accept-Encoding is deliberately
/// absent: reqwest negotiates gzip/brotli/deflate itself and transparently
/// decompresses only when it owns that header.
pub fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        reqwest::header::ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(
        reqwest::header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("es-ES,es;q=0.9,en;q=0.8"),
    );
    headers.insert(
        reqwest::header::CONNECTION,
        HeaderValue::from_static("keep-alive"),
    );
    headers.insert(
        reqwest::header::UPGRADE_INSECURE_REQUESTS,
        HeaderValue::from_static("1"),
    );
    headers.insert("Sec-Fetch-Dest", HeaderValue::from_static("document"));
    headers.insert("Sec-Fetch-Mode", HeaderValue::from_static("navigate"));
    headers.insert("Sec-Fetch-Site", HeaderValue::from_static("none"));
    headers.insert(
        reqwest::header::CACHE_CONTROL,
        HeaderValue::from_static("max-age=0"),
    );
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_has_multiple_identities() {
        assert!(USER_AGENTS.len() >= 4);
        let policy = FetchPolicy::default();
        assert_eq!(policy.user_agents.len(), USER_AGENTS.len());
    }

    #[test]
    fn picked_agent_comes_from_pool() {
        let policy = FetchPolicy::default();
        for _ in 0..20 {
            let ua = policy.pick_user_agent();
            assert!(USER_AGENTS.contains(&ua));
        }
    }

    #[test]
    fn empty_pool_falls_back_to_first_builtin() {
        let policy = FetchPolicy {
            user_agents: Vec::new(),
            ..FetchPolicy::default()
        };
        assert_eq!(policy.pick_user_agent(), USER_AGENTS[0]);
    }

    #[test]
    fn headers_cover_browser_fingerprint() {
        let headers = browser_headers();
        assert!(headers.contains_key(reqwest::header::ACCEPT));
        assert!(headers.contains_key(reqwest::header::ACCEPT_LANGUAGE));
        assert!(headers.contains_key("Sec-Fetch-Mode"));
        assert!(headers.contains_key(reqwest::header::UPGRADE_INSECURE_REQUESTS));
    }
}
