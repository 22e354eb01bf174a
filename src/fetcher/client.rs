use once_cell::sync::Lazy;
use reqwest::{Client, ClientBuilder};
use tracing::{instrument, warn};

use crate::fetcher::{
    decode::decode_body,
    errors::{FetchError, is_tls_failure},
    identity::{FetchPolicy, browser_headers},
};

static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .redirect(reqwest::redirect::Policy::limited(10))
        .default_headers(browser_headers())
        .build()
        .expect("Failed to build HTTP client")
});

/// Client with certificate verification disabled, used for exactly one retry
/// after a TLS failure on the verifying client.
static INSECURE_CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .redirect(reqwest::redirect::Policy::limited(10))
        .default_headers(browser_headers())
        .danger_accept_invalid_certs(true)
        .build()
        .expect("Failed to build insecure HTTP client")
});

/// Fetch a page and return its decoded body text.
///
/// A 4xx/5xx status resolves to `FetchError::HttpStatus` without retry. A TLS
/// failure is retried once with certificate verification disabled; if that
/// also fails the result is `FetchError::Transport`. All failure paths are
/// typed; nothing here panics.
#[instrument(skip_all, fields(url = %url))]
pub async fn fetch(url: &str, policy: &FetchPolicy) -> Result<String, FetchError> {
    let parsed_url = url::Url::parse(url)?;
    let user_agent = policy.pick_user_agent().to_string();

    let response = match send(&HTTP_CLIENT, parsed_url.clone(), &user_agent, policy).await {
        Ok(response) => response,
        Err(err) if is_tls_failure(&err) => {
            warn!("tls failure, retrying once without certificate verification");
            send(&INSECURE_CLIENT, parsed_url, &user_agent, policy)
                .await
                .map_err(|e| FetchError::Transport(e.to_string()))?
        }
        Err(err) => return Err(FetchError::from_reqwest(err, policy.timeout)),
    };

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::HttpStatus(status));
    }

    let body_bytes = response
        .bytes()
        .await
        .map_err(|e| FetchError::Transport(e.to_string()))?;

    Ok(decode_body(&body_bytes))
}

async fn send(
    client: &Client,
    url: url::Url,
    user_agent: &str,
    policy: &FetchPolicy,
) -> Result<reqwest::Response, reqwest::Error> {
    client
        .get(url)
        .header(reqwest::header::USER_AGENT, user_agent)
        .timeout(policy.timeout)
        .send()
        .await
}
