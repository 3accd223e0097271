//! Bounded-timeout page fetching
//!
//! The fetcher is the one external call with an explicit timeout. Every
//! failure mode (timeout, transport error, non-2xx status, empty body)
//! collapses into `None` so callers can treat it as a "no content"
//! condition instead of handling an error.

use std::time::Duration;

use tracing::warn;

/// Fetch a page body, returning `None` on any failure.
pub async fn fetch_page(
    client: &reqwest::Client,
    url: &str,
    timeout_secs: u64,
    user_agent: &str,
) -> Option<String> {
    let response = match client
        .get(url)
        .header(reqwest::header::USER_AGENT, user_agent)
        .timeout(Duration::from_secs(timeout_secs))
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            warn!(url, error = %e, "page fetch failed");
            return None;
        }
    };

    if !response.status().is_success() {
        warn!(url, status = %response.status(), "page fetch returned non-success status");
        return None;
    }

    match response.text().await {
        Ok(body) if !body.is_empty() => Some(body),
        Ok(_) => {
            warn!(url, "page fetch returned an empty body");
            None
        }
        Err(e) => {
            warn!(url, error = %e, "failed to read page body");
            None
        }
    }
}
