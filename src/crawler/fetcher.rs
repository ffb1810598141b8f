//! HTTP fetcher with bounded retries
//!
//! This module handles all page fetches for the pipeline, including:
//! - Building the shared HTTP client
//! - Routing targets through the configured proxy relay
//! - Retrying failed fetch-and-extract attempts up to a configured ceiling
//! - Writing a diagnostic markup snapshot when extraction fails

use crate::crawler::ExtractError;
use crate::proxy::FetchRoute;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// User agent sent with every request; the target serves its full
/// server-rendered markup to mainstream browsers
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36";

/// Errors from a fetch-and-extract operation
///
/// Both variants count against the same retry budget: a transport failure and
/// a blocked/drifted page are equally transient from the caller's view.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport or timeout failure reaching the page
    #[error("navigation failed for {url}: {message}")]
    Navigation { url: String, message: String },

    /// The page was fetched but a required structural element was missing
    #[error("extraction failed for {url}: {source}")]
    Extraction { url: String, source: ExtractError },
}

/// Builds the HTTP client shared by all fetches in a run
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages through a route and runs an extractor, with bounded retries
///
/// One `Fetcher` is built per stage so each stage carries its own per-attempt
/// timeout, while the underlying HTTP client (the session handle) is shared.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    route: FetchRoute,
    retries: u32,
    /// Per-attempt timeout; `None` means the client default applies
    timeout: Option<Duration>,
    /// Fixed path for the diagnostic snapshot, overwritten on each failure
    snapshot_path: PathBuf,
}

impl Fetcher {
    /// Creates a fetcher for one pipeline stage
    ///
    /// # Arguments
    ///
    /// * `client` - The shared HTTP client
    /// * `route` - Proxy or direct URL routing strategy
    /// * `retries` - Retry ceiling: additional attempts after the first
    /// * `timeout` - Per-attempt timeout override, `None` for the client default
    /// * `snapshot_path` - Where the failure snapshot is written
    pub fn new(
        client: Client,
        route: FetchRoute,
        retries: u32,
        timeout: Option<Duration>,
        snapshot_path: PathBuf,
    ) -> Self {
        Self {
            client,
            route,
            retries,
            timeout,
            snapshot_path,
        }
    }

    /// Fetches a target and runs an extractor over the response markup
    ///
    /// Performs at most `retries + 1` attempts. Each attempt issues exactly one
    /// fresh HTTP request, released on every exit path when the attempt ends.
    /// The first successful extraction short-circuits the remaining budget.
    /// When the extractor reports a structural failure the fetched markup is
    /// snapshotted (best-effort) before the attempt is counted as failed.
    ///
    /// # Arguments
    ///
    /// * `target` - The page URL the caller wants
    /// * `locale` - Locale code forwarded to the proxy relay
    /// * `extract` - Extractor run against the fetched markup
    ///
    /// # Returns
    ///
    /// * `Ok(T)` - The extracted value from the first successful attempt
    /// * `Err(FetchError)` - The last failure once the budget is exhausted
    pub async fn fetch_and_extract<T, F>(
        &self,
        target: &str,
        locale: &str,
        extract: F,
    ) -> Result<T, FetchError>
    where
        F: Fn(&str) -> Result<T, ExtractError>,
    {
        let fetch_url = self.route.route(target, locale);
        let mut tries: u32 = 0;

        loop {
            match self.attempt(&fetch_url, target, &extract).await {
                Ok(value) => {
                    tracing::info!("Successfully fetched: {}", target);
                    return Ok(value);
                }
                Err(err) => {
                    let remaining = self.retries.saturating_sub(tries);
                    tracing::warn!("Error: {}, tries left: {}, url: {}", err, remaining, target);

                    if tries >= self.retries {
                        return Err(err);
                    }
                    tries += 1;
                }
            }
        }
    }

    /// Performs a single fetch-and-extract attempt
    async fn attempt<T, F>(
        &self,
        fetch_url: &str,
        target: &str,
        extract: &F,
    ) -> Result<T, FetchError>
    where
        F: Fn(&str) -> Result<T, ExtractError>,
    {
        let mut request = self.client.get(fetch_url);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| FetchError::Navigation {
            url: target.to_string(),
            message: classify_transport_error(&e),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Navigation {
                url: target.to_string(),
                message: format!("HTTP {}", status),
            });
        }

        let body = response.text().await.map_err(|e| FetchError::Navigation {
            url: target.to_string(),
            message: format!("failed to read body: {}", e),
        })?;

        match extract(&body) {
            Ok(value) => Ok(value),
            Err(source) => {
                self.write_snapshot(&body);
                Err(FetchError::Extraction {
                    url: target.to_string(),
                    source,
                })
            }
        }
    }

    /// Writes the fetched markup to the fixed snapshot path
    ///
    /// Best-effort: a snapshot failure must never mask the extraction failure
    /// being reported, so it is only logged.
    fn write_snapshot(&self, body: &str) {
        if let Err(e) = std::fs::write(&self.snapshot_path, body) {
            tracing::debug!(
                "failed to write failure snapshot to {}: {}",
                self.snapshot_path.display(),
                e
            );
        }
    }
}

/// Maps a transport error to a short human-readable description
fn classify_transport_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "request timeout".to_string()
    } else if e.is_connect() {
        "connection refused".to_string()
    } else {
        e.to_string()
    }
}
