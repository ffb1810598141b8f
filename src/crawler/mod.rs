//! Crawler module for the two-stage scrape pipeline
//!
//! This module contains the core pipeline logic, including:
//! - HTTP fetching with bounded retries and proxy routing
//! - Search-result extraction into lightweight stubs
//! - Detail-page extraction into enriched records
//! - Overall per-keyword coordination

mod coordinator;
mod detail;
mod fetcher;
mod search;

pub use coordinator::Coordinator;
pub use detail::{extract_pin_detail, DetailRecord};
pub use fetcher::{build_http_client, FetchError, Fetcher};
pub use search::{extract_search_results, search_url, SearchResultStub, PROXY_ORIGIN};

use crate::config::Config;
use thiserror::Error;

/// Structural extraction failure
///
/// Raised when a required element is absent from fetched markup. The upstream
/// site's markup is not versioned, so markup drift and soft blocks both land
/// here and are retried on the same budget as navigation errors.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The profile block is missing; the page is most likely blocked
    #[error("page blocked or profile info missing")]
    BlockedOrMissingProfile,

    /// A specific required element is missing from otherwise intact markup
    #[error("required element missing: {0}")]
    MissingElement(&'static str),
}

/// Runs the complete two-stage pipeline over every configured keyword
///
/// This is the main entry point. For each keyword it crawls the search
/// results into a per-keyword CSV, then re-reads that CSV and scrapes each
/// discovered detail page into a second CSV. Per-item failures are logged and
/// skipped; this function only fails on setup errors, never on individual
/// fetches.
///
/// # Arguments
///
/// * `config` - The pipeline configuration
pub async fn run_pipeline(config: Config) -> crate::Result<()> {
    let coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
