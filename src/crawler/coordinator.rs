//! Pipeline coordinator
//!
//! Drives the two stages for each configured keyword, strictly in order:
//! crawl every search result into the search CSV, then re-read that CSV and
//! scrape every discovered detail page into the detail CSV. Per-item failures
//! are logged and skipped; nothing escapes the top-level run boundary.

use crate::config::Config;
use crate::crawler::{
    build_http_client, extract_pin_detail, extract_search_results, search_url, Fetcher,
    SearchResultStub,
};
use crate::proxy::FetchRoute;
use crate::sink::{destination_for, CsvSink, Stage};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Coordinates the crawl and scrape stages for a run
pub struct Coordinator {
    config: Config,
    site_root: Url,
    sink: CsvSink,
    search_fetcher: Fetcher,
    detail_fetcher: Fetcher,
}

impl Coordinator {
    /// Creates a coordinator from a validated configuration
    ///
    /// Builds the shared HTTP client, the proxy route, one fetcher per stage
    /// (each with its own per-attempt timeout) and the CSV sink.
    pub fn new(config: Config) -> crate::Result<Self> {
        let site_root = Url::parse(&config.crawl.site_root)?;
        let sink = CsvSink::new(&config.output.directory)?;

        let client = build_http_client()?;
        let route = FetchRoute::from_config(config.proxy.as_ref());
        let snapshot_path =
            Path::new(&config.output.directory).join(&config.output.snapshot_filename);

        let search_timeout = config.crawl.search_timeout_secs.map(Duration::from_secs);
        let detail_timeout = Some(Duration::from_secs(config.crawl.detail_timeout_secs));

        let search_fetcher = Fetcher::new(
            client.clone(),
            route.clone(),
            config.crawl.retries,
            search_timeout,
            snapshot_path.clone(),
        );
        let detail_fetcher = Fetcher::new(
            client,
            route,
            config.crawl.retries,
            detail_timeout,
            snapshot_path,
        );

        Ok(Self {
            config,
            site_root,
            sink,
            search_fetcher,
            detail_fetcher,
        })
    }

    /// Runs both stages for every configured keyword
    ///
    /// Keywords are processed one after another; within a keyword the scrape
    /// stage only starts once the crawl stage has completed. The scrape stage
    /// reads its input back from the search CSV rather than from memory, so an
    /// interrupted run can be resumed by re-invocation.
    pub async fn run(&self) -> crate::Result<()> {
        if self.config.crawl.max_concurrent_fetches > 1 {
            tracing::debug!(
                "max-concurrent-fetches = {} is reserved; fetches run sequentially",
                self.config.crawl.max_concurrent_fetches
            );
        }

        for keyword in &self.config.crawl.keywords {
            tracing::info!("Crawl starting for '{}'", keyword);
            let destination = self.crawl_stage(keyword).await;
            tracing::info!("Crawl complete for '{}'", keyword);

            if let Some(destination) = destination {
                tracing::info!("Scrape starting for '{}'", keyword);
                self.scrape_stage(keyword, &destination).await;
                tracing::info!("Scrape complete for '{}'", keyword);
            }
        }

        Ok(())
    }

    /// Crawl stage: fetch the search page and persist each stub
    ///
    /// Returns the search destination filename on completion, or `None` when
    /// the search fetch failed terminally (the keyword is then skipped).
    async fn crawl_stage(&self, keyword: &str) -> Option<String> {
        let destination = destination_for(keyword, Stage::Search);
        let target = search_url(&self.site_root, keyword);
        let locale = &self.config.crawl.locale;

        let stubs = match self
            .search_fetcher
            .fetch_and_extract(&target, locale, |body| {
                Ok(extract_search_results(body, &self.site_root))
            })
            .await
        {
            Ok(stubs) => stubs,
            Err(e) => {
                tracing::error!("search failed terminally for '{}': {}", keyword, e);
                return None;
            }
        };

        tracing::info!("found {} results for '{}'", stubs.len(), keyword);

        for stub in stubs {
            // One append per stub so partial progress survives a mid-run crash.
            if let Err(e) = self.sink.append(&[stub], &destination) {
                tracing::error!("failed to persist search record for '{}': {}", keyword, e);
            }
        }

        Some(destination)
    }

    /// Scrape stage: re-read the search CSV and persist each detail record
    ///
    /// A row whose retries are exhausted is logged with its URL and skipped;
    /// sink failures likewise abort only that row's persistence.
    async fn scrape_stage(&self, keyword: &str, search_destination: &str) {
        let rows: Vec<SearchResultStub> = match self.sink.read_records(search_destination) {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!(
                    "cannot read back search records for '{}': {}",
                    keyword,
                    e
                );
                return;
            }
        };

        let destination = destination_for(keyword, Stage::Detail);
        let locale = &self.config.crawl.locale;

        for row in rows {
            let extracted = self
                .detail_fetcher
                .fetch_and_extract(&row.url, locale, |body| extract_pin_detail(body, &row))
                .await;

            match extracted {
                Ok(record) => {
                    if let Err(e) = self.sink.append(&[record], &destination) {
                        tracing::error!("failed to persist detail record for {}: {}", row.url, e);
                    }
                }
                Err(e) => {
                    tracing::warn!("skipping pin after exhausted retries: {}", e);
                }
            }
        }
    }
}
