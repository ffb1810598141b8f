use serde::Deserialize;

/// Main configuration structure for Pinscout
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub proxy: Option<ProxyConfig>,
    pub output: OutputConfig,
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// Keywords to search for, one output file pair per keyword
    pub keywords: Vec<String>,

    /// Two-letter country/locale code passed to the proxy service.
    /// Passed through uninterpreted; the proxy service owns its meaning.
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Retry ceiling: additional attempts after the first, inclusive
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Reserved: maximum number of concurrent fetches. Accepted and
    /// validated, but scheduling is currently single-worker sequential.
    #[serde(rename = "max-concurrent-fetches", default = "default_concurrency")]
    pub max_concurrent_fetches: u32,

    /// Canonical site root used to build search URLs and re-anchor
    /// proxy-stripped detail links
    #[serde(rename = "site-root", default = "default_site_root")]
    pub site_root: String,

    /// Per-attempt timeout for detail page fetches (seconds)
    #[serde(rename = "detail-timeout-secs", default = "default_detail_timeout")]
    pub detail_timeout_secs: u64,

    /// Per-attempt timeout for search page fetches (seconds).
    /// Absent means the HTTP client default applies.
    #[serde(rename = "search-timeout-secs", default)]
    pub search_timeout_secs: Option<u64>,
}

/// Rotating-proxy service configuration
///
/// When this section is absent the crawler fetches targets directly.
#[derive(Debug, Clone, Deserialize)]
pub struct ProxyConfig {
    /// API key for the proxy service
    #[serde(rename = "api-key")]
    pub api_key: String,

    /// Proxy endpoint the target URL is rewritten against
    #[serde(default = "default_proxy_endpoint")]
    pub endpoint: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory where per-keyword CSV files are written
    pub directory: String,

    /// Filename of the diagnostic markup snapshot written on extraction
    /// failure, overwritten each time
    #[serde(rename = "snapshot-filename", default = "default_snapshot_filename")]
    pub snapshot_filename: String,
}

fn default_locale() -> String {
    "us".to_string()
}

fn default_retries() -> u32 {
    3
}

fn default_concurrency() -> u32 {
    1
}

fn default_site_root() -> String {
    "https://www.pinterest.com".to_string()
}

fn default_detail_timeout() -> u64 {
    60
}

fn default_proxy_endpoint() -> String {
    "https://proxy.scrapeops.io/v1/".to_string()
}

fn default_snapshot_filename() -> String {
    "failure-snapshot.html".to_string()
}
