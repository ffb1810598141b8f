//! Pinscout: a keyword-driven pin board scraper
//!
//! This crate implements a two-stage scrape pipeline: a crawl stage that turns
//! keyword searches into lightweight result stubs, and a scrape stage that
//! revisits each stub's detail page for enriched attributes. Fetches can be
//! routed through a rotating-proxy service, every fetch is wrapped in bounded
//! retries, and records are appended incrementally to per-keyword CSV files.

pub mod config;
pub mod crawler;
pub mod proxy;
pub mod sink;

use thiserror::Error;

/// Main error type for Pinscout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] crawler::FetchError),

    #[error("Sink error: {0}")]
    Sink(#[from] sink::SinkError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Pinscout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{DetailRecord, SearchResultStub};
pub use proxy::FetchRoute;
pub use sink::{CsvSink, Stage};
