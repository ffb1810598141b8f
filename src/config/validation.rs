use crate::config::types::{Config, CrawlConfig, OutputConfig, ProxyConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawl_config(&config.crawl)?;
    if let Some(proxy) = &config.proxy {
        validate_proxy_config(proxy)?;
    }
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawl configuration
///
/// Note: the locale is deliberately NOT validated. Malformed locale codes are
/// passed through to the proxy service uninterpreted.
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.keywords.is_empty() {
        return Err(ConfigError::Validation(
            "at least one keyword is required".to_string(),
        ));
    }

    for keyword in &config.keywords {
        if keyword.trim().is_empty() {
            return Err(ConfigError::Validation(
                "keywords must not be blank".to_string(),
            ));
        }
    }

    if config.max_concurrent_fetches < 1 || config.max_concurrent_fetches > 100 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_fetches must be between 1 and 100, got {}",
            config.max_concurrent_fetches
        )));
    }

    if config.detail_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "detail_timeout_secs must be >= 1".to_string(),
        ));
    }

    let site_root = Url::parse(&config.site_root)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid site_root: {}", e)))?;

    if site_root.scheme() != "http" && site_root.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "site_root must be an HTTP(S) URL, got '{}'",
            config.site_root
        )));
    }

    Ok(())
}

/// Validates proxy configuration
fn validate_proxy_config(config: &ProxyConfig) -> Result<(), ConfigError> {
    if config.api_key.is_empty() {
        return Err(ConfigError::Validation(
            "proxy api_key cannot be empty".to_string(),
        ));
    }

    Url::parse(&config.endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid proxy endpoint: {}", e)))?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    if config.snapshot_filename.is_empty() {
        return Err(ConfigError::Validation(
            "snapshot_filename cannot be empty".to_string(),
        ));
    }

    Ok(())
}
