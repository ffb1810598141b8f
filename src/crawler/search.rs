//! Search-results extraction
//!
//! Parses a search-results page into an ordered sequence of result stubs.
//! Document order of the grid containers is the site's relevance order, so the
//! output sequence preserves it.

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use url::Url;

/// Proxy-relay origin that can leak into hrefs when pages are fetched through
/// the relay; stripped before detail URLs are resolved
pub const PROXY_ORIGIN: &str = "https://proxy.scrapeops.io";

/// Lightweight search-result reference awaiting detail enrichment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultStub {
    /// Accessible label of the result anchor
    pub name: Option<String>,

    /// Absolute detail-page URL on the canonical site
    pub url: String,

    /// Thumbnail image URL
    pub image: Option<String>,
}

/// Builds the search URL for a keyword
///
/// Spaces in the keyword become `+`, matching how the site's own search box
/// submits queries.
pub fn search_url(site_root: &Url, keyword: &str) -> String {
    let formatted = keyword.replace(' ', "+");
    let mut url = site_root.clone();
    url.set_path("/search/pins/");
    url.set_query(Some(&format!("q={}&rs=typed", formatted)));
    url.to_string()
}

/// Extracts result stubs from a search-results page
///
/// Each grid-item container contributes one stub built from its anchor
/// (accessible label and href) and descendant image (source). A missing image
/// or label degrades that field to `None`; a missing anchor makes the detail
/// URL unextractable, so that container is excluded entirely. The output never
/// contains a stub without a URL.
///
/// # Arguments
///
/// * `html` - The search-results markup
/// * `site_root` - Canonical site root detail hrefs are resolved against
pub fn extract_search_results(html: &str, site_root: &Url) -> Vec<SearchResultStub> {
    let document = Html::parse_document(html);

    let card_selector = match Selector::parse("div[data-grid-item='true']") {
        Ok(sel) => sel,
        Err(_) => return Vec::new(),
    };
    let anchor_selector = match Selector::parse("a") {
        Ok(sel) => sel,
        Err(_) => return Vec::new(),
    };
    let image_selector = match Selector::parse("img") {
        Ok(sel) => sel,
        Err(_) => return Vec::new(),
    };

    let mut stubs = Vec::new();

    for card in document.select(&card_selector) {
        // A stub without its detail URL is unusable; skip the whole container.
        let anchor = match card.select(&anchor_selector).next() {
            Some(anchor) => anchor,
            None => continue,
        };
        let href = match anchor.value().attr("href") {
            Some(href) => href,
            None => continue,
        };
        let url = match rewrite_detail_url(href, site_root) {
            Some(url) => url,
            None => continue,
        };

        let name = anchor.value().attr("aria-label").map(str::to_string);
        let image = card
            .select(&image_selector)
            .next()
            .and_then(|img| img.value().attr("src"))
            .map(str::to_string);

        stubs.push(SearchResultStub { name, url, image });
    }

    stubs
}

/// Strips any proxy-origin literal from a raw href and re-anchors it onto the
/// canonical site root, yielding an absolute detail URL
fn rewrite_detail_url(href: &str, site_root: &Url) -> Option<String> {
    let stripped = href.trim().replacen(PROXY_ORIGIN, "", 1);
    if stripped.is_empty() {
        return None;
    }
    site_root.join(&stripped).ok().map(|u| u.to_string())
}
