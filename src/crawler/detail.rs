//! Detail-page extraction
//!
//! Parses a single detail page into an enriched record. The selectors here are
//! intentionally brittle against markup drift: when the site ships different
//! markup (or serves a block page) the extraction fails loudly, and the
//! fetcher treats that as a retryable condition rather than a distinct error.

use crate::crawler::{ExtractError, SearchResultStub};
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

/// Sentinel written when a pin exposes no external website
const NO_WEBSITE: &str = "n/a";

/// Literal suffix trailing the follower count in the profile text
const FOLLOWERS_SUFFIX: &str = " followers";

/// Enriched record produced by visiting a stub's detail page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailRecord {
    /// Creator profile name
    pub name: String,

    /// External website, or `"n/a"` when the pin has none
    pub website: String,

    /// Number of full rating stars (zero is valid and common)
    pub stars: u32,

    /// Raw textual follower count, unit suffixes like "K"/"M" preserved
    pub follower_count: String,

    /// Thumbnail carried over from the originating stub; detail pages do not
    /// re-expose a reliable primary image
    pub image: Option<String>,
}

/// Extracts an enriched record from a detail page
///
/// The follower-count container (nested in the main details container) is
/// required: its absence is the primary soft-block signal and fails the
/// attempt with [`ExtractError::BlockedOrMissingProfile`]. The website span
/// and rating stars are optional and degrade to `"n/a"` and `0`. A follower
/// container without a readable creator name is still an extraction failure;
/// a record is never emitted with an undefined name.
///
/// # Arguments
///
/// * `html` - The detail-page markup
/// * `stub` - The originating search stub, source of the carried-over image
pub fn extract_pin_detail(
    html: &str,
    stub: &SearchResultStub,
) -> Result<DetailRecord, ExtractError> {
    let document = Html::parse_document(html);

    // Optional fields are read defensively from the whole document before the
    // required profile block is checked.
    let website = extract_website(&document);
    let stars = count_stars(&document);

    let follower = find_follower_container(&document)
        .ok_or(ExtractError::BlockedOrMissingProfile)?;
    let profile_text: String = follower.text().collect();

    let name = extract_creator_name(follower)
        .ok_or(ExtractError::MissingElement("creator profile name"))?;

    // The profile text reads "<name><count> followers"; stripping the name and
    // the literal suffix leaves the raw count verbatim.
    let follower_count = profile_text
        .replacen(&name, "", 1)
        .replacen(FOLLOWERS_SUFFIX, "", 1);

    Ok(DetailRecord {
        name,
        website,
        stars,
        follower_count,
        image: stub.image.clone(),
    })
}

/// Reads the uniquely-styled website span, defaulting to the sentinel
fn extract_website(document: &Html) -> String {
    Selector::parse("span[style='text-decoration: underline;']")
        .ok()
        .and_then(|sel| {
            document
                .select(&sel)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string())
        })
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| NO_WEBSITE.to_string())
}

/// Counts the full-star rating markers
fn count_stars(document: &Html) -> u32 {
    Selector::parse("div[data-test-id='rating-star-full']")
        .ok()
        .map(|sel| document.select(&sel).count() as u32)
        .unwrap_or(0)
}

/// Locates the follower-count container nested inside the main details
/// container; `None` signals a blocked or malformed page
fn find_follower_container(document: &Html) -> Option<ElementRef<'_>> {
    let main_selector = Selector::parse("div[data-test-id='CloseupDetails']").ok()?;
    let follower_selector = Selector::parse("div[data-test-id='follower-count']").ok()?;

    document
        .select(&main_selector)
        .next()
        .and_then(|main| main.select(&follower_selector).next())
}

/// Reads the creator name from the nested title attribute inside the
/// follower-count container
fn extract_creator_name(follower: ElementRef<'_>) -> Option<String> {
    let creator_selector = Selector::parse("div[data-test-id='creator-profile-name']").ok()?;
    let inner_selector = Selector::parse("div").ok()?;

    follower
        .select(&creator_selector)
        .next()
        .and_then(|creator| creator.select(&inner_selector).next())
        .and_then(|inner| inner.value().attr("title"))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stub_with_image(image: Option<&str>) -> SearchResultStub {
        SearchResultStub {
            name: Some("Grill guide".to_string()),
            url: "https://www.pinterest.com/pin/1/".to_string(),
            image: image.map(str::to_string),
        }
    }

    // Profile markup is compact like the live site's; the follower count is
    // recovered from the container text verbatim, so stray whitespace between
    // tags would end up in the count.
    fn full_page() -> String {
        concat!(
            r#"<html><body>"#,
            r#"<span style="text-decoration: underline;">grillmasters.example</span>"#,
            r#"<div data-test-id="CloseupDetails">"#,
            r#"<div data-test-id="rating-star-full"></div>"#,
            r#"<div data-test-id="rating-star-full"></div>"#,
            r#"<div data-test-id="rating-star-full"></div>"#,
            r#"<div data-test-id="follower-count">"#,
            r#"<div data-test-id="creator-profile-name">"#,
            r#"<div title="Jane Doe">Jane Doe</div>"#,
            r#"</div>1.2K followers</div>"#,
            r#"</div>"#,
            r#"</body></html>"#,
        )
        .to_string()
    }

    #[test]
    fn test_full_extraction() {
        let record =
            extract_pin_detail(&full_page(), &stub_with_image(Some("https://i.example/1.jpg")))
                .unwrap();

        assert_eq!(record.name, "Jane Doe");
        assert_eq!(record.website, "grillmasters.example");
        assert_eq!(record.stars, 3);
        assert_eq!(record.follower_count, "1.2K");
        assert_eq!(record.image.as_deref(), Some("https://i.example/1.jpg"));
    }

    #[test]
    fn test_missing_website_defaults_to_sentinel() {
        let html = r#"
            <div data-test-id="CloseupDetails">
                <div data-test-id="follower-count">
                    <div data-test-id="creator-profile-name">
                        <div title="Jane Doe">Jane Doe</div>
                    </div>42 followers</div>
            </div>
        "#;
        let record = extract_pin_detail(html, &stub_with_image(None)).unwrap();
        assert_eq!(record.website, "n/a");
    }

    #[test]
    fn test_zero_stars_is_valid() {
        let html = r#"
            <div data-test-id="CloseupDetails">
                <div data-test-id="follower-count">
                    <div data-test-id="creator-profile-name">
                        <div title="Jane Doe">Jane Doe</div>
                    </div>42 followers</div>
            </div>
        "#;
        let record = extract_pin_detail(html, &stub_with_image(None)).unwrap();
        assert_eq!(record.stars, 0);
    }

    #[test]
    fn test_missing_follower_container_is_blocking() {
        let html = r#"
            <div data-test-id="CloseupDetails">
                <span>no profile info at all</span>
            </div>
        "#;
        let result = extract_pin_detail(html, &stub_with_image(None));
        assert!(matches!(result, Err(ExtractError::BlockedOrMissingProfile)));
    }

    #[test]
    fn test_missing_main_container_is_blocking() {
        let html = r#"<html><body><p>soft block page</p></body></html>"#;
        let result = extract_pin_detail(html, &stub_with_image(None));
        assert!(matches!(result, Err(ExtractError::BlockedOrMissingProfile)));
    }

    #[test]
    fn test_missing_creator_name_is_extraction_error() {
        // Follower container present, creator-name element absent: must fail
        // rather than emit a record with an undefined name.
        let html = r#"
            <div data-test-id="CloseupDetails">
                <div data-test-id="follower-count">1.2K followers</div>
            </div>
        "#;
        let result = extract_pin_detail(html, &stub_with_image(None));
        assert!(matches!(result, Err(ExtractError::MissingElement(_))));
    }

    #[test]
    fn test_follower_count_strips_name_and_suffix() {
        let record = extract_pin_detail(&full_page(), &stub_with_image(None)).unwrap();
        // "Jane Doe1.2K followers" minus "Jane Doe" minus " followers"
        assert_eq!(record.follower_count, "1.2K");
    }

    #[test]
    fn test_unit_suffixes_preserved_verbatim() {
        let html = concat!(
            r#"<div data-test-id="CloseupDetails">"#,
            r#"<div data-test-id="follower-count">"#,
            r#"<div data-test-id="creator-profile-name">"#,
            r#"<div title="Big Channel">Big Channel</div>"#,
            r#"</div>3M followers</div>"#,
            r#"</div>"#,
        );
        let record = extract_pin_detail(html, &stub_with_image(None)).unwrap();
        assert_eq!(record.follower_count, "3M");
    }

    #[test]
    fn test_image_passed_through_from_stub() {
        let record = extract_pin_detail(
            &full_page(),
            &stub_with_image(Some("https://i.example/thumb.jpg")),
        )
        .unwrap();
        assert_eq!(record.image.as_deref(), Some("https://i.example/thumb.jpg"));
    }
}
