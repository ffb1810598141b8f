//! Integration tests for the scrape pipeline
//!
//! These tests use wiremock to create mock HTTP servers and exercise
//! the full crawl-then-scrape cycle end-to-end.

use pinscout::config::{Config, CrawlConfig, OutputConfig};
use pinscout::crawler::run_pipeline;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at a mock server
fn create_test_config(site_root: &str, output_dir: &str, retries: u32, keyword: &str) -> Config {
    Config {
        crawl: CrawlConfig {
            keywords: vec![keyword.to_string()],
            locale: "uk".to_string(),
            retries,
            max_concurrent_fetches: 1,
            site_root: site_root.to_string(),
            detail_timeout_secs: 5,
            search_timeout_secs: Some(5),
        },
        proxy: None,
        output: OutputConfig {
            directory: output_dir.to_string(),
            snapshot_filename: "failure-snapshot.html".to_string(),
        },
    }
}

/// Search-results page with two grid items linking to detail pages
fn search_page_body() -> &'static str {
    concat!(
        r#"<html><body>"#,
        r#"<div data-grid-item="true">"#,
        r#"<a aria-label="Grill guide" href="/pin/1/"></a>"#,
        r#"<img src="https://img.example.com/1.jpg" />"#,
        r#"</div>"#,
        r#"<div data-grid-item="true">"#,
        r#"<a aria-label="Smoker tips" href="/pin/2/"></a>"#,
        r#"<img src="https://img.example.com/2.jpg" />"#,
        r#"</div>"#,
        r#"</body></html>"#,
    )
}

/// Detail page with every extractable attribute present
///
/// The profile markup is compact like the live site's; the follower count
/// is recovered verbatim from the container text.
fn detail_page_body() -> &'static str {
    concat!(
        r#"<html><body>"#,
        r#"<span style="text-decoration: underline;">grillmasters.example</span>"#,
        r#"<div data-test-id="CloseupDetails">"#,
        r#"<div data-test-id="rating-star-full"></div>"#,
        r#"<div data-test-id="rating-star-full"></div>"#,
        r#"<div data-test-id="follower-count">"#,
        r#"<div data-test-id="creator-profile-name">"#,
        r#"<div title="Jane Doe">Jane Doe</div>"#,
        r#"</div>1.2K followers</div>"#,
        r#"</div>"#,
        r#"</body></html>"#,
    )
}

#[tokio::test]
async fn test_full_pipeline_retries_and_skips() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Search results page
    Mock::given(method("GET"))
        .and(path("/search/pins/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(search_page_body()))
        .mount(&mock_server)
        .await;

    // Pin 1 fails twice, then succeeds within the retry budget
    Mock::given(method("GET"))
        .and(path("/pin/1/"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pin/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_page_body()))
        .mount(&mock_server)
        .await;

    // Pin 2 fails on every attempt and must be skipped
    Mock::given(method("GET"))
        .and(path("/pin/2/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let output_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = create_test_config(
        &base_url,
        output_dir.path().to_str().unwrap(),
        3,
        "grilling",
    );

    run_pipeline(config).await.expect("Pipeline failed");

    // Both stubs were persisted during the crawl stage
    let search_csv = std::fs::read_to_string(output_dir.path().join("grilling.csv"))
        .expect("Search CSV missing");
    let search_lines: Vec<&str> = search_csv.lines().collect();
    assert_eq!(search_lines.len(), 3, "Expected header plus 2 stub rows");
    assert_eq!(search_lines[0], "name,url,image");
    assert!(search_lines[1].contains("/pin/1/"));
    assert!(search_lines[2].contains("/pin/2/"));

    // Only the recovering pin produced a detail record
    let detail_csv = std::fs::read_to_string(output_dir.path().join("grilling-details.csv"))
        .expect("Detail CSV missing");
    let detail_lines: Vec<&str> = detail_csv.lines().collect();
    assert_eq!(detail_lines.len(), 2, "Expected header plus 1 detail row");
    assert_eq!(detail_lines[0], "name,website,stars,follower_count,image");
    assert_eq!(
        detail_lines[1],
        "Jane Doe,grillmasters.example,2,1.2K,https://img.example.com/1.jpg"
    );
}

#[tokio::test]
async fn test_retry_budget_is_retries_plus_one_requests() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // With retries = 2 the search fetch must issue exactly 3 requests,
    // one per attempt, then give up on the keyword.
    Mock::given(method("GET"))
        .and(path("/search/pins/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    let output_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = create_test_config(
        &base_url,
        output_dir.path().to_str().unwrap(),
        2,
        "grilling",
    );

    // The run itself still completes; the keyword is skipped, not fatal
    run_pipeline(config).await.expect("Pipeline failed");

    // No search file means the scrape stage never started
    assert!(!output_dir.path().join("grilling.csv").exists());
    assert!(!output_dir.path().join("grilling-details.csv").exists());

    // Wiremock verifies the expected request count when the server drops
}

#[tokio::test]
async fn test_extraction_failure_writes_snapshot() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/search/pins/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<div data-grid-item="true"><a href="/pin/1/"></a></div>"#,
        ))
        .mount(&mock_server)
        .await;

    // Detail page parses as HTML but carries no profile block, as a soft
    // block page would
    let block_body = "<html><body><p>please verify you are human</p></body></html>";
    Mock::given(method("GET"))
        .and(path("/pin/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(block_body))
        .mount(&mock_server)
        .await;

    let output_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = create_test_config(&base_url, output_dir.path().to_str().unwrap(), 0, "grilling");

    run_pipeline(config).await.expect("Pipeline failed");

    // The failing markup was snapshotted for inspection
    let snapshot = std::fs::read_to_string(output_dir.path().join("failure-snapshot.html"))
        .expect("Snapshot missing");
    assert_eq!(snapshot, block_body);

    // The blocked pin was skipped, so no detail file exists
    assert!(!output_dir.path().join("grilling-details.csv").exists());
}

#[tokio::test]
async fn test_rerun_appends_without_second_header() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/search/pins/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(search_page_body()))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_page_body()))
        .mount(&mock_server)
        .await;

    let output_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = create_test_config(
        &base_url,
        output_dir.path().to_str().unwrap(),
        0,
        "camp fire",
    );

    run_pipeline(config.clone()).await.expect("First run failed");
    run_pipeline(config).await.expect("Second run failed");

    // Keyword spaces map to hyphens in the destination filenames
    let search_csv = std::fs::read_to_string(output_dir.path().join("camp-fire.csv"))
        .expect("Search CSV missing");
    let header_count = search_csv
        .lines()
        .filter(|line| *line == "name,url,image")
        .count();
    assert_eq!(header_count, 1, "Header must be written exactly once");
    assert_eq!(search_csv.lines().count(), 5, "Expected header plus 4 rows");

    // Second scrape stage saw 4 stubs, so 2 + 4 detail rows in total
    let detail_csv = std::fs::read_to_string(output_dir.path().join("camp-fire-details.csv"))
        .expect("Detail CSV missing");
    assert_eq!(detail_csv.lines().count(), 7, "Expected header plus 6 rows");
}
