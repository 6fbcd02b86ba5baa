//! Integration tests for the exporter
//!
//! These tests use wiremock to stand in for an Elasticsearch scroll endpoint
//! and run full exports into a temporary directory.

use quick_xml::events::Event;
use quick_xml::Reader;
use serde_json::{json, Value};
use sitemap_export::config::{Config, MappingConfig, OutputConfig, SourceConfig};
use sitemap_export::{run_export, ChangeFrequency, ExportError};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(server_url: &str, directory: &Path, max_urls_per_file: usize) -> Config {
    Config {
        source: SourceConfig {
            url: server_url.to_string(),
            index: "landregistry".to_string(),
            doc_type: "property".to_string(),
            page_size: 3,
            scroll_expiry: "1m".to_string(),
            request_timeout: 5,
        },
        mapping: MappingConfig {
            base_page_url: "https://propertyinfo.example.com/property".to_string(),
            change_frequency: ChangeFrequency::Weekly,
        },
        output: OutputConfig {
            directory_path: directory.to_string_lossy().into_owned(),
            directory_url: "https://propertyinfo.example.com/sitemaps/".to_string(),
            base_filename: "site_map".to_string(),
            index_filename: "site_map_index.xml".to_string(),
            max_urls_per_file,
            file_encoding: "UTF-8".to_string(),
        },
    }
}

/// Text of every `tag` element in a written file, in document order
fn element_texts(file: &Path, tag: &str) -> Vec<String> {
    let xml = fs::read_to_string(file).unwrap();
    let mut reader = Reader::from_str(&xml);
    reader.config_mut().trim_text(true);

    let mut texts = Vec::new();
    let mut inside = false;
    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) => inside = e.name().as_ref() == tag.as_bytes(),
            Event::Text(text) if inside => texts.push(text.unescape().unwrap().into_owned()),
            Event::End(_) => inside = false,
            Event::Eof => break,
            _ => {}
        }
    }
    texts
}

/// Name of the root element of a written file
fn root_element(file: &Path) -> String {
    let xml = fs::read_to_string(file).unwrap();
    let mut reader = Reader::from_str(&xml);
    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) | Event::Empty(e) => {
                return String::from_utf8(e.name().as_ref().to_vec()).unwrap()
            }
            Event::Eof => panic!("{} has no root element", file.display()),
            _ => {}
        }
    }
}

fn address_hit(number: u32) -> Value {
    json!({
        "_index": "landregistry",
        "_type": "property",
        "_id": format!("1002593820{}", number),
        "_score": 1.0,
        "_source": {
            "entryDatetime": format!("2014-06-0{}T09:01:38+00", number),
            "postcode": "EX2 4RQ",
            "addressKey": format!("{}_RIVERSIDE_ROAD_EXETER_EX2_4RQ", number),
        }
    })
}

fn scroll_page(scroll_id: &str, hits: Vec<Value>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "_scroll_id": scroll_id,
        "took": 1,
        "timed_out": false,
        "hits": {"total": 5, "max_score": 1.0, "hits": hits}
    }))
}

/// Mounts a scroll of two full pages followed by an empty one
async fn mount_two_page_scroll(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/landregistry/property/_search"))
        .respond_with(scroll_page("s1", (1..=3).map(address_hit).collect()))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/_search/scroll"))
        .and(body_json(json!({"scroll": "1m", "scroll_id": "s1"})))
        .respond_with(scroll_page("s2", (4..=5).map(address_hit).collect()))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/_search/scroll"))
        .and(body_json(json!({"scroll": "1m", "scroll_id": "s2"})))
        .respond_with(scroll_page("s3", vec![]))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_release(server: &MockServer, scroll_id: &str, times: u64) {
    Mock::given(method("DELETE"))
        .and(path("/_search/scroll"))
        .and(body_json(json!({ "scroll_id": scroll_id })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"succeeded": true})))
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_export_writes_files_and_index() {
    let server = MockServer::start().await;
    mount_two_page_scroll(&server).await;
    mount_release(&server, "s3", 1).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path(), 2);

    let summary = run_export(&config, true).await.unwrap();

    assert_eq!(summary.entries_written, 5);
    assert_eq!(summary.pages_fetched, 3);
    let names: Vec<&str> = summary.files.iter().map(|f| f.file_name.as_str()).collect();
    assert_eq!(names, ["site_map_0.xml", "site_map_1.xml", "site_map_2.xml"]);

    let first = dir.path().join("site_map_0.xml");
    assert!(fs::read_to_string(&first)
        .unwrap()
        .starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert_eq!(root_element(&first), "urlset");
    assert_eq!(
        element_texts(&first, "loc"),
        [
            "https://propertyinfo.example.com/property/EX2_4RQ/1_RIVERSIDE_ROAD_EXETER",
            "https://propertyinfo.example.com/property/EX2_4RQ/2_RIVERSIDE_ROAD_EXETER",
        ]
    );
    assert_eq!(
        element_texts(&first, "lastmod"),
        ["2014-06-01T09:01+00:00", "2014-06-02T09:01+00:00"]
    );
    assert_eq!(element_texts(&first, "changefreq"), ["weekly", "weekly"]);

    assert_eq!(
        element_texts(&dir.path().join("site_map_2.xml"), "loc"),
        ["https://propertyinfo.example.com/property/EX2_4RQ/5_RIVERSIDE_ROAD_EXETER"]
    );

    let index = dir.path().join("site_map_index.xml");
    assert_eq!(root_element(&index), "sitemapindex");
    assert_eq!(
        element_texts(&index, "loc"),
        [
            "https://propertyinfo.example.com/sitemaps/site_map_0.xml",
            "https://propertyinfo.example.com/sitemaps/site_map_1.xml",
            "https://propertyinfo.example.com/sitemaps/site_map_2.xml",
        ]
    );
}

#[tokio::test]
async fn test_export_clears_previous_run() {
    let server = MockServer::start().await;
    mount_two_page_scroll(&server).await;
    mount_release(&server, "s3", 1).await;

    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("site_map_7.xml"), "stale").unwrap();
    fs::write(dir.path().join("site_map_index.xml"), "stale").unwrap();
    fs::write(dir.path().join("other.txt"), "keep me").unwrap();

    let config = create_test_config(&server.uri(), dir.path(), 10);
    let summary = run_export(&config, true).await.unwrap();

    assert_eq!(summary.files.len(), 1);
    assert!(!dir.path().join("site_map_7.xml").exists());
    assert_eq!(
        fs::read_to_string(dir.path().join("other.txt")).unwrap(),
        "keep me"
    );

    assert_eq!(
        element_texts(&dir.path().join("site_map_index.xml"), "loc"),
        ["https://propertyinfo.example.com/sitemaps/site_map_0.xml"]
    );
}

#[tokio::test]
async fn test_export_can_keep_existing_files() {
    let server = MockServer::start().await;
    mount_two_page_scroll(&server).await;
    mount_release(&server, "s3", 1).await;

    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("site_map_7.xml"), "stale").unwrap();

    let config = create_test_config(&server.uri(), dir.path(), 10);
    run_export(&config, false).await.unwrap();

    assert_eq!(
        fs::read_to_string(dir.path().join("site_map_7.xml")).unwrap(),
        "stale"
    );
    assert!(dir.path().join("site_map_0.xml").exists());
}

#[tokio::test]
async fn test_empty_index_writes_empty_manifest() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/landregistry/property/_search"))
        .respond_with(scroll_page("s1", vec![]))
        .expect(1)
        .mount(&server)
        .await;
    mount_release(&server, "s1", 1).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path(), 10);

    let summary = run_export(&config, true).await.unwrap();

    assert!(summary.files.is_empty());
    assert!(!dir.path().join("site_map_0.xml").exists());
    let index = dir.path().join("site_map_index.xml");
    assert_eq!(root_element(&index), "sitemapindex");
    assert!(element_texts(&index, "loc").is_empty());
}

#[tokio::test]
async fn test_source_failure_aborts_and_releases_cursor() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/landregistry/property/_search"))
        .respond_with(scroll_page("s1", (1..=3).map(address_hit).collect()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/_search/scroll"))
        .respond_with(ResponseTemplate::new(503).set_body_string("cluster unavailable"))
        .mount(&server)
        .await;
    mount_release(&server, "s1", 1).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path(), 2);

    let result = run_export(&config, true).await;

    assert!(matches!(result, Err(ExportError::Fetch { .. })));
    // The full first file was written before the failure
    assert!(dir.path().join("site_map_0.xml").exists());
    assert!(!dir.path().join("site_map_1.xml").exists());
    assert!(!dir.path().join("site_map_index.xml").exists());
}

#[tokio::test]
async fn test_failed_release_still_completes_export() {
    let server = MockServer::start().await;
    mount_two_page_scroll(&server).await;
    Mock::given(method("DELETE"))
        .and(path("/_search/scroll"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path(), 3);

    let summary = run_export(&config, true).await.unwrap();

    assert_eq!(summary.entries_written, 5);
    assert_eq!(summary.files.len(), 2);
    assert_eq!(
        element_texts(&dir.path().join("site_map_1.xml"), "loc"),
        [
            "https://propertyinfo.example.com/property/EX2_4RQ/4_RIVERSIDE_ROAD_EXETER",
            "https://propertyinfo.example.com/property/EX2_4RQ/5_RIVERSIDE_ROAD_EXETER",
        ]
    );
    assert_eq!(
        element_texts(&dir.path().join("site_map_index.xml"), "loc"),
        [
            "https://propertyinfo.example.com/sitemaps/site_map_0.xml",
            "https://propertyinfo.example.com/sitemaps/site_map_1.xml",
        ]
    );
}

#[tokio::test]
async fn test_latin1_export_writes_declared_encoding() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/landregistry/property/_search"))
        .respond_with(scroll_page(
            "s1",
            vec![json!({
                "_source": {
                    "entryDatetime": "2014-06-07T09:01:38+00",
                    "postcode": "EX2 4RQ",
                    "addressKey": "1_CAFÉ_ROW_EXETER_EX2_4RQ",
                }
            })],
        ))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/_search/scroll"))
        .respond_with(scroll_page("s2", vec![]))
        .mount(&server)
        .await;
    mount_release(&server, "s2", 1).await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server.uri(), dir.path(), 10);
    config.output.file_encoding = "ISO-8859-1".to_string();

    run_export(&config, true).await.unwrap();

    let bytes = fs::read(dir.path().join("site_map_0.xml")).unwrap();
    assert!(bytes.starts_with(br#"<?xml version="1.0" encoding="windows-1252"?>"#));
    let expected_loc: &[u8] = b"/EX2_4RQ/1_CAF\xC9_ROW_EXETER</loc>";
    assert!(bytes
        .windows(expected_loc.len())
        .any(|window| window == expected_loc));

    let index = fs::read(dir.path().join("site_map_index.xml")).unwrap();
    assert!(index.starts_with(br#"<?xml version="1.0" encoding="windows-1252"?>"#));
}

#[tokio::test]
async fn test_failed_first_query_does_not_release() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path(), 2);

    let result = run_export(&config, true).await;

    assert!(matches!(result, Err(ExportError::Fetch { .. })));
    assert!(!dir.path().join("site_map_index.xml").exists());
}

#[tokio::test]
async fn test_missing_output_directory_fails_before_fetching() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(scroll_page("s1", vec![]))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("does-not-exist");
    let config = create_test_config(&server.uri(), &missing, 2);

    let result = run_export(&config, true).await;

    match result {
        Err(ExportError::DirectoryClear { path, .. }) => assert_eq!(path, missing),
        other => panic!("expected directory clear failure, got {:?}", other.map(|s| s.files)),
    }
}
