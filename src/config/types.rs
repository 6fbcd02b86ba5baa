use crate::sitemap::ChangeFrequency;
use serde::Deserialize;

/// Main configuration structure for an export run
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub source: SourceConfig,
    pub mapping: MappingConfig,
    pub output: OutputConfig,
}

/// Remote data source configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Base URL of the Elasticsearch instance
    pub url: String,

    /// Index to scan
    #[serde(default = "default_index")]
    pub index: String,

    /// Document type; left out of the search path when empty
    #[serde(rename = "doc-type", default = "default_doc_type")]
    pub doc_type: String,

    /// Number of records requested per page
    #[serde(rename = "page-size", default = "default_page_size")]
    pub page_size: u32,

    /// How long the server keeps the scroll cursor alive between pages (e.g. "2m")
    #[serde(rename = "scroll-expiry", default = "default_scroll_expiry")]
    pub scroll_expiry: String,

    /// Timeout for each request to the source (seconds)
    #[serde(rename = "request-timeout", default = "default_request_timeout")]
    pub request_timeout: u64,
}

/// Record-to-URL mapping configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MappingConfig {
    /// Base URL for the exported pages
    #[serde(rename = "base-page-url")]
    pub base_page_url: String,

    /// Change frequency written for every URL
    #[serde(rename = "change-frequency", default = "default_change_frequency")]
    pub change_frequency: ChangeFrequency,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory the site map files are written to
    #[serde(rename = "directory-path")]
    pub directory_path: String,

    /// URL under which the directory is published
    #[serde(rename = "directory-url")]
    pub directory_url: String,

    /// Site map files are named `{base_filename}_{n}.xml`
    #[serde(rename = "base-filename", default = "default_base_filename")]
    pub base_filename: String,

    /// File name of the site map index
    #[serde(rename = "index-filename", default = "default_index_filename")]
    pub index_filename: String,

    /// Maximum number of URLs per site map file
    #[serde(rename = "max-urls-per-file", default = "default_max_urls_per_file")]
    pub max_urls_per_file: usize,

    /// Encoding declared in the XML prolog
    #[serde(rename = "file-encoding", default = "default_file_encoding")]
    pub file_encoding: String,
}

fn default_index() -> String {
    "landregistry".to_string()
}

fn default_doc_type() -> String {
    "property".to_string()
}

fn default_page_size() -> u32 {
    1000
}

fn default_scroll_expiry() -> String {
    "2m".to_string()
}

fn default_request_timeout() -> u64 {
    120
}

fn default_change_frequency() -> ChangeFrequency {
    ChangeFrequency::Weekly
}

fn default_base_filename() -> String {
    "site_map".to_string()
}

fn default_index_filename() -> String {
    "site_map_index.xml".to_string()
}

fn default_max_urls_per_file() -> usize {
    50_000
}

fn default_file_encoding() -> String {
    "UTF-8".to_string()
}
