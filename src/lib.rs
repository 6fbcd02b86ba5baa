//! Sitemap-Export: static site map generation from a paginated data source
//!
//! This crate drains a cursor-paged remote source (an Elasticsearch scroll) into
//! size-bounded `urlset` files and a `sitemapindex` manifest referencing them.

pub mod config;
pub mod export;
pub mod sitemap;
pub mod source;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for export operations
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to retrieve a page of data: {source}")]
    Fetch {
        #[source]
        source: source::SourceError,
    },

    #[error("Failed to extract cursor from the page response")]
    CursorExtraction,

    #[error("Failed to convert records to site map entries: {source}")]
    Mapping {
        #[source]
        source: source::MappingError,
    },

    #[error("Failed to write file {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to clear site map directory {}: {source}", path.display())]
    DirectoryClear {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
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

/// Result type alias for export operations
pub type Result<T> = std::result::Result<T, ExportError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use export::{run_export, ExportSummary, Exporter};
pub use sitemap::{ChangeFrequency, ChunkWriter, FileRecord, ManifestWriter, OutputEntry};
pub use source::{PageSource, RecordMapper, RemoteSource};
