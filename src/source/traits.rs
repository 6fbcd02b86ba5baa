//! Remote source traits and error types
//!
//! This module defines the interface to the paginated data source and the
//! errors raised while fetching and converting its records.

use crate::source::Cursor;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// One record exactly as the remote source returned it
pub type RawRecord = serde_json::Value;

/// A page of records plus the cursor to continue from
#[derive(Debug, Clone, Default)]
pub struct RawPage {
    /// Resume token from the response; `None` when the response carried none
    pub cursor: Option<Cursor>,

    /// Records in source order; empty once the source is exhausted
    pub records: Vec<RawRecord>,
}

/// Errors raised by the remote source collaborator
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    Parse(String),
}

/// Result type for remote source operations
pub type SourceResult<T> = Result<T, SourceError>;

/// Errors raised while converting a raw record into an output entry
#[derive(Debug, Error)]
pub enum MappingError {
    #[error("Record is missing field '{0}'")]
    MissingField(String),

    #[error("Field '{field}' has an invalid value: {value}")]
    InvalidField { field: String, value: String },

    #[error("Invalid timestamp '{value}': {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Address key '{address_key}' is too short to strip postcode '{postcode}'")]
    AddressKeyTooShort {
        address_key: String,
        postcode: String,
    },
}

/// Trait for cursor-paged remote data sources
///
/// The first page is requested without a cursor; every later page is requested
/// with the cursor carried by the previous response.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Issues the initial query
    async fn fetch_first_page(&self, page_size: u32, timeout: Duration) -> SourceResult<RawPage>;

    /// Continues from `cursor`
    async fn fetch_next_page(
        &self,
        cursor: &Cursor,
        page_size: u32,
        timeout: Duration,
    ) -> SourceResult<RawPage>;

    /// Releases server-side resources held for `cursor`
    async fn release_cursor(&self, cursor: &Cursor) -> SourceResult<()>;
}
