//! Source module for paged record retrieval
//!
//! This module contains everything upstream of the site map writers:
//! - The remote source interface and its Elasticsearch scroll implementation
//! - Cursor state for a paging session
//! - Mapping of raw records into output entries
//! - [`PageSource`], which combines the above into "next batch of entries"

mod cursor;
mod elasticsearch;
mod mapper;
mod page_source;
mod traits;

pub use cursor::{Cursor, CursorState};
pub use elasticsearch::{build_http_client, ElasticsearchClient};
pub use mapper::{AddressRecordMapper, RecordMapper};
pub use page_source::PageSource;
pub use traits::{MappingError, RawPage, RawRecord, RemoteSource, SourceError, SourceResult};
