//! Site map output
//!
//! This module handles:
//! - Packing output entries into capacity-bounded `urlset` files
//! - Writing the `sitemapindex` manifest that references them
//! - Clearing files left over from a previous run

mod chunk_writer;
mod clear;
mod manifest;
mod types;
pub mod xml;

pub use chunk_writer::{ChunkWriter, Document};
pub use clear::clear_site_map_directory;
pub(crate) use clear::site_map_file_pattern;
pub use manifest::ManifestWriter;
pub use types::{ChangeFrequency, FileRecord, OutputEntry};
