//! Export module wiring the source to the site map writers
//!
//! This module contains the top-level export flow:
//! - Optional clearing of a previous run's files
//! - Construction of the Elasticsearch source, mapper and writers from config
//! - The drain, flush and manifest sequence in [`Exporter`]

mod orchestrator;

pub use orchestrator::{ExportSummary, Exporter};

use crate::config::Config;
use crate::sitemap::{clear_site_map_directory, ChunkWriter, ManifestWriter};
use crate::source::{AddressRecordMapper, ElasticsearchClient, PageSource};
use crate::Result;
use std::path::Path;
use std::time::Duration;

/// Runs a complete export from the configured Elasticsearch index
///
/// This is the main entry point for an export. It will:
/// 1. Delete existing site map files and the index (when `clear_existing` is set)
/// 2. Build the HTTP client and scroll source
/// 3. Page through the index and write full site map files as they fill up
/// 4. Release the scroll, write the final partial file and the index
///
/// # Arguments
///
/// * `config` - A validated export configuration
/// * `clear_existing` - Whether to remove the files of a previous run first
///
/// # Returns
///
/// * `Ok(ExportSummary)` - Export completed and the index was written
/// * `Err(ExportError)` - Export failed; files written so far are left in place
pub async fn run_export(config: &Config, clear_existing: bool) -> Result<ExportSummary> {
    let output = &config.output;

    if clear_existing {
        let removed = clear_site_map_directory(
            Path::new(&output.directory_path),
            &output.base_filename,
            &output.index_filename,
        )?;
        tracing::info!(
            "Cleared {} existing files from {}",
            removed.len(),
            output.directory_path
        );
    }

    let remote = ElasticsearchClient::new(&config.source)?;
    let mapper = AddressRecordMapper::from_config(&config.mapping);
    let source = PageSource::new(
        remote,
        mapper,
        config.source.page_size,
        Duration::from_secs(config.source.request_timeout),
    );

    let writer = ChunkWriter::from_config(output)?;
    let manifest = ManifestWriter::from_config(output)?;

    Exporter::new(source, writer, manifest).run().await
}
