//! Export orchestration
//!
//! The [`Exporter`] drains a [`PageSource`] into a [`ChunkWriter`] until the
//! first empty batch, then flushes the last partial file and writes the index.
//! The remote cursor is released when draining ends, whether it succeeded or not.

use crate::sitemap::{ChunkWriter, FileRecord, ManifestWriter};
use crate::source::{PageSource, RecordMapper, RemoteSource};
use crate::Result;
use std::path::PathBuf;

/// Outcome of a completed export
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// Site map files in write order
    pub files: Vec<FileRecord>,

    pub entries_written: usize,

    /// Pages retrieved, including the final empty page
    pub pages_fetched: usize,

    pub manifest_path: PathBuf,
}

/// Drives one export run from source to index file
pub struct Exporter<R, M> {
    source: PageSource<R, M>,
    writer: ChunkWriter,
    manifest: ManifestWriter,
}

impl<R: RemoteSource, M: RecordMapper> Exporter<R, M> {
    pub fn new(source: PageSource<R, M>, writer: ChunkWriter, manifest: ManifestWriter) -> Self {
        Self {
            source,
            writer,
            manifest,
        }
    }

    /// Runs the export to completion
    ///
    /// Any fetch, mapping or write failure aborts the run. Files already written
    /// stay on disk; no index is written for a failed run.
    pub async fn run(&mut self) -> Result<ExportSummary> {
        tracing::info!("Started generating site map");

        let drained = self.drain().await;
        self.source.release().await;
        let entries_written = drained?;

        self.writer.flush()?;
        let manifest_path = self.manifest.write(self.writer.file_records())?;

        let summary = ExportSummary {
            pages_fetched: self.source.pages_fetched(),
            files: self.writer.file_records().to_vec(),
            entries_written,
            manifest_path,
        };

        tracing::info!(
            "Completed generating site map: {} URLs in {} files",
            summary.entries_written,
            summary.files.len()
        );

        Ok(summary)
    }

    #[cfg(test)]
    pub(crate) fn source(&self) -> &PageSource<R, M> {
        &self.source
    }

    /// Appends batches until the source returns an empty one
    async fn drain(&mut self) -> Result<usize> {
        let mut entries_written = 0;

        loop {
            let batch = self.source.fetch_next_batch().await?;
            if batch.is_empty() {
                return Ok(entries_written);
            }

            entries_written += batch.len();
            self.writer.append(batch)?;
        }
    }
}
