//! Capacity-bounded site map file writer
//!
//! Entries are packed into a [`Document`] in arrival order. A document is sealed
//! (written to `{base}_{n}.xml`) the moment it holds exactly `max_entries_per_file`
//! entries; whatever remains at the end of the run is written by [`ChunkWriter::flush`].

use crate::config::OutputConfig;
use crate::sitemap::xml::{render_urlset, resolve_encoding};
use crate::sitemap::{FileRecord, OutputEntry};
use crate::{ConfigError, ConfigResult, ExportError, Result};
use encoding_rs::Encoding;
use std::path::PathBuf;

/// In-memory buffer of entries not yet written to disk
#[derive(Debug, Default)]
pub struct Document {
    entries: Vec<OutputEntry>,
}

impl Document {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[OutputEntry] {
        &self.entries
    }
}

/// Packs entries into numbered site map files of at most `max_entries_per_file` URLs
#[derive(Debug)]
pub struct ChunkWriter {
    directory: PathBuf,
    base_filename: String,
    max_entries_per_file: usize,
    encoding: &'static Encoding,
    current: Document,
    sequence_number: u32,
    file_records: Vec<FileRecord>,
}

impl ChunkWriter {
    /// Creates a writer targeting `directory`
    ///
    /// # Returns
    ///
    /// * `Err(ConfigError::Validation)` - `max_entries_per_file` is zero
    pub fn new(
        directory: impl Into<PathBuf>,
        base_filename: impl Into<String>,
        max_entries_per_file: usize,
        encoding: &'static Encoding,
    ) -> ConfigResult<Self> {
        if max_entries_per_file == 0 {
            return Err(ConfigError::Validation(
                "max_entries_per_file must be >= 1".to_string(),
            ));
        }

        Ok(Self {
            directory: directory.into(),
            base_filename: base_filename.into(),
            max_entries_per_file,
            encoding,
            current: Document::default(),
            sequence_number: 0,
            file_records: Vec::new(),
        })
    }

    /// Creates a writer from the output section of the configuration
    pub fn from_config(config: &OutputConfig) -> ConfigResult<Self> {
        Self::new(
            &config.directory_path,
            &config.base_filename,
            config.max_urls_per_file,
            resolve_encoding(&config.file_encoding)?,
        )
    }

    /// Appends a batch of entries, sealing every document that fills up
    ///
    /// A batch larger than the free space in the current document spills over
    /// into as many fresh documents as it needs. An empty batch is a no-op.
    pub fn append(&mut self, entries: Vec<OutputEntry>) -> Result<()> {
        let mut remaining = entries.into_iter().peekable();

        while remaining.peek().is_some() {
            let free_space = self.max_entries_per_file - self.current.len();
            self.current
                .entries
                .extend(remaining.by_ref().take(free_space));

            if self.current.len() == self.max_entries_per_file {
                self.seal_current()?;
            }
        }

        Ok(())
    }

    /// Writes the current document if it holds any entries
    pub fn flush(&mut self) -> Result<()> {
        if self.current.is_empty() {
            tracing::debug!("Nothing to flush, current site map is empty");
            return Ok(());
        }

        self.seal_current()
    }

    /// Files written so far, in write order
    pub fn file_records(&self) -> &[FileRecord] {
        &self.file_records
    }

    /// The document currently being filled
    pub fn current_document(&self) -> &Document {
        &self.current
    }

    /// Name of the file the given sequence number is written to
    pub fn file_name(&self, sequence_number: u32) -> String {
        format!("{}_{}.xml", self.base_filename, sequence_number)
    }

    fn seal_current(&mut self) -> Result<()> {
        let file_name = self.file_name(self.sequence_number);
        let path = self.directory.join(&file_name);

        let document = std::mem::take(&mut self.current);
        let persist_error = |source| ExportError::Persist {
            path: path.clone(),
            source,
        };

        let xml = render_urlset(document.entries(), self.encoding).map_err(persist_error)?;
        std::fs::write(&path, xml).map_err(persist_error)?;

        tracing::info!(
            "Created site map file: {} ({} URLs)",
            path.display(),
            document.len()
        );

        self.file_records.push(FileRecord {
            file_name,
            sequence_number: self.sequence_number,
        });
        self.sequence_number += 1;

        Ok(())
    }
}
