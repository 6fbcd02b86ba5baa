//! Site map index generation

use crate::config::OutputConfig;
use crate::sitemap::xml::{render_sitemap_index, resolve_encoding};
use crate::sitemap::FileRecord;
use crate::{ConfigResult, ExportError, Result};
use chrono::{Local, NaiveDate};
use encoding_rs::Encoding;
use std::path::PathBuf;

/// Writes the `sitemapindex` file referencing every site map file of a run
#[derive(Debug, Clone)]
pub struct ManifestWriter {
    directory: PathBuf,
    directory_url: String,
    file_name: String,
    encoding: &'static Encoding,
}

impl ManifestWriter {
    pub fn new(
        directory: impl Into<PathBuf>,
        directory_url: impl Into<String>,
        file_name: impl Into<String>,
        encoding: &'static Encoding,
    ) -> Self {
        Self {
            directory: directory.into(),
            directory_url: directory_url.into(),
            file_name: file_name.into(),
            encoding,
        }
    }

    pub fn from_config(config: &OutputConfig) -> ConfigResult<Self> {
        Ok(Self::new(
            &config.directory_path,
            &config.directory_url,
            &config.index_filename,
            resolve_encoding(&config.file_encoding)?,
        ))
    }

    /// Writes the index, stamping every entry with today's date
    ///
    /// # Returns
    ///
    /// The path of the written index file
    pub fn write(&self, file_records: &[FileRecord]) -> Result<PathBuf> {
        self.write_dated(file_records, Local::now().date_naive())
    }

    /// Writes the index with an explicit `lastmod` date
    pub fn write_dated(&self, file_records: &[FileRecord], date: NaiveDate) -> Result<PathBuf> {
        let path = self.directory.join(&self.file_name);
        let locations: Vec<String> = file_records
            .iter()
            .map(|record| self.file_url(&record.file_name))
            .collect();
        let last_modified = date.format("%Y-%m-%d").to_string();

        let persist_error = |source| ExportError::Persist {
            path: path.clone(),
            source,
        };
        let xml =
            render_sitemap_index(&locations, &last_modified, self.encoding).map_err(persist_error)?;
        std::fs::write(&path, xml).map_err(persist_error)?;

        tracing::info!(
            "Created site map index file: {} ({} site maps)",
            path.display(),
            locations.len()
        );

        Ok(path)
    }

    /// Public URL of a file in the output directory
    pub fn file_url(&self, file_name: &str) -> String {
        format!("{}/{}", self.directory_url.trim_end_matches('/'), file_name)
    }
}
