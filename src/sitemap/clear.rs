//! Removal of output left behind by a previous run

use crate::{ExportError, Result};
use regex::Regex;
use std::io;
use std::path::{Path, PathBuf};

/// Deletes site map files (`{base_filename}_<digits>.xml`) and the index file from `directory`
///
/// Other files are left untouched. Any failure to list or delete aborts the clear.
///
/// # Returns
///
/// The paths that were deleted
pub fn clear_site_map_directory(
    directory: &Path,
    base_filename: &str,
    index_filename: &str,
) -> Result<Vec<PathBuf>> {
    tracing::info!("Clearing site map directory {}", directory.display());

    let clear_error = |source| ExportError::DirectoryClear {
        path: directory.to_path_buf(),
        source,
    };
    let pattern = site_map_file_pattern(base_filename)
        .map_err(|e| clear_error(io::Error::new(io::ErrorKind::InvalidInput, e)))?;

    let mut deleted = Vec::new();
    for dir_entry in std::fs::read_dir(directory).map_err(clear_error)? {
        let dir_entry = dir_entry.map_err(clear_error)?;
        let file_name = dir_entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            continue;
        };

        let is_site_map = pattern.is_match(file_name) && dir_entry.path().is_file();
        if !is_site_map && file_name != index_filename {
            continue;
        }

        let path = dir_entry.path();
        std::fs::remove_file(&path).map_err(|source| ExportError::DirectoryClear {
            path: path.clone(),
            source,
        })?;
        tracing::info!("Deleted file {}", path.display());
        deleted.push(path);
    }

    Ok(deleted)
}

/// Matches the names of the site map files written for `base_filename`
pub(crate) fn site_map_file_pattern(
    base_filename: &str,
) -> std::result::Result<Regex, regex::Error> {
    Regex::new(&format!(r"^{}_\d+\.xml$", regex::escape(base_filename)))
}
