//! Batch-at-a-time view of a cursor-paged remote source
//!
//! [`PageSource`] owns the paging session: it issues the initial query on the
//! first call, continues from the latest cursor on every later call, and maps
//! each page through a [`RecordMapper`]. An empty page ends the session.

use crate::sitemap::OutputEntry;
use crate::source::{CursorState, RawPage, RecordMapper, RemoteSource};
use crate::{ExportError, Result};
use std::time::Duration;

/// Paged retrieval of output entries from a remote source
pub struct PageSource<R, M> {
    remote: R,
    mapper: M,
    page_size: u32,
    timeout: Duration,
    state: CursorState,
    exhausted: bool,
    pages_fetched: usize,
}

impl<R: RemoteSource, M: RecordMapper> PageSource<R, M> {
    pub fn new(remote: R, mapper: M, page_size: u32, timeout: Duration) -> Self {
        Self {
            remote,
            mapper,
            page_size,
            timeout,
            state: CursorState::NoCursor,
            exhausted: false,
            pages_fetched: 0,
        }
    }

    /// Fetches the next page and maps it to output entries
    ///
    /// Returns an empty batch once the source is exhausted; after that (or after
    /// [`release`](Self::release)) the remote source is not contacted again.
    pub async fn fetch_next_batch(&mut self) -> Result<Vec<OutputEntry>> {
        if self.exhausted {
            tracing::debug!("Source already exhausted, not fetching");
            return Ok(Vec::new());
        }

        let page = self.retrieve_page().await?;

        // Keep the refreshed cursor before mapping so it can still be released
        let cursor = page.cursor.ok_or(ExportError::CursorExtraction)?;
        self.state = CursorState::HasCursor(cursor);
        self.pages_fetched += 1;

        let entries = page
            .records
            .iter()
            .map(|record| self.mapper.map_record(record))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|source| ExportError::Mapping { source })?;

        tracing::info!("Retrieved {} records from the source", entries.len());

        if entries.is_empty() {
            self.exhausted = true;
        }

        Ok(entries)
    }

    /// Releases the remote cursor
    ///
    /// Failure is logged and otherwise ignored. Calling this more than once, or
    /// before anything was fetched, does not contact the remote source.
    pub async fn release(&mut self) {
        match std::mem::replace(&mut self.state, CursorState::Released) {
            CursorState::HasCursor(cursor) => match self.remote.release_cursor(&cursor).await {
                Ok(()) => tracing::info!("Released source cursor"),
                Err(e) => tracing::warn!("Failed to release source cursor: {}", e),
            },
            CursorState::NoCursor => tracing::debug!("No source cursor to release"),
            CursorState::Released => {}
        }
        self.exhausted = true;
    }

    #[cfg(test)]
    pub(crate) fn remote(&self) -> &R {
        &self.remote
    }

    pub fn cursor_state(&self) -> &CursorState {
        &self.state
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Number of pages retrieved so far, including the final empty one
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    async fn retrieve_page(&self) -> Result<RawPage> {
        let result = match &self.state {
            CursorState::NoCursor => {
                self.remote
                    .fetch_first_page(self.page_size, self.timeout)
                    .await
            }
            CursorState::HasCursor(cursor) => {
                self.remote
                    .fetch_next_page(cursor, self.page_size, self.timeout)
                    .await
            }
            CursorState::Released => return Ok(RawPage::default()),
        };

        result.map_err(|source| ExportError::Fetch { source })
    }
}
