/// Cursor definitions for tracking paging progress
use std::fmt;

/// Opaque resume token issued by the remote source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a paging session stands
///
/// `NoCursor -> HasCursor -> Released`; a released session never fetches again.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CursorState {
    /// Nothing fetched yet
    #[default]
    NoCursor,

    /// At least one page fetched; holds the latest cursor
    HasCursor(Cursor),

    /// Session closed
    Released,
}

impl CursorState {
    /// Returns the current cursor, if any
    #[cfg(test)]
    pub(crate) fn cursor(&self) -> Option<&Cursor> {
        match self {
            Self::HasCursor(cursor) => Some(cursor),
            Self::NoCursor | Self::Released => None,
        }
    }

    pub fn is_released(&self) -> bool {
        matches!(self, Self::Released)
    }
}
