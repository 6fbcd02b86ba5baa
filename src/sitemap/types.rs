//! Value types flowing through the site map writers

use serde::Deserialize;
use std::fmt;

/// How often a page is expected to change, as written to `<changefreq>`
///
/// Parsing, including from configuration, ignores case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    /// Returns the tag used in site map XML
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }

    fn all() -> [Self; 7] {
        [
            Self::Always,
            Self::Hourly,
            Self::Daily,
            Self::Weekly,
            Self::Monthly,
            Self::Yearly,
            Self::Never,
        ]
    }
}

impl std::str::FromStr for ChangeFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|freq| freq.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Invalid change frequency: {}", s))
    }
}

impl TryFrom<String> for ChangeFrequency {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for ChangeFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One URL ready to be written to a site map file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputEntry {
    /// Absolute URL of the page
    pub location: String,

    /// Timestamp written to `<lastmod>`, already formatted
    pub last_modified: String,

    pub change_frequency: ChangeFrequency,
}

impl OutputEntry {
    pub fn new(
        location: impl Into<String>,
        last_modified: impl Into<String>,
        change_frequency: ChangeFrequency,
    ) -> Self {
        Self {
            location: location.into(),
            last_modified: last_modified.into(),
            change_frequency,
        }
    }
}

/// A site map file that has been written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub file_name: String,

    /// 0-based position in write order
    pub sequence_number: u32,
}
