//! Conversion of raw source records into site map entries

use crate::config::MappingConfig;
use crate::sitemap::{ChangeFrequency, OutputEntry};
use crate::source::{MappingError, RawRecord};
use chrono::NaiveDateTime;
use serde_json::Value;

/// Format of `entryDatetime` in the address documents
const ENTRY_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S+00";

/// Format written to `<lastmod>`
const LAST_MODIFIED_FORMAT: &str = "%Y-%m-%dT%H:%M+00:00";

/// Converts one raw record into one output entry
pub trait RecordMapper {
    fn map_record(&self, record: &RawRecord) -> Result<OutputEntry, MappingError>;
}

impl<F> RecordMapper for F
where
    F: Fn(&RawRecord) -> Result<OutputEntry, MappingError>,
{
    fn map_record(&self, record: &RawRecord) -> Result<OutputEntry, MappingError> {
        self(record)
    }
}

/// Maps address search hits to property page URLs
///
/// A hit's `_source` must carry `postcode`, `addressKey` and `entryDatetime`.
/// The page URL is `{base}/{postcode}/{segment}` where spaces in the postcode
/// become underscores and `segment` is the address key with its trailing
/// `_{postcode}` part cut off.
#[derive(Debug, Clone)]
pub struct AddressRecordMapper {
    base_page_url: String,
    change_frequency: ChangeFrequency,
}

impl AddressRecordMapper {
    pub fn new(base_page_url: impl Into<String>, change_frequency: ChangeFrequency) -> Self {
        Self {
            base_page_url: base_page_url.into(),
            change_frequency,
        }
    }

    pub fn from_config(config: &MappingConfig) -> Self {
        Self::new(&config.base_page_url, config.change_frequency)
    }

    fn page_url(&self, postcode: &str, address_key: &str) -> Result<String, MappingError> {
        let segment = address_key
            .len()
            .checked_sub(postcode.len() + 1)
            .and_then(|end| address_key.get(..end))
            .ok_or_else(|| MappingError::AddressKeyTooShort {
                address_key: address_key.to_string(),
                postcode: postcode.to_string(),
            })?;

        Ok(format!(
            "{}/{}/{}",
            self.base_page_url.trim_end_matches('/'),
            postcode.replace(' ', "_"),
            segment
        ))
    }
}

impl RecordMapper for AddressRecordMapper {
    fn map_record(&self, record: &RawRecord) -> Result<OutputEntry, MappingError> {
        let source = record
            .get("_source")
            .ok_or_else(|| MappingError::MissingField("_source".to_string()))?;

        let postcode = string_field(source, "postcode")?;
        let address_key = string_field(source, "addressKey")?;
        let entry_datetime = string_field(source, "entryDatetime")?;

        let last_modified = NaiveDateTime::parse_from_str(entry_datetime, ENTRY_DATETIME_FORMAT)
            .map_err(|source| MappingError::InvalidTimestamp {
                value: entry_datetime.to_string(),
                source,
            })?
            .format(LAST_MODIFIED_FORMAT)
            .to_string();

        Ok(OutputEntry::new(
            self.page_url(postcode, address_key)?,
            last_modified,
            self.change_frequency,
        ))
    }
}

fn string_field<'a>(source: &'a Value, field: &str) -> Result<&'a str, MappingError> {
    match source.get(field) {
        Some(Value::String(value)) => Ok(value),
        Some(other) => Err(MappingError::InvalidField {
            field: field.to_string(),
            value: other.to_string(),
        }),
        None => Err(MappingError::MissingField(field.to_string())),
    }
}
