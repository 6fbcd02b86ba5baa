use crate::config::types::{Config, MappingConfig, OutputConfig, SourceConfig};
use crate::sitemap::site_map_file_pattern;
use crate::sitemap::xml::resolve_encoding;
use crate::ConfigError;
use url::Url;

/// Largest page the scroll API will hand out in one response
const MAX_PAGE_SIZE: u32 = 10_000;

/// Sitemap protocol limit on URLs per file
const MAX_URLS_PER_FILE: usize = 50_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_source_config(&config.source)?;
    validate_mapping_config(&config.mapping)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates remote source configuration
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    validate_absolute_url("source.url", &config.url)?;

    if config.index.is_empty() {
        return Err(ConfigError::Validation("index cannot be empty".to_string()));
    }

    if config.index.contains('/') || config.doc_type.contains('/') {
        return Err(ConfigError::Validation(format!(
            "index and doc-type cannot contain '/', got '{}' and '{}'",
            config.index, config.doc_type
        )));
    }

    if config.page_size < 1 || config.page_size > MAX_PAGE_SIZE {
        return Err(ConfigError::Validation(format!(
            "page_size must be between 1 and {}, got {}",
            MAX_PAGE_SIZE, config.page_size
        )));
    }

    validate_time_unit(&config.scroll_expiry)?;

    if config.request_timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout must be >= 1s, got {}s",
            config.request_timeout
        )));
    }

    Ok(())
}

/// Validates mapping configuration
fn validate_mapping_config(config: &MappingConfig) -> Result<(), ConfigError> {
    validate_absolute_url("mapping.base-page-url", &config.base_page_url)
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory_path.is_empty() {
        return Err(ConfigError::Validation(
            "directory_path cannot be empty".to_string(),
        ));
    }

    validate_absolute_url("output.directory-url", &config.directory_url)?;
    validate_file_name("base_filename", &config.base_filename)?;
    validate_file_name("index_filename", &config.index_filename)?;
    validate_index_filename(&config.base_filename, &config.index_filename)?;

    if config.max_urls_per_file < 1 || config.max_urls_per_file > MAX_URLS_PER_FILE {
        return Err(ConfigError::Validation(format!(
            "max_urls_per_file must be between 1 and {}, got {}",
            MAX_URLS_PER_FILE, config.max_urls_per_file
        )));
    }

    resolve_encoding(&config.file_encoding)?;

    Ok(())
}

/// The index must not share a name with any site map file of the run
fn validate_index_filename(base_filename: &str, index_filename: &str) -> Result<(), ConfigError> {
    let site_map_files = site_map_file_pattern(base_filename).map_err(|e| {
        ConfigError::Validation(format!("invalid base_filename '{}': {}", base_filename, e))
    })?;

    if site_map_files.is_match(index_filename) {
        return Err(ConfigError::Validation(format!(
            "index_filename '{}' collides with the site map files named {}_<n>.xml",
            index_filename, base_filename
        )));
    }

    Ok(())
}

fn validate_absolute_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            field, value
        )));
    }

    Ok(())
}

/// A bare file name: non-empty, no path separators
fn validate_file_name(field: &str, name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::Validation(format!("{} cannot be empty", field)));
    }

    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        return Err(ConfigError::Validation(format!(
            "{} must be a plain file name, got '{}'",
            field, name
        )));
    }

    Ok(())
}

/// Validates an Elasticsearch time unit such as "90s" or "2m"
fn validate_time_unit(value: &str) -> Result<(), ConfigError> {
    let split = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    let (digits, unit) = value.split_at(split);

    if digits.is_empty() || !matches!(unit, "d" | "h" | "m" | "s" | "ms") {
        return Err(ConfigError::Validation(format!(
            "scroll_expiry must look like '2m' (units d, h, m, s, ms), got '{}'",
            value
        )));
    }

    Ok(())
}
