//! Configuration module for Sitemap-Export
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use sitemap_export::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("export.toml")).unwrap();
//! println!("Files hold at most {} URLs", config.output.max_urls_per_file);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, MappingConfig, OutputConfig, SourceConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
