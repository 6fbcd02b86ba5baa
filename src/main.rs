//! Sitemap-Export main entry point
//!
//! This is the command-line interface for the site map exporter.

use anyhow::Context;
use clap::Parser;
use sitemap_export::config::{load_config_with_hash, Config};
use sitemap_export::run_export;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Sitemap-Export: static site maps from an Elasticsearch index
///
/// Sitemap-Export pages through every document of an index, turns each one
/// into a page URL and writes the URLs into size-bounded site map files plus
/// a site map index that references them.
#[derive(Parser, Debug)]
#[command(name = "sitemap-export")]
#[command(version = "1.0.0")]
#[command(about = "Static site map generation from a paged data source", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show the export settings without contacting the source
    #[arg(long)]
    dry_run: bool,

    /// Leave existing site map files in the output directory
    #[arg(long)]
    keep_existing: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e).with_context(|| {
                format!("could not load configuration from {}", cli.config.display())
            });
        }
    };

    if cli.dry_run {
        handle_dry_run(&config, cli.keep_existing);
        return Ok(());
    }

    handle_export(&config, cli.keep_existing).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitemap_export=info,warn"),
            1 => EnvFilter::new("sitemap_export=debug,info"),
            2 => EnvFilter::new("sitemap_export=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows what an export would do
fn handle_dry_run(config: &Config, keep_existing: bool) {
    println!("=== Sitemap-Export Dry Run ===\n");

    println!("Source:");
    println!("  URL: {}", config.source.url);
    println!("  Index: {}", config.source.index);
    if !config.source.doc_type.is_empty() {
        println!("  Document type: {}", config.source.doc_type);
    }
    println!("  Page size: {}", config.source.page_size);
    println!("  Scroll expiry: {}", config.source.scroll_expiry);
    println!("  Request timeout: {}s", config.source.request_timeout);

    println!("\nMapping:");
    println!("  Base page URL: {}", config.mapping.base_page_url);
    println!("  Change frequency: {}", config.mapping.change_frequency);

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory_path);
    println!("  Published at: {}", config.output.directory_url);
    println!("  Files: {}_<n>.xml", config.output.base_filename);
    println!("  Index: {}", config.output.index_filename);
    println!("  Max URLs per file: {}", config.output.max_urls_per_file);
    println!("  Encoding: {}", config.output.file_encoding);

    println!("\n✓ Configuration is valid");
    if keep_existing {
        println!("✓ Would keep existing site map files");
    } else {
        println!(
            "✓ Would clear existing site map files in {}",
            config.output.directory_path
        );
    }
}

/// Handles the main export operation
async fn handle_export(config: &Config, keep_existing: bool) -> anyhow::Result<()> {
    if keep_existing {
        tracing::info!("Keeping existing site map files");
    }

    match run_export(config, !keep_existing).await {
        Ok(summary) => {
            tracing::info!(
                "Export completed: {} URLs from {} pages, index at {}",
                summary.entries_written,
                summary.pages_fetched,
                summary.manifest_path.display()
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Export failed: {}", e);
            Err(e).context("site map export failed")
        }
    }
}
