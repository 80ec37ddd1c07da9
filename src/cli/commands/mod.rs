//! CLI command definitions and dispatch.
//!
//! This module provides the command-line interface for bib-enrich.
//! Each subcommand is implemented in its own submodule for maintainability:
//! - `enrich`: Bibliography metadata enrichment
//! - `cache`: Metadata cache statistics and cleanup
//! - `config`: Configuration file management

mod cache;
mod config;
mod enrich;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;

pub use cache::{cmd_cache_cleanup, cmd_cache_stats};
pub use config::cmd_init_config;
pub use enrich::cmd_enrich;

/// Bibliography enrichment CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Enrich a parsed bibliography with metadata from scholarly APIs
    Enrich {
        /// Path to the parsed bibliography (a JSON array of entries)
        input: PathBuf,
        /// Write the enriched metadata mapping here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Only serve cached metadata; entries without a cached record are skipped
        #[arg(long)]
        skip_cached: bool,
        /// Skip enrichment entirely and write an empty mapping
        #[arg(long)]
        no_enrich: bool,
    },
    /// Show metadata cache statistics
    CacheStats,
    /// Remove expired records from the metadata cache
    CacheCleanup,
    /// Write a default configuration file
    InitConfig {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let rt = Runtime::new()?;

    match &cli.command {
        Commands::Enrich {
            input,
            output,
            skip_cached,
            no_enrich,
        } => cmd_enrich(&rt, input, output.as_ref(), *skip_cached, *no_enrich),
        Commands::CacheStats => cmd_cache_stats(),
        Commands::CacheCleanup => cmd_cache_cleanup(),
        Commands::InitConfig { force } => cmd_init_config(*force),
    }
}
