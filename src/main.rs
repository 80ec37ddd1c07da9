//! bib-enrich - bibliography metadata enrichment.
//!
//! This application takes a parsed bibliography and fills in missing
//! metadata (abstracts, citation counts, open-access links, ...) by querying
//! scholarly APIs, with persistent caching between runs.

pub mod cli;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod model;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::from_default_env().add_directive("bib_enrich=info".parse().unwrap()))
        .init();

    cli::run_command(&args)
}
