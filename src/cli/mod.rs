//! Command-line interface for bib-enrich.
//!
//! This module provides CLI commands for enriching parsed bibliographies
//! and maintaining the metadata cache.

mod commands;

pub use commands::{Cli, Commands, run_command};
