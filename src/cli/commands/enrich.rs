//! Bibliography metadata enrichment command.

use std::collections::BTreeMap;
use std::path::PathBuf;

use tokio::runtime::Runtime;

use crate::config;
use crate::enrichment::{EnrichedMetadata, EnrichmentService};
use crate::error::ResultExt;
use crate::model;

/// Enrich a parsed bibliography with metadata from scholarly APIs.
pub fn cmd_enrich(
    rt: &Runtime,
    input: &PathBuf,
    output: Option<&PathBuf>,
    skip_cached: bool,
    no_enrich: bool,
) -> anyhow::Result<()> {
    let mut config = config::load();
    if skip_cached {
        config.enrichment.skip_cached = true;
    }

    let entries = model::load_entries(input)?;

    if no_enrich || !config.enrichment.enabled {
        println!("Enrichment disabled; writing an empty mapping.");
        return write_output(output, &BTreeMap::new());
    }
    if entries.is_empty() {
        println!("No entries found in {}.", input.display());
        return write_output(output, &BTreeMap::new());
    }

    let mut service = EnrichmentService::from_config(&config)?;

    let sources: Vec<_> = service.sources().iter().map(|s| s.as_str()).collect();
    println!("Sources: {}", sources.join(", "));
    if config.enrichment.skip_cached {
        println!("Cache-only mode: entries without cached metadata are skipped.");
    }
    println!("Enriching {} entries...\n", entries.len());

    let enriched = rt.block_on(service.enrich(&entries));

    for entry in &entries {
        match enriched.get(&entry.key) {
            Some(metadata) => println!("✓ {} ({})", entry.key, metadata.source),
            None => println!("✗ {} no metadata found", entry.key),
        }
    }
    println!();
    println!(
        "Done! {} of {} entries enriched",
        enriched.len(),
        entries.len()
    );

    write_output(output, &enriched)
}

/// Write the enriched mapping as pretty JSON to a file, or stdout when no
/// path is given.
fn write_output(
    output: Option<&PathBuf>,
    enriched: &BTreeMap<String, EnrichedMetadata>,
) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(enriched)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(format!("writing enriched metadata to {}", path.display()))?;
            println!("Wrote enriched metadata to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
