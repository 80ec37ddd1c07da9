//! Metadata cache maintenance commands.

use crate::config;
use crate::enrichment::MetadataCache;

/// Show metadata cache statistics.
pub fn cmd_cache_stats() -> anyhow::Result<()> {
    let config = config::load();
    let cache = MetadataCache::open(
        &config.enrichment.cache_path,
        config.enrichment.cache_ttl_days,
    );
    let stats = cache.stats();

    println!("Metadata cache: {}", config.enrichment.cache_path.display());
    println!("  Total records:   {}", stats.total);
    println!("  Valid records:   {}", stats.valid);
    println!("  Expired records: {}", stats.expired);
    Ok(())
}

/// Remove expired records from the metadata cache.
pub fn cmd_cache_cleanup() -> anyhow::Result<()> {
    let config = config::load();
    let mut cache = MetadataCache::open(
        &config.enrichment.cache_path,
        config.enrichment.cache_ttl_days,
    );

    let removed = cache.cleanup_expired()?;
    if removed == 0 {
        println!("No expired records to remove.");
    } else {
        println!("✓ Removed {removed} expired record(s)");
    }
    Ok(())
}
