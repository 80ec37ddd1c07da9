//! Persistent metadata cache.
//!
//! Enrichment results are cached on disk keyed by entry key, so re-runs
//! over an unchanged bibliography make no network requests. Records carry
//! an expiry timestamp (default 30 days past fetch); an expired record is
//! a miss.
//!
//! Both cache files are pretty-printed JSON over a `BTreeMap`, which keeps
//! them stable and human-diffable - the files are meant to live in version
//! control alongside the bibliography. Writes go to a temp file first and
//! rename into place, so an overlapping scheduled run reading the file
//! never observes a partial write.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::domain::EnrichedMetadata;

/// Default record lifetime in days.
pub const DEFAULT_TTL_DAYS: i64 = 30;

/// One cached enrichment result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord {
    /// The metadata itself, flattened so the persisted record reads as
    /// `{...fields, source, fetched_at, expires_at, entry_title}`
    #[serde(flatten)]
    pub metadata: EnrichedMetadata,
    /// Entry title at the time of caching, kept for diff readability
    pub entry_title: String,
    /// Past this instant the record is treated as absent
    pub expires_at: DateTime<Utc>,
}

impl CacheRecord {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Counts reported by [`MetadataCache::stats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub total: usize,
    pub valid: usize,
    pub expired: usize,
}

/// Cache persistence errors.
///
/// Only writes can fail; unreadable or corrupt files degrade to an empty
/// cache so a run never aborts over cache state.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Failed to serialize cache: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to create cache directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to write cache to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

/// Disk-backed metadata cache with per-record expiry.
pub struct MetadataCache {
    path: PathBuf,
    ttl: Duration,
    records: BTreeMap<String, CacheRecord>,
}

impl MetadataCache {
    /// Load the cache at `path`, or start empty when the file is missing
    /// or unreadable. A corrupt cache costs re-fetching, never the run.
    pub fn open(path: impl Into<PathBuf>, ttl_days: i64) -> Self {
        let path = path.into();
        let records = load_map(&path);
        Self {
            path,
            ttl: Duration::days(ttl_days),
            records,
        }
    }

    /// Fresh record for `key`, or None when absent or expired.
    pub fn get(&self, key: &str) -> Option<&CacheRecord> {
        self.records
            .get(key)
            .filter(|r| !r.is_expired_at(Utc::now()))
    }

    /// Whether a non-expired record exists for `key`.
    pub fn contains_fresh(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Store a result and flush to disk immediately, so work already done
    /// survives a crash later in the run.
    pub fn put(
        &mut self,
        key: &str,
        entry_title: &str,
        metadata: EnrichedMetadata,
    ) -> Result<(), CacheError> {
        let expires_at = metadata.fetched_at + self.ttl;
        self.records.insert(
            key.to_string(),
            CacheRecord {
                metadata,
                entry_title: entry_title.to_string(),
                expires_at,
            },
        );
        self.save()
    }

    /// Drop expired records; returns how many were removed.
    pub fn cleanup_expired(&mut self) -> Result<usize, CacheError> {
        let now = Utc::now();
        let before = self.records.len();
        self.records.retain(|_, r| !r.is_expired_at(now));
        let removed = before - self.records.len();
        if removed > 0 {
            self.save()?;
        }
        Ok(removed)
    }

    pub fn stats(&self) -> CacheStats {
        let now = Utc::now();
        let expired = self
            .records
            .values()
            .filter(|r| r.is_expired_at(now))
            .count();
        CacheStats {
            total: self.records.len(),
            valid: self.records.len() - expired,
            expired,
        }
    }

    fn save(&self) -> Result<(), CacheError> {
        let contents = serde_json::to_string_pretty(&self.records)?;
        write_atomic(&self.path, &contents)
    }
}

/// First-seen timestamps per entry key.
///
/// Written the first time a key is observed and never updated, so the
/// downstream feed renderer can compute a stable "date added" for each
/// entry across runs.
pub struct DiscoveryCache {
    path: PathBuf,
    records: BTreeMap<String, DateTime<Utc>>,
}

impl DiscoveryCache {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = load_map(&path);
        Self { path, records }
    }

    /// Record `key` as first seen now, unless it was seen before.
    /// Returns true when the key is new.
    pub fn record(&mut self, key: &str) -> Result<bool, CacheError> {
        if self.records.contains_key(key) {
            return Ok(false);
        }
        self.records.insert(key.to_string(), Utc::now());
        self.save()?;
        Ok(true)
    }

    pub fn first_seen(&self, key: &str) -> Option<DateTime<Utc>> {
        self.records.get(key).copied()
    }

    fn save(&self) -> Result<(), CacheError> {
        let contents = serde_json::to_string_pretty(&self.records)?;
        write_atomic(&self.path, &contents)
    }
}

/// Read a JSON map, degrading to empty on any failure.
fn load_map<V: for<'de> Deserialize<'de>>(path: &Path) -> BTreeMap<String, V> {
    if !path.exists() {
        tracing::debug!("No cache file at {:?}, starting empty", path);
        return BTreeMap::new();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(map) => map,
            Err(e) => {
                tracing::warn!(
                    "Cache file {:?} is corrupt ({}), treating as empty",
                    path,
                    e
                );
                BTreeMap::new()
            }
        },
        Err(e) => {
            tracing::warn!("Failed to read cache file {:?}: {}", path, e);
            BTreeMap::new()
        }
    }
}

/// Write contents to a temp file next to `path`, then rename into place.
fn write_atomic(path: &Path, contents: &str) -> Result<(), CacheError> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        std::fs::create_dir_all(dir).map_err(|e| CacheError::CreateDir(dir.to_path_buf(), e))?;
    }

    let temp_path = path.with_extension("json.tmp");
    std::fs::write(&temp_path, contents).map_err(|e| CacheError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| CacheError::Rename(temp_path, path.to_path_buf(), e))?;
    Ok(())
}
