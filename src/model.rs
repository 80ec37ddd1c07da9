//! Core data model for bibliography entries.
//!
//! [`BibEntry`] is the input record produced by the external bibliography
//! parser. Enrichment treats entries as read-only: every run consumes a
//! slice of entries and produces a separate metadata mapping keyed by
//! [`BibEntry::key`].

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One bibliographic record, as produced by the parser.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BibEntry {
    /// Citation key, unique within a run (e.g. "smith2020")
    pub key: String,
    /// Entry title as written in the bibliography (may contain LaTeX)
    pub title: String,
    /// Ordered author list, one name per element
    pub authors: Vec<String>,
    /// Publication year
    pub year: Option<i32>,
    /// Venue or journal name
    pub venue: Option<String>,
    /// Digital Object Identifier, if the entry carries one
    pub doi: Option<String>,
    /// Entry URL field, if present
    pub url: Option<String>,
    /// Entry type (article, inproceedings, misc, ...)
    pub entry_type: String,
    /// Unparsed fields preserved verbatim for identifier fallback
    /// (e.g. eprint, archiveprefix, primaryclass)
    pub raw_fields: BTreeMap<String, String>,
}

impl BibEntry {
    /// Case-insensitive lookup into the raw field map.
    pub fn raw_field(&self, name: &str) -> Option<&str> {
        self.raw_fields
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Read a bibliography from a JSON file containing an array of entries.
pub fn load_entries(path: &Path) -> Result<Vec<BibEntry>> {
    if !path.exists() {
        return Err(Error::not_found(path));
    }
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| Error::input(path, e.to_string()))
}
