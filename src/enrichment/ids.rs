//! DOI and arXiv identifier handling shared by the source clients.
//!
//! Bibliography exports carry identifiers in every shape the upstream
//! tools emit: bare DOIs, `doi:` prefixes, full resolver URLs, arXiv IDs
//! hiding in `eprint` fields or DataCite DOIs. Everything here normalizes
//! those into the canonical forms the APIs expect.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::BibEntry;

/// Modern arXiv identifier, e.g. `2501.00123`.
static ARXIV_NEW_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}\.\d{4,5}$").unwrap());

/// Pre-2007 arXiv identifier, e.g. `cs/0501001` or `cs.CV/0501001`.
static ARXIV_OLD_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z-]+(\.[A-Z]{2})?/\d{7}$").unwrap());

/// Trailing version marker on an arXiv identifier (`v2` in `2501.00123v2`).
static ARXIV_VERSION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"v\d+$").unwrap());

const DOI_PREFIXES: &[&str] = &[
    "https://doi.org/",
    "http://doi.org/",
    "https://dx.doi.org/",
    "http://dx.doi.org/",
    "doi:",
];

/// Strip resolver URLs and `doi:` prefixes down to the bare DOI.
pub fn clean_doi(doi: &str) -> String {
    let mut rest = doi.trim();
    loop {
        let before = rest;
        for prefix in DOI_PREFIXES {
            if let Some(stripped) = strip_prefix_ignore_case(rest, prefix) {
                rest = stripped.trim();
            }
        }
        if rest == before {
            return rest.to_string();
        }
    }
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}

/// Minimal shape check: `10.` registrant prefix and a suffix separator.
///
/// Deliberately loose. The registries accept DOIs this rejects nothing
/// from; it only filters obvious junk like empty strings and URLs that
/// survived cleaning.
pub fn is_valid_doi(doi: &str) -> bool {
    doi.len() >= 7 && doi.starts_with("10.") && doi[3..].contains('/')
}

/// True when `s` is a bare arXiv identifier, with or without a version.
pub fn looks_like_arxiv_id(s: &str) -> bool {
    let bare = strip_arxiv_version(s);
    ARXIV_NEW_ID.is_match(bare) || ARXIV_OLD_ID.is_match(bare)
}

fn strip_arxiv_version(id: &str) -> &str {
    match ARXIV_VERSION.find(id) {
        Some(m) if m.start() > 0 => &id[..m.start()],
        _ => id,
    }
}

fn strip_arxiv_prefix(s: &str) -> &str {
    let s = s.trim();
    strip_prefix_ignore_case(s, "arxiv:").map_or(s, str::trim)
}

/// Pull an arXiv identifier out of an entry, wherever it is hiding.
///
/// Checks the `eprint` field, then DataCite DOIs (`10.48550/arXiv.<id>`),
/// then abstract-page URLs. Returns the identifier without any version
/// suffix so lookups hit the latest revision.
pub fn extract_arxiv_id(entry: &BibEntry) -> Option<String> {
    if let Some(eprint) = entry.raw_field("eprint") {
        let candidate = strip_arxiv_prefix(eprint);
        if looks_like_arxiv_id(candidate) {
            return Some(strip_arxiv_version(candidate).to_string());
        }
    }

    if let Some(doi) = &entry.doi {
        let doi = clean_doi(doi);
        if let Some(candidate) = strip_prefix_ignore_case(&doi, "10.48550/arxiv.") {
            if looks_like_arxiv_id(candidate) {
                return Some(strip_arxiv_version(candidate).to_string());
            }
        }
    }

    if let Some(url) = &entry.url {
        if let Some(pos) = url.to_lowercase().find("arxiv.org/abs/") {
            let candidate = url[pos + "arxiv.org/abs/".len()..]
                .trim_end_matches('/')
                .split(['?', '#'])
                .next()
                .unwrap_or("");
            if looks_like_arxiv_id(candidate) {
                return Some(strip_arxiv_version(candidate).to_string());
            }
        }
    }

    None
}

/// Heuristic: does this entry describe an arXiv preprint?
///
/// Used to front the arXiv source for entries that clearly came from
/// there, since the general indexes often lag preprint postings.
pub fn is_arxiv_entry(entry: &BibEntry) -> bool {
    if extract_arxiv_id(entry).is_some() {
        return true;
    }

    if let Some(venue) = &entry.venue {
        if venue.to_lowercase().contains("arxiv") {
            return true;
        }
    }

    for field in [&entry.doi, &entry.url] {
        if let Some(value) = field {
            if value.to_lowercase().contains("arxiv") {
                return true;
            }
        }
    }

    ["archiveprefix", "eprint", "primaryclass"]
        .iter()
        .filter_map(|name| entry.raw_field(name))
        .any(|value| value.to_lowercase().contains("arxiv"))
}
