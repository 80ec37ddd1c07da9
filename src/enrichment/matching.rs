//! Similarity scoring between bibliography entries and candidate API results.
//!
//! Free-text search against academic APIs returns near-misses: different
//! papers with overlapping titles, the right paper with a reformatted
//! title, LaTeX markup that the index never saw. These functions decide
//! whether a candidate is the same work as the entry.
//!
//! Title comparison is Jaccard similarity over normalized token sets with
//! stop words removed. Author comparison pairs each name in the shorter
//! list with its best Jaro-Winkler match in the other list.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use strsim::jaro_winkler;

/// Minimum per-name similarity for two author names to count as a match.
pub const AUTHOR_NAME_MATCH_THRESHOLD: f64 = 0.8;

/// Weight of the author signal when computing match confidence.
pub const AUTHOR_CONFIDENCE_WEIGHT: f64 = 0.3;

/// Cleaned titles shorter than this are too ambiguous for free-text search.
pub const MIN_SEARCH_TITLE_LEN: usize = 10;

/// Words carrying no discriminating power, dropped before comparison.
const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
];

/// `\emph{text}` and friends: keep the argument, drop the command.
static LATEX_COMMAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\[a-zA-Z]+\{([^}]*)\}").unwrap());

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s]").unwrap());

/// Like NON_WORD but keeps hyphens and colons, which search endpoints accept.
static NON_QUERY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s\-:]").unwrap());

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Strip LaTeX markup and punctuation, lowercase, collapse whitespace.
pub fn normalize_title(title: &str) -> String {
    let stripped = LATEX_COMMAND.replace_all(title, "$1");
    let stripped = stripped.replace(['{', '}'], "");
    let cleaned = NON_WORD.replace_all(&stripped, " ");
    WHITESPACE
        .replace_all(cleaned.trim(), " ")
        .to_lowercase()
}

/// Prepare a title for use as a free-text search query.
///
/// Keeps case, hyphens and colons (APIs index those); strips LaTeX
/// commands and braces that would poison the query.
pub fn clean_title_for_search(title: &str) -> String {
    let stripped = LATEX_COMMAND.replace_all(title, "$1");
    let stripped = stripped.replace(['{', '}'], "");
    let cleaned = NON_QUERY.replace_all(&stripped, " ");
    WHITESPACE.replace_all(cleaned.trim(), " ").into_owned()
}

fn title_tokens(title: &str) -> HashSet<String> {
    normalize_title(title)
        .split_whitespace()
        .filter(|w| !STOP_WORDS.contains(w))
        .map(str::to_string)
        .collect()
}

/// Jaccard similarity of two titles over normalized, stop-word-free tokens.
///
/// Returns a score in [0, 1]. Two empty token sets are identical (1.0);
/// one empty set shares nothing with a non-empty one (0.0).
pub fn title_similarity(a: &str, b: &str) -> f64 {
    let tokens_a = title_tokens(a);
    let tokens_b = title_tokens(b);

    if tokens_a.is_empty() && tokens_b.is_empty() {
        return 1.0;
    }
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let intersection = tokens_a.intersection(&tokens_b).count();
    let union = tokens_a.union(&tokens_b).count();
    intersection as f64 / union as f64
}

/// Normalize an author name for comparison.
///
/// Reorders "Last, First" to "first last", lowercases, strips punctuation
/// and drops single-letter initials when a fuller name part remains.
pub fn normalize_author_name(name: &str) -> String {
    let reordered = match name.split_once(',') {
        Some((last, first)) => format!("{} {}", first.trim(), last.trim()),
        None => name.trim().to_string(),
    };
    let cleaned = NON_WORD.replace_all(&reordered, " ").to_lowercase();
    let tokens: Vec<&str> = cleaned.split_whitespace().collect();

    let full_parts: Vec<&str> = tokens.iter().copied().filter(|t| t.len() > 1).collect();
    let kept = if full_parts.is_empty() { tokens } else { full_parts };
    kept.join(" ")
}

/// Fraction of names in the shorter list with an acceptable match in the
/// other list. Returns 0.0 when either list is empty.
pub fn author_similarity(a: &[String], b: &[String]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let norm_a: Vec<String> = a.iter().map(|n| normalize_author_name(n)).collect();
    let norm_b: Vec<String> = b.iter().map(|n| normalize_author_name(n)).collect();

    let (shorter, longer) = if norm_a.len() <= norm_b.len() {
        (&norm_a, &norm_b)
    } else {
        (&norm_b, &norm_a)
    };

    let matched = shorter
        .iter()
        .filter(|name| {
            longer
                .iter()
                .map(|other| jaro_winkler(name, other))
                .fold(0.0_f64, f64::max)
                >= AUTHOR_NAME_MATCH_THRESHOLD
        })
        .count();

    matched as f64 / shorter.len() as f64
}

/// Combined confidence for an accepted search match.
///
/// Title similarity decides acceptance; authors only raise the reported
/// confidence, capped at 1.0.
pub fn match_confidence(title_sim: f64, author_sim: f64) -> f64 {
    (title_sim + AUTHOR_CONFIDENCE_WEIGHT * author_sim).min(1.0)
}

/// Surname of the first author, used to narrow search queries.
///
/// Handles both "Last, First" and "First Last" forms; for the latter the
/// whole name is returned, which the search endpoints match fine.
pub fn first_author_surname(authors: &[String]) -> Option<String> {
    let first = authors.first()?;
    let surname = first.split(" and ").next()?.split(',').next()?.trim();
    (!surname.is_empty()).then(|| surname.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_titles() {
        assert_eq!(
            title_similarity("Deep Learning for NLP", "Deep Learning for NLP"),
            1.0
        );
    }

    #[test]
    fn test_case_and_punctuation_ignored() {
        assert_eq!(
            title_similarity("Attention Is All You Need!", "attention is all you need"),
            1.0
        );
    }

    #[test]
    fn test_latex_markup_stripped() {
        let raw = r"{Deep} \emph{Learning} for \textbf{Academic} Paper Analysis";
        let clean = "Deep Learning for Academic Paper Analysis";
        assert!(title_similarity(raw, clean) >= 0.7);
    }

    #[test]
    fn test_disjoint_titles() {
        assert_eq!(
            title_similarity("Quantum Field Theory", "Protein Folding Dynamics"),
            0.0
        );
    }

    #[test]
    fn test_empty_title_edge_cases() {
        assert_eq!(title_similarity("", ""), 1.0);
        // Stop words only normalizes to an empty token set
        assert_eq!(title_similarity("the of and", "the of and"), 1.0);
        assert_eq!(title_similarity("", "Deep Learning"), 0.0);
        assert_eq!(title_similarity("the and", "Deep Learning"), 0.0);
    }

    #[test]
    fn test_stop_words_do_not_inflate_similarity() {
        // Shared stop words alone must not create a match
        assert_eq!(
            title_similarity("The Theory of Stars", "The History of Rome"),
            0.0
        );
    }

    #[test]
    fn test_clean_title_for_search() {
        assert_eq!(
            clean_title_for_search(r"\texttt{GraphQL}: A {Query} Language"),
            "GraphQL: A Query Language"
        );
        assert_eq!(
            clean_title_for_search("Self-Supervised   Learning"),
            "Self-Supervised Learning"
        );
    }

    #[test]
    fn test_normalize_author_name_orderings() {
        assert_eq!(normalize_author_name("Smith, John"), "john smith");
        assert_eq!(normalize_author_name("John Smith"), "john smith");
        assert_eq!(normalize_author_name("Smith, John Q."), "john smith");
        assert_eq!(normalize_author_name("J. Smith"), "smith");
    }

    #[test]
    fn test_author_similarity_full_match() {
        let a = vec!["Smith, John".to_string(), "Jane Doe".to_string()];
        let b = vec!["John Smith".to_string(), "Doe, Jane".to_string()];
        assert_eq!(author_similarity(&a, &b), 1.0);
    }

    #[test]
    fn test_author_similarity_shorter_list_governs() {
        let entry = vec!["John Smith".to_string()];
        let result = vec![
            "John Smith".to_string(),
            "Jane Doe".to_string(),
            "Wei Zhang".to_string(),
        ];
        assert_eq!(author_similarity(&entry, &result), 1.0);
    }

    #[test]
    fn test_author_similarity_empty_lists() {
        let some = vec!["John Smith".to_string()];
        assert_eq!(author_similarity(&[], &some), 0.0);
        assert_eq!(author_similarity(&some, &[]), 0.0);
        assert_eq!(author_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn test_author_similarity_no_overlap() {
        let a = vec!["John Smith".to_string()];
        let b = vec!["Vera Molnar".to_string()];
        assert!(author_similarity(&a, &b) < 1.0);
    }

    #[test]
    fn test_match_confidence_capped() {
        assert_eq!(match_confidence(1.0, 1.0), 1.0);
        assert!((match_confidence(0.8, 0.5) - 0.95).abs() < 1e-9);
        assert_eq!(match_confidence(0.7, 0.0), 0.7);
    }

    #[test]
    fn test_first_author_surname() {
        assert_eq!(
            first_author_surname(&["LeCun, Yann".to_string()]),
            Some("LeCun".to_string())
        );
        assert_eq!(
            first_author_surname(&["Ashish Vaswani".to_string()]),
            Some("Ashish Vaswani".to_string())
        );
        assert_eq!(
            first_author_surname(&["Doe, Jane".to_string(), "Roe, Richard".to_string()]),
            Some("Doe".to_string())
        );
        assert_eq!(first_author_surname(&[]), None);
        assert_eq!(first_author_surname(&["  ".to_string()]), None);
    }
}

/// Property-based tests for the scoring functions
#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Titles with word characters, spaces and common punctuation
    fn arbitrary_title() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9 .,:!\\-]{0,60}"
    }

    fn arbitrary_authors() -> impl Strategy<Value = Vec<String>> {
        proptest::collection::vec("[a-zA-Z ,.]{1,30}", 0..5)
    }

    proptest! {
        /// Similarity never leaves [0, 1]
        #[test]
        fn title_similarity_in_range(a in arbitrary_title(), b in arbitrary_title()) {
            let score = title_similarity(&a, &b);
            prop_assert!((0.0..=1.0).contains(&score), "out of range: {}", score);
        }

        /// Argument order never matters
        #[test]
        fn title_similarity_symmetric(a in arbitrary_title(), b in arbitrary_title()) {
            prop_assert_eq!(title_similarity(&a, &b), title_similarity(&b, &a));
        }

        /// A title always matches itself exactly
        #[test]
        fn title_self_similarity_is_one(a in arbitrary_title()) {
            prop_assert_eq!(title_similarity(&a, &a), 1.0);
        }

        /// Author scores stay in [0, 1] regardless of list shapes
        #[test]
        fn author_similarity_in_range(a in arbitrary_authors(), b in arbitrary_authors()) {
            let score = author_similarity(&a, &b);
            prop_assert!((0.0..=1.0).contains(&score), "out of range: {}", score);
        }

        /// Normalization is idempotent
        #[test]
        fn normalize_title_idempotent(a in arbitrary_title()) {
            let once = normalize_title(&a);
            prop_assert_eq!(normalize_title(&once), once.clone());
        }
    }
}
