//! Adapter layer: Convert Crossref DTOs to domain models
//!
//! This is the ONLY place where DTO types are converted to domain types.
//! This isolates API changes - if Crossref changes their response format,
//! only this file and dto.rs need to change.

use super::dto;
use crate::enrichment::domain::{EnrichedMetadata, MetadataSource};

/// Convert a Crossref work to an enrichment record.
///
/// Absent fields stay absent; Crossref deposits vary wildly in
/// completeness and a sparse record is still worth caching.
pub fn to_metadata(work: dto::Work) -> EnrichedMetadata {
    let mut metadata = EnrichedMetadata::new(MetadataSource::Crossref);

    if let Some(doi) = work.doi {
        metadata = metadata.with_doi(doi);
    }

    // Kept verbatim, JATS markup included; rendering is the consumer's job
    metadata.abstract_text = work.abstract_text;

    metadata.authors = author_names(&work.author);
    metadata.venue = work.container_title.into_iter().next();
    metadata.citation_count = work.is_referenced_by_count;
    metadata.reference_count = work.references_count;
    metadata.subjects = work.subject;

    // Print date wins over online; journals backfill online-first works
    metadata.publication_date = work
        .published_print
        .as_ref()
        .and_then(format_date)
        .or_else(|| work.published_online.as_ref().and_then(format_date));

    metadata
}

/// Author display names in deposit order, "given family" when both parts
/// exist.
pub(super) fn author_names(authors: &[dto::Author]) -> Vec<String> {
    authors
        .iter()
        .filter_map(|author| {
            let name = match (&author.given, &author.family) {
                (Some(given), Some(family)) => format!("{given} {family}"),
                (None, Some(family)) => family.clone(),
                (Some(given), None) => given.clone(),
                (None, None) => return None,
            };
            let name = name.trim().to_string();
            (!name.is_empty()).then_some(name)
        })
        .collect()
}

/// Format date parts as "YYYY-MM-DD" when all three are present, else
/// just the year. Parts after a null are unusable.
fn format_date(date: &dto::PartialDate) -> Option<String> {
    let first = date.date_parts.first()?;
    let parts: Vec<i32> = first.iter().map_while(|p| *p).collect();

    match parts.as_slice() {
        [year, month, day, ..] => Some(format!("{year}-{month:02}-{day:02}")),
        [year, ..] => Some(year.to_string()),
        [] => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn work() -> dto::Work {
        dto::Work {
            doi: None,
            title: Vec::new(),
            abstract_text: None,
            author: Vec::new(),
            container_title: Vec::new(),
            is_referenced_by_count: None,
            references_count: None,
            subject: Vec::new(),
            published_print: None,
            published_online: None,
            score: None,
        }
    }

    fn date(parts: Vec<Option<i32>>) -> dto::PartialDate {
        dto::PartialDate {
            date_parts: vec![parts],
        }
    }

    #[test]
    fn test_full_work_maps_all_fields() {
        let work = dto::Work {
            doi: Some("10.1038/nature14539".to_string()),
            title: vec!["Deep learning".to_string()],
            abstract_text: Some("<jats:p>Deep learning allows...</jats:p>".to_string()),
            author: vec![
                dto::Author {
                    given: Some("Yann".to_string()),
                    family: Some("LeCun".to_string()),
                },
                dto::Author {
                    given: Some("Yoshua".to_string()),
                    family: Some("Bengio".to_string()),
                },
            ],
            container_title: vec!["Nature".to_string()],
            is_referenced_by_count: Some(46912),
            references_count: Some(103),
            subject: vec!["Multidisciplinary".to_string()],
            published_print: Some(date(vec![Some(2015), Some(5), Some(28)])),
            published_online: None,
            score: Some(1.0),
        };

        let metadata = to_metadata(work);

        assert_eq!(metadata.source, MetadataSource::Crossref);
        assert_eq!(metadata.doi.as_deref(), Some("10.1038/nature14539"));
        assert_eq!(
            metadata.doi_url.as_deref(),
            Some("https://doi.org/10.1038/nature14539")
        );
        assert_eq!(metadata.authors, vec!["Yann LeCun", "Yoshua Bengio"]);
        assert_eq!(metadata.venue.as_deref(), Some("Nature"));
        assert_eq!(metadata.citation_count, Some(46912));
        assert_eq!(metadata.reference_count, Some(103));
        assert_eq!(metadata.subjects, vec!["Multidisciplinary"]);
        assert_eq!(metadata.publication_date.as_deref(), Some("2015-05-28"));
        // JATS wrapper survives untouched
        assert_eq!(
            metadata.abstract_text.as_deref(),
            Some("<jats:p>Deep learning allows...</jats:p>")
        );
        // Identifier fields this source never supplies stay empty
        assert!(metadata.url.is_none());
        assert!(metadata.arxiv_url.is_none());
        assert!(metadata.pdf_url.is_none());
        assert!(metadata.match_score.is_none());
    }

    #[test]
    fn test_empty_work_maps_to_empty_record() {
        let metadata = to_metadata(work());

        assert_eq!(metadata.source, MetadataSource::Crossref);
        assert!(metadata.doi.is_none());
        assert!(metadata.authors.is_empty());
        assert!(metadata.publication_date.is_none());
    }

    #[test]
    fn test_date_with_single_part_is_year_only() {
        let mut w = work();
        w.published_print = Some(date(vec![Some(2020)]));

        assert_eq!(to_metadata(w).publication_date.as_deref(), Some("2020"));
    }

    #[test]
    fn test_date_with_two_parts_is_year_only() {
        let mut w = work();
        w.published_online = Some(date(vec![Some(2017), Some(6)]));

        assert_eq!(to_metadata(w).publication_date.as_deref(), Some("2017"));
    }

    #[test]
    fn test_date_pads_month_and_day() {
        let mut w = work();
        w.published_print = Some(date(vec![Some(2021), Some(3), Some(7)]));

        assert_eq!(
            to_metadata(w).publication_date.as_deref(),
            Some("2021-03-07")
        );
    }

    #[test]
    fn test_null_date_parts_produce_no_date() {
        let mut w = work();
        w.published_print = Some(date(vec![None]));

        assert!(to_metadata(w).publication_date.is_none());
    }

    #[test]
    fn test_print_date_preferred_over_online() {
        let mut w = work();
        w.published_print = Some(date(vec![Some(2015), Some(5), Some(28)]));
        w.published_online = Some(date(vec![Some(2015), Some(2), Some(9)]));

        assert_eq!(
            to_metadata(w).publication_date.as_deref(),
            Some("2015-05-28")
        );
    }

    #[test]
    fn test_author_name_fallbacks() {
        let authors = vec![
            dto::Author {
                given: Some("Ada".to_string()),
                family: Some("Lovelace".to_string()),
            },
            dto::Author {
                given: None,
                family: Some("Banksy".to_string()),
            },
            dto::Author {
                given: Some("Prince".to_string()),
                family: None,
            },
            dto::Author {
                given: None,
                family: None,
            },
        ];

        assert_eq!(author_names(&authors), vec!["Ada Lovelace", "Banksy", "Prince"]);
    }
}
