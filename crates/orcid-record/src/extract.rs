//! Field extraction from ORCID v3.0 records
//!
//! Works are read from `activities-summary.works.group[]`, taking the first
//! `work-summary` of each group (after a fetch these are full work details).
//! Profile data comes from `person` and the affiliation sections of
//! `activities-summary`.

use serde_json::Value;
use tracing::warn;

use orcid_text::unescape_html;

use crate::model::{
    Affiliation, AffiliationKind, Citation, ExternalIdentifier, Funding, OrcidData, Publication,
    Publications,
};
use crate::value::{array_at, get_path, non_empty, str_at, value_str};

/// Extract and categorize every work in the record.
///
/// `author_limit` caps the display author list; the full list is kept in
/// `raw_authors`.
pub fn extract_publications(record: &Value, author_limit: usize) -> Publications {
    let mut publications = Publications::default();

    for group in array_at(record, &["activities-summary", "works", "group"]) {
        let Some(work) = array_at(group, &["work-summary"]).first() else {
            continue;
        };
        match work {
            Value::Object(map) if map.is_empty() => continue,
            Value::Object(_) => publications.push(extract_work(work, author_limit)),
            Value::Null => continue,
            _ => warn!("Skipping malformed work entry: expected an object"),
        }
    }

    // Stable sort keeps record order within a year
    for group in [
        &mut publications.journal_articles,
        &mut publications.conference_papers,
        &mut publications.other,
    ] {
        group.sort_by(|a, b| b.year.cmp(&a.year));
    }

    publications
}

fn extract_work(work: &Value, author_limit: usize) -> Publication {
    let raw_authors: Vec<String> = array_at(work, &["contributors", "contributor"])
        .iter()
        .filter_map(|c| non_empty(value_str(c, &["credit-name"])))
        .map(unescape_html)
        .collect();

    let venue = non_empty(value_str(work, &["journal-title"]))
        .or_else(|| non_empty(str_at(work, &["conference", "name"])))
        .map(unescape_html)
        .unwrap_or_default();

    let mut publication = Publication {
        authors: format_display_authors(&raw_authors, author_limit),
        title: unescape_html(value_str(work, &["title", "title"]).unwrap_or("Untitled")),
        venue,
        year: owned(value_str(work, &["publication-date", "year"])),
        month: owned(value_str(work, &["publication-date", "month"])),
        url: owned(value_str(work, &["url"])),
        pub_type: owned(str_at(work, &["type"])).to_lowercase(),
        citation: extract_citation(work),
        raw_authors,
        ..Default::default()
    };

    for eid in array_at(work, &["external-ids", "external-id"]) {
        let id_type = non_empty(str_at(eid, &["external-id-type"]));
        let id_value = non_empty(str_at(eid, &["external-id-value"]));
        if let (Some(id_type), Some(id_value)) = (id_type, id_value) {
            if id_type == "doi" && publication.doi.is_empty() {
                publication.doi = id_value.to_string();
            }
            publication
                .external_ids
                .insert(id_type.to_string(), id_value.to_string());
        }
    }

    publication
}

fn extract_citation(work: &Value) -> Option<Citation> {
    let citation = get_path(work, &["citation"])?;
    Some(Citation {
        citation_type: owned(str_at(citation, &["citation-type"])),
        citation_value: owned(str_at(citation, &["citation-value"])),
    })
}

/// Format author names as "Last, I.I." (IEEE style).
///
/// Only the first `limit` names are shown; "et al." is appended when the
/// list was truncated. Single-token names are kept as written.
pub fn format_display_authors(names: &[String], limit: usize) -> String {
    let mut formatted: Vec<String> = names
        .iter()
        .take(limit)
        .map(|name| {
            let parts: Vec<&str> = name.split_whitespace().collect();
            match parts.split_last() {
                Some((last, given)) if !given.is_empty() => {
                    let initials: String = given
                        .iter()
                        .filter_map(|word| word.chars().next())
                        .map(|c| format!("{}.", c))
                        .collect();
                    format!("{}, {}", last, initials)
                }
                _ => name.clone(),
            }
        })
        .collect();

    if names.len() > limit {
        formatted.push("et al.".to_string());
    }

    formatted.join(", ")
}

/// Biography text, or `None` when absent or empty
pub fn extract_biography(record: &Value) -> Option<String> {
    non_empty(str_at(record, &["person", "biography", "content"])).map(unescape_html)
}

/// Person-level external identifiers with both a type and a value
pub fn extract_external_identifiers(record: &Value) -> Vec<ExternalIdentifier> {
    array_at(record, &["person", "external-identifiers", "external-identifier"])
        .iter()
        .filter_map(|ext| {
            let id_type = non_empty(str_at(ext, &["external-id-type"]))?;
            let value = non_empty(str_at(ext, &["external-id-value"]))?;
            Some(ExternalIdentifier {
                id_type: unescape_html(id_type),
                value: unescape_html(value),
                url: owned(value_str(ext, &["external-id-url"])),
            })
        })
        .collect()
}

/// Items of one affiliation section, most recent start year first
pub fn extract_affiliations(record: &Value, kind: AffiliationKind) -> Vec<Affiliation> {
    let mut items: Vec<Affiliation> = array_at(record, &["activities-summary", kind.section(), "affiliation-group"])
        .iter()
        .flat_map(|group| array_at(group, &["summaries"]))
        .filter_map(|wrapper| get_path(wrapper, &[kind.summary_key()]))
        .filter(|summary| summary.as_object().is_some_and(|m| !m.is_empty()))
        .map(|summary| {
            let address = |field: &str| non_empty(str_at(summary, &["organization", "address", field]));
            let location: Vec<&str> = ["city", "region", "country"]
                .into_iter()
                .filter_map(address)
                .collect();

            Affiliation {
                organization: unescaped(str_at(summary, &["organization", "name"])),
                location: location.join(", "),
                role: unescaped(str_at(summary, &["role-title"])),
                department: unescaped(str_at(summary, &["department-name"])),
                start_year: owned(value_str(summary, &["start-date", "year"])),
                end_year: owned(value_str(summary, &["end-date", "year"])),
            }
        })
        .collect();

    sort_by_start_year(&mut items, |a| &a.start_year);
    items
}

/// Funding summaries, most recent start year first
pub fn extract_fundings(record: &Value) -> Vec<Funding> {
    let mut items: Vec<Funding> = array_at(record, &["activities-summary", "fundings", "group"])
        .iter()
        .flat_map(|group| array_at(group, &["funding-summary"]))
        .filter(|summary| summary.as_object().is_some_and(|m| !m.is_empty()))
        .map(|summary| Funding {
            title: unescaped(value_str(summary, &["title", "title"])),
            organization: unescaped(str_at(summary, &["organization", "name"])),
            funding_type: owned(str_at(summary, &["type"])),
            start_year: owned(value_str(summary, &["start-date", "year"])),
            end_year: owned(value_str(summary, &["end-date", "year"])),
        })
        .collect();

    sort_by_start_year(&mut items, |f| &f.start_year);
    items
}

/// Every non-publication field of the record
pub fn extract_data(record: &Value) -> OrcidData {
    OrcidData {
        biography: extract_biography(record),
        external_identifiers: extract_external_identifiers(record),
        fundings: extract_fundings(record),
        employments: extract_affiliations(record, AffiliationKind::Employment),
        educations: extract_affiliations(record, AffiliationKind::Education),
        distinctions: extract_affiliations(record, AffiliationKind::Distinction),
        memberships: extract_affiliations(record, AffiliationKind::Membership),
        services: extract_affiliations(record, AffiliationKind::Service),
    }
}

/// Descending by start year as a string, empty treated as "0"
fn sort_by_start_year<T>(items: &mut [T], start_year: impl Fn(&T) -> &String) {
    let key = |item: &T| -> String {
        let year = start_year(item);
        if year.is_empty() {
            "0".to_string()
        } else {
            year.clone()
        }
    };
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}

fn owned(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

fn unescaped(value: Option<&str>) -> String {
    non_empty(value).map(unescape_html).unwrap_or_default()
}
