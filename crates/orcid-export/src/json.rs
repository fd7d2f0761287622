//! JSON export
//!
//! Each document carries a `_meta` block followed by the extracted fields.
//! Free-text fields are cleaned for plain-text consumers (tags stripped,
//! sub/superscripts converted to Unicode).

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use orcid_record::{OrcidData, Publication, Publications};
use orcid_text::clean_for_plaintext;

/// Publications envelope, or `None` when there are no publications
pub fn export_publications(
    orcid_id: &str,
    publications: &Publications,
    generated_at: DateTime<Utc>,
) -> Option<Value> {
    if publications.is_empty() {
        return None;
    }

    Some(json!({
        "_meta": {
            "section": "orcid-publications",
            "orcid_id": orcid_id,
            "generated_at": generated_at.to_rfc3339(),
            "total_count": publications.total(),
        },
        "journal_articles": cleaned(&publications.journal_articles),
        "conference_papers": cleaned(&publications.conference_papers),
        "other_publications": cleaned(&publications.other),
    }))
}

fn cleaned(publications: &[Publication]) -> Vec<Publication> {
    publications
        .iter()
        .map(|p| Publication {
            title: clean_for_plaintext(&p.title),
            ..p.clone()
        })
        .collect()
}

/// Profile data envelope, or `None` when the record has none
pub fn export_data(orcid_id: &str, data: &OrcidData, generated_at: DateTime<Utc>) -> Option<Value> {
    if !data.has_content() {
        return None;
    }

    Some(json!({
        "_meta": {
            "section": "orcid-data",
            "orcid_id": orcid_id,
            "generated_at": generated_at.to_rfc3339(),
        },
        "biography": data.biography.as_deref().map(clean_for_plaintext),
        "employment": data.employments,
        "education": data.educations,
        "distinctions": data.distinctions,
        "memberships": data.memberships,
        "external_service": data.services,
        "fundings": data.fundings,
        "external_identifiers": data.external_identifiers,
    }))
}

/// Pretty-print with `indent` spaces per level; non-ASCII is written as-is
pub fn to_json_string(value: &Value, indent: usize) -> serde_json::Result<String> {
    let indent = " ".repeat(indent);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    String::from_utf8(buf)
        .map_err(|e| serde_json::Error::io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}
