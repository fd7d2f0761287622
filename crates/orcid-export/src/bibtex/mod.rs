//! BibTeX export
//!
//! The record owner's own citation is preferred: when a work carries an
//! embedded `citation-type: bibtex` value it is emitted as-is (with its key
//! deduplicated). Otherwise an entry is generated from the extracted fields.

pub mod cite_key;
pub mod entry;
pub mod formatter;

pub use cite_key::CiteKeyGenerator;
pub use entry::{BibTeXEntry, BibTeXEntryType, BibTeXField};
pub use formatter::{format_entries, format_entry};

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use tracing::info;

use orcid_record::{Publication, Publications};
use orcid_text::{escape_for_bibtex, unescape_html};

lazy_static! {
    static ref EMBEDDED_KEY_RE: Regex = Regex::new(r"^@\w+\{([^,]+),").unwrap();
    static ref ENTRY_HEAD_RE: Regex = Regex::new(r"(@\w+\{)[^,]+,").unwrap();
}

/// BibTeX month macro for a numeric month ("3" or "03")
pub fn month_macro(month: &str) -> Option<&'static str> {
    let macro_name = match month.trim() {
        "1" | "01" => "jan",
        "2" | "02" => "feb",
        "3" | "03" => "mar",
        "4" | "04" => "apr",
        "5" | "05" => "may",
        "6" | "06" => "jun",
        "7" | "07" => "jul",
        "8" | "08" => "aug",
        "9" | "09" => "sep",
        "10" => "oct",
        "11" => "nov",
        "12" => "dec",
        _ => return None,
    };
    Some(macro_name)
}

/// First author's last name, used as the cite key stem
pub fn first_author_last_name(publication: &Publication) -> String {
    if let Some(first) = publication.raw_authors.first() {
        return first
            .split_whitespace()
            .last()
            .unwrap_or("Unknown")
            .to_string();
    }

    match publication.authors.split(',').next().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => "Unknown".to_string(),
    }
}

/// "Last, First and Last, First ..." with every author included
pub fn format_authors_bibtex(raw_authors: &[String]) -> String {
    raw_authors
        .iter()
        .map(|name| {
            let name = unescape_html(name);
            let parts: Vec<&str> = name.split_whitespace().collect();
            match parts.split_last() {
                Some((last, given)) if !given.is_empty() => format!("{}, {}", last, given.join(" ")),
                _ => name.clone(),
            }
        })
        .collect::<Vec<_>>()
        .join(" and ")
}

/// Build an entry from extracted publication fields
pub fn publication_to_entry(publication: &Publication, cite_key: String) -> BibTeXEntry {
    let entry_type = BibTeXEntryType::from_orcid_type(&publication.pub_type);
    let mut entry = BibTeXEntry::new(cite_key, entry_type);

    if !publication.raw_authors.is_empty() {
        entry.add_field("author", format_authors_bibtex(&publication.raw_authors));
    }

    if !publication.title.is_empty() {
        // Double braces keep BibTeX styles from changing the title's case
        entry.add_field("title", format!("{{{}}}", escape_for_bibtex(&publication.title)));
    }

    if !publication.venue.is_empty() {
        entry.add_field(entry_type.venue_field(), escape_for_bibtex(&publication.venue));
    }

    if !publication.year.is_empty() {
        entry.add_field("year", publication.year.as_str());
    }

    if let Some(month) = month_macro(&publication.month) {
        entry.add_raw_field("month", month);
    }

    if !publication.doi.is_empty() {
        entry.add_field("doi", publication.doi.as_str());
    }

    if !publication.url.is_empty() {
        entry.add_field("url", publication.url.as_str());
    }

    let extras = [
        ("volume", &publication.volume),
        ("pages", &publication.pages),
        ("number", &publication.number),
        ("publisher", &publication.publisher),
        ("abstract", &publication.abstract_text),
    ];
    for (key, value) in extras {
        if !value.is_empty() && entry.get_field(key).is_none() {
            entry.add_field(key, escape_for_bibtex(value));
        }
    }

    for key in ["isbn", "issn"] {
        if let Some(value) = publication.external_ids.get(key).filter(|v| !v.is_empty()) {
            entry.add_field(key, value.as_str());
        }
    }

    entry
}

/// Cite key of an embedded BibTeX string (`@type{KEY,`)
pub fn embedded_cite_key(bibtex: &str) -> Option<String> {
    EMBEDDED_KEY_RE
        .captures(bibtex.trim())
        .map(|caps| caps[1].trim().to_string())
}

/// Single-line tab-separated citations become one field per line
fn normalize_embedded(bibtex: &str) -> String {
    let text = bibtex.trim();
    if text.contains('\t') && !text.contains('\n') {
        text.replace('\t', "\n  ")
    } else {
        text.to_string()
    }
}

fn embedded_bibtex(publication: &Publication) -> Option<&str> {
    publication
        .citation
        .as_ref()
        .filter(|c| c.citation_type.eq_ignore_ascii_case("bibtex"))
        .map(|c| c.citation_value.as_str())
        .filter(|value| !value.trim().is_empty())
}

/// Render `.bib` file content, or an empty string when there are no publications
pub fn export_bibtex(orcid_id: &str, publications: &Publications, generated_at: DateTime<Utc>) -> String {
    if publications.is_empty() {
        return String::new();
    }

    let mut keys = CiteKeyGenerator::new();
    let mut entries: Vec<String> = Vec::new();
    let mut embedded_count = 0;
    let mut generated_count = 0;

    for publication in publications.iter() {
        if let Some(bibtex) = embedded_bibtex(publication) {
            let mut bibtex = bibtex.to_string();
            if let Some(key) = embedded_cite_key(&bibtex) {
                if keys.contains(&key) {
                    let new_key =
                        keys.generate(&first_author_last_name(publication), &publication.year);
                    bibtex = ENTRY_HEAD_RE
                        .replacen(&bibtex, 1, |caps: &Captures| format!("{}{},", &caps[1], new_key))
                        .into_owned();
                } else {
                    keys.reserve(&key);
                }
            }
            entries.push(normalize_embedded(&bibtex));
            embedded_count += 1;
            continue;
        }

        let key = keys.generate(&first_author_last_name(publication), &publication.year);
        entries.push(format_entry(&publication_to_entry(publication, key)));
        generated_count += 1;
    }

    info!(
        "BibTeX export: {} from ORCID citations, {} generated from metadata",
        embedded_count, generated_count
    );

    let header = format!(
        "% BibTeX export from ORCID record: {id}\n\
         % Generated: {ts}\n\
         % Source: https://orcid.org/{id}\n\
         % Entries: {total} total ({embedded} from ORCID, {generated} generated)\n\
         %\n",
        id = orcid_id,
        ts = generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        total = entries.len(),
        embedded = embedded_count,
        generated = generated_count,
    );

    format!("{}{}\n", header, entries.join("\n\n"))
}
