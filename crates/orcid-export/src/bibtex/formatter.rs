//! BibTeX formatting
//!
//! Converts [`BibTeXEntry`] structures to BibTeX text.

use super::entry::{BibTeXEntry, BibTeXField};

/// Format a single entry:
///
/// ```text
/// @article{Smith2024,
///   author = {Smith, John},
///   month = mar
/// }
/// ```
pub fn format_entry(entry: &BibTeXEntry) -> String {
    let fields: Vec<String> = entry.fields.iter().map(format_field).collect();
    format!(
        "@{}{{{},\n{}\n}}",
        entry.entry_type.as_str(),
        entry.cite_key,
        fields.join(",\n")
    )
}

fn format_field(field: &BibTeXField) -> String {
    if field.raw {
        format!("  {} = {}", field.key, field.value)
    } else {
        format!("  {} = {{{}}}", field.key, field.value)
    }
}

/// Join formatted entries with blank lines
pub fn format_entries(entries: &[BibTeXEntry]) -> String {
    entries
        .iter()
        .map(format_entry)
        .collect::<Vec<_>>()
        .join("\n\n")
}
