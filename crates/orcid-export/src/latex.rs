//! LaTeX section rendering
//!
//! Free-text fields (titles, biography, funding titles) may carry HTML or
//! inline math and go through [`escape_latex_smart`]. Structured fields
//! (names, organizations, venues, years) go through the plain
//! [`escape_latex`]. Every `\href` target is passed through
//! [`sanitize_url_for_latex`]; when that rejects it, the label is kept and the
//! link dropped.

use orcid_record::{Affiliation, OrcidData, Publication, PublicationCategory, Publications};
use orcid_text::{escape_latex, escape_latex_smart, sanitize_url_for_latex};

use crate::Section;

/// Format a year span: "S--E", "S--present", "E" or ""
pub fn format_date_range(start_year: &str, end_year: &str) -> String {
    match (start_year.is_empty(), end_year.is_empty()) {
        (false, false) => format!("{}--{}", start_year, end_year),
        (false, true) => format!("{}--present", start_year),
        (true, false) => end_year.to_string(),
        (true, true) => String::new(),
    }
}

/// Placeholder written when the record could not be obtained
pub fn generate_unavailable_latex(section: Section, reason: &str) -> String {
    format!(
        "\\section{{{}}}\n\n\\noindent\n\\textit{{{}}}\n",
        section.heading(),
        escape_latex(reason)
    )
}

/// Render the publications section, or an empty string when there is nothing to list
pub fn generate_publications_latex(orcid_id: &str, publications: &Publications) -> String {
    if publications.is_empty() {
        return String::new();
    }

    let mut lines: Vec<String> = Vec::new();
    push_section_header(&mut lines, Section::Publications, orcid_id);

    lines.push(r"\vspace{0.5em}".to_string());
    lines.push(r"\noindent".to_string());
    let groups = publications.groups();
    for (category, pubs) in &groups {
        lines.push(format!("{} {} for the period considered", pubs.len(), category.heading()));
        // Other Publications is always the last count
        if *category != PublicationCategory::Other {
            lines.push(r"\\".to_string());
        }
    }
    lines.push(String::new());

    for (category, pubs) in &groups {
        push_publication_list(&mut lines, category.heading(), pubs);
    }

    lines.join("\n")
}

fn push_section_header(lines: &mut Vec<String>, section: Section, orcid_id: &str) {
    lines.push(format!("\\section{{{}}}", section.heading()));
    lines.push(String::new());

    let orcid_url = sanitize_url_for_latex(&format!("https://orcid.org/{}", orcid_id));
    let label = escape_latex(orcid_id);
    lines.push(r"\noindent".to_string());
    if orcid_url.is_empty() {
        lines.push(format!("ORCID: {}", label));
    } else {
        lines.push(format!("ORCID: \\href{{{}}}{{{}}}", orcid_url, label));
    }
    lines.push(String::new());
}

fn push_publication_list(lines: &mut Vec<String>, heading: &str, publications: &[Publication]) {
    lines.push(format!("\\subsection{{{}}}", heading));
    lines.push(r"\begin{raggedright}".to_string());
    lines.push(r"\begin{itemize}".to_string());
    for publication in publications {
        lines.push(format!("  \\item {}", format_publication_item(publication)));
    }
    lines.push(r"\end{itemize}".to_string());
    lines.push(r"\end{raggedright}".to_string());
    lines.push(String::new());
}

/// `YEAR: AUTHORS, ``TITLE.'' \textit{VENUE}.\\ \href{doi-url}{DOI:doi}`
pub fn format_publication_item(publication: &Publication) -> String {
    let mut entry = format!("{}: ", escape_latex(&publication.year));

    let authors = escape_latex(&publication.authors);
    if !authors.is_empty() {
        entry.push_str(&authors);
        entry.push_str(", ");
    }

    entry.push_str(&format!("``{}.''", escape_latex_smart(&publication.title)));

    let venue = escape_latex(&publication.venue);
    if !venue.is_empty() {
        entry.push_str(&format!(" \\textit{{{}}}.", venue));
    }

    if !publication.doi.is_empty() {
        let label = escape_latex(&publication.doi).to_lowercase();
        let url = sanitize_url_for_latex(&format!("https://doi.org/{}", publication.doi).to_lowercase());
        if url.is_empty() {
            entry.push_str(&format!("\\\\ DOI:{}", label));
        } else {
            entry.push_str(&format!("\\\\ \\href{{{}}}{{DOI:{}}}", url, label));
        }
    }

    entry
}

/// Builds "a, b (c), d" style item text, skipping empty parts
#[derive(Default)]
struct ItemText(String);

impl ItemText {
    fn add(&mut self, value: &str, prefix: &str, suffix: &str) {
        if value.is_empty() {
            return;
        }
        if self.0.is_empty() {
            self.0.push_str(value);
        } else {
            self.0.push_str(prefix);
            self.0.push_str(value);
            self.0.push_str(suffix);
        }
    }

    fn finish(self) -> String {
        self.0
    }
}

struct Escaped {
    role: String,
    department: String,
    organization: String,
    location: String,
    dates: String,
}

impl Escaped {
    fn new(affiliation: &Affiliation) -> Self {
        Self {
            role: escape_latex(&affiliation.role),
            department: escape_latex(&affiliation.department),
            organization: escape_latex(&affiliation.organization),
            location: escape_latex(&affiliation.location),
            dates: format_date_range(&affiliation.start_year, &affiliation.end_year),
        }
    }
}

fn employment_item(affiliation: &Affiliation) -> String {
    let e = Escaped::new(affiliation);
    let mut item = ItemText::default();
    item.add(&e.role, "", "");
    item.add(&e.department, ", ", "");
    item.add(&e.organization, ", ", "");
    item.add(&e.location, " (", ")");
    item.add(&e.dates, ", ", "");
    item.finish()
}

fn education_item(affiliation: &Affiliation) -> String {
    let e = Escaped::new(affiliation);
    let mut item = ItemText::default();
    item.add(&e.role, "", "");
    item.add(&e.department, " in ", "");
    item.add(&e.organization, ", ", "");
    item.add(&e.location, " (", ")");
    item.add(&e.dates, ", ", "");
    item.finish()
}

/// Distinctions and service: role, organization, dates
fn role_at_org_item(affiliation: &Affiliation) -> String {
    let e = Escaped::new(affiliation);
    let mut item = ItemText::default();
    item.add(&e.role, "", "");
    item.add(&e.organization, ", ", "");
    item.add(&e.dates, ", ", "");
    item.finish()
}

fn membership_item(affiliation: &Affiliation) -> String {
    let e = Escaped::new(affiliation);
    let mut item = ItemText::default();
    item.add(&e.organization, "", "");
    item.add(&e.role, " -- ", "");
    item.add(&e.dates, ", ", "");
    item.finish()
}

fn push_itemize(lines: &mut Vec<String>, heading: &str, items: impl IntoIterator<Item = String>) {
    lines.push(format!("\\subsection{{{}}}", heading));
    lines.push(r"\begin{itemize}".to_string());
    for item in items {
        lines.push(format!("  \\item {}", item));
    }
    lines.push(r"\end{itemize}".to_string());
    lines.push(String::new());
}

/// Render the non-publication section.
///
/// Subsections appear in a fixed order and only when non-empty. A record
/// with none of them still produces the section with a short note.
pub fn generate_data_latex(orcid_id: &str, data: &OrcidData) -> String {
    let mut lines: Vec<String> = Vec::new();
    push_section_header(&mut lines, Section::Data, orcid_id);

    if let Some(biography) = data.biography.as_deref().filter(|b| !b.is_empty()) {
        lines.push(r"\subsection{Biography}".to_string());
        lines.push(escape_latex_smart(biography));
        lines.push(String::new());
    }

    if !data.employments.is_empty() {
        push_itemize(&mut lines, "Employment", data.employments.iter().map(employment_item));
    }

    if !data.educations.is_empty() {
        push_itemize(&mut lines, "Education", data.educations.iter().map(education_item));
    }

    if !data.fundings.is_empty() {
        let items = data.fundings.iter().map(|funding| {
            let title = escape_latex_smart(&funding.title);
            let mut item = ItemText::default();
            if !title.is_empty() {
                item.add(&format!("``{}''", title), "", "");
            }
            item.add(&escape_latex(&funding.organization), ", ", "");
            item.add(&escape_latex(&funding.funding_type), " (", ")");
            item.add(&format_date_range(&funding.start_year, &funding.end_year), ", ", "");
            item.finish()
        });
        push_itemize(&mut lines, "Selected Projects", items);
    }

    if !data.external_identifiers.is_empty() {
        let items = data.external_identifiers.iter().map(|ext| {
            let id_type = escape_latex(&ext.id_type);
            let value = escape_latex(&ext.value);
            let url = sanitize_url_for_latex(&ext.url);
            if url.is_empty() {
                format!("{}: {}", id_type, value)
            } else {
                format!("{}: \\href{{{}}}{{{}}}", id_type, url, value)
            }
        });
        push_itemize(&mut lines, "External Identifiers", items);
    }

    if !data.distinctions.is_empty() {
        push_itemize(&mut lines, "Distinctions", data.distinctions.iter().map(role_at_org_item));
    }

    if !data.memberships.is_empty() {
        push_itemize(&mut lines, "Memberships", data.memberships.iter().map(membership_item));
    }

    if !data.services.is_empty() {
        push_itemize(&mut lines, "External Service", data.services.iter().map(role_at_org_item));
    }

    if !data.has_content() {
        lines.push(r"\textit{No additional data found in ORCID record.}".to_string());
    }

    lines.join("\n")
}
