//! Text normalization for ORCID record fields
//!
//! ORCID titles and biographies arrive with two kinds of embedded markup:
//! - HTML tags (`<i>`, `<sub>`, `<sup>`, `<inf>`, `<scp>`, `<mml:*>`, ...)
//! - Inline LaTeX math (`$...$`, occasionally `$$...$$`)
//!
//! Every function here is a pure string transform. Pick the entry point by
//! output format:
//! - [`escape_latex_smart`] for LaTeX documents
//! - [`clean_for_plaintext`] for JSON and other plain-text consumers
//! - [`escape_for_bibtex`] for BibTeX field values
//! - [`sanitize_url_for_latex`] for any hyperlink target
//!
//! Structured fields that never carry markup (names, organizations, venues)
//! go through the plain [`escape_latex`].

mod bibtex;
mod latex;
mod math;
mod plaintext;
mod scripts;
mod tags;
mod url;

pub use bibtex::{escape_for_bibtex, unescape_html};
pub use latex::{escape_latex, escape_latex_smart, html_to_latex, strip_non_latin1};
pub use math::{split_math_regions, Span};
pub use plaintext::clean_for_plaintext;
pub use scripts::{to_subscript, to_superscript};
pub use tags::strip_tags;
pub use url::sanitize_url_for_latex;
