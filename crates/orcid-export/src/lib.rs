//! Output renderers for ORCID data
//!
//! - [`latex`]: `\section` files for inclusion in a LaTeX report
//! - [`bibtex`]: `.bib` content, preferring citations embedded in the record
//! - [`json`]: format-agnostic JSON envelopes with a `_meta` block
//!
//! Renderers are total. An empty string (or `None` for JSON) means there is
//! nothing to write, and callers skip creating the file.

pub mod bibtex;
pub mod json;
pub mod latex;

pub use bibtex::export_bibtex;
pub use json::{export_data, export_publications, to_json_string};
pub use latex::{generate_data_latex, generate_publications_latex, generate_unavailable_latex};

use std::fmt;

/// Which part of the record a file covers
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Section {
    #[default]
    Publications,
    Data,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Publications => "publications",
            Self::Data => "data",
        }
    }

    /// `\section` title used in LaTeX output
    pub fn heading(&self) -> &'static str {
        match self {
            Self::Publications => "ORCID Publications",
            Self::Data => "ORCID Data",
        }
    }

    /// File stem shared by every output format (`orcid-publications.tex`, ...)
    pub fn file_stem(&self) -> &'static str {
        match self {
            Self::Publications => "orcid-publications",
            Self::Data => "orcid-data",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
