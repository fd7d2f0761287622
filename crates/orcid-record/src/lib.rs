//! ORCID record model and extraction
//!
//! The ORCID public API returns a deeply nested JSON document whose shape is a
//! documented convention rather than a contract. This crate reads it through
//! small safe-navigation helpers ([`value`]) and produces typed values:
//! - [`Publications`] grouped by category (journal, conference, other)
//! - [`OrcidData`] with biography, affiliations, fundings and external identifiers
//!
//! Extraction never fails. Missing or oddly shaped fields fall back to empty
//! values and malformed entries are skipped with a warning.

pub mod extract;
pub mod filter;
pub mod identifiers;
pub mod model;
pub mod value;

pub use extract::{
    extract_affiliations, extract_biography, extract_data, extract_external_identifiers,
    extract_fundings, extract_publications, format_display_authors,
};
pub use filter::{filter_by_year, parse_year_filter, YearRange};
pub use identifiers::{sanitize_dept, validate_orcid_id, validate_uin};
pub use model::{
    Affiliation, AffiliationKind, Citation, ExternalIdentifier, Funding, OrcidData, Publication,
    PublicationCategory, Publications,
};

/// Default number of authors shown before "et al."
pub const DEFAULT_AUTHOR_LIMIT: usize = 5;
