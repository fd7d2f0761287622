//! Typed values extracted from an ORCID record
//!
//! Field names double as the JSON export's keys.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::filter::{filter_by_year, YearRange};

/// Citation attached to a work by its owner (often a BibTeX string)
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Citation {
    pub citation_type: String,
    pub citation_value: String,
}

/// One work from the record's works section
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Publication {
    /// Display form: "Last, I.I." for the first few authors, then "et al."
    pub authors: String,
    /// Full credit names as written in the record
    pub raw_authors: Vec<String>,
    pub title: String,
    pub venue: String,
    pub year: String,
    pub month: String,
    pub doi: String,
    pub url: String,
    pub pub_type: String,
    pub external_ids: BTreeMap<String, String>,
    pub citation: Option<Citation>,

    // Filled by DOI enrichment
    #[serde(skip_serializing_if = "String::is_empty")]
    pub volume: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub pages: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub number: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub publisher: String,
    #[serde(rename = "abstract", skip_serializing_if = "String::is_empty")]
    pub abstract_text: String,
}

impl Publication {
    pub fn category(&self) -> PublicationCategory {
        PublicationCategory::from_pub_type(&self.pub_type)
    }
}

/// Grouping used by every renderer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PublicationCategory {
    JournalArticle,
    ConferencePaper,
    Other,
}

impl PublicationCategory {
    /// Map an ORCID (or CSL) work type to its category
    pub fn from_pub_type(pub_type: &str) -> Self {
        match pub_type.to_lowercase().as_str() {
            "journal-article" | "journal-issue" | "article-journal" => Self::JournalArticle,
            "conference-paper" | "conference-abstract" | "conference-poster" | "paper-conference" => {
                Self::ConferencePaper
            }
            _ => Self::Other,
        }
    }

    /// Human-readable heading
    pub fn heading(&self) -> &'static str {
        match self {
            Self::JournalArticle => "Journal Articles",
            Self::ConferencePaper => "Conference Papers",
            Self::Other => "Other Publications",
        }
    }
}

/// Publications grouped by category, each group sorted by year descending
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Publications {
    pub journal_articles: Vec<Publication>,
    pub conference_papers: Vec<Publication>,
    pub other: Vec<Publication>,
}

impl Publications {
    pub fn total(&self) -> usize {
        self.journal_articles.len() + self.conference_papers.len() + self.other.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Iterate journal articles, then conference papers, then everything else
    pub fn iter(&self) -> impl Iterator<Item = &Publication> {
        self.journal_articles
            .iter()
            .chain(self.conference_papers.iter())
            .chain(self.other.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Publication> {
        self.journal_articles
            .iter_mut()
            .chain(self.conference_papers.iter_mut())
            .chain(self.other.iter_mut())
    }

    /// Non-empty groups with their category, in display order
    pub fn groups(&self) -> Vec<(PublicationCategory, &[Publication])> {
        [
            (PublicationCategory::JournalArticle, self.journal_articles.as_slice()),
            (PublicationCategory::ConferencePaper, self.conference_papers.as_slice()),
            (PublicationCategory::Other, self.other.as_slice()),
        ]
        .into_iter()
        .filter(|(_, pubs)| !pubs.is_empty())
        .collect()
    }

    /// Keep only publications inside `range` (no-op when `None`)
    pub fn filter_by_year(self, range: Option<YearRange>) -> Self {
        Self {
            journal_articles: filter_by_year(self.journal_articles, range),
            conference_papers: filter_by_year(self.conference_papers, range),
            other: filter_by_year(self.other, range),
        }
    }

    pub(crate) fn push(&mut self, publication: Publication) {
        match publication.category() {
            PublicationCategory::JournalArticle => self.journal_articles.push(publication),
            PublicationCategory::ConferencePaper => self.conference_papers.push(publication),
            PublicationCategory::Other => self.other.push(publication),
        }
    }
}

/// Affiliation-style record sections
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AffiliationKind {
    Employment,
    Education,
    Distinction,
    Membership,
    Service,
}

impl AffiliationKind {
    pub const ALL: [AffiliationKind; 5] = [
        Self::Employment,
        Self::Education,
        Self::Distinction,
        Self::Membership,
        Self::Service,
    ];

    /// Key under `activities-summary`
    pub fn section(&self) -> &'static str {
        match self {
            Self::Employment => "employments",
            Self::Education => "educations",
            Self::Distinction => "distinctions",
            Self::Membership => "memberships",
            Self::Service => "services",
        }
    }

    /// Key of each summary inside an affiliation group
    pub fn summary_key(&self) -> &'static str {
        match self {
            Self::Employment => "employment-summary",
            Self::Education => "education-summary",
            Self::Distinction => "distinction-summary",
            Self::Membership => "membership-summary",
            Self::Service => "service-summary",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Affiliation {
    pub organization: String,
    /// Non-empty parts of city, region, country joined by ", "
    pub location: String,
    pub role: String,
    pub department: String,
    pub start_year: String,
    pub end_year: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Funding {
    pub title: String,
    pub organization: String,
    #[serde(rename = "type")]
    pub funding_type: String,
    pub start_year: String,
    pub end_year: String,
}

/// Person-level identifier such as a Scopus Author ID or ResearcherID
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ExternalIdentifier {
    #[serde(rename = "type")]
    pub id_type: String,
    pub value: String,
    pub url: String,
}

/// Everything except publications
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OrcidData {
    pub biography: Option<String>,
    pub external_identifiers: Vec<ExternalIdentifier>,
    pub fundings: Vec<Funding>,
    pub employments: Vec<Affiliation>,
    pub educations: Vec<Affiliation>,
    pub distinctions: Vec<Affiliation>,
    pub memberships: Vec<Affiliation>,
    pub services: Vec<Affiliation>,
}

impl OrcidData {
    pub fn has_content(&self) -> bool {
        self.biography.as_deref().is_some_and(|b| !b.is_empty())
            || !self.external_identifiers.is_empty()
            || !self.fundings.is_empty()
            || !self.employments.is_empty()
            || !self.educations.is_empty()
            || !self.distinctions.is_empty()
            || !self.memberships.is_empty()
            || !self.services.is_empty()
    }

    pub fn affiliations(&self, kind: AffiliationKind) -> &[Affiliation] {
        match kind {
            AffiliationKind::Employment => &self.employments,
            AffiliationKind::Education => &self.educations,
            AffiliationKind::Distinction => &self.distinctions,
            AffiliationKind::Membership => &self.memberships,
            AffiliationKind::Service => &self.services,
        }
    }
}
