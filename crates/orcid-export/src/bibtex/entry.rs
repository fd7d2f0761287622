//! BibTeX entry data structures

/// BibTeX entry types produced from ORCID work types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BibTeXEntryType {
    Article,
    Book,
    InCollection,
    InProceedings,
    Manual,
    Misc,
    PhdThesis,
    TechReport,
    Unpublished,
}

impl BibTeXEntryType {
    /// Map an ORCID work type (case-insensitive); unknown types become `misc`
    pub fn from_orcid_type(pub_type: &str) -> Self {
        match pub_type.to_lowercase().as_str() {
            "journal-article" | "journal-issue" | "article-journal" | "book-review" => Self::Article,
            "conference-paper" | "conference-abstract" | "conference-poster" | "paper-conference" => {
                Self::InProceedings
            }
            "book" | "edited-book" => Self::Book,
            "book-chapter" => Self::InCollection,
            "dissertation" | "dissertation-thesis" => Self::PhdThesis,
            "report" => Self::TechReport,
            "working-paper" | "preprint" => Self::Unpublished,
            "manual" => Self::Manual,
            _ => Self::Misc,
        }
    }

    /// Convert entry type to canonical string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Book => "book",
            Self::InCollection => "incollection",
            Self::InProceedings => "inproceedings",
            Self::Manual => "manual",
            Self::Misc => "misc",
            Self::PhdThesis => "phdthesis",
            Self::TechReport => "techreport",
            Self::Unpublished => "unpublished",
        }
    }

    /// Field that holds the venue name for this type
    pub fn venue_field(&self) -> &'static str {
        match self {
            Self::InProceedings | Self::InCollection => "booktitle",
            Self::Article => "journal",
            _ => "publisher",
        }
    }
}

/// A single BibTeX field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibTeXField {
    pub key: String,
    pub value: String,
    /// Emit the value without braces (month macros such as `jan`)
    pub raw: bool,
}

/// A BibTeX entry built from publication metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibTeXEntry {
    pub cite_key: String,
    pub entry_type: BibTeXEntryType,
    pub fields: Vec<BibTeXField>,
}

impl BibTeXEntry {
    pub fn new(cite_key: String, entry_type: BibTeXEntryType) -> Self {
        Self {
            cite_key,
            entry_type,
            fields: Vec::new(),
        }
    }

    /// Add a braced field
    pub fn add_field(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.push(BibTeXField {
            key: key.into(),
            value: value.into(),
            raw: false,
        });
    }

    /// Add a field emitted verbatim
    pub fn add_raw_field(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.push(BibTeXField {
            key: key.into(),
            value: value.into(),
            raw: true,
        });
    }

    /// Get a field value by key (case-insensitive)
    pub fn get_field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.key.eq_ignore_ascii_case(key))
            .map(|f| f.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("journal-article", BibTeXEntryType::Article)]
    #[case("JOURNAL-ISSUE", BibTeXEntryType::Article)]
    #[case("book-review", BibTeXEntryType::Article)]
    #[case("conference-poster", BibTeXEntryType::InProceedings)]
    #[case("paper-conference", BibTeXEntryType::InProceedings)]
    #[case("edited-book", BibTeXEntryType::Book)]
    #[case("book-chapter", BibTeXEntryType::InCollection)]
    #[case("dissertation-thesis", BibTeXEntryType::PhdThesis)]
    #[case("report", BibTeXEntryType::TechReport)]
    #[case("preprint", BibTeXEntryType::Unpublished)]
    #[case("manual", BibTeXEntryType::Manual)]
    #[case("website", BibTeXEntryType::Misc)]
    #[case("data-set", BibTeXEntryType::Misc)]
    #[case("", BibTeXEntryType::Misc)]
    fn test_from_orcid_type(#[case] input: &str, #[case] expected: BibTeXEntryType) {
        assert_eq!(BibTeXEntryType::from_orcid_type(input), expected);
    }

    #[test]
    fn test_venue_field() {
        assert_eq!(BibTeXEntryType::Article.venue_field(), "journal");
        assert_eq!(BibTeXEntryType::InProceedings.venue_field(), "booktitle");
        assert_eq!(BibTeXEntryType::InCollection.venue_field(), "booktitle");
        assert_eq!(BibTeXEntryType::Book.venue_field(), "publisher");
    }

    #[test]
    fn test_entry_field_access() {
        let mut entry = BibTeXEntry::new("Smith2024".to_string(), BibTeXEntryType::Article);
        entry.add_field("title", "A Great Paper");
        entry.add_raw_field("Month", "mar");

        assert_eq!(entry.get_field("TITLE"), Some("A Great Paper"));
        assert_eq!(entry.get_field("month"), Some("mar"));
        assert_eq!(entry.get_field("doi"), None);
        assert!(entry.fields[1].raw);
    }
}
