//! Publication year filtering

use std::fmt;
use tracing::warn;

use crate::model::Publication;

const MIN_YEAR: i32 = 1900;
const MAX_YEAR: i32 = 2100;

/// Inclusive year range
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn contains(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Parse a `--year` argument.
///
/// - `None` or `"all"`: no filter
/// - `"YYYY-YYYY"`: academic year range
/// - `"YYYY"`: a single calendar year
///
/// Anything else, years outside 1900..=2100, or a reversed range log a
/// warning and disable filtering.
pub fn parse_year_filter(arg: Option<&str>) -> Option<YearRange> {
    let arg = arg?.trim();
    if arg.eq_ignore_ascii_case("all") {
        return None;
    }

    if let Some((start, end)) = arg.split_once('-') {
        if !end.contains('-') {
            let (Ok(start), Ok(end)) = (start.parse::<i32>(), end.parse::<i32>()) else {
                warn!("Invalid year range '{}', ignoring filter", arg);
                return None;
            };
            if !in_bounds(start) {
                warn!("Start year {} out of range ({}-{}), ignoring filter", start, MIN_YEAR, MAX_YEAR);
                return None;
            }
            if !in_bounds(end) {
                warn!("End year {} out of range ({}-{}), ignoring filter", end, MIN_YEAR, MAX_YEAR);
                return None;
            }
            if start > end {
                warn!("Invalid year range '{}' (start > end), ignoring filter", arg);
                return None;
            }
            return Some(YearRange { start, end });
        }
    }

    match arg.parse::<i32>() {
        Ok(year) if in_bounds(year) => Some(YearRange { start: year, end: year }),
        Ok(year) => {
            warn!("Year {} out of range ({}-{}), ignoring filter", year, MIN_YEAR, MAX_YEAR);
            None
        }
        Err(_) => {
            warn!("Invalid year '{}', ignoring filter", arg);
            None
        }
    }
}

fn in_bounds(year: i32) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&year)
}

/// Keep publications whose year falls in `range`.
///
/// Entries with an empty or unparsable year cannot be placed and are kept.
pub fn filter_by_year(publications: Vec<Publication>, range: Option<YearRange>) -> Vec<Publication> {
    let Some(range) = range else {
        return publications;
    };

    publications
        .into_iter()
        .filter(|p| match p.year.trim().parse::<i32>() {
            Ok(year) => range.contains(year),
            Err(_) => true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn with_year(year: &str) -> Publication {
        Publication {
            year: year.to_string(),
            ..Default::default()
        }
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some("all"), None)]
    #[case(Some("ALL"), None)]
    #[case(Some("2024-2025"), Some(YearRange { start: 2024, end: 2025 }))]
    #[case(Some(" 2024 "), Some(YearRange { start: 2024, end: 2024 }))]
    #[case(Some("2025-2024"), None)]
    #[case(Some("1800-2024"), None)]
    #[case(Some("2024-2200"), None)]
    #[case(Some("1850"), None)]
    #[case(Some("abc"), None)]
    #[case(Some("2024-abc"), None)]
    #[case(Some("2020-2021-2022"), None)]
    fn test_parse_year_filter(#[case] input: Option<&str>, #[case] expected: Option<YearRange>) {
        assert_eq!(parse_year_filter(input), expected);
    }

    #[test]
    fn test_filter_inclusive_bounds() {
        let pubs = vec![with_year("2023"), with_year("2024"), with_year("2025"), with_year("2026")];
        let filtered = filter_by_year(pubs, Some(YearRange { start: 2024, end: 2025 }));
        let years: Vec<&str> = filtered.iter().map(|p| p.year.as_str()).collect();
        assert_eq!(years, vec!["2024", "2025"]);
    }

    #[test]
    fn test_filter_keeps_unknown_years() {
        let pubs = vec![with_year(""), with_year("n.d."), with_year("1999")];
        let filtered = filter_by_year(pubs, Some(YearRange { start: 2024, end: 2024 }));
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_filter_none_is_noop() {
        let pubs = vec![with_year("1999")];
        assert_eq!(filter_by_year(pubs.clone(), None), pubs);
    }

    #[test]
    fn test_display() {
        assert_eq!(YearRange { start: 2024, end: 2025 }.to_string(), "2024-2025");
    }
}
