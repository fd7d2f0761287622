//! HTML/XML tag removal

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Any opening or closing tag, with an optional one-level namespace prefix (`mml:`)
    static ref HTML_TAG_RE: Regex = Regex::new(r"(?i)</?(?:[a-z][a-z0-9]*:)?[a-z][^>]*>").unwrap();

    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
}

/// Remove all HTML/XML tags, keeping their inner text.
///
/// Whitespace runs are collapsed to a single space and the result is trimmed.
/// Text without a `<` is returned untouched.
pub fn strip_tags(text: &str) -> String {
    if !text.contains('<') {
        return text.to_string();
    }

    // Removing one tag can splice two fragments into a new one ("<<i>b>"),
    // so repeat until nothing matches.
    let mut result = text.to_string();
    while HTML_TAG_RE.is_match(&result) {
        result = HTML_TAG_RE.replace_all(&result, "").into_owned();
    }

    collapse_whitespace(&result)
}

/// Collapse every whitespace run to one space and trim both ends
pub(crate) fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_no_tags() {
        assert_eq!(strip_tags("plain text"), "plain text");
    }

    #[test]
    fn test_strip_empty() {
        assert_eq!(strip_tags(""), "");
    }

    #[test]
    fn test_strip_formatting_tags() {
        assert_eq!(strip_tags("<i>in vitro</i>"), "in vitro");
        assert_eq!(strip_tags("CO<sub>2</sub>"), "CO2");
        assert_eq!(strip_tags("CO<inf>2</inf>"), "CO2");
        assert_eq!(strip_tags("Ni<sup>2+</sup>"), "Ni2+");
        assert_eq!(strip_tags("<scp>Computer-aided</scp>"), "Computer-aided");
        assert_eq!(strip_tags("<title>Effect of X on Y</title>"), "Effect of X on Y");
    }

    #[test]
    fn test_strip_mathml_namespace() {
        let text = r#"<mml:math xmlns:mml="http://www.w3.org/1998/Math/MathML"><mml:msub><mml:mn>3</mml:mn></mml:msub></mml:math>"#;
        let result = strip_tags(text);
        assert!(!result.contains('<'));
        assert_eq!(result, "3");
    }

    #[test]
    fn test_strip_collapses_whitespace() {
        let text = "<i>Escherichia coli</i>\n                    biofilms";
        assert_eq!(strip_tags(text), "Escherichia coli biofilms");
    }

    #[test]
    fn test_strip_keeps_bare_angle_brackets() {
        assert_eq!(strip_tags("a < b and c > d"), "a < b and c > d");
        assert_eq!(strip_tags("p <0.05 <i>n</i>"), "p <0.05 n");
    }

    #[test]
    fn test_strip_spliced_tag_is_removed() {
        assert_eq!(strip_tags("x<<i>b>y"), "xy");
    }
}
