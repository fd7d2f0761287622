//! BibTeX field values and HTML entity decoding

use crate::tags::strip_tags;

/// Decode HTML character references (`&amp;`, `&lt;`, `&#233;`, ...) to characters
pub fn unescape_html(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

/// Clean text for a BibTeX field value.
///
/// Entities are decoded and HTML tags stripped. LaTeX special characters are
/// left alone: BibTeX consumers render `$...$` math and `\commands` natively.
pub fn escape_for_bibtex(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    strip_tags(&unescape_html(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape_entities() {
        assert_eq!(unescape_html("a &lt; b &amp; c &gt; d"), "a < b & c > d");
        assert_eq!(unescape_html("&quot;hello&quot;"), "\"hello\"");
        assert_eq!(unescape_html("Caf&#233; &#x2013; Bar"), "Café – Bar");
        assert_eq!(unescape_html("no entities"), "no entities");
    }

    #[test]
    fn test_bibtex_strips_html() {
        assert_eq!(escape_for_bibtex("<i>in vitro</i> study"), "in vitro study");
        assert_eq!(escape_for_bibtex("CO<sub>2</sub>"), "CO2");
    }

    #[test]
    fn test_bibtex_preserves_latex() {
        assert_eq!(escape_for_bibtex("$\\alpha$-decay of Ni$_{3}$"), "$\\alpha$-decay of Ni$_{3}$");
        assert_eq!(escape_for_bibtex("A & B 10%"), "A & B 10%");
    }

    #[test]
    fn test_bibtex_encoded_tags_removed() {
        assert_eq!(escape_for_bibtex("&lt;i&gt;Title&lt;/i&gt; &amp; more"), "Title & more");
    }

    #[test]
    fn test_bibtex_empty() {
        assert_eq!(escape_for_bibtex(""), "");
    }
}
