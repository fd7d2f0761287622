//! Inline math segmentation
//!
//! Splits text into alternating math / non-math spans using single-dollar
//! delimiters. The segmentation is lossless: concatenating the spans gives
//! back the input.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// `$`, one or more non-`$` characters, `$`
    static ref INLINE_MATH_RE: Regex = Regex::new(r"\$[^$]+\$").unwrap();
}

/// A contiguous slice of the input, either math (delimiters included) or text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span<'a> {
    pub is_math: bool,
    pub content: &'a str,
}

impl<'a> Span<'a> {
    pub fn math(content: &'a str) -> Self {
        Self {
            is_math: true,
            content,
        }
    }

    pub fn text(content: &'a str) -> Self {
        Self {
            is_math: false,
            content,
        }
    }
}

/// Split `text` into math and non-math spans.
///
/// Matches are leftmost and non-overlapping. A `$` without a closing partner
/// stays inside the surrounding text span. Input with no math yields exactly
/// one text span holding the whole string (even when it is empty).
pub fn split_math_regions(text: &str) -> Vec<Span<'_>> {
    let mut spans = Vec::new();
    let mut last_end = 0;

    for m in INLINE_MATH_RE.find_iter(text) {
        if m.start() > last_end {
            spans.push(Span::text(&text[last_end..m.start()]));
        }
        spans.push(Span::math(m.as_str()));
        last_end = m.end();
    }

    if last_end < text.len() {
        spans.push(Span::text(&text[last_end..]));
    }

    if spans.is_empty() {
        spans.push(Span::text(text));
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejoin(spans: &[Span<'_>]) -> String {
        spans.iter().map(|s| s.content).collect()
    }

    #[test]
    fn test_split_no_math() {
        assert_eq!(split_math_regions("plain text"), vec![Span::text("plain text")]);
    }

    #[test]
    fn test_split_empty() {
        assert_eq!(split_math_regions(""), vec![Span::text("")]);
    }

    #[test]
    fn test_split_inline_math() {
        let spans = split_math_regions("text $x^2$ more");
        assert_eq!(
            spans,
            vec![Span::text("text "), Span::math("$x^2$"), Span::text(" more")]
        );
    }

    #[test]
    fn test_split_adjacent_chemistry() {
        let spans = split_math_regions("Ni$_{3}$Sn$_{4}$");
        let math: Vec<&str> = spans.iter().filter(|s| s.is_math).map(|s| s.content).collect();
        assert_eq!(math, vec!["$_{3}$", "$_{4}$"]);
        assert_eq!(rejoin(&spans), "Ni$_{3}$Sn$_{4}$");
    }

    #[test]
    fn test_split_math_at_edges() {
        let spans = split_math_regions("$\\alpha$ decay");
        assert_eq!(spans[0], Span::math("$\\alpha$"));
        assert_eq!(spans[1], Span::text(" decay"));

        let spans = split_math_regions("value of $k$");
        assert_eq!(spans.last(), Some(&Span::math("$k$")));
    }

    #[test]
    fn test_split_only_math() {
        assert_eq!(split_math_regions("$x$"), vec![Span::math("$x$")]);
    }

    #[test]
    fn test_split_unmatched_dollar() {
        let spans = split_math_regions("price is $50");
        assert!(spans.iter().all(|s| !s.is_math));
        assert_eq!(rejoin(&spans), "price is $50");
    }

    #[test]
    fn test_split_price_range_is_taken_as_math() {
        // Two literal dollar signs are indistinguishable from a math span
        let spans = split_math_regions("$5 to $10");
        assert_eq!(spans, vec![Span::math("$5 to $"), Span::text("10")]);
    }

    #[test]
    fn test_split_empty_dollars_are_text() {
        let spans = split_math_regions("$$");
        assert_eq!(spans, vec![Span::text("$$")]);
    }
}
