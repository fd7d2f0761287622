//! LaTeX output
//!
//! Provides:
//! - Plain escaping of LaTeX special characters
//! - HTML tag to LaTeX command conversion
//! - Math-aware escaping for free-text fields (titles, biographies)

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::math::split_math_regions;
use crate::tags::{collapse_whitespace, strip_tags};

/// Placeholder for `\ ` while the surrounding text is escaped.
/// Input NULs are dropped first, so user text cannot spell it.
const SENTINEL: &str = "\u{0}BSSP\u{0}";
const BACKSLASH_SPACE: &str = "\\ ";

lazy_static! {
    /// Known HTML tags and their LaTeX replacements, applied in order (inner tags first)
    static ref HTML_TO_LATEX_RULES: Vec<(Regex, &'static str)> = vec![
        // Subscript: <sub> and Elsevier's non-standard <inf>
        (Regex::new(r"(?is)<(?:sub|inf)>(.*?)</(?:sub|inf)>").unwrap(), r"\textsubscript{${1}}"),
        (Regex::new(r"(?is)<sup>(.*?)</sup>").unwrap(), r"\textsuperscript{${1}}"),
        (Regex::new(r"(?is)<(?:i|em)>(.*?)</(?:i|em)>").unwrap(), r"\textit{${1}}"),
        (Regex::new(r"(?is)<(?:b|strong)>(.*?)</(?:b|strong)>").unwrap(), r"\textbf{${1}}"),
        // Small caps (Wiley)
        (Regex::new(r"(?is)<scp>(.*?)</scp>").unwrap(), r"\textsc{${1}}"),
    ];

    static ref DISPLAY_MATH_RE: Regex = Regex::new(r"\$\$([^$]+)\$\$").unwrap();

    /// Opening half of a command produced by `html_to_latex`
    static ref GENERATED_COMMAND_RE: Regex =
        Regex::new(r"^\\(?:textit|textbf|textsubscript|textsuperscript|textsc)\{").unwrap();
}

/// Escape LaTeX special characters.
///
/// `\ & % $ # _ { } ~ ^` are replaced by their escaped forms in a single pass,
/// so the braces of `\textbackslash{}` are never re-escaped. Code points above
/// U+00FF are dropped since pdflatex cannot typeset them without extra packages.
pub fn escape_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 4);
    for c in text.chars() {
        push_escaped(c, &mut out);
    }
    out
}

fn push_escaped(c: char, out: &mut String) {
    match c {
        '\\' => out.push_str(r"\textbackslash{}"),
        '&' => out.push_str(r"\&"),
        '%' => out.push_str(r"\%"),
        '$' => out.push_str(r"\$"),
        '#' => out.push_str(r"\#"),
        '_' => out.push_str(r"\_"),
        '{' => out.push_str(r"\{"),
        '}' => out.push_str(r"\}"),
        '~' => out.push_str(r"\textasciitilde{}"),
        '^' => out.push_str(r"\textasciicircum{}"),
        c if !is_latin1(c) => {}
        c => out.push(c),
    }
}

fn is_latin1(c: char) -> bool {
    (c as u32) <= 0xFF
}

/// Drop every code point above U+00FF
pub fn strip_non_latin1(text: &str) -> String {
    text.chars().filter(|&c| is_latin1(c)).collect()
}

/// Convert known HTML tags to LaTeX commands.
///
/// Handles `<i>`, `<em>`, `<b>`, `<strong>`, `<sub>`, `<inf>`, `<sup>` and
/// `<scp>`. Any other tag (MathML, `<title>`, `<p>`, ...) is stripped and
/// whitespace is collapsed. Text without a `<` passes through untouched.
pub fn html_to_latex(text: &str) -> String {
    if !text.contains('<') {
        return text.to_string();
    }

    let mut result = text.to_string();
    for (pattern, replacement) in HTML_TO_LATEX_RULES.iter() {
        result = pattern.replace_all(&result, *replacement).into_owned();
    }

    collapse_whitespace(&strip_tags(&result))
}

/// Escape a free-text field for LaTeX, preserving inline math and HTML formatting.
///
/// Pipeline:
/// 1. Drop NUL characters and convert HTML tags to LaTeX commands
/// 2. Normalize `$$...$$` to `$...$`
/// 3. Protect `\ ` (inter-word space)
/// 4. Split into math and non-math spans
/// 5. Escape non-math spans, keeping the commands from step 1 intact
/// 6. Rejoin, restore `\ ` and drop non-Latin-1 characters
///
/// Math spans are emitted verbatim.
pub fn escape_latex_smart(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let converted = html_to_latex(&text.replace('\0', ""));
    let inline = DISPLAY_MATH_RE.replace_all(&converted, |caps: &Captures| format!("${}$", &caps[1]));
    let protected = inline.replace(BACKSLASH_SPACE, SENTINEL);

    let mut out = String::with_capacity(protected.len() + protected.len() / 4);
    // Generated commands may enclose a math span, so the count of open
    // commands carries over from one text span to the next.
    let mut open_commands = 0usize;
    for span in split_math_regions(&protected) {
        if span.is_math {
            out.push_str(span.content);
        } else {
            escape_preserving_commands(span.content, &mut open_commands, &mut out);
        }
    }
    for _ in 0..open_commands {
        out.push('}');
    }

    strip_non_latin1(&out.replace(SENTINEL, BACKSLASH_SPACE))
}

/// Escape `text`, passing generated command openers and their closing braces through
fn escape_preserving_commands(text: &str, open_commands: &mut usize, out: &mut String) {
    let mut rest = text;
    while let Some(c) = rest.chars().next() {
        if c == '\\' {
            if let Some(m) = GENERATED_COMMAND_RE.find(rest) {
                out.push_str(m.as_str());
                *open_commands += 1;
                rest = &rest[m.end()..];
                continue;
            }
        } else if c == '}' && *open_commands > 0 {
            out.push('}');
            *open_commands -= 1;
            rest = &rest[1..];
            continue;
        }

        push_escaped(c, out);
        rest = &rest[c.len_utf8()..];
    }
}
