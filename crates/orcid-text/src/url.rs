//! URL sanitization for LaTeX hyperlinks

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref HTTP_SCHEME_RE: Regex = Regex::new(r"(?i)^https?://").unwrap();
}

/// Sanitize a URL for use as the target of `\href{...}{...}`.
///
/// Returns an empty string for anything that is not `http://` or `https://`
/// (`javascript:`, `file:`, `ftp:`, scheme-less, ...), meaning the link should
/// be omitted. Otherwise backslashes and braces are removed so the value
/// cannot close the command argument or start a new command.
pub fn sanitize_url_for_latex(url: &str) -> String {
    let url = url.trim();
    if !HTTP_SCHEME_RE.is_match(url) {
        return String::new();
    }

    url.chars()
        .filter(|c| !matches!(c, '\\' | '{' | '}'))
        .collect()
}
