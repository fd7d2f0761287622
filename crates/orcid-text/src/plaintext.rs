//! Plain-text output (JSON and other markup-free consumers)

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::scripts::{to_subscript, to_superscript};
use crate::tags::{collapse_whitespace, strip_tags};

lazy_static! {
    static ref SUB_TAG_RE: Regex = Regex::new(r"(?i)<(?:sub|inf)>(.*?)</(?:sub|inf)>").unwrap();
    static ref SUP_TAG_RE: Regex = Regex::new(r"(?i)<sup>(.*?)</sup>").unwrap();
}

/// Clean a free-text field for plain-text output.
///
/// - `<sub>`/`<inf>` and `<sup>` content becomes Unicode sub/superscripts where possible
/// - Remaining tags are stripped
/// - `$` math delimiters are dropped, their content (e.g. `\alpha`) is kept
/// - Whitespace is collapsed
pub fn clean_for_plaintext(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let result = SUB_TAG_RE.replace_all(text, |caps: &Captures| to_subscript(&caps[1]));
    let result = SUP_TAG_RE.replace_all(&result, |caps: &Captures| to_superscript(&caps[1]));

    let result = strip_tags(&result).replace('$', "");

    collapse_whitespace(&result)
}
