//! Identifier validation
//!
//! ORCID iDs and department codes end up in cache paths and API URLs, so both
//! are checked against strict patterns before use.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ORCID_ID_RE: Regex = Regex::new(r"^[0-9]{4}-[0-9]{4}-[0-9]{4}-[0-9]{3}[0-9X]$").unwrap();
    static ref UIN_RE: Regex = Regex::new(r"^[0-9]{9}$").unwrap();
    static ref DEPT_RE: Regex = Regex::new(r"^[A-Za-z0-9_-]+$").unwrap();
}

/// Check the `XXXX-XXXX-XXXX-XXXX` ORCID iD shape (last character may be `X`)
pub fn validate_orcid_id(orcid_id: &str) -> bool {
    ORCID_ID_RE.is_match(orcid_id)
}

/// Check that a university identification number is exactly nine digits
pub fn validate_uin(uin: &str) -> bool {
    UIN_RE.is_match(uin)
}

/// Accept a department code made of letters, digits, `_` and `-` only
pub fn sanitize_dept(dept: Option<&str>) -> Option<String> {
    dept.filter(|d| DEPT_RE.is_match(d)).map(str::to_string)
}
