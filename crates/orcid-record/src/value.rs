//! Safe navigation over untyped JSON
//!
//! Every helper treats a missing key, a JSON `null` and a value of the wrong
//! kind the same way: as absent.

use serde_json::Value;

/// Follow `path` through nested objects
pub fn get_path<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(value, |current, key| current.get(*key))
        .filter(|v| !v.is_null())
}

/// String leaf at `path`
pub fn str_at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    get_path(value, path).and_then(Value::as_str)
}

/// Array at `path`, or an empty slice
pub fn array_at<'a>(value: &'a Value, path: &[&str]) -> &'a [Value] {
    get_path(value, path)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// String inside the `{ "value": "..." }` wrapper ORCID uses for most scalars
pub fn value_str<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    get_path(value, path).and_then(|wrapper| str_at(wrapper, &["value"]))
}

/// Like [`str_at`], with empty strings treated as absent
pub(crate) fn non_empty<'a>(value: Option<&'a str>) -> Option<&'a str> {
    value.filter(|s| !s.is_empty())
}
