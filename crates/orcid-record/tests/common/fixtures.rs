//! Test fixture loading utilities

use serde_json::Value;
use std::path::PathBuf;

/// Get the path to a fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_fixtures")
        .join(name)
}

/// Load an ORCID record fixture as JSON
pub fn load_record_fixture(name: &str) -> Value {
    let text = std::fs::read_to_string(fixture_path(&format!("records/{}", name)))
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", name));
    serde_json::from_str(&text).unwrap_or_else(|e| panic!("Invalid fixture {}: {}", name, e))
}
