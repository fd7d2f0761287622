//! Shared helpers for orcid-fetch integration tests

#![allow(dead_code)]

use serde_json::{json, Value};

use orcid_fetch::{ApiConfig, CacheConfig};

pub const ORCID_ID: &str = "0000-0002-1825-0097";

/// API settings pointing at a mock server, with no waiting between requests
pub fn api_config(base_url: &str) -> ApiConfig {
    ApiConfig {
        base_url: base_url.to_string(),
        doi_base_url: base_url.to_string(),
        rate_limit_delay_secs: 0.0,
        rate_limit_backoff_secs: 0.0,
        max_retries: 3,
        ..ApiConfig::default()
    }
}

pub fn cache_config() -> CacheConfig {
    CacheConfig::default()
}

/// Minimal record with two work groups (put-codes 101 and 202)
pub fn summary_record() -> Value {
    json!({
        "orcid-identifier": {"path": ORCID_ID},
        "activities-summary": {
            "works": {
                "group": [
                    {"work-summary": [{
                        "put-code": 101,
                        "type": "journal-article",
                        "title": {"title": {"value": "Summary One"}}
                    }]},
                    {"work-summary": [{
                        "put-code": 202,
                        "type": "conference-paper",
                        "title": {"title": {"value": "Summary Two"}}
                    }]}
                ]
            }
        }
    })
}

/// Full work detail as returned by `/{orcid}/work/{put-code}`
pub fn work_detail(put_code: u64, title: &str) -> Value {
    json!({
        "put-code": put_code,
        "type": "journal-article",
        "title": {"title": {"value": title}},
        "publication-date": {"year": {"value": "2023"}},
        "contributors": {"contributor": [
            {"credit-name": {"value": "Josiah Carberry"}}
        ]}
    })
}
