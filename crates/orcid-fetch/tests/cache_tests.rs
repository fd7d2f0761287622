//! Record cache and cache-first retrieval tests

mod common;

use chrono::{Duration, Utc};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

use common::{api_config, cache_config, summary_record, ORCID_ID};
use orcid_fetch::{FetchError, FetchPolicy, OrcidClient, RecordCache, RecordSource};

fn write_record(dir: &std::path::Path, value: &serde_json::Value) {
    fs::create_dir_all(dir).unwrap();
    fs::write(
        dir.join(format!("{}.json", ORCID_ID)),
        serde_json::to_string(value).unwrap(),
    )
    .unwrap();
}

fn cache_in(data_dir: &TempDir) -> RecordCache {
    RecordCache::new(data_dir.path(), &cache_config())
}

// === RecordCache ===

#[test]
fn test_load_prefers_department_directory() {
    let data_dir = TempDir::new().unwrap();
    let cache = cache_in(&data_dir);
    write_record(&cache.root().join("ECEN"), &json!({"source": "dept"}));
    write_record(cache.root(), &json!({"source": "flat"}));

    let record = cache.load(ORCID_ID, Some("ECEN")).unwrap();
    assert_eq!(record["source"], "dept");

    let record = cache.load(ORCID_ID, None).unwrap();
    assert_eq!(record["source"], "flat");
}

#[test]
fn test_load_searches_other_departments() {
    let data_dir = TempDir::new().unwrap();
    let cache = cache_in(&data_dir);
    write_record(&cache.root().join("PHYS"), &json!({"source": "phys"}));

    let record = cache.load(ORCID_ID, Some("ECEN")).unwrap();
    assert_eq!(record["source"], "phys");
}

#[test]
fn test_load_miss() {
    let data_dir = TempDir::new().unwrap();
    let cache = cache_in(&data_dir);
    assert!(cache.load(ORCID_ID, None).is_none());

    fs::create_dir_all(cache.root()).unwrap();
    assert!(cache.load(ORCID_ID, Some("ECEN")).is_none());
}

#[test]
fn test_load_corrupt_json_is_none() {
    let data_dir = TempDir::new().unwrap();
    let cache = cache_in(&data_dir);
    fs::create_dir_all(cache.root()).unwrap();
    fs::write(cache.root().join(format!("{}.json", ORCID_ID)), "{ not json").unwrap();

    assert!(cache.load(ORCID_ID, None).is_none());
}

#[test]
fn test_load_rejects_traversal() {
    let data_dir = TempDir::new().unwrap();
    let cache = cache_in(&data_dir);
    assert!(cache.load("../../etc/passwd", None).is_none());
}

#[test]
fn test_store_then_load() {
    let data_dir = TempDir::new().unwrap();
    let cache = cache_in(&data_dir);
    let mut record = summary_record();

    let path = cache.store(ORCID_ID, Some("ECEN"), &mut record, Utc::now()).unwrap();

    assert!(path.ends_with(format!("ORCID_JSON/ECEN/{}.json", ORCID_ID)));
    let loaded = cache.load(ORCID_ID, Some("ECEN")).unwrap();
    assert_eq!(loaded, record);
    assert!(cache.is_fresh(&loaded, Utc::now()));

    // Pretty-printed with two-space indentation
    let text = fs::read_to_string(path).unwrap();
    assert!(text.contains("\n  \"_cache_metadata\""));
}

#[test]
fn test_store_rejects_invalid_orcid() {
    let data_dir = TempDir::new().unwrap();
    let cache = cache_in(&data_dir);
    let mut record = json!({});
    assert!(matches!(
        cache.store("bad", None, &mut record, Utc::now()),
        Err(FetchError::InvalidOrcid(_))
    ));
}

// === RecordSource ===

fn source_for(data_dir: &TempDir, base_url: &str) -> RecordSource {
    RecordSource::new(
        cache_in(data_dir),
        OrcidClient::new(&api_config(base_url)).unwrap(),
    )
}

fn no_fetch() -> FetchPolicy {
    FetchPolicy {
        fetch: false,
        force: false,
    }
}

fn cached_record(data_dir: &TempDir, age: Duration, marker: &str) {
    let cache = cache_in(data_dir);
    let mut record = json!({"marker": marker});
    cache
        .store(ORCID_ID, None, &mut record, Utc::now() - age)
        .unwrap();
}

#[tokio::test]
async fn test_miss_without_fetch_is_none() {
    let data_dir = TempDir::new().unwrap();
    let source = source_for(&data_dir, "http://127.0.0.1:9");

    let record = source.get_or_fetch(ORCID_ID, None, no_fetch()).await.unwrap();
    assert!(record.is_none());
}

#[tokio::test]
async fn test_stale_without_fetch_returns_stale_copy() {
    let data_dir = TempDir::new().unwrap();
    cached_record(&data_dir, Duration::days(30), "stale");
    let source = source_for(&data_dir, "http://127.0.0.1:9");

    let record = source.get_or_fetch(ORCID_ID, None, no_fetch()).await.unwrap().unwrap();
    assert_eq!(record["marker"], "stale");
}

#[tokio::test]
async fn test_fresh_cache_skips_api() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", mockito::Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let data_dir = TempDir::new().unwrap();
    cached_record(&data_dir, Duration::hours(1), "fresh");
    let source = source_for(&data_dir, &server.url());

    let record = source
        .get_or_fetch(ORCID_ID, None, FetchPolicy::default())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(record["marker"], "fresh");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_stale_cache_is_refetched_and_rewritten() {
    let mut server = mockito::Server::new_async().await;
    let _record_mock = server
        .mock("GET", format!("/{}/record", ORCID_ID).as_str())
        .with_status(200)
        .with_body(json!({"marker": "remote"}).to_string())
        .expect(1)
        .create_async()
        .await;

    let data_dir = TempDir::new().unwrap();
    cached_record(&data_dir, Duration::days(30), "stale");
    let source = source_for(&data_dir, &server.url());

    let record = source
        .get_or_fetch(ORCID_ID, None, FetchPolicy::default())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record["marker"], "remote");

    let cached = source.cache().load(ORCID_ID, None).unwrap();
    assert_eq!(cached["marker"], "remote");
    assert!(source.cache().is_fresh(&cached, Utc::now()));
}

#[tokio::test]
async fn test_force_ignores_fresh_cache() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", format!("/{}/record", ORCID_ID).as_str())
        .with_status(200)
        .with_body(json!({"marker": "remote"}).to_string())
        .expect(1)
        .create_async()
        .await;

    let data_dir = TempDir::new().unwrap();
    cached_record(&data_dir, Duration::hours(1), "fresh");
    let source = source_for(&data_dir, &server.url());

    let policy = FetchPolicy {
        fetch: true,
        force: true,
    };
    let record = source.get_or_fetch(ORCID_ID, None, policy).await.unwrap().unwrap();

    assert_eq!(record["marker"], "remote");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_force_without_fetch_uses_cache() {
    let data_dir = TempDir::new().unwrap();
    cached_record(&data_dir, Duration::hours(1), "fresh");
    let source = source_for(&data_dir, "http://127.0.0.1:9");

    let policy = FetchPolicy {
        fetch: false,
        force: true,
    };
    let record = source.get_or_fetch(ORCID_ID, None, policy).await.unwrap().unwrap();
    assert_eq!(record["marker"], "fresh");
}

#[tokio::test]
async fn test_fetch_failure_is_an_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", format!("/{}/record", ORCID_ID).as_str())
        .with_status(404)
        .create_async()
        .await;

    let data_dir = TempDir::new().unwrap();
    let source = source_for(&data_dir, &server.url());

    let result = source.get_or_fetch(ORCID_ID, Some("ECEN"), FetchPolicy::default()).await;
    assert!(matches!(result, Err(FetchError::Status { status: 404, .. })));
    assert!(source.cache().load(ORCID_ID, Some("ECEN")).is_none());
}

#[tokio::test]
async fn test_invalid_orcid_is_rejected() {
    let data_dir = TempDir::new().unwrap();
    let source = source_for(&data_dir, "http://127.0.0.1:9");
    let result = source.get_or_fetch("0000-0000", None, FetchPolicy::default()).await;
    assert!(matches!(result, Err(FetchError::InvalidOrcid(_))));
}
