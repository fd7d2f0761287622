//! On-disk ORCID record cache
//!
//! Layout: `<data_dir>/<dir_name>/[<dept>/]<orcid>.json`. Each stored record
//! carries a `_cache_metadata` object used for TTL checks.

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

use orcid_record::{sanitize_dept, validate_orcid_id};

use crate::config::CacheConfig;
use crate::error::{FetchError, Result};

/// Key of the metadata object added to cached records
pub const CACHE_METADATA_KEY: &str = "_cache_metadata";

/// Stamp `record` with the time it was cached
pub fn add_cache_metadata(record: &mut Value, ttl_seconds: u64, now: DateTime<Utc>) {
    if let Some(obj) = record.as_object_mut() {
        obj.insert(
            CACHE_METADATA_KEY.to_string(),
            json!({
                "cached_at": now.to_rfc3339(),
                "ttl_seconds": ttl_seconds,
            }),
        );
    }
}

/// Whether a cached record is younger than `ttl_seconds`.
///
/// Records without metadata, or with a timestamp that is missing or lacks a
/// UTC offset, count as stale.
pub fn is_cache_fresh(record: &Value, ttl_seconds: u64, now: DateTime<Utc>) -> bool {
    let Some(cached_at) = record
        .get(CACHE_METADATA_KEY)
        .and_then(|m| m.get("cached_at"))
        .and_then(Value::as_str)
    else {
        return false;
    };

    match DateTime::parse_from_rfc3339(cached_at) {
        Ok(cached_at) => {
            let age = now.signed_duration_since(cached_at.with_timezone(&Utc));
            age.num_seconds() < i64::try_from(ttl_seconds).unwrap_or(i64::MAX)
        }
        Err(_) => false,
    }
}

/// Cached ORCID records under one data directory
#[derive(Debug, Clone)]
pub struct RecordCache {
    root: PathBuf,
    ttl_seconds: u64,
}

impl RecordCache {
    pub fn new(data_dir: &Path, config: &CacheConfig) -> Self {
        Self {
            root: data_dir.join(&config.dir_name),
            ttl_seconds: config.ttl_seconds,
        }
    }

    /// The cache directory (`<data_dir>/<dir_name>`)
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    pub fn is_fresh(&self, record: &Value, now: DateTime<Utc>) -> bool {
        is_cache_fresh(record, self.ttl_seconds, now)
    }

    /// Where a record for `orcid_id` is written
    pub fn path_for(&self, orcid_id: &str, dept: Option<&str>) -> PathBuf {
        let file_name = format!("{}.json", orcid_id);
        match sanitize_dept(dept) {
            Some(dept) => self.root.join(dept).join(file_name),
            None => self.root.join(file_name),
        }
    }

    /// Load a cached record.
    ///
    /// Looks in the department directory, then the flat directory, then every
    /// other subdirectory. The first file found decides the outcome: if it
    /// cannot be read or parsed the result is `None`.
    pub fn load(&self, orcid_id: &str, dept: Option<&str>) -> Option<Value> {
        if !validate_orcid_id(orcid_id) {
            error!("Invalid ORCID iD format: {}", orcid_id);
            return None;
        }

        let file_name = format!("{}.json", orcid_id);

        if let Some(dept) = sanitize_dept(dept) {
            let path = self.root.join(dept).join(&file_name);
            if path.is_file() {
                return read_record(&path);
            }
        }

        let flat = self.root.join(&file_name);
        if flat.is_file() {
            return read_record(&flat);
        }

        let mut subdirs: Vec<PathBuf> = fs::read_dir(&self.root)
            .ok()?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_dir())
            .collect();
        subdirs.sort();

        subdirs
            .into_iter()
            .map(|dir| dir.join(&file_name))
            .find(|path| path.is_file())
            .and_then(|path| read_record(&path))
    }

    /// Stamp and write a record, creating directories as needed
    pub fn store(
        &self,
        orcid_id: &str,
        dept: Option<&str>,
        record: &mut Value,
        now: DateTime<Utc>,
    ) -> Result<PathBuf> {
        if !validate_orcid_id(orcid_id) {
            return Err(FetchError::InvalidOrcid(orcid_id.to_string()));
        }

        add_cache_metadata(record, self.ttl_seconds, now);

        let path = self.path_for(orcid_id, dept);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, serde_json::to_string_pretty(record)?)?;
        debug!("Wrote {}", path.display());
        Ok(path)
    }
}

fn read_record(path: &Path) -> Option<Value> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            error!("Failed to read {}: {}", path.display(), e);
            return None;
        }
    };

    match serde_json::from_str(&content) {
        Ok(record) => Some(record),
        Err(e) => {
            error!("Failed to parse JSON from {}: {}", path.display(), e);
            None
        }
    }
}
