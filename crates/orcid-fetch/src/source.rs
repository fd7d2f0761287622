//! Cache-first record retrieval

use chrono::Utc;
use serde_json::Value;
use std::path::Path;
use tracing::{info, warn};

use orcid_record::validate_orcid_id;

use crate::cache::RecordCache;
use crate::client::OrcidClient;
use crate::config::Config;
use crate::error::{FetchError, Result};

/// Whether the API may be contacted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPolicy {
    /// Allow API requests on a cache miss or stale entry
    pub fetch: bool,
    /// Ignore the cache entirely (only with `fetch`)
    pub force: bool,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            fetch: true,
            force: false,
        }
    }
}

/// Record cache backed by the ORCID API
#[derive(Debug, Clone)]
pub struct RecordSource {
    cache: RecordCache,
    client: OrcidClient,
}

impl RecordSource {
    pub fn new(cache: RecordCache, client: OrcidClient) -> Self {
        Self { cache, client }
    }

    pub fn from_config(data_dir: &Path, config: &Config) -> Result<Self> {
        Ok(Self::new(
            RecordCache::new(data_dir, &config.cache),
            OrcidClient::new(&config.api)?,
        ))
    }

    pub fn cache(&self) -> &RecordCache {
        &self.cache
    }

    /// Return a record from the cache or the API.
    ///
    /// | cache  | fetch allowed      | fetch disabled |
    /// |--------|--------------------|----------------|
    /// | fresh  | cached             | cached         |
    /// | stale  | refetch            | stale copy     |
    /// | miss   | fetch              | `None`         |
    ///
    /// With `force` (and `fetch`) the cache is not consulted.
    pub async fn get_or_fetch(
        &self,
        orcid_id: &str,
        dept: Option<&str>,
        policy: FetchPolicy,
    ) -> Result<Option<Value>> {
        if !validate_orcid_id(orcid_id) {
            return Err(FetchError::InvalidOrcid(orcid_id.to_string()));
        }

        if policy.force && policy.fetch {
            info!("Force fetching ORCID record for {} (ignoring cache)", orcid_id);
            return self.fetch_and_store(orcid_id, dept).await.map(Some);
        }

        if let Some(record) = self.cache.load(orcid_id, dept) {
            if self.cache.is_fresh(&record, Utc::now()) {
                info!("Using cached ORCID record for {} (fresh)", orcid_id);
                return Ok(Some(record));
            }

            if policy.fetch {
                info!(
                    "Cached ORCID record for {} is stale (age > {}s), refetching",
                    orcid_id,
                    self.cache.ttl_seconds()
                );
                return self.fetch_and_store(orcid_id, dept).await.map(Some);
            }

            warn!("Using stale cached record for {} (fetch disabled)", orcid_id);
            return Ok(Some(record));
        }

        if policy.fetch {
            info!("No cached record for {}, fetching", orcid_id);
            return self.fetch_and_store(orcid_id, dept).await.map(Some);
        }

        info!("No cached record for {} and fetching is disabled", orcid_id);
        Ok(None)
    }

    /// Fetch from the API and write to the cache.
    ///
    /// A cache write failure is logged; the fetched record is still returned.
    pub async fn fetch_and_store(&self, orcid_id: &str, dept: Option<&str>) -> Result<Value> {
        let mut record = self.client.fetch_record(orcid_id).await?;

        match self.cache.store(orcid_id, dept, &mut record, Utc::now()) {
            Ok(path) => info!("Cached ORCID record to {}", path.display()),
            Err(e) => warn!("Failed to cache ORCID record for {}: {}", orcid_id, e),
        }

        Ok(record)
    }
}
