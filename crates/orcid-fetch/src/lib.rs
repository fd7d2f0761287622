//! Record retrieval for academia-orcid
//!
//! - [`Config`]: TOML configuration with environment overrides
//! - [`RecordCache`]: JSON records on disk with a TTL
//! - [`OrcidClient`]: ORCID public API with retry and bounded concurrency
//! - [`RecordSource`]: cache-first retrieval combining the two
//! - [`DoiClient`]: optional CSL-JSON enrichment from doi.org
//! - [`lookup_orcid_for_uin`]: UIN to ORCID iD mapping in SQLite

pub mod cache;
pub mod client;
pub mod config;
pub mod enrich;
pub mod error;
pub mod mapping;
pub mod source;

pub use cache::{add_cache_metadata, is_cache_fresh, RecordCache};
pub use client::OrcidClient;
pub use config::{ApiConfig, CacheConfig, Config, OutputConfig};
pub use enrich::{enrich_publication, needs_enrichment, CslRecord, DoiClient, EnrichmentStats};
pub use error::{ConfigError, FetchError, Result};
pub use mapping::lookup_orcid_for_uin;
pub use source::{FetchPolicy, RecordSource};

/// User-Agent sent to the ORCID API and doi.org
pub const USER_AGENT: &str = concat!("academia-orcid/", env!("CARGO_PKG_VERSION"));
