//! DOI metadata enrichment
//!
//! ORCID work records often lack volume, pages and the like. doi.org answers
//! content negotiation with CSL-JSON, which fills those gaps. Enrichment
//! never overwrites a value already present in the record.

use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{info, warn};

use orcid_record::Publication;

use crate::config::ApiConfig;
use crate::error::{FetchError, Result};
use crate::USER_AGENT;

const CSL_JSON: &str = "application/vnd.citationstyles.csl+json";

/// The subset of a CSL-JSON item used for enrichment.
///
/// Scalar fields are kept as raw JSON because registrars disagree on whether
/// `volume`, `page` and `issue` are strings or numbers.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CslRecord {
    #[serde(rename = "container-title")]
    pub container_title: Option<Value>,
    pub issued: Option<CslDate>,
    pub volume: Option<Value>,
    pub page: Option<Value>,
    pub issue: Option<Value>,
    pub publisher: Option<Value>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<Value>,
    pub author: Vec<CslName>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CslDate {
    #[serde(rename = "date-parts")]
    pub date_parts: Vec<Vec<Value>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CslName {
    pub given: Option<String>,
    pub family: Option<String>,
}

impl CslName {
    /// "Given Family", or whichever part is present
    pub fn display(&self) -> Option<String> {
        let given = self.given.as_deref().unwrap_or("");
        let family = self.family.as_deref().unwrap_or("");
        match (given.is_empty(), family.is_empty()) {
            (false, false) => Some(format!("{} {}", given, family)),
            (true, false) => Some(family.to_string()),
            (false, true) => Some(given.to_string()),
            (true, true) => None,
        }
    }
}

impl CslRecord {
    /// First container title (journal or proceedings name)
    pub fn container_title(&self) -> Option<String> {
        match self.container_title.as_ref()? {
            Value::Array(titles) => titles.first().and_then(scalar_string),
            other => scalar_string(other),
        }
    }

    /// Month number from `issued.date-parts[0][1]`
    pub fn month(&self) -> Option<String> {
        self.issued
            .as_ref()?
            .date_parts
            .first()?
            .get(1)
            .and_then(scalar_string)
    }

    pub fn author_names(&self) -> Vec<String> {
        self.author.iter().filter_map(CslName::display).collect()
    }
}

/// Non-empty string or number as a string
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn fill(field: &mut String, value: Option<String>) {
    if field.is_empty() {
        if let Some(value) = value {
            *field = value;
        }
    }
}

/// Copy CSL metadata into the publication's empty fields
pub fn enrich_publication(publication: &mut Publication, csl: &CslRecord) {
    fill(&mut publication.venue, csl.container_title());
    fill(&mut publication.month, csl.month());
    fill(&mut publication.volume, csl.volume.as_ref().and_then(scalar_string));
    fill(&mut publication.pages, csl.page.as_ref().and_then(scalar_string));
    fill(&mut publication.number, csl.issue.as_ref().and_then(scalar_string));
    fill(&mut publication.publisher, csl.publisher.as_ref().and_then(scalar_string));
    fill(&mut publication.abstract_text, csl.abstract_text.as_ref().and_then(scalar_string));

    if publication.raw_authors.is_empty() {
        publication.raw_authors = csl.author_names();
    }
}

/// Whether any field enrichment could fill is empty
pub fn needs_enrichment(publication: &Publication) -> bool {
    [
        &publication.venue,
        &publication.month,
        &publication.volume,
        &publication.pages,
        &publication.number,
        &publication.publisher,
        &publication.abstract_text,
    ]
    .iter()
    .any(|field| field.is_empty())
        || publication.raw_authors.is_empty()
}

/// Outcome counts of an enrichment pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichmentStats {
    pub enriched: usize,
    pub without_doi: usize,
    pub already_complete: usize,
    pub failed: usize,
}

/// doi.org content-negotiation client
#[derive(Debug, Clone)]
pub struct DoiClient {
    client: Client,
    base_url: String,
    delay: Duration,
}

impl DoiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.doi_timeout())
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: config.doi_base_url.trim_end_matches('/').to_string(),
            delay: config.rate_limit_delay(),
        })
    }

    /// CSL-JSON metadata for `doi`; any failure is logged and yields `None`
    pub async fn fetch_metadata(&self, doi: &str) -> Option<CslRecord> {
        match self.try_fetch_metadata(doi).await {
            Ok(csl) => Some(csl),
            Err(e) => {
                warn!("DOI lookup failed for {}: {}", doi, e);
                None
            }
        }
    }

    async fn try_fetch_metadata(&self, doi: &str) -> Result<CslRecord> {
        let url = format!("{}/{}", self.base_url, doi);
        let response = self.client.get(&url).header(ACCEPT, CSL_JSON).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Enrich every publication that has a DOI and at least one empty field.
    ///
    /// Lookups are sequential, separated by the configured rate-limit delay.
    pub async fn enrich_publications<'a, I>(&self, publications: I) -> EnrichmentStats
    where
        I: IntoIterator<Item = &'a mut Publication>,
    {
        let mut stats = EnrichmentStats::default();

        for publication in publications {
            if publication.doi.is_empty() {
                stats.without_doi += 1;
                continue;
            }
            if !needs_enrichment(publication) {
                stats.already_complete += 1;
                continue;
            }

            if stats.enriched > 0 {
                tokio::time::sleep(self.delay).await;
            }

            match self.fetch_metadata(&publication.doi).await {
                Some(csl) => {
                    enrich_publication(publication, &csl);
                    stats.enriched += 1;
                }
                None => stats.failed += 1,
            }
        }

        info!(
            "DOI enrichment: {} enriched, {} without DOI, {} already complete, {} failed",
            stats.enriched, stats.without_doi, stats.already_complete, stats.failed
        );
        stats
    }
}
