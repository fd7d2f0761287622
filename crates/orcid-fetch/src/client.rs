//! ORCID public API client
//!
//! The record endpoint only returns work summaries. Full work details
//! (contributors, citations, external ids) come from one request per
//! put-code, issued in rate-limited batches.

use reqwest::header::ACCEPT;
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{info, warn};

use orcid_record::validate_orcid_id;
use orcid_record::value::array_at;

use crate::config::ApiConfig;
use crate::error::{FetchError, Result};
use crate::USER_AGENT;

/// Attempt counter with doubling backoff
#[derive(Debug, Clone)]
pub(crate) struct RetryState {
    attempt: u32,
    max_attempts: u32,
    delay: Duration,
}

impl RetryState {
    /// At least one attempt is always made
    pub(crate) fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            attempt: 1,
            max_attempts: max_attempts.max(1),
            delay: initial_delay,
        }
    }

    pub(crate) fn attempt(&self) -> u32 {
        self.attempt
    }

    pub(crate) fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay to wait before the next attempt, or `None` when attempts are used up
    pub(crate) fn next_delay(&mut self) -> Option<Duration> {
        if self.attempt >= self.max_attempts {
            return None;
        }
        let delay = self.delay;
        self.delay = self.delay.saturating_mul(2);
        self.attempt += 1;
        Some(delay)
    }
}

/// Client for `https://pub.orcid.org/v3.0` (or a compatible base URL)
#[derive(Debug, Clone)]
pub struct OrcidClient {
    client: Client,
    config: ApiConfig,
}

impl OrcidClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    async fn get_json(&self, url: &str, timeout: Duration) -> Result<Value> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .timeout(timeout)
            .send()
            .await?;

        let status = response.status().as_u16();
        if status == 429 {
            return Err(FetchError::RateLimited);
        }
        if status != 200 {
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Fetch a full record, replacing each work group's first summary with
    /// its full work detail where one could be fetched
    pub async fn fetch_record(&self, orcid_id: &str) -> Result<Value> {
        if !validate_orcid_id(orcid_id) {
            return Err(FetchError::InvalidOrcid(orcid_id.to_string()));
        }

        info!("Fetching ORCID record for {} from API", orcid_id);
        let url = format!("{}/{}/record", self.base_url(), orcid_id);
        let mut record = self.get_json(&url, self.config.timeout()).await?;
        info!("Fetched main record for {}", orcid_id);

        let summaries = summary_put_codes(&record);
        if summaries.is_empty() {
            return Ok(record);
        }

        let put_codes: Vec<String> = summaries.iter().map(|(_, code)| code.clone()).collect();
        let details = self.fetch_work_details(orcid_id, &put_codes).await;

        for (group_idx, put_code) in summaries {
            let Some(detail) = details.get(&put_code) else {
                continue;
            };
            let pointer = format!("/activities-summary/works/group/{}/work-summary/0", group_idx);
            if let Some(slot) = record.pointer_mut(&pointer) {
                *slot = detail.clone();
            }
        }

        Ok(record)
    }

    /// Fetch one work detail; failures are logged and yield `None`
    pub async fn fetch_work_detail(&self, orcid_id: &str, put_code: &str) -> Option<Value> {
        match self.try_fetch_work_detail(orcid_id, put_code).await {
            Ok(detail) => Some(detail),
            Err(e) => {
                warn!("Skipping work {}: {}", put_code, e);
                None
            }
        }
    }

    /// Fetch one work detail, retrying 429s and transport errors with
    /// exponential backoff. Any other failure ends the attempt immediately.
    pub async fn try_fetch_work_detail(&self, orcid_id: &str, put_code: &str) -> Result<Value> {
        if !validate_orcid_id(orcid_id) {
            return Err(FetchError::InvalidOrcid(orcid_id.to_string()));
        }

        let url = format!("{}/{}/work/{}", self.base_url(), orcid_id, put_code);
        let mut retry = RetryState::new(self.config.max_retries, self.config.rate_limit_backoff());

        loop {
            match self.get_json(&url, self.config.work_detail_timeout()).await {
                Ok(detail) => return Ok(detail),
                Err(e) if e.is_retryable() => {
                    let attempt = retry.attempt();
                    let Some(delay) = retry.next_delay() else {
                        return Err(FetchError::RetriesExhausted {
                            attempts: attempt,
                            url,
                        });
                    };
                    warn!(
                        "Work {} attempt {}/{} failed ({}), retrying in {:?}",
                        put_code,
                        attempt,
                        retry.max_attempts(),
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Fetch many work details.
    ///
    /// Put-codes are processed in batches of `max_concurrent_requests`; the
    /// requests in a batch run concurrently and batches are separated by
    /// `rate_limit_delay`. Put-codes whose detail could not be fetched are
    /// absent from the result.
    pub async fn fetch_work_details(
        &self,
        orcid_id: &str,
        put_codes: &[String],
    ) -> HashMap<String, Value> {
        let mut results = HashMap::new();
        if put_codes.is_empty() {
            return results;
        }

        let total = put_codes.len();
        let batch_size = self.config.max_concurrent_requests.max(1);
        info!("Fetching {} work details, {} at a time", total, batch_size);

        let batches: Vec<&[String]> = put_codes.chunks(batch_size).collect();
        for (i, batch) in batches.iter().enumerate() {
            let mut tasks = JoinSet::new();
            for put_code in batch.iter() {
                let client = self.clone();
                let orcid_id = orcid_id.to_string();
                let put_code = put_code.clone();
                tasks.spawn(async move {
                    let detail = client.fetch_work_detail(&orcid_id, &put_code).await;
                    (put_code, detail)
                });
            }

            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok((put_code, Some(detail))) => {
                        results.insert(put_code, detail);
                    }
                    Ok((_, None)) => {}
                    Err(e) => warn!("Work detail task failed: {}", e),
                }
            }

            if i + 1 < batches.len() {
                tokio::time::sleep(self.config.rate_limit_delay()).await;
            }
        }

        info!("Fetched {}/{} work details", results.len(), total);
        results
    }
}

/// `(group index, put-code)` for the first summary of every work group
fn summary_put_codes(record: &Value) -> Vec<(usize, String)> {
    array_at(record, &["activities-summary", "works", "group"])
        .iter()
        .enumerate()
        .filter_map(|(idx, group)| {
            let summary = array_at(group, &["work-summary"]).first()?;
            put_code_string(summary.get("put-code")?).map(|code| (idx, code))
        })
        .collect()
}

fn put_code_string(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}
