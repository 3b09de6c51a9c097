//! Page retrieval with identity rotation and bounded retry.
//!
//! Servers that filter bots often answer a single User-Agent with 403, so
//! each identity gets a few attempts before the next one is tried. Attempts
//! are strictly sequential; a fetch never issues concurrent requests.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::Client;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::FetchConfig;
use crate::error::AuditError;
use crate::models::FetchResult;

/// Why a single attempt was rejected
#[derive(Debug, Error)]
enum AttemptError {
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Unsuccessful status: {0}")]
    Status(u16),
}

pub struct ResilientFetcher {
    client: Client,
    base_headers: HeaderMap,
    identities: Vec<HeaderValue>,
    config: FetchConfig,
}

impl ResilientFetcher {
    pub fn new(config: FetchConfig) -> Result<Self, AuditError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AuditError::InvalidConfig(format!("HTTP client: {}", e)))?;

        let mut base_headers = HeaderMap::new();
        for (name, value) in &config.base_headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| AuditError::InvalidConfig(format!("header {:?}: {}", name, e)))?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                AuditError::InvalidConfig(format!("header value {:?}: {}", value, e))
            })?;
            base_headers.insert(name, value);
        }

        let identities = config
            .identities
            .iter()
            .map(|ua| {
                HeaderValue::from_str(ua)
                    .map_err(|e| AuditError::InvalidConfig(format!("user agent {:?}: {}", ua, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            client,
            base_headers,
            identities,
            config,
        })
    }

    /// Worst-case request count for one `fetch`.
    pub fn max_attempts(&self) -> usize {
        self.config.max_attempts()
    }

    /// Returns `None` once every identity has used up its attempts.
    pub async fn fetch(&self, url: &str) -> Option<FetchResult> {
        for (index, identity) in self.identities.iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.config.identity_delay).await;
            }

            for attempt in 1..=self.config.attempts_per_identity {
                match self.attempt(url, identity).await {
                    Ok(result) => {
                        info!(
                            url,
                            identity = index + 1,
                            attempt,
                            elapsed = result.elapsed_seconds,
                            "Fetched page"
                        );
                        return Some(result);
                    }
                    Err(e) => {
                        warn!(
                            "Fetch attempt {} with identity {} failed for {}: {}",
                            attempt,
                            index + 1,
                            url,
                            e
                        );
                    }
                }
            }

            debug!("Identity {} exhausted for {}", index + 1, url);
        }

        error!(
            "Fetch failed for {} after {} attempts",
            url,
            self.max_attempts()
        );
        None
    }

    async fn attempt(
        &self,
        url: &str,
        identity: &HeaderValue,
    ) -> Result<FetchResult, AttemptError> {
        let mut headers = self.base_headers.clone();
        headers.insert(USER_AGENT, identity.clone());

        let start = Instant::now();
        let response = self.client.get(url).headers(headers).send().await?;
        let elapsed = start.elapsed().as_secs_f64();

        let status = response.status();
        if !status.is_success() {
            return Err(AttemptError::Status(status.as_u16()));
        }

        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        Ok(FetchResult {
            status_code: status.as_u16(),
            headers,
            body,
            elapsed_seconds: (elapsed * 100.0).round() / 100.0,
        })
    }
}
