use std::time::Duration;

use crate::error::AuditError;

/// Browser identities rotated through by the fetcher, in order.
const DEFAULT_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.0.3 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/88.0.4324.96 Safari/537.36",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 14_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.1.1 Mobile/15E148 Safari/604.1",
];

/// Headers sent with every identity.
const DEFAULT_BASE_HEADERS: &[(&str, &str)] = &[
    (
        "Accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
    ),
    ("Accept-Language", "en-US,en;q=0.5"),
    ("Connection", "keep-alive"),
    ("Upgrade-Insecure-Requests", "1"),
];

/// Category weights as integer percentages so the sum is exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryWeights {
    pub security: u32,
    pub performance: u32,
    pub seo: u32,
    pub accessibility: u32,
}

impl CategoryWeights {
    pub fn total(&self) -> u32 {
        self.security + self.performance + self.seo + self.accessibility
    }
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            security: 35,
            performance: 35,
            seo: 20,
            accessibility: 10,
        }
    }
}

/// Fetcher behaviour: who we pretend to be and how hard we try.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User-Agent strings, tried in order
    pub identities: Vec<String>,
    /// Headers shared by every identity
    pub base_headers: Vec<(String, String)>,
    /// Requests per identity before moving on
    pub attempts_per_identity: usize,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Pause between identities
    pub identity_delay: Duration,
}

impl FetchConfig {
    /// Worst-case number of requests for one fetch.
    pub fn max_attempts(&self) -> usize {
        self.identities.len() * self.attempts_per_identity
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            identities: DEFAULT_USER_AGENTS.iter().map(|ua| ua.to_string()).collect(),
            base_headers: DEFAULT_BASE_HEADERS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            attempts_per_identity: 3,
            request_timeout: Duration::from_secs(30),
            identity_delay: Duration::from_secs(1),
        }
    }
}

/// TLS inspection settings.
#[derive(Debug, Clone)]
pub struct TlsConfig {
    pub port: u16,
    /// Connect, read and write timeout on the inspection socket
    pub timeout: Duration,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            port: 443,
            timeout: Duration::from_secs(10),
        }
    }
}

/// Everything an audit needs to know up front. Built once, never mutated.
#[derive(Debug, Clone, Default)]
pub struct AuditConfig {
    pub fetch: FetchConfig,
    pub tls: TlsConfig,
    pub weights: CategoryWeights,
}

impl AuditConfig {
    pub fn validate(&self) -> Result<(), AuditError> {
        if self.weights.total() != 100 {
            return Err(AuditError::InvalidConfig(format!(
                "category weights must sum to 100, got {}",
                self.weights.total()
            )));
        }
        if self.fetch.identities.is_empty() {
            return Err(AuditError::InvalidConfig(
                "at least one fetch identity is required".to_string(),
            ));
        }
        if self.fetch.attempts_per_identity == 0 {
            return Err(AuditError::InvalidConfig(
                "attempts per identity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
