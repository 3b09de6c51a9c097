use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use crate::error::AuditError;
use crate::services::normalize_url;

/// Rendered in place of values that were not measured.
pub const NOT_AVAILABLE: &str = "N/A";

/// Serialize `None` as `"N/A"` instead of `null`.
fn or_not_available<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    match value {
        Some(v) => v.serialize(serializer),
        None => serializer.serialize_str(NOT_AVAILABLE),
    }
}

// ============================================================================
// Request Types
// ============================================================================

/// Device profile the audit was requested for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AuditMode {
    #[default]
    Desktop,
    Mobile,
}

impl fmt::Display for AuditMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditMode::Desktop => write!(f, "desktop"),
            AuditMode::Mobile => write!(f, "mobile"),
        }
    }
}

/// A validated audit request. Only constructed through normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditRequest {
    url: String,
    mode: AuditMode,
}

impl AuditRequest {
    /// Normalize `raw_url`; fails with `InvalidUrl` when nothing fetchable remains.
    pub fn new(raw_url: &str, mode: AuditMode) -> Result<Self, AuditError> {
        let url =
            normalize_url(raw_url).ok_or_else(|| AuditError::InvalidUrl(raw_url.to_string()))?;
        Ok(Self { url, mode })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn mode(&self) -> AuditMode {
        self.mode
    }
}

// ============================================================================
// Fetch & TLS Types
// ============================================================================

/// A successfully retrieved page. Owned by a single audit.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub status_code: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
    /// Time to response headers, rounded to 2 decimals
    pub elapsed_seconds: f64,
}

impl FetchResult {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Case-insensitive header presence check
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.contains_key(name)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Outcome of the TLS handshake against the audited host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsInfo {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_until_expiry: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cipher_strength_bits: Option<i32>,
}

impl TlsInfo {
    pub fn invalid() -> Self {
        Self::default()
    }
}

// ============================================================================
// Category Reports
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct SecurityReport {
    pub score: u8,
    pub ssl_valid: bool,
    #[serde(serialize_with = "or_not_available")]
    pub encryption_strength: Option<i32>,
    pub security_headers: String,
    pub vulnerabilities: u32,
    #[serde(serialize_with = "or_not_available")]
    pub certificate_expiry: Option<i64>,
    pub mixed_content: bool,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PerformanceReport {
    pub score: u8,
    /// Absent when the page could not be analyzed
    #[serde(flatten)]
    pub metrics: Option<PerformanceMetrics>,
    pub issues: Vec<String>,
}

/// Heuristic page-speed figures derived from one fetch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceMetrics {
    pub lcp_s: f64,
    pub fcp_s: f64,
    pub cls: f64,
    pub tti: f64,
    pub fid: u32,
    /// Kilobytes, 1 decimal
    pub page_size: f64,
    pub requests_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeoReport {
    pub score: u8,
    /// Absent when the page could not be analyzed
    #[serde(flatten)]
    pub details: Option<SeoDetails>,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeoDetails {
    pub title: Option<String>,
    pub title_length: usize,
    pub meta_desc_length: usize,
    pub h1_count: usize,
    pub internal_links: usize,
    pub has_robots_meta: bool,
    pub has_canonical: bool,
    #[serde(serialize_with = "or_not_available")]
    pub keyword_density: Option<f64>,
    #[serde(serialize_with = "or_not_available")]
    pub backlinks: Option<u64>,
    #[serde(serialize_with = "or_not_available")]
    pub page_depth: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccessibilityReport {
    pub score: u8,
    /// Absent when the page could not be analyzed
    #[serde(flatten)]
    pub details: Option<AccessibilityDetails>,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessibilityDetails {
    pub alt_text_coverage: f64,
    pub aria_usage: f64,
    pub has_main_landmark: bool,
    pub proper_heading_order: bool,
    pub keyboard_nav: String,
    pub screen_reader: String,
    #[serde(serialize_with = "or_not_available")]
    pub contrast_ratio: Option<f64>,
    #[serde(serialize_with = "or_not_available")]
    pub color_blind_compatibility: Option<String>,
}

// ============================================================================
// Aggregate Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// Inclusive lower bounds, checked from the top.
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=u8::MAX => Grade::A,
            80..=89 => Grade::B,
            70..=79 => Grade::C,
            60..=69 => Grade::D,
            _ => Grade::F,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OverallSummary {
    pub score: u8,
    pub grade: Grade,
    #[serde(serialize_with = "or_not_available")]
    pub response_time_ms: Option<u64>,
    pub pages_scanned: u32,
    pub audit_duration: f64,
}

/// Final result of one audit
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub timestamp: DateTime<Utc>,
    pub url: String,
    pub mode: AuditMode,
    pub status: String,
    pub tls: TlsInfo,
    pub overall: OverallSummary,
    pub security: SecurityReport,
    pub performance: PerformanceReport,
    pub seo: SeoReport,
    pub accessibility: AccessibilityReport,
    /// Deduplicated union of category issues, sorted
    pub issues: Vec<String>,
}

/// Advisory progress notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    #[serde(rename = "progress")]
    pub percent: u8,
    pub message: String,
}

impl ProgressEvent {
    pub fn new(percent: u8, message: impl Into<String>) -> Self {
        Self {
            percent: percent.min(100),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_boundaries_are_inclusive() {
        assert_eq!(Grade::from_score(100), Grade::A);
        assert_eq!(Grade::from_score(90), Grade::A);
        assert_eq!(Grade::from_score(89), Grade::B);
        assert_eq!(Grade::from_score(80), Grade::B);
        assert_eq!(Grade::from_score(79), Grade::C);
        assert_eq!(Grade::from_score(70), Grade::C);
        assert_eq!(Grade::from_score(69), Grade::D);
        assert_eq!(Grade::from_score(60), Grade::D);
        assert_eq!(Grade::from_score(59), Grade::F);
        assert_eq!(Grade::from_score(0), Grade::F);
    }

    #[test]
    fn test_grade_is_monotonic() {
        let mut previous = Grade::from_score(0);
        for score in 1..=100u8 {
            let grade = Grade::from_score(score);
            // A sorts first, so a higher score never yields a later variant
            assert!(grade <= previous, "grade regressed at {}", score);
            previous = grade;
        }
    }

    #[test]
    fn test_missing_values_serialize_as_not_available() {
        let report = SecurityReport {
            score: 10,
            ssl_valid: false,
            encryption_strength: None,
            security_headers: "None".to_string(),
            vulnerabilities: 0,
            certificate_expiry: Some(-3),
            mixed_content: false,
            issues: vec![],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["encryption_strength"], "N/A");
        assert_eq!(json["certificate_expiry"], -3);
    }

    #[test]
    fn test_category_fields_serialize_flat() {
        let report = SeoReport {
            score: 20,
            details: Some(SeoDetails {
                title: Some("Home".to_string()),
                title_length: 4,
                meta_desc_length: 0,
                h1_count: 1,
                internal_links: 0,
                has_robots_meta: false,
                has_canonical: false,
                keyword_density: None,
                backlinks: None,
                page_depth: None,
            }),
            issues: vec![],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["score"], 20);
        assert_eq!(json["title"], "Home");
        assert_eq!(json["page_depth"], "N/A");
        assert!(json.get("details").is_none());

        let unanalyzed = PerformanceReport {
            score: 0,
            metrics: None,
            issues: vec!["Unable to analyze performance".to_string()],
        };
        let json = serde_json::to_value(&unanalyzed).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_progress_event_clamps_percent() {
        let event = ProgressEvent::new(150, "done");
        assert_eq!(event.percent, 100);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["progress"], 100);
    }

    #[test]
    fn test_request_normalizes_url() {
        let request = AuditRequest::new(" example.com ", AuditMode::Mobile).unwrap();
        assert_eq!(request.url(), "https://example.com/");
        assert_eq!(request.mode(), AuditMode::Mobile);
    }

    #[test]
    fn test_request_rejects_missing_host() {
        assert!(matches!(
            AuditRequest::new("http://", AuditMode::Desktop),
            Err(AuditError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_mode_serializes_lowercase() {
        assert_eq!(serde_json::to_value(AuditMode::Mobile).unwrap(), "mobile");
        assert_eq!(AuditMode::default().to_string(), "desktop");
    }
}
