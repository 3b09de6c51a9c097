use chrono::Utc;
use std::time::Instant;
use tracing::{debug, error, info};

use crate::config::{AuditConfig, CategoryWeights};
use crate::error::AuditError;
use crate::models::{
    AccessibilityReport, AuditReport, AuditRequest, FetchResult, Grade, OverallSummary,
    PerformanceReport, ProgressEvent, SecurityReport, SeoReport, TlsInfo,
};
use crate::services::accessibility::analyze_accessibility;
use crate::services::aggregator::{merge_issues, overall_score, CategoryScores};
use crate::services::document::{round_to, Page};
use crate::services::fetcher::ResilientFetcher;
use crate::services::normalize::hostname_from_url;
use crate::services::performance::analyze_performance;
use crate::services::progress::ProgressSink;
use crate::services::security::analyze_security;
use crate::services::seo::analyze_seo;
use crate::services::tls_inspector::TlsInspector;

/// Runs the fetch-and-score pipeline for one URL at a time.
///
/// Holds no per-audit state, so one instance can serve concurrent audits.
pub struct Auditor {
    fetcher: ResilientFetcher,
    tls: TlsInspector,
    weights: CategoryWeights,
}

struct CategoryReports {
    security: SecurityReport,
    performance: PerformanceReport,
    seo: SeoReport,
    accessibility: AccessibilityReport,
}

impl Auditor {
    pub fn new(config: AuditConfig) -> Result<Self, AuditError> {
        config.validate()?;
        Ok(Self {
            fetcher: ResilientFetcher::new(config.fetch)?,
            tls: TlsInspector::new(config.tls),
            weights: config.weights,
        })
    }

    pub async fn run(
        &self,
        request: &AuditRequest,
        progress: &dyn ProgressSink,
    ) -> Result<AuditReport, AuditError> {
        let started = Instant::now();
        let url = request.url();
        info!("Audit request: URL={}, mode={}", url, request.mode());

        progress.emit(ProgressEvent::new(5, "Initializing audit..."));
        let host = hostname_from_url(url);

        progress.emit(ProgressEvent::new(20, "Checking SSL..."));
        progress.emit(ProgressEvent::new(40, "Fetching page content..."));
        let (tls, fetched) = tokio::join!(self.tls.inspect(&host), self.fetcher.fetch(url));

        let response = fetched.ok_or_else(|| {
            error!("Fetch failed for {}", url);
            AuditError::FetchExhausted {
                url: url.to_string(),
                attempts: self.fetcher.max_attempts(),
            }
        })?;

        let reports = analyze(&response, &tls, progress).map_err(|e| {
            error!("Analysis failed for {}: {}", url, e);
            e
        })?;

        let scores = CategoryScores {
            security: reports.security.score,
            performance: reports.performance.score,
            seo: reports.seo.score,
            accessibility: reports.accessibility.score,
        };
        let score = overall_score(&scores, &self.weights);
        let grade = Grade::from_score(score);
        let issues = merge_issues([
            reports.security.issues.as_slice(),
            reports.performance.issues.as_slice(),
            reports.seo.issues.as_slice(),
            reports.accessibility.issues.as_slice(),
        ]);

        let response_time_ms = Some(response.elapsed_seconds)
            .filter(|s| *s > 0.0)
            .map(|s| (s * 1000.0).round() as u64);

        progress.emit(ProgressEvent::new(100, "Completing audit..."));
        info!("Audit complete for {}: {} ({})", url, score, grade);

        Ok(AuditReport {
            timestamp: Utc::now(),
            url: url.to_string(),
            mode: request.mode(),
            status: "success".to_string(),
            tls,
            overall: OverallSummary {
                score,
                grade,
                response_time_ms,
                pages_scanned: 1,
                audit_duration: round_to(started.elapsed().as_secs_f64(), 1),
            },
            security: reports.security,
            performance: reports.performance,
            seo: reports.seo,
            accessibility: reports.accessibility,
            issues,
        })
    }
}

/// Parse once and run all four analyzers over the same document.
///
/// Kept synchronous: the parsed DOM never lives across an await point.
fn analyze(
    response: &FetchResult,
    tls: &TlsInfo,
    progress: &dyn ProgressSink,
) -> Result<CategoryReports, AuditError> {
    let page = Page::parse(response);

    progress.emit(ProgressEvent::new(60, "Analyzing security..."));
    let security = analyze_security(Some(&page), tls)?;

    progress.emit(ProgressEvent::new(
        75,
        "Analyzing performance, SEO & accessibility...",
    ));
    debug!("Starting performance analysis");
    let performance = analyze_performance(Some(&page), Some(response.elapsed_seconds))?;
    debug!("Starting SEO analysis");
    let seo = analyze_seo(Some(&page))?;
    debug!("Starting accessibility analysis");
    let accessibility = analyze_accessibility(Some(&page))?;
    debug!("Analysis complete");

    Ok(CategoryReports {
        security,
        performance,
        seo,
        accessibility,
    })
}
