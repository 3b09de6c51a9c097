use crate::error::AuditError;
use crate::models::{PerformanceMetrics, PerformanceReport};
use crate::services::document::{round_to, Page};

// Fallbacks when no timing is known; they sit exactly on the thresholds.
const DEFAULT_FCP_S: f64 = 1.8;
const DEFAULT_LCP_S: f64 = 2.5;
const DEFAULT_TTI_S: f64 = 3.8;

// Not measured: no rendering happens, so these are fixed.
const FIXED_CLS: f64 = 0.05;
const FIXED_FID_MS: u32 = 15;

const LCP_THRESHOLD_S: f64 = 2.5;
const FCP_THRESHOLD_S: f64 = 1.8;
const CLS_THRESHOLD: f64 = 0.1;
const TTI_THRESHOLD_S: f64 = 3.8;
const FID_THRESHOLD_MS: u32 = 100;

/// Approximate page-speed scoring from a single fetch.
pub fn analyze_performance(
    page: Option<&Page<'_>>,
    elapsed_seconds: Option<f64>,
) -> Result<PerformanceReport, AuditError> {
    let page = match page.filter(|p| p.is_usable()) {
        Some(page) => page,
        None => {
            return Ok(PerformanceReport {
                score: 0,
                metrics: None,
                issues: vec!["Unable to analyze performance".to_string()],
            })
        }
    };

    // A zero reading carries no information
    let elapsed = elapsed_seconds.filter(|s| *s > 0.0);
    let fcp = elapsed.map_or(DEFAULT_FCP_S, |s| s * 0.8);
    let lcp = elapsed.map_or(DEFAULT_LCP_S, |s| s * 1.2);
    let tti = elapsed.map_or(DEFAULT_TTI_S, |s| s * 2.0);

    let mut score = 0u32;
    let mut issues = Vec::new();

    if lcp < LCP_THRESHOLD_S {
        score += 25;
    } else {
        issues.push(format!("High LCP: {:?}s", round_to(lcp, 2)));
    }
    if fcp < FCP_THRESHOLD_S {
        score += 25;
    } else {
        issues.push(format!("High FCP: {:?}s", round_to(fcp, 2)));
    }
    if FIXED_CLS < CLS_THRESHOLD {
        score += 20;
    } else {
        issues.push(format!("High CLS: {:?}", FIXED_CLS));
    }
    if tti < TTI_THRESHOLD_S {
        score += 15;
    } else {
        issues.push(format!("High TTI: {:?}s", round_to(tti, 2)));
    }
    if FIXED_FID_MS < FID_THRESHOLD_MS {
        score += 15;
    } else {
        issues.push(format!("High FID: {}ms", FIXED_FID_MS));
    }

    let requests_count = 1
        + page.count("script[src]")?
        + page.count("link[rel~=\"stylesheet\"][href]")?
        + page.count("img[src]")?;

    Ok(PerformanceReport {
        score: score.min(100) as u8,
        metrics: Some(PerformanceMetrics {
            lcp_s: round_to(lcp, 2),
            fcp_s: round_to(fcp, 2),
            cls: FIXED_CLS,
            tti: round_to(tti, 2),
            fid: FIXED_FID_MS,
            page_size: round_to(page.response().body.len() as f64 / 1024.0, 1),
            requests_count,
        }),
        issues,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::document::page_response;

    const ASSET_PAGE: &str = r#"<html><head>
        <link rel="stylesheet" href="/a.css">
        <link rel="preload" href="/font.woff2">
        <script src="/app.js"></script>
        <script>inline()</script>
        </head><body><img src="/a.png"><img src="/b.png"><img alt="no source"></body></html>"#;

    #[test]
    fn test_fast_page_scores_full_marks() {
        let response = page_response(200, &[], ASSET_PAGE);
        let page = Page::parse(&response);
        let report = analyze_performance(Some(&page), Some(0.5)).unwrap();

        assert_eq!(report.score, 100);
        assert!(report.issues.is_empty());
        let metrics = report.metrics.unwrap();
        assert_eq!(metrics.fcp_s, 0.4);
        assert_eq!(metrics.lcp_s, 0.6);
        assert_eq!(metrics.tti, 1.0);
        assert_eq!(metrics.requests_count, 1 + 1 + 1 + 2);
    }

    #[test]
    fn test_slow_page_loses_timing_credit() {
        let response = page_response(200, &[], "<p>slow</p>");
        let page = Page::parse(&response);
        let report = analyze_performance(Some(&page), Some(3.0)).unwrap();

        // Only CLS and FID survive
        assert_eq!(report.score, 35);
        assert_eq!(
            report.issues,
            vec![
                "High LCP: 3.6s".to_string(),
                "High FCP: 2.4s".to_string(),
                "High TTI: 6.0s".to_string(),
            ]
        );
    }

    #[test]
    fn test_missing_timing_uses_threshold_defaults() {
        let response = page_response(200, &[], "<p>x</p>");
        let page = Page::parse(&response);
        for elapsed in [None, Some(0.0)] {
            let report = analyze_performance(Some(&page), elapsed).unwrap();
            // Defaults sit on the thresholds, so strict comparisons fail
            assert_eq!(report.score, 35);
            assert_eq!(report.metrics.as_ref().unwrap().lcp_s, 2.5);
        }
    }

    #[test]
    fn test_page_size_in_kilobytes() {
        let body = "a".repeat(2048 + 512);
        let response = page_response(200, &[], &body);
        let page = Page::parse(&response);
        let report = analyze_performance(Some(&page), Some(0.2)).unwrap();
        assert_eq!(report.metrics.unwrap().page_size, 2.5);
    }

    #[test]
    fn test_unusable_response() {
        let report = analyze_performance(None, Some(0.2)).unwrap();
        assert_eq!(report.score, 0);
        assert_eq!(report.issues, vec!["Unable to analyze performance".to_string()]);

        let response = page_response(500, &[], "<p>x</p>");
        let page = Page::parse(&response);
        assert_eq!(analyze_performance(Some(&page), Some(0.2)).unwrap().score, 0);
    }
}
