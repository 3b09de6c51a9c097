use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Color, Table};

use crate::models::*;
use crate::output::colors::*;

/// Format an audit report for the terminal
pub fn format_audit_report(report: &AuditReport) -> String {
    let mut output = String::new();

    output.push_str(&main_header(&format!("Page Audit: {}", report.url)));
    output.push_str(&format!(
        "Grade: {}    Score: {}/100    Mode: {}\n",
        format_grade(report.overall.grade),
        format_score(report.overall.score),
        report.mode
    ));
    output.push_str(&format!(
        "Response: {}    Duration: {}s    Audited: {}\n\n",
        report
            .overall
            .response_time_ms
            .map(|ms| format!("{} ms", ms))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        report.overall.audit_duration,
        report.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    // Category scores
    output.push_str(&section_header("Scores"));
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        Cell::new("Category"),
        Cell::new("Score").set_alignment(CellAlignment::Right),
        Cell::new("Issues").set_alignment(CellAlignment::Right),
    ]);
    for (name, score, issues) in [
        ("Security", report.security.score, report.security.issues.len()),
        (
            "Performance",
            report.performance.score,
            report.performance.issues.len(),
        ),
        ("SEO", report.seo.score, report.seo.issues.len()),
        (
            "Accessibility",
            report.accessibility.score,
            report.accessibility.issues.len(),
        ),
    ] {
        table.add_row(vec![
            Cell::new(name),
            score_cell(score),
            Cell::new(issues.to_string()).set_alignment(CellAlignment::Right),
        ]);
    }
    output.push_str(&table.to_string());
    output.push_str("\n\n");

    // TLS
    output.push_str(&section_header("Certificate"));
    output.push_str(&format!("  Valid:       {}\n", format_check(report.tls.valid)));
    if let Some(issuer) = &report.tls.issuer {
        output.push_str(&format!("  Issuer:      {}\n", issuer));
    }
    if let Some(days) = report.tls.days_until_expiry {
        output.push_str(&format!("  Days Left:   {}\n", format_days_remaining(days)));
    }
    if let Some(bits) = report.tls.cipher_strength_bits {
        output.push_str(&format!("  Cipher:      {}-bit\n", bits));
    }
    output.push_str(&format!(
        "  Headers:     {}\n",
        report.security.security_headers
    ));
    output.push_str(&format!(
        "  Mixed:       {}\n\n",
        format_check(!report.security.mixed_content)
    ));

    // Performance
    if let Some(metrics) = &report.performance.metrics {
        output.push_str(&section_header("Performance (estimated)"));
        output.push_str(&format!(
            "  LCP: {}s   FCP: {}s   TTI: {}s   CLS: {}   FID: {}ms\n",
            metrics.lcp_s, metrics.fcp_s, metrics.tti, metrics.cls, metrics.fid
        ));
        output.push_str(&format!(
            "  Page size: {} KB   Requests: {}\n\n",
            metrics.page_size, metrics.requests_count
        ));
    }

    // SEO
    if let Some(seo) = &report.seo.details {
        output.push_str(&section_header("SEO"));
        output.push_str(&format!(
            "  Title:       {}\n",
            seo.title.as_deref().unwrap_or(NOT_AVAILABLE)
        ));
        output.push_str(&format!(
            "  H1 tags: {}   Internal links: {}   Robots: {}   Canonical: {}\n\n",
            seo.h1_count,
            seo.internal_links,
            format_check(seo.has_robots_meta),
            format_check(seo.has_canonical)
        ));
    }

    // Accessibility
    if let Some(a11y) = &report.accessibility.details {
        output.push_str(&section_header("Accessibility"));
        output.push_str(&format!(
            "  Alt text: {}%   ARIA: {}%   Main landmark: {}   Keyboard: {}\n\n",
            a11y.alt_text_coverage,
            a11y.aria_usage,
            format_check(a11y.has_main_landmark),
            a11y.keyboard_nav
        ));
    }

    // Issues
    if !report.issues.is_empty() {
        output.push_str(&section_header("Issues"));
        for issue in &report.issues {
            output.push_str(&format!("  {} {}\n", "->".yellow(), issue));
        }
        output.push('\n');
    }

    output
}

fn score_cell(score: u8) -> Cell {
    let color = match Grade::from_score(score) {
        Grade::A | Grade::B => Color::Green,
        Grade::C | Grade::D => Color::Yellow,
        Grade::F => Color::Red,
    };
    Cell::new(score.to_string())
        .fg(color)
        .set_alignment(CellAlignment::Right)
}
