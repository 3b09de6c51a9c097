use crate::error::AuditError;
use crate::models::{AccessibilityDetails, AccessibilityReport};
use crate::services::document::{round_to, Page};

/// Pages start from a charitable baseline rather than zero.
const BASE_SCORE: u32 = 50;
const ALT_COVERAGE_THRESHOLD: f64 = 90.0;

pub fn analyze_accessibility(page: Option<&Page<'_>>) -> Result<AccessibilityReport, AuditError> {
    let page = match page.filter(|p| p.is_usable()) {
        Some(page) => page,
        None => {
            return Ok(AccessibilityReport {
                score: 0,
                details: None,
                issues: vec!["Unable to analyze accessibility".to_string()],
            })
        }
    };

    let images = page.select("img")?;
    let with_alt = images
        .iter()
        .filter(|img| img.value().attr("alt").is_some_and(|alt| !alt.trim().is_empty()))
        .count();
    // No images means nothing is missing
    let alt_text_coverage = if images.is_empty() {
        100.0
    } else {
        round_to(with_alt as f64 / images.len() as f64 * 100.0, 1)
    };

    let aria_elements = page.count("[aria-label][role]")?;
    // Includes the html, head and body elements the parser always supplies
    let total_elements = page.count("*")?.max(1);
    let aria_usage = round_to(aria_elements as f64 / total_elements as f64 * 100.0, 1);

    let has_main_landmark = page.exists("main, [role=\"main\"]")?;
    let proper_heading_order = page
        .select("h1, h2, h3, h4, h5, h6")?
        .first()
        .is_some_and(|h| h.value().name() == "h1");

    let keyboard_nav = if page.exists("a[href]")? {
        "Supported"
    } else {
        "Limited"
    };

    let mut score = BASE_SCORE;
    let mut issues = Vec::new();

    if alt_text_coverage > ALT_COVERAGE_THRESHOLD {
        score += 20;
    } else {
        issues.push(format!("Low alt text coverage: {:?}%", alt_text_coverage));
    }
    if aria_elements > 0 {
        score += 10;
    }
    if has_main_landmark {
        score += 10;
    }
    if proper_heading_order {
        score += 10;
    } else {
        issues.push("Improper heading structure.".to_string());
    }

    Ok(AccessibilityReport {
        score: score.min(100) as u8,
        details: Some(AccessibilityDetails {
            alt_text_coverage,
            aria_usage,
            has_main_landmark,
            proper_heading_order,
            keyboard_nav: keyboard_nav.to_string(),
            screen_reader: "Basic compatibility".to_string(),
            contrast_ratio: None,
            color_blind_compatibility: None,
        }),
        issues,
    })
}
