use crate::error::AuditError;
use crate::models::{SeoDetails, SeoReport};
use crate::services::document::{element_text, Page};

/// On-page SEO signals: title, description, headings, links, robots, canonical.
pub fn analyze_seo(page: Option<&Page<'_>>) -> Result<SeoReport, AuditError> {
    let page = match page.filter(|p| p.is_usable()) {
        Some(page) => page,
        None => {
            return Ok(SeoReport {
                score: 0,
                details: None,
                issues: vec!["Unable to analyze SEO".to_string()],
            })
        }
    };

    let title = page
        .select("title")?
        .first()
        .map(element_text)
        .filter(|t| !t.is_empty());
    let title_length = title.as_ref().map_or(0, |t| t.chars().count());

    let meta_desc_length = page
        .select("meta[name=\"description\"]")?
        .first()
        .and_then(|meta| meta.value().attr("content"))
        .map_or(0, |content| content.trim().chars().count());

    let internal_links = page
        .select("a[href]")?
        .iter()
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| is_internal_link(href))
        .count();

    let h1_count = page.count("h1")?;
    let has_robots_meta = page.exists("meta[name=\"robots\"]")?;
    let has_canonical = page.exists("link[rel~=\"canonical\"]")?;

    let mut score = 0u32;
    let mut issues = Vec::new();

    if title_length > 10 && title_length < 60 {
        score += 20;
    } else {
        issues.push("Title missing or suboptimal length.".to_string());
    }
    if meta_desc_length > 50 && meta_desc_length < 160 {
        score += 20;
    } else {
        issues.push("Meta description missing or suboptimal length.".to_string());
    }
    if h1_count == 1 {
        score += 10;
    } else {
        issues.push("Incorrect number of H1 tags.".to_string());
    }
    if internal_links > 5 {
        score += 10;
    }
    if has_robots_meta {
        score += 10;
    }
    if has_canonical {
        score += 10;
    }

    Ok(SeoReport {
        score: score.min(100) as u8,
        details: Some(SeoDetails {
            title,
            title_length,
            meta_desc_length,
            h1_count,
            internal_links,
            has_robots_meta,
            has_canonical,
            keyword_density: None,
            backlinks: None,
            page_depth: None,
        }),
        issues,
    })
}

/// Relative links only: no absolute http(s), protocol-relative or fragment hrefs.
fn is_internal_link(href: &str) -> bool {
    let lower = href.trim().to_ascii_lowercase();
    !lower.is_empty()
        && !lower.starts_with("http:")
        && !lower.starts_with("https:")
        && !lower.starts_with("//")
        && !lower.starts_with('#')
}
