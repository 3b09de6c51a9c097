use scraper::{ElementRef, Html, Selector};

use crate::error::AuditError;
use crate::models::FetchResult;

/// A fetched response plus its parsed DOM, shared by all analyzers.
pub struct Page<'a> {
    response: &'a FetchResult,
    document: Html,
}

impl<'a> Page<'a> {
    pub fn parse(response: &'a FetchResult) -> Self {
        let document = Html::parse_document(&response.text());
        Self { response, document }
    }

    pub fn response(&self) -> &FetchResult {
        self.response
    }

    /// Only 2xx responses are worth scoring.
    pub fn is_usable(&self) -> bool {
        self.response.is_success()
    }

    /// Matching elements in document order.
    pub fn select(&self, css: &str) -> Result<Vec<ElementRef<'_>>, AuditError> {
        let selector = selector(css)?;
        Ok(self.document.select(&selector).collect())
    }

    pub fn count(&self, css: &str) -> Result<usize, AuditError> {
        let selector = selector(css)?;
        Ok(self.document.select(&selector).count())
    }

    pub fn exists(&self, css: &str) -> Result<bool, AuditError> {
        let selector = selector(css)?;
        Ok(self.document.select(&selector).next().is_some())
    }
}

fn selector(css: &str) -> Result<Selector, AuditError> {
    Selector::parse(css)
        .map_err(|e| AuditError::AnalysisFailure(format!("invalid selector {:?}: {}", css, e)))
}

/// Trimmed text content of an element.
pub fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
pub(crate) fn page_response(status: u16, headers: &[(&str, &str)], body: &str) -> FetchResult {
    use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

    let mut map = HeaderMap::new();
    for (name, value) in headers {
        map.insert(
            HeaderName::from_bytes(name.as_bytes()).unwrap(),
            HeaderValue::from_str(value).unwrap(),
        );
    }
    FetchResult {
        status_code: status,
        headers: map,
        body: body.as_bytes().to_vec(),
        elapsed_seconds: 0.5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_preserves_document_order() {
        let response = page_response(200, &[], "<h2>b</h2><h1>a</h1><h3>c</h3>");
        let page = Page::parse(&response);
        let names: Vec<_> = page
            .select("h1, h2, h3")
            .unwrap()
            .iter()
            .map(|e| e.value().name().to_string())
            .collect();
        assert_eq!(names, vec!["h2", "h1", "h3"]);
    }

    #[test]
    fn test_invalid_selector_is_analysis_failure() {
        let response = page_response(200, &[], "<p>x</p>");
        let page = Page::parse(&response);
        assert!(matches!(
            page.count("p[["),
            Err(AuditError::AnalysisFailure(_))
        ));
    }

    #[test]
    fn test_usable_only_for_success_status() {
        let ok = page_response(204, &[], "");
        let missing = page_response(404, &[], "");
        assert!(Page::parse(&ok).is_usable());
        assert!(!Page::parse(&missing).is_usable());
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.2345, 2), 1.23);
        assert_eq!(round_to(12.96, 1), 13.0);
    }
}
