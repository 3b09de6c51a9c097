use crate::error::AuditError;
use crate::models::{SecurityReport, TlsInfo};
use crate::services::document::Page;

/// Headers checked on the response, with the short name used in reports.
const SECURITY_HEADERS: &[(&str, &str)] = &[
    ("Content-Security-Policy", "CSP"),
    ("Strict-Transport-Security", "HSTS"),
    ("X-Frame-Options", "XFO"),
    ("X-Content-Type-Options", "XCTO"),
    ("X-XSS-Protection", "XXSSP"),
    ("Referrer-Policy", "RP"),
];

/// Elements that pull in sub-resources.
const RESOURCE_SELECTOR: &str = "img[src], script[src], iframe[src], audio[src], video[src], \
     source[src], link[rel~=\"stylesheet\"][href], link[rel~=\"preload\"][href], \
     link[rel~=\"icon\"][href]";

const TLS_CREDIT: u32 = 40;
const HEADER_CREDIT: u32 = 10;
const MIXED_CONTENT_CREDIT: u32 = 10;

/// Score TLS validity, security headers and mixed content.
///
/// Without a response, mixed content cannot be observed and the credit is
/// granted anyway; header checks only run for 2xx responses.
pub fn analyze_security(
    page: Option<&Page<'_>>,
    tls: &TlsInfo,
) -> Result<SecurityReport, AuditError> {
    let mut score = 0u32;
    let mut issues = Vec::new();
    let mut present = Vec::new();

    if tls.valid {
        score += TLS_CREDIT;
    } else {
        issues.push("Invalid SSL/TLS certificate.".to_string());
    }

    if let Some(page) = page.filter(|p| p.is_usable()) {
        for (header, short) in SECURITY_HEADERS {
            if page.response().has_header(header) {
                score += HEADER_CREDIT;
                present.push(*short);
            } else {
                issues.push(format!("Missing {} header.", header));
            }
        }
    }

    let mixed_content = match page {
        Some(page) => has_mixed_content(page)?,
        None => false,
    };
    if mixed_content {
        issues.push("Mixed content detected.".to_string());
    } else {
        score += MIXED_CONTENT_CREDIT;
    }

    Ok(SecurityReport {
        score: score.min(100) as u8,
        ssl_valid: tls.valid,
        encryption_strength: tls.cipher_strength_bits,
        security_headers: if present.is_empty() {
            "None".to_string()
        } else {
            present.join(", ")
        },
        vulnerabilities: 0,
        certificate_expiry: tls.days_until_expiry,
        mixed_content,
        issues,
    })
}

fn has_mixed_content(page: &Page<'_>) -> Result<bool, AuditError> {
    Ok(page.select(RESOURCE_SELECTOR)?.iter().any(|element| {
        let value = element.value();
        value
            .attr("src")
            .or_else(|| value.attr("href"))
            .is_some_and(|url| url.starts_with("http://"))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::document::page_response;

    const ALL_HEADERS: &[(&str, &str)] = &[
        ("Content-Security-Policy", "default-src 'self'"),
        ("Strict-Transport-Security", "max-age=31536000"),
        ("X-Frame-Options", "DENY"),
        ("X-Content-Type-Options", "nosniff"),
        ("X-XSS-Protection", "1; mode=block"),
        ("Referrer-Policy", "no-referrer"),
    ];

    fn valid_tls() -> TlsInfo {
        TlsInfo {
            valid: true,
            issuer: Some("Let's Encrypt".to_string()),
            days_until_expiry: Some(60),
            cipher_strength_bits: Some(256),
        }
    }

    #[test]
    fn test_perfect_security_score() {
        let response = page_response(
            200,
            ALL_HEADERS,
            r#"<img src="https://cdn.example.com/a.png"><script src="/app.js"></script>"#,
        );
        let page = Page::parse(&response);
        let report = analyze_security(Some(&page), &valid_tls()).unwrap();

        assert_eq!(report.score, 100);
        assert!(report.issues.is_empty());
        assert_eq!(report.security_headers, "CSP, HSTS, XFO, XCTO, XXSSP, RP");
        assert_eq!(report.encryption_strength, Some(256));
        assert!(!report.mixed_content);
    }

    #[test]
    fn test_missing_headers_are_reported() {
        let response = page_response(200, &[("X-Frame-Options", "DENY")], "<p>hi</p>");
        let page = Page::parse(&response);
        let report = analyze_security(Some(&page), &valid_tls()).unwrap();

        assert_eq!(report.score, 40 + 10 + 10);
        assert_eq!(report.security_headers, "XFO");
        assert_eq!(report.issues.len(), 5);
        assert!(report
            .issues
            .contains(&"Missing Content-Security-Policy header.".to_string()));
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let response = page_response(200, &[("content-security-policy", "default-src *")], "");
        let page = Page::parse(&response);
        let report = analyze_security(Some(&page), &valid_tls()).unwrap();
        assert_eq!(report.security_headers, "CSP");
    }

    #[test]
    fn test_mixed_content_withholds_credit() {
        // Five of six headers: 40 + 50, plus 10 only without mixed content
        let headers = &ALL_HEADERS[..5];
        let clean = page_response(200, headers, r#"<img src="https://example.com/a.png">"#);
        let clean_report = analyze_security(Some(&Page::parse(&clean)), &valid_tls()).unwrap();
        assert!(!clean_report.mixed_content);
        assert_eq!(clean_report.score, 100);

        let mixed = page_response(
            200,
            headers,
            r#"<link rel="shortcut icon" href="http://example.com/favicon.ico">"#,
        );
        let report = analyze_security(Some(&Page::parse(&mixed)), &valid_tls()).unwrap();

        assert!(report.mixed_content);
        assert_eq!(report.score, 90);
        assert!(report
            .issues
            .contains(&"Mixed content detected.".to_string()));
    }

    #[test]
    fn test_mixed_content_is_hidden_by_cap_with_all_headers() {
        let response = page_response(
            200,
            ALL_HEADERS,
            r#"<link rel="stylesheet" href="http://example.com/a.css"><img src="http://example.com/b.png">"#,
        );
        let page = Page::parse(&response);
        let report = analyze_security(Some(&page), &valid_tls()).unwrap();

        assert!(report.mixed_content);
        assert_eq!(report.score, 100);
        assert_eq!(report.issues, vec!["Mixed content detected.".to_string()]);
    }

    #[test]
    fn test_plain_http_anchor_is_not_mixed_content() {
        let response = page_response(200, ALL_HEADERS, r#"<a href="http://example.com">x</a>"#);
        let page = Page::parse(&response);
        assert!(!analyze_security(Some(&page), &valid_tls()).unwrap().mixed_content);
    }

    #[test]
    fn test_no_response_grants_mixed_content_credit() {
        let report = analyze_security(None, &TlsInfo::invalid()).unwrap();
        assert_eq!(report.score, 10);
        assert!(!report.ssl_valid);
        assert!(!report.mixed_content);
        assert_eq!(report.security_headers, "None");
        assert_eq!(report.issues, vec!["Invalid SSL/TLS certificate.".to_string()]);
    }

    #[test]
    fn test_error_status_skips_header_checks() {
        let response = page_response(
            404,
            ALL_HEADERS,
            r#"<script src="http://example.com/a.js"></script>"#,
        );
        let page = Page::parse(&response);
        let report = analyze_security(Some(&page), &valid_tls()).unwrap();

        assert_eq!(report.security_headers, "None");
        assert!(report.mixed_content);
        assert_eq!(report.score, 40);
    }

    #[test]
    fn test_expired_certificate_still_counts_as_valid() {
        let tls = TlsInfo {
            days_until_expiry: Some(-12),
            ..valid_tls()
        };
        let report = analyze_security(None, &tls).unwrap();
        assert!(report.ssl_valid);
        assert_eq!(report.certificate_expiry, Some(-12));
        assert_eq!(report.score, 50);
    }
}
