use url::{Host, Url};

/// Turn user input into a fetchable absolute URL.
///
/// Returns `None` for empty input, unparsable strings and URLs without a
/// host. Callers treat `None` as "invalid URL" and abort the audit.
pub fn normalize_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let candidate = if has_http_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let parsed = Url::parse(&candidate).ok()?;
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Some(parsed.to_string()),
        _ => None,
    }
}

fn has_http_scheme(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Best-effort host for TLS inspection. Falls back to splitting on `//`
/// and `/` so malformed input still yields something to connect to.
pub fn hostname_from_url(url: &str) -> String {
    match Url::parse(url).ok().and_then(|u| u.host().map(|h| h.to_owned())) {
        Some(Host::Domain(domain)) => domain,
        Some(Host::Ipv4(addr)) => addr.to_string(),
        Some(Host::Ipv6(addr)) => addr.to_string(),
        None => url
            .rsplit("//")
            .next()
            .and_then(|rest| rest.split('/').next())
            .unwrap_or(url)
            .to_string(),
    }
}
