use thiserror::Error;

/// Terminal failures of an audit invocation.
///
/// TLS problems are deliberately absent: they degrade into an invalid
/// certificate state inside the security report instead of aborting.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Invalid URL: {0:?}")]
    InvalidUrl(String),
    #[error("Failed to fetch URL {url} after {attempts} attempts")]
    FetchExhausted { url: String, attempts: usize },
    #[error("Analysis failed: {0}")]
    AnalysisFailure(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl AuditError {
    /// Message suitable for showing to the person who requested the audit.
    pub fn user_message(&self) -> String {
        match self {
            AuditError::InvalidUrl(_) => "URL required".to_string(),
            AuditError::FetchExhausted { .. } => "Failed to fetch URL".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_hides_internals_for_fetch_failure() {
        let err = AuditError::FetchExhausted {
            url: "https://example.com".to_string(),
            attempts: 12,
        };
        assert_eq!(err.user_message(), "Failed to fetch URL");
        assert!(err.to_string().contains("12 attempts"));
    }

    #[test]
    fn test_analysis_failure_keeps_cause() {
        let err = AuditError::AnalysisFailure("bad selector".to_string());
        assert_eq!(err.user_message(), "Analysis failed: bad selector");
    }
}
