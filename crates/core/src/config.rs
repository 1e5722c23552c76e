//! Client runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into the client and gateway.
//! Nothing in this crate reads environment variables while a submission is running.

use crate::constants::{DEFAULT_DIAGNOSE_URL, DEFAULT_TIMEOUT_SECS};
use crate::{DiagError, DiagResult};
use std::time::Duration;

/// Client configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    diagnose_url: String,
    timeout: Duration,
}

impl ClientConfig {
    /// Create a new `ClientConfig`.
    ///
    /// The URL must be an absolute `http://` or `https://` URL and the timeout must be non-zero.
    pub fn new(diagnose_url: impl Into<String>, timeout: Duration) -> DiagResult<Self> {
        let diagnose_url = diagnose_url.into().trim().to_string();

        if diagnose_url.is_empty() {
            return Err(DiagError::InvalidInput(
                "diagnose URL cannot be empty".into(),
            ));
        }

        if !(diagnose_url.starts_with("http://") || diagnose_url.starts_with("https://")) {
            return Err(DiagError::InvalidInput(format!(
                "diagnose URL must start with http:// or https://: {diagnose_url}"
            )));
        }

        if timeout.is_zero() {
            return Err(DiagError::InvalidInput("timeout must be non-zero".into()));
        }

        Ok(Self {
            diagnose_url,
            timeout,
        })
    }

    pub fn diagnose_url(&self) -> &str {
        &self.diagnose_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            diagnose_url: DEFAULT_DIAGNOSE_URL.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Resolve the diagnose URL from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default endpoint.
pub fn diagnose_url_from_env_value(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_DIAGNOSE_URL.into())
}

/// Parse the request timeout (whole seconds) from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default timeout.
pub fn timeout_from_env_value(value: Option<String>) -> DiagResult<Duration> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    let Some(value) = value else {
        return Ok(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    };

    let secs: u64 = value.parse().map_err(|_| {
        DiagError::InvalidInput(format!("timeout must be a whole number of seconds: {value}"))
    })?;

    if secs == 0 {
        return Err(DiagError::InvalidInput("timeout must be non-zero".into()));
    }

    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_empty_and_non_http_urls() {
        assert!(ClientConfig::new("   ", Duration::from_secs(1)).is_err());
        assert!(ClientConfig::new("ftp://host/api", Duration::from_secs(1)).is_err());
        assert!(ClientConfig::new("/api/diagnose", Duration::from_secs(1)).is_err());
    }

    #[test]
    fn new_rejects_zero_timeout() {
        let err = ClientConfig::new("http://localhost/api/diagnose", Duration::ZERO).unwrap_err();
        assert!(matches!(err, DiagError::InvalidInput(_)));
    }

    #[test]
    fn new_trims_url() {
        let cfg = ClientConfig::new(" https://diag.example/api/diagnose ", Duration::from_secs(5))
            .unwrap();
        assert_eq!(cfg.diagnose_url(), "https://diag.example/api/diagnose");
        assert_eq!(cfg.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn url_env_value_falls_back_to_default() {
        assert_eq!(diagnose_url_from_env_value(None), DEFAULT_DIAGNOSE_URL);
        assert_eq!(
            diagnose_url_from_env_value(Some("  ".into())),
            DEFAULT_DIAGNOSE_URL
        );
        assert_eq!(
            diagnose_url_from_env_value(Some("http://x/api/diagnose".into())),
            "http://x/api/diagnose"
        );
    }

    #[test]
    fn timeout_env_value_parsing() {
        assert_eq!(
            timeout_from_env_value(None).unwrap(),
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        );
        assert_eq!(
            timeout_from_env_value(Some(" 7 ".into())).unwrap(),
            Duration::from_secs(7)
        );
        assert!(timeout_from_env_value(Some("0".into())).is_err());
        assert!(timeout_from_env_value(Some("soon".into())).is_err());
    }
}
