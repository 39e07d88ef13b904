use std::env;

use reqwest::Url;

use crate::error::OrchestratorError;

/// Environment variable holding the backend endpoint.
pub const WEBAPI_URL: &str = "WEBAPI_URL";

/// Connection settings of the HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub endpoint: String,
    /// Honor the `HTTP_PROXY` family of variables.
    pub use_proxy: bool,
}

impl ClientConfig {
    /// Validates an endpoint URL.
    ///
    /// # Errors
    /// Returns `OrchestratorError::InvalidConfig` unless the URL parses as an
    /// http(s) URL with a host.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, OrchestratorError> {
        let endpoint = endpoint.into().trim().to_string();
        let invalid = |reason: String| {
            OrchestratorError::InvalidConfig(format!("endpoint '{endpoint}': {reason}"))
        };

        let url = Url::parse(&endpoint).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", url.scheme())));
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(invalid("missing host".to_string()));
        }

        Ok(Self {
            endpoint,
            use_proxy: true,
        })
    }

    /// Connects directly, ignoring any proxy configured in the environment.
    pub fn without_proxy(self) -> Self {
        Self {
            use_proxy: false,
            ..self
        }
    }

    /// Reads the endpoint from `WEBAPI_URL`.
    pub fn from_env() -> Result<Self, OrchestratorError> {
        let endpoint = env::var(WEBAPI_URL)
            .map_err(|e| OrchestratorError::InvalidConfig(format!("{WEBAPI_URL}: {e}")))?;
        Self::new(endpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_urls() {
        let cfg = ClientConfig::new(" http://localhost:8000/api ").unwrap();
        assert_eq!(cfg.endpoint, "http://localhost:8000/api");
        assert!(ClientConfig::new("https://ml.example.com").is_ok());
    }

    #[test]
    fn rejects_anything_else() {
        for url in [
            "",
            "localhost:8000",
            "ftp://host",
            "http://",
            "http://exa mple.com/api",
            "http://:80",
            "http://[::1",
            "mailto:ops@example.com",
        ] {
            assert!(
                matches!(ClientConfig::new(url), Err(OrchestratorError::InvalidConfig(_))),
                "{url}"
            );
        }
    }
}
