//! Client configuration.
//!
//! `ClientConfig` is plain serde data so a host can read it from whatever
//! format it already uses. Only `username` and `api_key` are mandatory.

use serde::{Deserialize, Serialize};

use crate::classify::ErrorPolicy;
use crate::error::{MadMimiError, Result};

pub const API_URL: &str = "https://api.madmimi.com";

/// Account identity sent with every request.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub api_key: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            api_key: api_key.into(),
        }
    }
}

// The key never appears in debug output.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(flatten)]
    pub credentials: Credentials,
    #[serde(default)]
    pub policy: ErrorPolicy,
    /// Emit request/response traces through `tracing`.
    #[serde(default)]
    pub debug: bool,
}

fn default_base_url() -> String {
    API_URL.to_string()
}

impl ClientConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            base_url: default_base_url(),
            credentials,
            policy: ErrorPolicy::default(),
            debug: false,
        }
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Base URL without a trailing `/`, after checking it is an absolute
    /// http(s) URL with no query or fragment.
    pub fn normalized_base_url(&self) -> Result<String> {
        let parsed = url::Url::parse(&self.base_url).map_err(|e| {
            MadMimiError::Configuration(format!("invalid base url {:?}: {e}", self.base_url))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(MadMimiError::Configuration(format!(
                "base url must be http or https: {}",
                self.base_url
            )));
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(MadMimiError::Configuration(format!(
                "base url must not carry a query or fragment: {}",
                self.base_url
            )));
        }
        Ok(self.base_url.trim_end_matches('/').to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_with_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"username":"jo@example.com","api_key":"k"}"#).unwrap();
        assert_eq!(config.base_url, API_URL);
        assert_eq!(config.policy, ErrorPolicy::Full);
        assert!(!config.debug);
        assert_eq!(config.credentials, Credentials::new("jo@example.com", "k"));
    }

    #[test]
    fn deserializes_policy_name() {
        let config: ClientConfig = serde_json::from_str(
            r#"{"username":"u","api_key":"k","policy":"transactional","debug":true}"#,
        )
        .unwrap();
        assert_eq!(config.policy, ErrorPolicy::Transactional);
        assert!(config.debug);
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let config = ClientConfig::new(Credentials::new("u", "k")).base_url("http://localhost:3000/");
        assert_eq!(config.normalized_base_url().unwrap(), "http://localhost:3000");
    }

    #[test]
    fn rejects_bad_base_urls() {
        for bad in ["not a url", "ftp://example.com", "https://api.madmimi.com/?x=1"] {
            let config = ClientConfig::new(Credentials::new("u", "k")).base_url(bad);
            assert!(
                matches!(config.normalized_base_url(), Err(MadMimiError::Configuration(_))),
                "{bad}"
            );
        }
    }

    #[test]
    fn debug_output_hides_api_key() {
        let rendered = format!("{:?}", Credentials::new("u", "secret-key"));
        assert!(!rendered.contains("secret-key"));
    }
}
