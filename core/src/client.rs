//! Stateless request builder and response interpreter for the MadMimi API.
//!
//! # Design
//! `Client` holds credentials, the base URL, the error policy and a debug
//! sink, none of which change after construction. An operation is split in
//! two: `build_request` turns an `Options` value into an `HttpRequest`, and
//! `parse_response` turns the outcome of executing it into the body or a
//! `MadMimiError`. The round-trip in between belongs to the caller, or to a
//! `Connection` wrapping a `Transport`.

use std::fmt;
use std::sync::Arc;

use crate::classify::{self, ErrorPolicy};
use crate::config::{ClientConfig, Credentials};
use crate::error::{MadMimiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, TransportError, FORM_CONTENT_TYPE};
use crate::log::{self, trace, DebugLog, NoopLog};
use crate::options::Options;

pub const USERNAME_KEY: &str = "username";
pub const API_KEY_KEY: &str = "api_key";

#[derive(Clone)]
pub struct Client {
    base_url: String,
    credentials: Credentials,
    policy: ErrorPolicy,
    log: Arc<dyn DebugLog>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Client for the public API with the full error policy and no tracing.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            base_url: crate::config::API_URL.to_string(),
            credentials,
            policy: ErrorPolicy::Full,
            log: Arc::new(NoopLog),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            base_url: config.normalized_base_url()?,
            credentials: config.credentials.clone(),
            policy: config.policy,
            log: log::for_debug_flag(config.debug),
        })
    }

    pub fn with_log(mut self, log: Arc<dyn DebugLog>) -> Self {
        self.log = log;
        self
    }

    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn log(&self) -> &dyn DebugLog {
        self.log.as_ref()
    }

    /// Credentials first, then the populated option fields, form-encoded.
    pub fn encode_params(&self, options: &dyn Options) -> Result<String> {
        let populated = options.populated()?;
        for key in [USERNAME_KEY, API_KEY_KEY] {
            if populated.contains_key(key) {
                return Err(MadMimiError::Configuration(format!(
                    "{} sets {key:?}, which is reserved for credentials",
                    options.name()
                )));
            }
        }

        let mut pairs: Vec<(&str, &str)> = Vec::with_capacity(populated.len() + 2);
        pairs.push((USERNAME_KEY, &self.credentials.username));
        pairs.push((API_KEY_KEY, &self.credentials.api_key));
        pairs.extend(populated.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        serde_urlencoded::to_string(&pairs)
            .map_err(|e| MadMimiError::Configuration(format!("cannot encode parameters: {e}")))
    }

    pub fn build_request(&self, options: &dyn Options) -> Result<HttpRequest> {
        let end_point = options.end_point()?;
        let method = options.request_type();
        trace(self.log(), || {
            format!(
                "About to send to {end_point} via {method} with options of {}",
                options.name()
            )
        });

        let query = self.encode_params(options)?;
        trace(self.log(), || format!("Query: {query}"));

        let mut url = format!("{}{end_point}", self.base_url);
        let request = if method == HttpMethod::Get {
            url.push('?');
            url.push_str(&query);
            HttpRequest {
                method,
                url,
                headers: Vec::new(),
                body: None,
            }
        } else {
            HttpRequest {
                method,
                url,
                headers: vec![("content-type".to_string(), FORM_CONTENT_TYPE.to_string())],
                body: Some(query),
            }
        };
        trace(self.log(), || format!("Url: {}", request.url));
        Ok(request)
    }

    /// Classify the outcome of executing a request built by this client.
    pub fn parse_response(
        &self,
        outcome: std::result::Result<HttpResponse, TransportError>,
    ) -> Result<String> {
        trace(self.log(), || match &outcome {
            Ok(response) => format!(
                "Transport info: status={} content_type={:?} headers={:?}",
                response.status,
                response.content_type(),
                response.headers
            ),
            Err(err) => format!("Transport info: {err}"),
        });
        if let Ok(response) = &outcome {
            trace(self.log(), || format!("Body content: {}", response.body));
        }

        let body = classify::classify(self.policy, &outcome)?;
        trace(self.log(), || format!("Successful call with result: {body}"));
        Ok(body)
    }
}
