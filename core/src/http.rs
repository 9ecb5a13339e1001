//! HTTP transport types and the transport capability.
//!
//! # Design
//! Requests and responses are plain data. `Client` builds an `HttpRequest`
//! and interprets the outcome of executing it without ever touching the
//! network; executing the round-trip is the job of a `Transport`
//! implementation supplied by the host (or, across the C boundary, of the
//! host itself).
//!
//! All fields use owned types (`String`, `Vec`) so values can cross FFI
//! boundaries without lifetime concerns.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Content type used for every request that carries a body.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// Built by `Client::build_request`. GET requests carry their parameters in
/// the query string of `url` and have no body; every other method carries
/// them form-encoded in `body`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.headers
            .push(("content-type".to_string(), content_type.into()));
        self
    }

    /// First `content-type` header, matched case-insensitively.
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
            .map(|(_, value)| value.as_str())
    }
}

/// A failure below HTTP: DNS, connect, TLS, timeout.
///
/// `code` is the transport's own error number (curl-style numbering is used
/// by the constants below) and is surfaced unchanged in `MadMimiError::Transfer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    pub message: String,
    pub code: i64,
}

impl TransportError {
    pub const COULDNT_RESOLVE_HOST: i64 = 6;
    pub const COULDNT_CONNECT: i64 = 7;
    pub const OPERATION_TIMEDOUT: i64 = 28;
    pub const RECV_ERROR: i64 = 56;

    pub fn new(message: impl Into<String>, code: i64) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transport error {}: {}", self.code, self.message)
    }
}

/// Executes one HTTP round-trip.
///
/// Non-2xx statuses are data, not errors: implementations must return them
/// as `Ok(HttpResponse)` and reserve `Err` for failures where no HTTP
/// response was received. Redirects must not be followed, since a 302 is a
/// meaningful answer from the provider.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}
