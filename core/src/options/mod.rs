//! Per-operation parameter containers.
//!
//! # Design
//! Every provider operation is an `Options` value: it knows its end point,
//! its HTTP method and which of its fields are required. Variants are plain
//! data assembled from small parts instead of a class hierarchy:
//!
//! - `Fields` holds the caller-set parameters and the required-name list.
//! - `Pagination` (via the `Paginated` trait) adds `page` / `per_page`.
//! - `MailingIds` (via the `Mailing` trait) adds the promotion and mailing
//!   identifiers that stats end points are keyed by.
//!
//! `populated()` only ever returns fields that were explicitly set.

pub mod audience;
pub mod pagination;
pub mod promotion;
pub mod raw;
pub mod stats;
pub mod transactional;

use std::collections::BTreeMap;

use crate::error::{MadMimiError, Result};
use crate::http::HttpMethod;

pub use pagination::{Paginated, Pagination};
pub use raw::RawOptions;
pub use stats::{Mailing, MailingIds};

/// Parameter set produced by `Options::populated`.
pub type Params = BTreeMap<String, String>;

/// Method an options variant is sent with.
pub type RequestType = HttpMethod;

/// One provider operation, ready to be sent by a `Client` or `Connection`.
pub trait Options {
    /// Variant name, used in debug traces.
    fn name(&self) -> &'static str;

    /// Path below the API base URL. Fails with `Configuration` when an
    /// identifier the path needs was never set.
    fn end_point(&self) -> Result<String>;

    fn request_type(&self) -> RequestType;

    /// The fields that were set, after checking that every required field is.
    fn populated(&self) -> Result<Params>;
}

/// Marker for the variants the transactional mailer accepts.
pub trait TransactionalOptions: Options {}

/// Caller-set parameters plus the names that must be present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields {
    required: Vec<String>,
    values: Params,
}

impl Fields {
    pub fn new(required: &[&str]) -> Self {
        Self {
            required: required.iter().map(|name| name.to_string()).collect(),
            values: Params::new(),
        }
    }

    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Mark more names as required. Names already required are skipped.
    pub fn require(&mut self, names: &[&str]) -> &mut Self {
        for name in names {
            if !self.required.iter().any(|known| known == name) {
                self.required.push(name.to_string());
            }
        }
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn set_flag(&mut self, name: impl Into<String>, value: bool) -> &mut Self {
        self.set(name, if value { "true" } else { "false" })
    }

    pub fn unset(&mut self, name: &str) -> Option<String> {
        self.values.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Names of required fields that have not been set, in declaration order.
    pub fn missing(&self) -> Vec<String> {
        self.required
            .iter()
            .filter(|name| !self.values.contains_key(name.as_str()))
            .cloned()
            .collect()
    }

    pub fn populated(&self) -> Result<Params> {
        let missing = self.missing();
        if !missing.is_empty() {
            return Err(MadMimiError::MissingRequiredField { fields: missing });
        }
        Ok(self.values.clone())
    }
}

/// Percent-encode one path segment. Spaces become `%20`, not `+`.
pub(crate) fn encode_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Fetch an identifier the end point needs, or explain which one is missing.
pub(crate) fn require_id<'a>(id: &'a Option<String>, what: &str, variant: &str) -> Result<&'a str> {
    match id.as_deref() {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(MadMimiError::Configuration(format!(
            "{variant} needs a {what} before its end point can be built"
        ))),
    }
}
