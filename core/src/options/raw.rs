//! Options for end points without a dedicated variant.
//!
//! Used by the C interface, where the host supplies the path, method and
//! fields as strings.

use super::{Fields, Options, Params, RequestType};
use crate::error::{MadMimiError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOptions {
    end_point: String,
    method: RequestType,
    fields: Fields,
}

impl RawOptions {
    pub fn new(end_point: impl Into<String>, method: RequestType) -> Self {
        Self {
            end_point: end_point.into(),
            method,
            fields: Fields::default(),
        }
    }

    /// Declare fields that `populated` must find set.
    pub fn require(mut self, required: &[&str]) -> Self {
        self.fields.require(required);
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.set(name, value);
        self
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }
}

impl Options for RawOptions {
    fn name(&self) -> &'static str {
        "RawOptions"
    }

    fn end_point(&self) -> Result<String> {
        if !self.end_point.starts_with('/') {
            return Err(MadMimiError::Configuration(format!(
                "end point must start with '/': {:?}",
                self.end_point
            )));
        }
        Ok(self.end_point.clone())
    }

    fn request_type(&self) -> RequestType {
        self.method
    }

    fn populated(&self) -> Result<Params> {
        self.fields.populated()
    }
}
