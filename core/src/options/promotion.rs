//! Promotion management.

use super::pagination::{Paginated, Pagination};
use super::{Fields, Options, Params, RequestType};
use crate::error::Result;

/// Create or replace a promotion: `POST /promotions/save`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavePromotion {
    fields: Fields,
}

impl Default for SavePromotion {
    fn default() -> Self {
        Self {
            fields: Fields::new(&["promotion_name"]),
        }
    }
}

impl SavePromotion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn promotion_name(mut self, name: impl Into<String>) -> Self {
        self.fields.set("promotion_name", name);
        self
    }

    pub fn raw_html(mut self, html: impl Into<String>) -> Self {
        self.fields.set("raw_html", html);
        self
    }

    pub fn raw_plain_text(mut self, text: impl Into<String>) -> Self {
        self.fields.set("raw_plain_text", text);
        self
    }
}

impl Options for SavePromotion {
    fn name(&self) -> &'static str {
        "SavePromotion"
    }

    fn end_point(&self) -> Result<String> {
        Ok("/promotions/save".to_string())
    }

    fn request_type(&self) -> RequestType {
        RequestType::Post
    }

    fn populated(&self) -> Result<Params> {
        self.fields.populated()
    }
}

/// List the account's promotions: `GET /promotions.xml`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Promotions {
    pagination: Pagination,
}

impl Promotions {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Paginated for Promotions {
    fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    fn pagination_mut(&mut self) -> &mut Pagination {
        &mut self.pagination
    }
}

impl Options for Promotions {
    fn name(&self) -> &'static str {
        "Promotions"
    }

    fn end_point(&self) -> Result<String> {
        Ok("/promotions.xml".to_string())
    }

    fn request_type(&self) -> RequestType {
        RequestType::Get
    }

    fn populated(&self) -> Result<Params> {
        let mut params = Params::new();
        self.pagination.write_into(&mut params);
        Ok(params)
    }
}
