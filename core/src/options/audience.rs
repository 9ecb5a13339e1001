//! Audience lists and memberships.

use super::{encode_segment, require_id, Fields, Options, Params, RequestType};
use crate::error::Result;

/// All audience lists: `GET /audience_lists/lists.xml`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lists;

impl Options for Lists {
    fn name(&self) -> &'static str {
        "Lists"
    }

    fn end_point(&self) -> Result<String> {
        Ok("/audience_lists/lists.xml".to_string())
    }

    fn request_type(&self) -> RequestType {
        RequestType::Get
    }

    fn populated(&self) -> Result<Params> {
        Ok(Params::new())
    }
}

/// `POST /audience_lists`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateList {
    fields: Fields,
}

impl Default for CreateList {
    fn default() -> Self {
        Self {
            fields: Fields::new(&["name"]),
        }
    }
}

impl CreateList {
    pub fn new(name: impl Into<String>) -> Self {
        Self::default().list(name)
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn list(mut self, name: impl Into<String>) -> Self {
        self.fields.set("name", name);
        self
    }
}

impl Options for CreateList {
    fn name(&self) -> &'static str {
        "CreateList"
    }

    fn end_point(&self) -> Result<String> {
        Ok("/audience_lists".to_string())
    }

    fn request_type(&self) -> RequestType {
        RequestType::Post
    }

    fn populated(&self) -> Result<Params> {
        self.fields.populated()
    }
}

/// `DELETE /audience_lists/{name}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteList {
    list: Option<String>,
}

impl DeleteList {
    pub fn new(list: impl Into<String>) -> Self {
        Self {
            list: Some(list.into()),
        }
    }
}

impl Options for DeleteList {
    fn name(&self) -> &'static str {
        "DeleteList"
    }

    fn end_point(&self) -> Result<String> {
        let list = require_id(&self.list, "list name", self.name())?;
        Ok(format!("/audience_lists/{}", encode_segment(list)))
    }

    fn request_type(&self) -> RequestType {
        RequestType::Delete
    }

    fn populated(&self) -> Result<Params> {
        Ok(Params::new())
    }
}

/// Whether a membership change adds or removes the address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipChange {
    Add,
    Remove,
}

/// `POST /audience_lists/{name}/add` or `/remove`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    change: MembershipChange,
    list: Option<String>,
    fields: Fields,
}

impl Membership {
    fn new(change: MembershipChange) -> Self {
        Self {
            change,
            list: None,
            fields: Fields::new(&["email"]),
        }
    }

    pub fn add() -> Self {
        Self::new(MembershipChange::Add)
    }

    pub fn remove() -> Self {
        Self::new(MembershipChange::Remove)
    }

    pub fn change(&self) -> MembershipChange {
        self.change
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn list(mut self, list: impl Into<String>) -> Self {
        self.list = Some(list.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.fields.set("email", email);
        self
    }
}

impl Options for Membership {
    fn name(&self) -> &'static str {
        match self.change {
            MembershipChange::Add => "AddMembership",
            MembershipChange::Remove => "RemoveMembership",
        }
    }

    fn end_point(&self) -> Result<String> {
        let list = require_id(&self.list, "list name", self.name())?;
        let action = match self.change {
            MembershipChange::Add => "add",
            MembershipChange::Remove => "remove",
        };
        Ok(format!("/audience_lists/{}/{action}", encode_segment(list)))
    }

    fn request_type(&self) -> RequestType {
        RequestType::Post
    }

    fn populated(&self) -> Result<Params> {
        self.fields.populated()
    }
}

/// Lists an address belongs to: `GET /audience_members/{email}/lists.xml`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberLists {
    email: Option<String>,
}

impl MemberLists {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
        }
    }
}

impl Options for MemberLists {
    fn name(&self) -> &'static str {
        "MemberLists"
    }

    fn end_point(&self) -> Result<String> {
        let email = require_id(&self.email, "member email", self.name())?;
        Ok(format!("/audience_members/{}/lists.xml", encode_segment(email)))
    }

    fn request_type(&self) -> RequestType {
        RequestType::Get
    }

    fn populated(&self) -> Result<Params> {
        Ok(Params::new())
    }
}

/// `GET /audience_members/search.xml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMembers {
    fields: Fields,
}

impl Default for SearchMembers {
    fn default() -> Self {
        Self {
            fields: Fields::new(&["query"]),
        }
    }
}

impl SearchMembers {
    pub fn new(query: impl Into<String>) -> Self {
        Self::default().query(query)
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.fields.set("query", query);
        self
    }

    /// Return every attribute instead of the default summary.
    pub fn raw(mut self, raw: bool) -> Self {
        self.fields.set_flag("raw", raw);
        self
    }

    /// Add every match to this list.
    pub fn add_list(mut self, list: impl Into<String>) -> Self {
        self.fields.set("add_list", list);
        self
    }
}

impl Options for SearchMembers {
    fn name(&self) -> &'static str {
        "SearchMembers"
    }

    fn end_point(&self) -> Result<String> {
        Ok("/audience_members/search.xml".to_string())
    }

    fn request_type(&self) -> RequestType {
        RequestType::Get
    }

    fn populated(&self) -> Result<Params> {
        self.fields.populated()
    }
}
