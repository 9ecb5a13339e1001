//! Transactional mailer operations.

use super::{encode_segment, require_id, Fields, Options, Params, RequestType, TransactionalOptions};
use crate::error::Result;

/// Send one promotion to one recipient: `POST /mailer`.
///
/// The provider answers with a plain-text transaction id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mailer {
    fields: Fields,
}

impl Default for Mailer {
    fn default() -> Self {
        Self {
            fields: Fields::new(&["promotion_name", "recipient"]),
        }
    }
}

impl Mailer {
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

    /// `Name <address>` or a bare address.
    pub fn recipient(mut self, recipient: impl Into<String>) -> Self {
        self.fields.set("recipient", recipient);
        self
    }

    pub fn from(mut self, from: impl Into<String>) -> Self {
        self.fields.set("from", from);
        self
    }

    pub fn bcc(mut self, bcc: impl Into<String>) -> Self {
        self.fields.set("bcc", bcc);
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.fields.set("subject", subject);
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

    /// YAML map of placeholder values.
    pub fn body(mut self, yaml: impl Into<String>) -> Self {
        self.fields.set("body", yaml);
        self
    }

    /// Also add the recipient to this audience list.
    pub fn list_name(mut self, list: impl Into<String>) -> Self {
        self.fields.set("list_name", list);
        self
    }

    pub fn check_suppressed(mut self, check: bool) -> Self {
        self.fields.set_flag("check_suppressed", check);
        self
    }

    pub fn track_links(mut self, track: bool) -> Self {
        self.fields.set_flag("track_links", track);
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.fields.set_flag("hidden", hidden);
        self
    }

    pub fn skip_placeholders(mut self, skip: bool) -> Self {
        self.fields.set_flag("skip_placeholders", skip);
        self
    }

    pub fn remove_unsubscribe(mut self, remove: bool) -> Self {
        self.fields.set_flag("remove_unsubscribe", remove);
        self
    }
}

impl Options for Mailer {
    fn name(&self) -> &'static str {
        "Mailer"
    }

    fn end_point(&self) -> Result<String> {
        Ok("/mailer".to_string())
    }

    fn request_type(&self) -> RequestType {
        RequestType::Post
    }

    fn populated(&self) -> Result<Params> {
        self.fields.populated()
    }
}

impl TransactionalOptions for Mailer {}

/// Send one promotion to every member of a list: `POST /mailer/to_list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailerToList {
    fields: Fields,
}

impl Default for MailerToList {
    fn default() -> Self {
        Self {
            fields: Fields::new(&["promotion_name", "list_name"]),
        }
    }
}

impl MailerToList {
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

    /// One list name, or several separated by commas.
    pub fn list_name(mut self, list: impl Into<String>) -> Self {
        self.fields.set("list_name", list);
        self
    }

    pub fn from(mut self, from: impl Into<String>) -> Self {
        self.fields.set("from", from);
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.fields.set("subject", subject);
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

    pub fn body(mut self, yaml: impl Into<String>) -> Self {
        self.fields.set("body", yaml);
        self
    }
}

impl Options for MailerToList {
    fn name(&self) -> &'static str {
        "MailerToList"
    }

    fn end_point(&self) -> Result<String> {
        Ok("/mailer/to_list".to_string())
    }

    fn request_type(&self) -> RequestType {
        RequestType::Post
    }

    fn populated(&self) -> Result<Params> {
        self.fields.populated()
    }
}

impl TransactionalOptions for MailerToList {}

/// Delivery status of a transactional send: `GET /mailers/status/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailerStatus {
    transaction_id: Option<String>,
}

impl MailerStatus {
    pub fn new(transaction_id: impl Into<String>) -> Self {
        Self {
            transaction_id: Some(transaction_id.into()),
        }
    }

    pub fn transaction_id(&self) -> Option<&str> {
        self.transaction_id.as_deref()
    }
}

impl Options for MailerStatus {
    fn name(&self) -> &'static str {
        "MailerStatus"
    }

    fn end_point(&self) -> Result<String> {
        let id = require_id(&self.transaction_id, "transaction id", self.name())?;
        Ok(format!("/mailers/status/{}", encode_segment(id)))
    }

    fn request_type(&self) -> RequestType {
        RequestType::Get
    }

    fn populated(&self) -> Result<Params> {
        Ok(Params::new())
    }
}

impl TransactionalOptions for MailerStatus {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MadMimiError;

    #[test]
    fn mailer_requires_promotion_and_recipient() {
        let err = Mailer::new().subject("hi").populated().unwrap_err();
        assert_eq!(
            err,
            MadMimiError::MissingRequiredField {
                fields: vec!["promotion_name".to_string(), "recipient".to_string()]
            }
        );
    }

    #[test]
    fn mailer_populates_only_what_was_set() {
        let mailer = Mailer::new()
            .promotion_name("Welcome")
            .recipient("Jo <jo@example.com>")
            .track_links(true);
        let params = mailer.populated().unwrap();
        assert_eq!(params.len(), 3);
        assert_eq!(params["promotion_name"], "Welcome");
        assert_eq!(params["track_links"], "true");
        assert!(!params.contains_key("subject"));
        assert!(!params.contains_key("bcc"));
    }

    #[test]
    fn mailer_is_a_post_to_mailer() {
        let mailer = Mailer::new();
        assert_eq!(mailer.end_point().unwrap(), "/mailer");
        assert_eq!(mailer.request_type(), RequestType::Post);
    }

    #[test]
    fn to_list_requires_list_name() {
        let err = MailerToList::new()
            .promotion_name("Newsletter")
            .populated()
            .unwrap_err();
        assert_eq!(
            err,
            MadMimiError::MissingRequiredField {
                fields: vec!["list_name".to_string()]
            }
        );
    }

    #[test]
    fn status_end_point_uses_transaction_id() {
        let status = MailerStatus::new("1234567");
        assert_eq!(status.end_point().unwrap(), "/mailers/status/1234567");
        assert_eq!(status.request_type(), RequestType::Get);
        assert!(status.populated().unwrap().is_empty());
    }

    #[test]
    fn status_without_id_is_configuration_error() {
        let err = MailerStatus::default().end_point().unwrap_err();
        assert!(matches!(err, MadMimiError::Configuration(_)));
    }
}
