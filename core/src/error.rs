//! Error types for the MadMimi client.
//!
//! # Design
//! The provider reports failures through a mix of status codes, literal
//! body strings and JSON envelopes. Classification folds all of them into
//! this closed set so callers can branch on the kind: retry a `Transfer`
//! carrying a transport code, fix configuration on `Authentication`, treat
//! `MissingRequiredField` as a programming error.

use thiserror::Error;

/// Errors returned by options validation, request building and response
/// classification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MadMimiError {
    /// No usable answer: a transport failure, a JSON envelope reporting
    /// `success: false`, or a status the provider uses for generic failure.
    #[error("transfer error ({code}): {message}")]
    Transfer { message: String, code: i64 },

    /// The provider answered with its `Authentication failed` literal.
    #[error("authentication failed: {message}")]
    Authentication { message: String },

    /// 403: the message contains `{placeholders}` that were not supplied.
    #[error("missing placeholders ({status}): {message}")]
    MissingPlaceholders { message: String, status: u16 },

    /// 409 on the generic endpoints.
    #[error("no promotion or list ({status}): {message}")]
    NoPromotionOrList { message: String, status: u16 },

    /// 409 on the transactional mailer.
    #[error("no promotion ({status}): {message}")]
    NoPromotion { message: String, status: u16 },

    /// 422: the provider rejected an option value.
    #[error("invalid option ({status}): {message}")]
    InvalidOption { message: String, status: u16 },

    /// 400 with one of the provider's range messages.
    #[error("out of range ({status}): {message}")]
    OutOfRange { message: String, status: u16 },

    #[error("missing required field(s): {}", fields.join(", "))]
    MissingRequiredField { fields: Vec<String> },

    #[error("configuration error: {0}")]
    Configuration(String),

    /// A non-200 status that no classification rule claimed.
    #[error("HTTP error code of {status} was generated and not caught: {body}")]
    UnexpectedStatus { status: u16, body: String },
}

/// Fieldless mirror of `MadMimiError`, for matching and for C error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Transfer,
    Authentication,
    MissingPlaceholders,
    NoPromotionOrList,
    NoPromotion,
    InvalidOption,
    OutOfRange,
    MissingRequiredField,
    Configuration,
    UnexpectedStatus,
}

impl MadMimiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MadMimiError::Transfer { .. } => ErrorKind::Transfer,
            MadMimiError::Authentication { .. } => ErrorKind::Authentication,
            MadMimiError::MissingPlaceholders { .. } => ErrorKind::MissingPlaceholders,
            MadMimiError::NoPromotionOrList { .. } => ErrorKind::NoPromotionOrList,
            MadMimiError::NoPromotion { .. } => ErrorKind::NoPromotion,
            MadMimiError::InvalidOption { .. } => ErrorKind::InvalidOption,
            MadMimiError::OutOfRange { .. } => ErrorKind::OutOfRange,
            MadMimiError::MissingRequiredField { .. } => ErrorKind::MissingRequiredField,
            MadMimiError::Configuration(_) => ErrorKind::Configuration,
            MadMimiError::UnexpectedStatus { .. } => ErrorKind::UnexpectedStatus,
        }
    }

    /// Status or provider code attached to the error, if any.
    ///
    /// For `Transfer` this is whatever the source reported: a transport
    /// error number, the `code` of a JSON envelope, or an HTTP status.
    pub fn code(&self) -> Option<i64> {
        match self {
            MadMimiError::Transfer { code, .. } => Some(*code),
            MadMimiError::MissingPlaceholders { status, .. }
            | MadMimiError::NoPromotionOrList { status, .. }
            | MadMimiError::NoPromotion { status, .. }
            | MadMimiError::InvalidOption { status, .. }
            | MadMimiError::OutOfRange { status, .. }
            | MadMimiError::UnexpectedStatus { status, .. } => Some(i64::from(*status)),
            MadMimiError::Authentication { .. }
            | MadMimiError::MissingRequiredField { .. }
            | MadMimiError::Configuration(_) => None,
        }
    }

    pub(crate) fn transfer(message: impl Into<String>, code: i64) -> Self {
        MadMimiError::Transfer {
            message: message.into(),
            code,
        }
    }
}

pub type Result<T> = std::result::Result<T, MadMimiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_are_listed_in_message() {
        let err = MadMimiError::MissingRequiredField {
            fields: vec!["promotion_name".to_string(), "recipient".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "missing required field(s): promotion_name, recipient"
        );
        assert_eq!(err.code(), None);
    }

    #[test]
    fn codes_follow_the_variant() {
        assert_eq!(MadMimiError::transfer("x", 6).code(), Some(6));
        let err = MadMimiError::NoPromotion {
            message: "no promotion".to_string(),
            status: 409,
        };
        assert_eq!(err.code(), Some(409));
        assert_eq!(err.kind(), ErrorKind::NoPromotion);
    }
}
