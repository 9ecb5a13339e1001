//! Turns a raw transport outcome into a body or a `MadMimiError`.
//!
//! # Design
//! The provider has no single error schema. The only signals are the
//! status code, a handful of literal body strings and, on some 200
//! responses, a JSON envelope with `success: false`. The rules below match
//! those literals exactly and are evaluated in a fixed order; reordering or
//! loosening them changes which error a caller sees.
//!
//! Classification is a pure function of the outcome and the `ErrorPolicy`.
//! It holds no state and performs no I/O.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{MadMimiError, Result};
use crate::http::{HttpResponse, TransportError};

pub const AUTHENTICATION_FAILED: &str = "Authentication failed";
pub const MISSING_PLACEHOLDERS_PREFIX: &str = "Your email has {placeholders} in it";
pub const ARGUMENT_OUT_OF_RANGE: &str = "argument out of range";
pub const COUNT_NEW_LIMITED: &str =
    "count_new calls are limited to data collected within the space of a month";
pub const DOES_NOT_EXIST: &str = "does not exist";
pub const SIGNUP_NOT_FOUND: &str = "Couldn't find Signup with id=";
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Which error table a client applies.
///
/// The generic end points and the transactional mailer disagree on a few
/// statuses, so the table is chosen per client rather than per call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Every end point. 409 means no such promotion or list; 400, 422 and
    /// 302 have dedicated rules.
    #[default]
    Full,
    /// The transactional mailer only. 409 means no such promotion; 400,
    /// 422 and 302 are left to the unexpected-status check.
    Transactional,
}

/// Apply the classification rules, then reject any status other than 200
/// that no rule claimed.
pub fn classify(
    policy: ErrorPolicy,
    outcome: &std::result::Result<HttpResponse, TransportError>,
) -> Result<String> {
    let response = match outcome {
        Ok(response) => response,
        Err(err) => return Err(MadMimiError::transfer(err.message.clone(), err.code)),
    };

    if let Some(err) = classify_response(policy, response) {
        return Err(err);
    }

    if response.status != 200 {
        return Err(MadMimiError::UnexpectedStatus {
            status: response.status,
            body: response.body.clone(),
        });
    }
    Ok(response.body.clone())
}

/// The rule table for a response that did arrive. `None` means no rule
/// claimed it.
pub fn classify_response(policy: ErrorPolicy, response: &HttpResponse) -> Option<MadMimiError> {
    let body = response.body.as_str();
    let status = response.status;

    if body == AUTHENTICATION_FAILED {
        return Some(MadMimiError::Authentication {
            message: body.to_string(),
        });
    }

    match status {
        200 => json_envelope_error(body),
        404 => Some(MadMimiError::transfer("endpoint or method not found", 404)),
        403 if starts_with_ignore_case(body, MISSING_PLACEHOLDERS_PREFIX) => {
            Some(MadMimiError::MissingPlaceholders {
                message: body.to_string(),
                status,
            })
        }
        // The HTML check has only been seen documented, never observed.
        500 if response.content_type() == Some(HTML_CONTENT_TYPE) => Some(MadMimiError::transfer(
            "error 500 was generated and an HTML page was returned",
            500,
        )),
        500 => Some(MadMimiError::transfer("500 error returned", 500)),
        409 => Some(match policy {
            ErrorPolicy::Full => MadMimiError::NoPromotionOrList {
                message: body.to_string(),
                status,
            },
            ErrorPolicy::Transactional => MadMimiError::NoPromotion {
                message: body.to_string(),
                status,
            },
        }),
        400 if policy == ErrorPolicy::Full => bad_request(body),
        422 if policy == ErrorPolicy::Full => Some(MadMimiError::InvalidOption {
            message: body.to_string(),
            status,
        }),
        302 if policy == ErrorPolicy::Full => Some(MadMimiError::transfer(
            "option likely unavailable for account",
            400,
        )),
        _ => None,
    }
}

fn bad_request(body: &str) -> Option<MadMimiError> {
    if body == ARGUMENT_OUT_OF_RANGE || body == COUNT_NEW_LIMITED {
        return Some(MadMimiError::OutOfRange {
            message: body.to_string(),
            status: 400,
        });
    }
    if contains_ignore_case(body, DOES_NOT_EXIST) {
        return Some(MadMimiError::transfer(
            format!("an element was not found: {body}"),
            404,
        ));
    }
    if contains_ignore_case(body, SIGNUP_NOT_FOUND) {
        return Some(MadMimiError::transfer(body, 404));
    }
    None
}

fn starts_with_ignore_case(body: &str, prefix: &str) -> bool {
    body.as_bytes()
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix.as_bytes()))
}

fn contains_ignore_case(body: &str, needle: &str) -> bool {
    body.to_ascii_lowercase()
        .contains(&needle.to_ascii_lowercase())
}

/// A present but falsy `success` (`false`, `0`, `"0"`, `""`, `null`) marks
/// a failed envelope. An absent field does not.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(_) => false,
    }
}

/// A 200 whose body opens with `{` is a JSON envelope; `success: false`
/// inside it is a failure despite the status.
fn json_envelope_error(body: &str) -> Option<MadMimiError> {
    if !body.trim_start().starts_with('{') {
        return None;
    }

    let envelope: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(err) => {
            return Some(MadMimiError::transfer(
                format!("malformed JSON envelope: {err}"),
                200,
            ))
        }
    };

    if !envelope.get("success").is_some_and(is_falsy) {
        return None;
    }

    let message = match envelope.get("error") {
        Some(Value::String(message)) => message.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    };
    let code = match envelope.get("code") {
        Some(Value::Number(code)) => code.as_i64().unwrap_or_default(),
        Some(Value::String(code)) => code.trim().parse().unwrap_or_default(),
        _ => 0,
    };
    Some(MadMimiError::transfer(message, code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn ok(status: u16, body: &str) -> std::result::Result<HttpResponse, TransportError> {
        Ok(HttpResponse::new(status, body))
    }

    #[test]
    fn transport_failure_keeps_message_and_code() {
        let outcome = Err(TransportError::new("Could not resolve host", 6));
        let err = classify(ErrorPolicy::Full, &outcome).unwrap_err();
        assert_eq!(err, MadMimiError::transfer("Could not resolve host", 6));
    }

    #[test]
    fn authentication_literal_wins_over_status() {
        for status in [200, 401, 500] {
            let err = classify(ErrorPolicy::Full, &ok(status, "Authentication failed")).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Authentication, "status {status}");
        }
    }

    #[test]
    fn authentication_literal_is_exact() {
        let body = classify(ErrorPolicy::Full, &ok(200, "Authentication failed!")).unwrap();
        assert_eq!(body, "Authentication failed!");
    }

    #[test]
    fn plain_200_body_is_returned_unchanged() {
        assert_eq!(classify(ErrorPolicy::Full, &ok(200, "abc123")).unwrap(), "abc123");
    }

    #[test]
    fn json_envelope_failure() {
        let body = r#"{"success":false,"error":"bad list","code":5}"#;
        let err = classify(ErrorPolicy::Full, &ok(200, body)).unwrap_err();
        assert_eq!(err, MadMimiError::transfer("bad list", 5));
    }

    #[test]
    fn json_envelope_with_leading_space_and_string_code() {
        let body = r#"  {"success":false,"error":"nope","code":"12"}"#;
        let err = classify(ErrorPolicy::Full, &ok(200, body)).unwrap_err();
        assert_eq!(err, MadMimiError::transfer("nope", 12));
    }

    #[test]
    fn json_envelope_success_returns_raw_body() {
        let body = r#"{"success":true,"list":"vip"}"#;
        assert_eq!(classify(ErrorPolicy::Full, &ok(200, body)).unwrap(), body);
    }

    #[test]
    fn json_envelope_without_success_field_is_not_a_failure() {
        let body = r#"{"id":7}"#;
        assert_eq!(classify(ErrorPolicy::Full, &ok(200, body)).unwrap(), body);
    }

    #[test]
    fn json_envelope_with_numeric_false_is_a_failure() {
        let err = classify(ErrorPolicy::Full, &ok(200, r#"{"success":0,"error":"x","code":3}"#))
            .unwrap_err();
        assert_eq!(err, MadMimiError::transfer("x", 3));

        let err = classify(ErrorPolicy::Full, &ok(200, r#"{"success":null,"code":4}"#)).unwrap_err();
        assert_eq!(err.code(), Some(4));

        let body = r#"{"success":1}"#;
        assert_eq!(classify(ErrorPolicy::Full, &ok(200, body)).unwrap(), body);
    }

    #[test]
    fn malformed_json_envelope_is_a_transfer_error() {
        let err = classify(ErrorPolicy::Full, &ok(200, "{not json")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transfer);
        assert_eq!(err.code(), Some(200));
    }

    #[test]
    fn not_found() {
        let err = classify(ErrorPolicy::Full, &ok(404, "Not Found")).unwrap_err();
        assert_eq!(err, MadMimiError::transfer("endpoint or method not found", 404));
    }

    #[test]
    fn placeholders_prefix() {
        let body = "Your email has {placeholders} in it, but no values were supplied";
        let err = classify(ErrorPolicy::Transactional, &ok(403, body)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingPlaceholders);
        assert_eq!(err.code(), Some(403));
    }

    #[test]
    fn placeholders_prefix_ignores_case() {
        let body = "your email has {PLACEHOLDERS} in it";
        let err = classify(ErrorPolicy::Full, &ok(403, body)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingPlaceholders);

        let short = classify(ErrorPolicy::Full, &ok(403, "your email")).unwrap_err();
        assert_eq!(short.kind(), ErrorKind::UnexpectedStatus);
    }

    #[test]
    fn bad_request_substrings_ignore_case() {
        let missing = classify(ErrorPolicy::Full, &ok(400, "List vip Does Not Exist")).unwrap_err();
        assert_eq!(
            missing,
            MadMimiError::transfer("an element was not found: List vip Does Not Exist", 404)
        );

        let signup = classify(ErrorPolicy::Full, &ok(400, "couldn't FIND signup with ID=9")).unwrap_err();
        assert_eq!(signup.code(), Some(404));

        let range = classify(ErrorPolicy::Full, &ok(400, "Argument Out Of Range")).unwrap_err();
        assert_eq!(range.kind(), ErrorKind::UnexpectedStatus);
    }

    #[test]
    fn other_403_falls_to_unexpected_status() {
        let err = classify(ErrorPolicy::Full, &ok(403, "Forbidden")).unwrap_err();
        assert_eq!(
            err,
            MadMimiError::UnexpectedStatus {
                status: 403,
                body: "Forbidden".to_string()
            }
        );
    }

    #[test]
    fn server_error_with_html_page() {
        let outcome = Ok(HttpResponse::new(500, "<html></html>").with_content_type(HTML_CONTENT_TYPE));
        let err = classify(ErrorPolicy::Full, &outcome).unwrap_err();
        assert!(matches!(err, MadMimiError::Transfer { ref message, code: 500 } if message.contains("HTML")));
    }

    #[test]
    fn server_error_without_html() {
        let outcome = Ok(HttpResponse::new(500, "oops").with_content_type("text/plain"));
        let err = classify(ErrorPolicy::Full, &outcome).unwrap_err();
        assert!(matches!(err, MadMimiError::Transfer { ref message, code: 500 } if !message.contains("HTML")));
    }

    #[test]
    fn conflict_depends_on_policy() {
        let full = classify(ErrorPolicy::Full, &ok(409, "no list")).unwrap_err();
        let transactional = classify(ErrorPolicy::Transactional, &ok(409, "no list")).unwrap_err();
        assert_eq!(full.kind(), ErrorKind::NoPromotionOrList);
        assert_eq!(transactional.kind(), ErrorKind::NoPromotion);
    }

    #[test]
    fn bad_request_rules() {
        let range = classify(ErrorPolicy::Full, &ok(400, ARGUMENT_OUT_OF_RANGE)).unwrap_err();
        assert_eq!(range.kind(), ErrorKind::OutOfRange);

        let month = classify(ErrorPolicy::Full, &ok(400, COUNT_NEW_LIMITED)).unwrap_err();
        assert_eq!(month.kind(), ErrorKind::OutOfRange);

        let missing = classify(ErrorPolicy::Full, &ok(400, "Promotion 12 does not exist")).unwrap_err();
        assert_eq!(missing.code(), Some(404));

        let signup = classify(ErrorPolicy::Full, &ok(400, "Couldn't find Signup with id=3")).unwrap_err();
        assert_eq!(signup, MadMimiError::transfer("Couldn't find Signup with id=3", 404));

        let other = classify(ErrorPolicy::Full, &ok(400, "bad")).unwrap_err();
        assert_eq!(other.kind(), ErrorKind::UnexpectedStatus);
    }

    #[test]
    fn out_of_range_needs_exact_match() {
        let err = classify(ErrorPolicy::Full, &ok(400, "argument out of range!")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedStatus);
    }

    #[test]
    fn invalid_option_and_redirect() {
        let invalid = classify(ErrorPolicy::Full, &ok(422, "bad email")).unwrap_err();
        assert_eq!(invalid.kind(), ErrorKind::InvalidOption);

        let redirect = classify(ErrorPolicy::Full, &ok(302, "")).unwrap_err();
        assert_eq!(
            redirect,
            MadMimiError::transfer("option likely unavailable for account", 400)
        );
    }

    #[test]
    fn transactional_policy_leaves_generic_rules_to_safety_net() {
        for status in [400, 422, 302] {
            let err = classify(ErrorPolicy::Transactional, &ok(status, ARGUMENT_OUT_OF_RANGE)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnexpectedStatus, "status {status}");
        }
    }

    #[test]
    fn unclassified_status_is_unexpected() {
        let err = classify(ErrorPolicy::Full, &ok(201, "created")).unwrap_err();
        assert_eq!(err.code(), Some(201));
    }

    #[test]
    fn classification_is_repeatable() {
        let outcome = ok(409, "no promotion");
        let first = classify(ErrorPolicy::Full, &outcome);
        let second = classify(ErrorPolicy::Full, &outcome);
        assert_eq!(first, second);
    }
}
