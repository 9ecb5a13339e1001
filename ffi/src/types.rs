//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type with C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! enums with explicit discriminants. Enums only travel outward; values the
//! C side passes in are plain integers, checked before use. Conversion
//! functions live here to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use madmimi_core::http::{HttpMethod, HttpRequest, HttpResponse, TransportError};
use madmimi_core::{ErrorKind, ErrorPolicy, MadMimiError};

/// Opaque handle to a `Client`. C callers receive a pointer to this and
/// pass it back into every FFI function.
pub struct FfiClient {
    pub(crate) inner: madmimi_core::Client,
}

/// Copy a C string into an owned `String`. Null reads as empty, invalid
/// UTF-8 is replaced.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string.
pub(crate) unsafe fn read_c_str(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
}

/// Hand a string to C. Interior NUL bytes are dropped rather than
/// truncating the rest of the text.
pub(crate) fn into_c_string(s: impl Into<Vec<u8>>) -> *mut c_char {
    let mut bytes = s.into();
    bytes.retain(|b| *b != 0);
    CString::new(bytes).unwrap_or_default().into_raw()
}

// ---------------------------------------------------------------------------
// Client options
// ---------------------------------------------------------------------------

/// Error table a client applies, as passed to `madmimi_client_new`.
#[repr(C)]
pub enum FfiErrorPolicy {
    Full = 0,
    Transactional = 1,
}

impl FfiErrorPolicy {
    pub(crate) fn from_raw(raw: i32) -> Option<ErrorPolicy> {
        match raw {
            0 => Some(ErrorPolicy::Full),
            1 => Some(ErrorPolicy::Transactional),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Put = 2,
    Delete = 3,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Put => FfiHttpMethod::Put,
            HttpMethod::Delete => FfiHttpMethod::Delete,
        }
    }
}

impl FfiHttpMethod {
    pub(crate) fn from_raw(raw: i32) -> Option<HttpMethod> {
        match raw {
            0 => Some(HttpMethod::Get),
            1 => Some(HttpMethod::Post),
            2 => Some(HttpMethod::Put),
            3 => Some(HttpMethod::Delete),
            _ => None,
        }
    }
}

/// One option field passed in by the caller. Neither pointer is freed by
/// this library.
#[repr(C)]
pub struct FfiField {
    pub key: *const c_char,
    pub value: *const c_char,
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Built by `madmimi_build_request`. The C caller executes the request and
/// passes the outcome back through `madmimi_parse_response`. `body` is null
/// for GET, where the parameters are already in `url`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: HttpRequest) -> *mut Self {
        let body = match req.body {
            Some(b) => into_c_string(b),
            None => std::ptr::null_mut(),
        };

        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let headers: Box<[FfiHeader]> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: into_c_string(k),
                    value: into_c_string(v),
                })
                .collect();
            Box::into_raw(headers) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            url: into_c_string(req.url),
            headers,
            headers_len,
            body,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// The outcome of executing a request, described as C-compatible data.
///
/// The C caller fills this in after the round-trip and passes a pointer to
/// `madmimi_parse_response`. When `transport_failed` is set the request
/// never produced a response: `transport_error_message` and
/// `transport_error_code` describe why and the HTTP fields are ignored.
/// The FFI layer reads but does not free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub content_type: *const c_char,
    pub body: *const c_char,
    pub transport_failed: bool,
    pub transport_error_message: *const c_char,
    pub transport_error_code: i64,
}

impl FfiHttpResponse {
    /// # Safety
    /// Every non-null pointer field must point to a NUL-terminated string.
    pub(crate) unsafe fn to_core(&self) -> Result<HttpResponse, TransportError> {
        if self.transport_failed {
            let message = unsafe { read_c_str(self.transport_error_message) };
            return Err(TransportError::new(message, self.transport_error_code));
        }
        let mut response = HttpResponse::new(self.status, unsafe { read_c_str(self.body) });
        if !self.content_type.is_null() {
            response = response.with_content_type(unsafe { read_c_str(self.content_type) });
        }
        Ok(response)
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiResult`. One per `ErrorKind`, plus the
/// boundary's own failures.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Transfer = 1,
    Authentication = 2,
    MissingPlaceholders = 3,
    NoPromotionOrList = 4,
    NoPromotion = 5,
    InvalidOption = 6,
    OutOfRange = 7,
    MissingRequiredField = 8,
    Configuration = 9,
    UnexpectedStatus = 10,
    Panic = 11,
    NullArg = 12,
}

impl From<ErrorKind> for FfiErrorCode {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Transfer => FfiErrorCode::Transfer,
            ErrorKind::Authentication => FfiErrorCode::Authentication,
            ErrorKind::MissingPlaceholders => FfiErrorCode::MissingPlaceholders,
            ErrorKind::NoPromotionOrList => FfiErrorCode::NoPromotionOrList,
            ErrorKind::NoPromotion => FfiErrorCode::NoPromotion,
            ErrorKind::InvalidOption => FfiErrorCode::InvalidOption,
            ErrorKind::OutOfRange => FfiErrorCode::OutOfRange,
            ErrorKind::MissingRequiredField => FfiErrorCode::MissingRequiredField,
            ErrorKind::Configuration => FfiErrorCode::Configuration,
            ErrorKind::UnexpectedStatus => FfiErrorCode::UnexpectedStatus,
        }
    }
}

/// Result envelope for `madmimi_parse_response` and for build failures.
///
/// On success `error_code` is `Ok`, `error_message` is null and `body`
/// holds the response body. On failure `body` is null, `error_message`
/// is the error's display text, and `code` carries the status or provider
/// code when `has_code` is set.
#[repr(C)]
pub struct FfiResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub has_code: bool,
    pub code: i64,
    pub body: *mut c_char,
}

impl FfiResult {
    fn boxed(self) -> *mut Self {
        Box::into_raw(Box::new(self))
    }

    fn failure(error_code: FfiErrorCode, message: String, code: Option<i64>) -> *mut Self {
        FfiResult {
            error_code,
            error_message: into_c_string(message),
            has_code: code.is_some(),
            code: code.unwrap_or_default(),
            body: std::ptr::null_mut(),
        }
        .boxed()
    }

    /// Build a success result carrying the response body.
    pub(crate) fn ok(body: String) -> *mut Self {
        FfiResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            has_code: false,
            code: 0,
            body: into_c_string(body),
        }
        .boxed()
    }

    /// Build an error result from a `MadMimiError`.
    pub(crate) fn from_error(err: MadMimiError) -> *mut Self {
        Self::failure(err.kind().into(), err.to_string(), err.code())
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::failure(FfiErrorCode::NullArg, format!("null argument: {name}"), None)
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::failure(FfiErrorCode::Panic, msg.to_string(), None)
    }
}
