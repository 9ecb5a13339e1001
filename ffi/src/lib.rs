//! C-ABI wrapper around `madmimi-core`.
//!
//! # Overview
//! Exposes request building and response classification through
//! `extern "C"` functions so any language with a C FFI can talk to the
//! MadMimi API with its own HTTP stack.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - One generic `madmimi_build_request` takes an end point, a method and
//!   key/value fields; typed option builders stay on the Rust side.
//! - A single `FfiResult` envelope carries either the body or an error code
//!   mirroring `ErrorKind`.
//! - The C caller owns all returned pointers and must call the matching
//!   `madmimi_free_*` function to release them.

pub mod types;

use std::ffi::CString;
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use madmimi_core::{ClientConfig, Credentials, MadMimiError, RawOptions};

use types::*;

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new `Client`.
///
/// `base_url` may be null for the public API. `policy` is an
/// `FfiErrorPolicy` value. Returns null if `username` or `api_key` is null,
/// if `policy` is unknown, if `base_url` is not a usable http(s) URL, or if
/// an internal panic occurs. The caller must free the returned pointer with
/// `madmimi_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn madmimi_client_new(
    username: *const c_char,
    api_key: *const c_char,
    base_url: *const c_char,
    policy: i32,
) -> *mut FfiClient {
    catch_unwind(|| {
        if username.is_null() || api_key.is_null() {
            return std::ptr::null_mut();
        }
        let Some(policy) = FfiErrorPolicy::from_raw(policy) else {
            return std::ptr::null_mut();
        };
        let credentials =
            unsafe { Credentials::new(read_c_str(username), read_c_str(api_key)) };
        let mut config = ClientConfig::new(credentials).policy(policy);
        if !base_url.is_null() {
            config = config.base_url(unsafe { read_c_str(base_url) });
        }
        match madmimi_core::Client::from_config(&config) {
            Ok(client) => Box::into_raw(Box::new(FfiClient { inner: client })),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a `Client` created by `madmimi_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn madmimi_client_free(client: *mut FfiClient) {
    if !client.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(client) });
        }));
    }
}

// ---------------------------------------------------------------------------
// Build
// ---------------------------------------------------------------------------

/// Store `result` in `*error` when the caller asked for it, otherwise free it.
fn report(error: *mut *mut FfiResult, result: *mut FfiResult) {
    if error.is_null() {
        madmimi_free_result(result);
    } else {
        unsafe { *error = result };
    }
}

/// Build an authenticated HTTP request for `end_point` (a path starting
/// with `/`) with `method` (an `FfiHttpMethod` value) and `fields_len`
/// option fields.
///
/// Returns null on failure. If `error` is not null it then receives an
/// `FfiResult` describing why, which the caller frees with
/// `madmimi_free_result`. The caller must free a returned request with
/// `madmimi_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn madmimi_build_request(
    client: *const FfiClient,
    end_point: *const c_char,
    method: i32,
    fields: *const FfiField,
    fields_len: u32,
    error: *mut *mut FfiResult,
) -> *mut FfiHttpRequest {
    let built = catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return Err(FfiResult::null_arg("client"));
        }
        if end_point.is_null() {
            return Err(FfiResult::null_arg("end_point"));
        }
        if fields.is_null() && fields_len > 0 {
            return Err(FfiResult::null_arg("fields"));
        }
        let Some(method) = FfiHttpMethod::from_raw(method) else {
            return Err(FfiResult::from_error(MadMimiError::Configuration(format!(
                "unknown method {method}"
            ))));
        };

        let client = unsafe { &*client };
        let mut options = RawOptions::new(unsafe { read_c_str(end_point) }, method);
        if fields_len > 0 {
            let fields = unsafe { std::slice::from_raw_parts(fields, fields_len as usize) };
            for field in fields {
                if field.key.is_null() {
                    return Err(FfiResult::null_arg("fields.key"));
                }
                options = unsafe { options.field(read_c_str(field.key), read_c_str(field.value)) };
            }
        }

        client
            .inner
            .build_request(&options)
            .map(FfiHttpRequest::from_core)
            .map_err(FfiResult::from_error)
    }))
    .unwrap_or_else(|_| Err(FfiResult::panic("panic in madmimi_build_request")));

    match built {
        Ok(request) => request,
        Err(result) => {
            report(error, result);
            std::ptr::null_mut()
        }
    }
}

// ---------------------------------------------------------------------------
// Parse
// ---------------------------------------------------------------------------

/// Classify the outcome of executing a request built by `client`.
///
/// Returns `error_code = Ok` with the body on success. Never returns null.
#[unsafe(no_mangle)]
pub extern "C" fn madmimi_parse_response(
    client: *const FfiClient,
    response: *const FfiHttpResponse,
) -> *mut FfiResult {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiResult::null_arg("client");
        }
        if response.is_null() {
            return FfiResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let outcome = unsafe { (*response).to_core() };
        match client.inner.parse_response(outcome) {
            Ok(body) => FfiResult::ok(body),
            Err(e) => FfiResult::from_error(e),
        }
    }))
    .unwrap_or_else(|_| FfiResult::panic("panic in madmimi_parse_response"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by `madmimi_build_request`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn madmimi_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        madmimi_free_string(req.url);
        madmimi_free_string(req.body);
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    req.headers,
                    req.headers_len as usize,
                ))
            };
            for h in headers.iter() {
                madmimi_free_string(h.key);
                madmimi_free_string(h.value);
            }
        }
    });
}

/// Free an `FfiResult` returned by `madmimi_parse_response` or stored by
/// `madmimi_build_request`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn madmimi_free_result(result: *mut FfiResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        madmimi_free_string(result.error_message);
        madmimi_free_string(result.body);
    });
}

/// Free a C string allocated by this library, for callers that detach a
/// string from a result and null the field. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn madmimi_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------


// ---------------------------------------------------------------------------
// Round-trip against the mock provider
// ---------------------------------------------------------------------------
