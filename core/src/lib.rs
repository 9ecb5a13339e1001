//! Synchronous client core for the MadMimi email marketing API.
//!
//! # Overview
//! Builds authenticated `HttpRequest` values from typed `Options`, hands
//! them to a `Transport`, and classifies the provider's answer into the
//! response body or a typed `MadMimiError`.
//!
//! # Design
//! - `Client` is I/O free: `build_request` / `parse_response` make the
//!   network boundary explicit, which is also what the C interface exposes.
//! - `Connection` pairs a `Client` with a `Transport` for callers that want
//!   a single `request` / `send_transactional` call.
//! - Options variants are composed from `Fields`, `Pagination` and
//!   `MailingIds` rather than inherited from a base class.
//! - The error table is an `ErrorPolicy` chosen at construction.
//! - Debug traces go to an injected `DebugLog`; the default discards them
//!   without formatting.

pub mod classify;
pub mod client;
pub mod config;
pub mod connection;
pub mod error;
pub mod http;
pub mod log;
pub mod options;

pub use classify::{classify, ErrorPolicy};
pub use client::Client;
pub use config::{ClientConfig, Credentials, API_URL};
pub use connection::Connection;
pub use error::{ErrorKind, MadMimiError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
pub use log::{DebugLog, NoopLog, TracingLog};
pub use options::{Mailing, Options, Paginated, RawOptions, RequestType, TransactionalOptions};
