//! A `Client` bound to a `Transport`.
//!
//! # Design
//! `Connection` performs exactly one synchronous round-trip per call and
//! keeps no per-call state, so one instance can serve many threads at once.
//! The generic and the transactional end points share this type; the
//! `ErrorPolicy` chosen at construction decides which error table applies.

use std::sync::Arc;

use crate::client::Client;
use crate::config::{ClientConfig, Credentials};
use crate::error::Result;
use crate::http::Transport;
use crate::log::{trace, DebugLog};
use crate::options::{Options, TransactionalOptions};

#[derive(Debug, Clone)]
pub struct Connection<T> {
    client: Client,
    transport: T,
}

impl<T: Transport> Connection<T> {
    /// Connection to the public API. `debug` routes traces to `tracing`.
    pub fn new(credentials: Credentials, transport: T, debug: bool) -> Result<Self> {
        Self::from_config(&ClientConfig::new(credentials).debug(debug), transport)
    }

    pub fn from_config(config: &ClientConfig, transport: T) -> Result<Self> {
        Ok(Self {
            client: Client::from_config(config)?,
            transport,
        })
    }

    pub fn from_client(client: Client, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn with_log(mut self, log: Arc<dyn DebugLog>) -> Self {
        self.client = self.client.with_log(log);
        self
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Call any end point. Returns the raw response body.
    pub fn request(&self, options: &dyn Options) -> Result<String> {
        self.send(options)
    }

    /// Call the transactional mailer. Returns the raw response body, which
    /// for `Mailer` is the transaction id.
    pub fn send_transactional<O: TransactionalOptions>(&self, options: &O) -> Result<String> {
        self.send(options)
    }

    fn send(&self, options: &dyn Options) -> Result<String> {
        let request = self.client.build_request(options)?;
        let outcome = self.transport.execute(&request);
        if let Err(err) = &outcome {
            trace(self.client.log(), || {
                format!("{} {} failed below HTTP: {err}", request.method, request.url)
            });
        }
        self.client.parse_response(outcome)
    }
}
