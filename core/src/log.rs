//! Debug trace sink injected into clients.
//!
//! Trace messages embed full URLs and bodies, so callers check `enabled()`
//! before formatting anything.

use std::sync::Arc;

pub const TRACE_TARGET: &str = "madmimi";

pub trait DebugLog: Send + Sync {
    fn enabled(&self) -> bool;

    fn debug(&self, message: &str);
}

/// Discards everything. The default sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLog;

impl DebugLog for NoopLog {
    fn enabled(&self) -> bool {
        false
    }

    fn debug(&self, _message: &str) {}
}

/// Forwards to `tracing` at debug level under the `madmimi` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl DebugLog for TracingLog {
    fn enabled(&self) -> bool {
        tracing::enabled!(target: TRACE_TARGET, tracing::Level::DEBUG)
    }

    fn debug(&self, message: &str) {
        tracing::debug!(target: TRACE_TARGET, "{message}");
    }
}

/// Sink for a debug flag: `TracingLog` when set, `NoopLog` otherwise.
pub fn for_debug_flag(debug: bool) -> Arc<dyn DebugLog> {
    if debug {
        Arc::new(TracingLog)
    } else {
        Arc::new(NoopLog)
    }
}

/// Format and emit a message only when the sink is listening.
pub(crate) fn trace(log: &dyn DebugLog, message: impl FnOnce() -> String) {
    if log.enabled() {
        log.debug(&message());
    }
}
