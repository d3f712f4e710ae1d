//! One structured record per built specification.
//!
//! Records go to the `opquery::trace` log target as JSON. A [`TraceCapture`]
//! additionally collects them for the current thread, so tests can assert on
//! the wrapping decision without installing a global logger.

use serde::Serialize;
use std::cell::RefCell;

pub const TRACE_TARGET: &str = "opquery::trace";

/// What the builder decided for one `specification()` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildTrace {
    pub namespace: String,
    pub wrapped: bool,
    /// Server modifier names in selector order.
    pub modifiers: Vec<String>,
    pub flags: u32,
    pub read_preference_sent: bool,
}

thread_local! {
    static CAPTURED: RefCell<Option<Vec<BuildTrace>>> = const { RefCell::new(None) };
}

/// Collects traces recorded on this thread while alive. Dropping it restores
/// whatever capture was active before.
pub struct TraceCapture {
    outer: Option<Vec<BuildTrace>>,
}

impl TraceCapture {
    #[must_use]
    pub fn start() -> Self {
        let outer = CAPTURED.with(|c| c.borrow_mut().replace(Vec::new()));
        Self { outer }
    }

    /// Removes and returns everything captured so far.
    #[must_use]
    pub fn take(&self) -> Vec<BuildTrace> {
        CAPTURED.with(|c| c.borrow_mut().as_mut().map(std::mem::take).unwrap_or_default())
    }
}

impl Drop for TraceCapture {
    fn drop(&mut self) {
        let outer = self.outer.take();
        CAPTURED.with(|c| *c.borrow_mut() = outer);
    }
}

pub(crate) fn record(trace: BuildTrace) {
    if log::log_enabled!(target: TRACE_TARGET, log::Level::Trace) {
        match serde_json::to_string(&trace) {
            Ok(json) => log::trace!(target: TRACE_TARGET, "{json}"),
            Err(e) => log::warn!(target: TRACE_TARGET, "unserializable build trace: {e}"),
        }
    }
    CAPTURED.with(|c| {
        if let Some(buf) = c.borrow_mut().as_mut() {
            buf.push(trace);
        }
    });
}
