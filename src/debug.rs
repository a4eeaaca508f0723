//! Process-wide best-effort trace sink
//!
//! Disabled by default (feature `debug`). There is no async/queued delivery:
//! `trace` calls the installed sink function inline, synchronously, from
//! whichever thread is parsing.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::OnceLock;

/// Trace severity, ordered from least to most verbose
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Severity {
	Error = 0,
	Warn = 1,
	Info = 2,
	Trace = 3,
}

static THRESHOLD: AtomicU8 = AtomicU8::new(u8::MAX);
static SINK: OnceLock<fn(Severity, &str)> = OnceLock::new();

/// Install the process-wide trace sink and severity threshold
///
/// Only the first call takes effect; later calls are no-ops, matching the
/// one-shot `OnceLock` storage.
pub fn enable_debug(severity: Severity, sink: fn(Severity, &str)) {
	let _ = SINK.set(sink);
	THRESHOLD.store(severity as u8, Ordering::Relaxed);
}

pub(crate) fn trace(severity: Severity, message: &str) {
	if severity as u8 > THRESHOLD.load(Ordering::Relaxed) {
		return;
	}
	if let Some(sink) = SINK.get() {
		sink(severity, message);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::atomic::{AtomicUsize, Ordering as O};

	static CALLS: AtomicUsize = AtomicUsize::new(0);

	fn counting_sink(_severity: Severity, _message: &str) {
		CALLS.fetch_add(1, O::SeqCst);
	}

	#[test]
	fn trace_without_sink_is_silent() {
		trace(Severity::Error, "no sink installed yet in this test binary path");
	}

	#[test]
	fn enable_then_trace_invokes_sink() {
		enable_debug(Severity::Trace, counting_sink);
		let before = CALLS.load(O::SeqCst);
		trace(Severity::Info, "hello");
		assert!(CALLS.load(O::SeqCst) > before);
	}
}
