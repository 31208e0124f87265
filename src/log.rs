//! The access-log sink boundary (spec.md §1, §6 "Output"): one line per
//! connection, `(timestamp, peer, status, target)`. The core only
//! depends on the [`LogSink`] trait; the host wires up where lines go.

use crate::error::Status;

pub trait LogSink: Send + Sync {
    fn record(&self, peer: &str, status: Status, target: &[u8]);
}

/// Emits `tracing::info!` records with structured fields. This is the
/// default sink the binary installs; rendered through a plain formatter
/// it matches spec.md's `YYYY-MM-DDTHH:MM:SS<TAB>peer<TAB>status<TAB>target`
/// line shape (quark.c's `printf` in `serve()`).
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn record(&self, peer: &str, status: Status, target: &[u8]) {
        let target = String::from_utf8_lossy(target);
        tracing::info!(peer, status = status.code(), %target, "request served");
    }
}

#[cfg(test)]
pub struct RecordingLogSink {
    pub lines: std::sync::Mutex<Vec<(String, u16, Vec<u8>)>>,
}

#[cfg(test)]
impl RecordingLogSink {
    pub fn new() -> Self {
        RecordingLogSink {
            lines: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[cfg(test)]
impl LogSink for RecordingLogSink {
    fn record(&self, peer: &str, status: Status, target: &[u8]) {
        self.lines
            .lock()
            .unwrap()
            .push((peer.to_string(), status.code(), target.to_vec()));
    }
}
