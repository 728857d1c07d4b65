//! Telemetry buffer adapter for the control-plane pull path.
//!
//! The transport reads telemetry on demand rather than having it pushed;
//! this adapter keeps the latest snapshot plus a fixed-depth history ring
//! so the dashboard can render a short trend without the core allocating.
//! Every event is also forwarded to an inner sink (normally the serial
//! [`LogEventSink`]), so wiring this adapter into the service covers both
//! outputs.
//!
//! [`LogEventSink`]: super::log_sink::LogEventSink

use heapless::HistoryBuffer;

use crate::app::events::{AppEvent, TelemetrySnapshot};
use crate::app::ports::EventSink;

/// Snapshots retained for the trend view — one minute at the 1 Hz cadence.
pub const TELEMETRY_HISTORY: usize = 60;

/// Pull-side telemetry buffer that forwards everything to an inner sink.
pub struct TelemetryLog<S: EventSink> {
    inner: S,
    latest: Option<TelemetrySnapshot>,
    history: HistoryBuffer<TelemetrySnapshot, TELEMETRY_HISTORY>,
}

impl<S: EventSink> TelemetryLog<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            latest: None,
            history: HistoryBuffer::new(),
        }
    }

    /// Most recent snapshot, if any sample boundary has passed yet.
    pub fn latest(&self) -> Option<&TelemetrySnapshot> {
        self.latest.as_ref()
    }

    /// Retained snapshots, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &TelemetrySnapshot> {
        self.history.oldest_ordered()
    }
}

impl<S: EventSink> EventSink for TelemetryLog<S> {
    fn emit(&mut self, event: &AppEvent) {
        if let AppEvent::Telemetry(t) = event {
            self.latest = Some(t.clone());
            self.history.write(t.clone());
        }
        self.inner.emit(event);
    }
}
