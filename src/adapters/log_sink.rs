//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).
//! The telemetry line keeps the rig's long-standing serial record shape
//! so existing capture scripts keep parsing it.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                info!(
                    "DATA | N1={:.2} N2={:.2} N3={:.2} N4={:.2} amb={:.2} | \
                     heat={:.3}W duty={:.1}% u={:.3} | mode={:?} run={} \
                     node={} sp={:.1} fix={}% fan={:?} | probes={}/{}",
                    t.probes_c[1],
                    t.probes_c[2],
                    t.probes_c[3],
                    t.probes_c[4],
                    t.probes_c[0],
                    t.heater_power_w,
                    t.heater_duty_percent,
                    t.pid_output,
                    t.mode,
                    u8::from(t.running),
                    t.selected_probe,
                    t.setpoint_c,
                    t.fixed_duty_percent,
                    t.cooler_level,
                    t.probes_detected,
                    t.probes_expected,
                );
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::ProbeCountMismatch { expected, detected } => {
                warn!("PROBES | expected {} devices, detected {}", expected, detected);
            }
            AppEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
        }
    }
}
