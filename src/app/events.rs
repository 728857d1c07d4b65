//! Outbound application events.
//!
//! The [`ControlService`](super::service::ControlService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on
//! the other side decide what to do with them — log to serial, buffer for
//! the dashboard's poll endpoint, etc.

use serde::Serialize;

use super::commands::ControlMode;
use crate::drivers::cooler::CoolerLevel;
use crate::fsm::StateId;
use crate::sensors::PROBE_COUNT;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Telemetry snapshot on every sample boundary.
    Telemetry(TelemetrySnapshot),

    /// The FSM transitioned between states.
    StateChanged { from: StateId, to: StateId },

    /// Bus enumeration no longer matches the commissioned probe count.
    /// Diagnostic — the control loop keeps running on cached readings.
    ProbeCountMismatch { expected: u8, detected: u8 },

    /// The control service has started (carries initial state).
    Started(StateId),
}

/// A point-in-time telemetry snapshot suitable for logging or transmission.
///
/// This struct is the read side of the control-plane contract: the
/// transport pulls it and owns the wire encoding.
#[derive(Debug, Clone, Serialize)]
pub struct TelemetrySnapshot {
    pub state: StateId,
    /// Cached probe temperatures in slot order (0 = ambient).
    pub probes_c: [f32; PROBE_COUNT],
    /// Instantaneous heater power (W).
    pub heater_power_w: f32,
    /// Last commanded heater duty after clamping (%).
    pub heater_duty_percent: f32,
    /// Last saturated PID output in engineering units; comparing this
    /// against `heater_duty_percent` exposes saturation for tuning.
    pub pid_output: f32,
    pub running: bool,
    pub mode: ControlMode,
    pub selected_probe: u8,
    pub setpoint_c: f32,
    pub fixed_duty_percent: u8,
    pub cooler_level: CoolerLevel,
    /// Commissioned probe count.
    pub probes_expected: u8,
    /// Devices seen on the last bus refresh.
    pub probes_detected: u8,
}
