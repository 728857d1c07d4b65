//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlService (domain)
//! ```
//!
//! Driven adapters (probe bus, heater, fan, event sinks) implement these
//! traits.  The [`ControlService`](super::service::ControlService) consumes
//! them via generics, so the domain core never touches hardware directly.

use crate::drivers::cooler::CoolerLevel;
use crate::sensors::PROBE_COUNT;

// ───────────────────────────────────────────────────────────────
// Probe port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to obtain probe temperatures.
///
/// Implementations carry the sticky-cache policy: `readings` must return
/// the last value per slot that passed the plausibility filter, and a
/// failed `refresh` must leave previous values in place.
pub trait ProbePort {
    /// One bus transaction: trigger a conversion and fold the results into
    /// the cache.  Called at most once per sampling period.
    fn refresh_probes(&mut self);

    /// Cached readings in slot order (0 = ambient), no bus traffic.
    fn probe_readings(&self) -> [f32; PROBE_COUNT];

    /// Devices seen on the last refresh (diagnostic).
    fn probes_detected(&self) -> u8;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command actuators.
pub trait ActuatorPort {
    /// Command the heater duty (0–100 %); out-of-range input is clamped.
    fn set_heater_duty(&mut self, percent: f32);

    /// Last commanded heater duty after clamping (%).
    fn heater_duty_percent(&self) -> f32;

    /// Instantaneous heater power from the voltage sense (W).
    fn heater_power_w(&mut self) -> f32;

    /// Command the cooling fan level.
    fn set_cooler_level(&mut self, level: CoolerLevel);

    /// Last commanded fan level.
    fn cooler_level(&self) -> CoolerLevel;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log, the
/// dashboard's pull buffer, etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
