//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the [`ProbeBank`] with its bus plus both actuator drivers,
//! exposing them through [`ProbePort`] and [`ActuatorPort`].  This is the
//! only module in the system that touches actual hardware.  On non-espidf
//! targets, the underlying drivers use cfg-gated simulation stubs.

use crate::app::ports::{ActuatorPort, ProbePort};
use crate::drivers::cooler::{CoolerDriver, CoolerLevel};
use crate::drivers::heater::HeaterDriver;
use crate::sensors::{ProbeBank, ProbeBus, PROBE_COUNT};

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<B: ProbeBus> {
    probes: ProbeBank,
    bus: B,
    heater: HeaterDriver,
    cooler: CoolerDriver,
}

impl<B: ProbeBus> HardwareAdapter<B> {
    pub fn new(bus: B, probes: ProbeBank, heater: HeaterDriver, cooler: CoolerDriver) -> Self {
        Self {
            probes,
            bus,
            heater,
            cooler,
        }
    }
}

// ── ProbePort implementation ──────────────────────────────────

impl<B: ProbeBus> ProbePort for HardwareAdapter<B> {
    fn refresh_probes(&mut self) {
        self.probes.refresh(&mut self.bus);
    }

    fn probe_readings(&self) -> [f32; PROBE_COUNT] {
        self.probes.read_all()
    }

    fn probes_detected(&self) -> u8 {
        self.probes.detected_count()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<B: ProbeBus> ActuatorPort for HardwareAdapter<B> {
    fn set_heater_duty(&mut self, percent: f32) {
        self.heater.set_duty(percent);
    }

    fn heater_duty_percent(&self) -> f32 {
        self.heater.last_percent()
    }

    fn heater_power_w(&mut self) -> f32 {
        self.heater.power_w()
    }

    fn set_cooler_level(&mut self, level: CoolerLevel) {
        self.cooler.set_level(level);
    }

    fn cooler_level(&self) -> CoolerLevel {
        self.cooler.level()
    }
}
