//! Mock hardware adapter for integration tests.
//!
//! Records every actuator call so tests can assert on the full command
//! history without touching real GPIO/PWM registers.

use heatbar::app::events::AppEvent;
use heatbar::app::ports::{ActuatorPort, EventSink, ProbePort};
use heatbar::drivers::cooler::CoolerLevel;
use heatbar::sensors::PROBE_COUNT;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ActuatorCall {
    SetHeaterDuty(f32),
    SetCoolerLevel(CoolerLevel),
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    /// Readings handed straight to the service; the sticky-cache policy
    /// itself is covered by the `ProbeBank` unit tests.
    pub readings: [f32; PROBE_COUNT],
    pub detected: u8,
    pub refreshes: u32,
    pub power_w: f32,
    pub calls: Vec<ActuatorCall>,
    heater_percent: f32,
    cooler: CoolerLevel,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn at(celsius: f32) -> Self {
        Self {
            readings: [celsius; PROBE_COUNT],
            detected: PROBE_COUNT as u8,
            refreshes: 0,
            power_w: 0.0,
            calls: Vec::new(),
            heater_percent: 0.0,
            cooler: CoolerLevel::Off,
        }
    }

    pub fn last_heater_duty(&self) -> Option<f32> {
        self.calls.iter().rev().find_map(|c| match c {
            ActuatorCall::SetHeaterDuty(p) => Some(*p),
            ActuatorCall::SetCoolerLevel(_) => None,
        })
    }
}

impl ProbePort for MockHardware {
    fn refresh_probes(&mut self) {
        self.refreshes += 1;
    }

    fn probe_readings(&self) -> [f32; PROBE_COUNT] {
        self.readings
    }

    fn probes_detected(&self) -> u8 {
        self.detected
    }
}

impl ActuatorPort for MockHardware {
    fn set_heater_duty(&mut self, percent: f32) {
        let percent = percent.clamp(0.0, 100.0);
        self.heater_percent = percent;
        self.calls.push(ActuatorCall::SetHeaterDuty(percent));
    }

    fn heater_duty_percent(&self) -> f32 {
        self.heater_percent
    }

    fn heater_power_w(&mut self) -> f32 {
        self.power_w
    }

    fn set_cooler_level(&mut self, level: CoolerLevel) {
        self.cooler = level;
        self.calls.push(ActuatorCall::SetCoolerLevel(level));
    }

    fn cooler_level(&self) -> CoolerLevel {
        self.cooler
    }
}

// ── RecordingSink ─────────────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn telemetry_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::Telemetry(_)))
            .count()
    }

    pub fn last_telemetry(&self) -> Option<&heatbar::app::events::TelemetrySnapshot> {
        self.events.iter().rev().find_map(|e| match e {
            AppEvent::Telemetry(t) => Some(t),
            _ => None,
        })
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
