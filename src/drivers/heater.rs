//! Heater drive and instantaneous power readback.
//!
//! The heater is a 10.3 Ω power resistor switched by an N-MOSFET on an
//! LEDC PWM channel. A divider on the resistor supply feeds ADC1 so the
//! firmware can report the electrical power actually being dissipated.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives LEDC and reads the real ADC via hw_init helpers.
//! On host/test: the duty write is a no-op and the ADC reads from a
//! static AtomicU16 for injection.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU16, Ordering};

use crate::drivers::hw_init;
use crate::pins;

/// Heater resistance at 20 °C (Ω).
const RESISTOR_OHMS: f32 = 10.3;
/// Divider ratio: 3.3 V at the ADC corresponds to 4.89 V at the resistor.
const VSENSE_SCALE: f32 = 1.4818;
const ADC_MAX: f32 = 4095.0;
const V_REF: f32 = 3.3;

#[cfg(not(target_os = "espidf"))]
static SIM_VSENSE_ADC: AtomicU16 = AtomicU16::new(0);

/// Inject a raw voltage-sense ADC sample for host tests.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_vsense_adc(raw: u16) {
    SIM_VSENSE_ADC.store(raw, Ordering::Relaxed);
}

/// Heater actuator with commanded-duty readback.
pub struct HeaterDriver {
    last_percent: f32,
    last_power_w: f32,
}

impl HeaterDriver {
    /// Driver with the heater forced off.
    pub fn new() -> Self {
        let mut drv = Self {
            last_percent: 0.0,
            last_power_w: 0.0,
        };
        drv.set_duty(0.0);
        drv
    }

    /// Command the heater duty cycle. Out-of-range input is clamped at
    /// this boundary before touching the PWM peripheral.
    pub fn set_duty(&mut self, percent: f32) {
        let percent = percent.clamp(0.0, 100.0);
        let duty_8bit = (percent * 2.55) as u8;
        hw_init::ledc_set(pins::LEDC_CH_HEATER, duty_8bit);
        self.last_percent = percent;
    }

    /// Last commanded duty after clamping (%).
    pub fn last_percent(&self) -> f32 {
        self.last_percent
    }

    /// Instantaneous electrical power in the resistor (W).
    ///
    /// Point measurement from the voltage sense, `P = V² / R` — not
    /// integrated energy.
    pub fn power_w(&mut self) -> f32 {
        let raw = self.read_vsense();
        let read_voltage = f32::from(raw) / ADC_MAX * V_REF;
        let real_voltage = read_voltage * VSENSE_SCALE;
        self.last_power_w = real_voltage * real_voltage / RESISTOR_OHMS;
        self.last_power_w
    }

    /// Most recent power computation without a new ADC sample (W).
    pub fn last_power_w(&self) -> f32 {
        self.last_power_w
    }

    #[cfg(target_os = "espidf")]
    fn read_vsense(&self) -> u16 {
        hw_init::adc1_read(hw_init::ADC1_CH_VSENSE)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_vsense(&self) -> u16 {
        SIM_VSENSE_ADC.load(Ordering::Relaxed)
    }
}

impl Default for HeaterDriver {
    fn default() -> Self {
        Self::new()
    }
}
