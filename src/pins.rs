//! GPIO / peripheral pin assignments for the HeatBar rig board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Heater (power resistor through an N-MOSFET low-side switch)
// ---------------------------------------------------------------------------

/// LEDC PWM output for the heater drive.
pub const HEATER_PWM_GPIO: i32 = 27;
/// Analog input sensing the resistor supply voltage (through a divider).
/// ADC1 channel 4 (GPIO 32).
pub const HEATER_VSENSE_GPIO: i32 = 32;

// ---------------------------------------------------------------------------
// Cooling fan (12 V brushless, PWM-dimmed through a driver transistor)
// ---------------------------------------------------------------------------

/// LEDC PWM output for the cooling fan.
pub const COOLER_PWM_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Temperature probes (DS18B20 string on a single one-wire bus)
// ---------------------------------------------------------------------------

/// One-wire data line shared by the ambient probe and the four bar nodes.
pub const PROBE_BUS_GPIO: i32 = 15;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits).  8-bit gives 0 – 255 duty levels.
pub const PWM_RESOLUTION_BITS: u32 = 8;
/// LEDC base frequency for the heater MOSFET (1 kHz — SSR/MOSFET friendly).
pub const HEATER_PWM_FREQ_HZ: u32 = 1_000;
/// LEDC base frequency for the fan (5 kHz — avoids audible whine).
pub const COOLER_PWM_FREQ_HZ: u32 = 5_000;

/// LEDC channel assignments.
pub const LEDC_CH_HEATER: u32 = 0;
pub const LEDC_CH_COOLER: u32 = 1;
