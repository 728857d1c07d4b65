#![allow(dead_code)] // Some variants reserved for typed ProbePort/ActuatorPort returns

//! Unified error types for the HeatBar firmware.
//!
//! Follows embedded best practice: a single `Error` enum that every subsystem
//! can convert into, keeping the top-level control loop's error handling
//! uniform.  All variants are `Copy` so they can be cheaply passed around
//! without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A probe could not be read or returned out-of-range data.
    Sensor(SensorError),
    /// An actuator command failed.
    Actuator(ActuatorError),
    /// The control algorithm was used out of contract.
    Control(ControlError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Control(e) => write!(f, "control: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The one-wire transaction failed (no presence pulse, CRC, timeout).
    BusReadFailed,
    /// A probe answered but the reading failed the plausibility filter.
    Implausible,
    /// Fewer devices answered the bus enumeration than the rig carries.
    /// Diagnostic only — the control loop keeps running on cached values.
    CountMismatch { expected: u8, detected: u8 },
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BusReadFailed => write!(f, "one-wire read failed"),
            Self::Implausible => write!(f, "reading failed plausibility filter"),
            Self::CountMismatch { expected, detected } => {
                write!(f, "probe count mismatch: expected {expected}, detected {detected}")
            }
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// PWM duty-cycle write failed.
    PwmWriteFailed,
    /// Voltage-sense ADC read failed.
    AdcReadFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PwmWriteFailed => write!(f, "PWM write failed"),
            Self::AdcReadFailed => write!(f, "ADC read failed"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Control errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlError {
    /// `PidController::update` was called before `configure`.
    NotConfigured,
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConfigured => write!(f, "PID updated before configure"),
        }
    }
}

impl From<ControlError> for Error {
    fn from(e: ControlError) -> Self {
        Self::Control(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subsystem_errors_convert_into_the_unified_type() {
        let e: Error = SensorError::BusReadFailed.into();
        assert_eq!(e, Error::Sensor(SensorError::BusReadFailed));

        let e: Error = ActuatorError::PwmWriteFailed.into();
        assert_eq!(e, Error::Actuator(ActuatorError::PwmWriteFailed));

        let e: Error = ControlError::NotConfigured.into();
        assert_eq!(e, Error::Control(ControlError::NotConfigured));
    }

    #[test]
    fn display_includes_the_subsystem_prefix() {
        let e = Error::Sensor(SensorError::CountMismatch {
            expected: 5,
            detected: 3,
        });
        let msg = format!("{e}");
        assert!(msg.starts_with("sensor:"));
        assert!(msg.contains("expected 5"));

        assert_eq!(format!("{}", Error::Init("adc")), "init: adc");
    }
}
