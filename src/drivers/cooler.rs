//! Cooling fan drive.
//!
//! The fan runs at one of four discrete levels; each maps to a fixed PWM
//! duty. The discrete representation is canonical everywhere — command
//! boundary, telemetry and this driver all speak [`CoolerLevel`].

use serde::{Deserialize, Serialize};

use crate::drivers::hw_init;
use crate::pins;

/// Discrete fan speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum CoolerLevel {
    #[default]
    Off = 0,
    Low = 1,
    Mid = 2,
    High = 3,
}

impl CoolerLevel {
    /// Decode a raw command value. Anything outside 0-3 turns the fan off.
    pub fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::Low,
            2 => Self::Mid,
            3 => Self::High,
            _ => Self::Off,
        }
    }

    /// Fixed duty mapping: Off/Low/Mid/High → 0/33/66/100 %.
    pub fn duty_percent(self) -> u8 {
        match self {
            Self::Off => 0,
            Self::Low => 33,
            Self::Mid => 66,
            Self::High => 100,
        }
    }
}

/// Fan actuator with level readback.
pub struct CoolerDriver {
    level: CoolerLevel,
}

impl CoolerDriver {
    /// Driver with the fan off.
    pub fn new() -> Self {
        let mut drv = Self {
            level: CoolerLevel::Off,
        };
        drv.set_level(CoolerLevel::Off);
        drv
    }

    /// Apply a fan level.
    pub fn set_level(&mut self, level: CoolerLevel) {
        let duty_8bit = (u16::from(level.duty_percent()) * 255 / 100) as u8;
        hw_init::ledc_set(pins::LEDC_CH_COOLER, duty_8bit);
        self.level = level;
    }

    /// Last applied level.
    pub fn level(&self) -> CoolerLevel {
        self.level
    }
}

impl Default for CoolerDriver {
    fn default() -> Self {
        Self::new()
    }
}
