//! Shared command surface between the control-plane transport and the
//! scheduler.
//!
//! The transport (HTTP dashboard, serial console — out of this crate)
//! validates and writes individual fields; the scheduler samples the whole
//! board once per tick.  Every field is an atomic word, so a concurrent
//! writer is tolerated with last-write-wins semantics and the scheduler
//! always reads a consistent, if possibly stale, value per field — no lock,
//! no transaction.
//!
//! The setters defensively clamp to the protocol ranges even though the
//! transport validates first.

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

use serde::{Deserialize, Serialize};

use crate::drivers::cooler::CoolerLevel;
use crate::sensors::{PROBE_NODE_FIRST, PROBE_NODE_LAST};

// ── Protocol ranges (shared with the transport contract) ──────

/// Lowest setpoint accepted at the command boundary (°C).
pub const SETPOINT_MIN_C: f32 = 5.0;
/// Highest setpoint accepted at the command boundary (°C).
pub const SETPOINT_MAX_C: f32 = 90.0;

/// Default regulation target installed at boot (°C).
const BOOT_SETPOINT_C: f32 = 30.0;

// ── Control mode ──────────────────────────────────────────────

/// Which actuation path the running scheduler takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum ControlMode {
    /// Open-loop: heater driven at the commanded fixed duty.
    #[default]
    FixedDuty = 0,
    /// Closed-loop: heater duty from the PID on the selected probe.
    Pid = 1,
}

impl ControlMode {
    /// Decode a raw command value; unknown values fall back to open-loop.
    pub fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::Pid,
            _ => Self::FixedDuty,
        }
    }
}

// ── Snapshot ──────────────────────────────────────────────────

/// Plain-value view of the board, sampled once per scheduler tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommandSnapshot {
    pub running: bool,
    pub mode: ControlMode,
    /// Node slot under regulation (1..=4; slot 0 is the ambient reference).
    pub selected_probe: u8,
    pub setpoint_c: f32,
    pub fixed_duty_percent: u8,
    pub cooler_level: CoolerLevel,
}

impl Default for CommandSnapshot {
    fn default() -> Self {
        Self {
            running: false,
            mode: ControlMode::FixedDuty,
            selected_probe: PROBE_NODE_FIRST as u8,
            setpoint_c: BOOT_SETPOINT_C,
            fixed_duty_percent: 0,
            cooler_level: CoolerLevel::High,
        }
    }
}

// ── Board ─────────────────────────────────────────────────────

/// The shared mutable command state, one atomic word per field.
pub struct CommandBoard {
    running: AtomicBool,
    mode: AtomicU8,
    selected_probe: AtomicU8,
    setpoint_c_bits: AtomicU32,
    fixed_duty_percent: AtomicU8,
    cooler_level: AtomicU8,
}

impl CommandBoard {
    /// Boot defaults: stopped, open-loop, node 1, 30 °C, 0 % duty, fan high.
    pub const fn new() -> Self {
        Self {
            running: AtomicBool::new(false),
            mode: AtomicU8::new(ControlMode::FixedDuty as u8),
            selected_probe: AtomicU8::new(PROBE_NODE_FIRST as u8),
            setpoint_c_bits: AtomicU32::new(BOOT_SETPOINT_C.to_bits()),
            fixed_duty_percent: AtomicU8::new(0),
            cooler_level: AtomicU8::new(CoolerLevel::High as u8),
        }
    }

    pub fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::Relaxed);
    }

    pub fn set_mode(&self, mode: ControlMode) {
        self.mode.store(mode as u8, Ordering::Relaxed);
    }

    /// Select the regulated node; clamped to the controllable slots.
    pub fn set_selected_probe(&self, slot: u8) {
        let slot = slot.clamp(PROBE_NODE_FIRST as u8, PROBE_NODE_LAST as u8);
        self.selected_probe.store(slot, Ordering::Relaxed);
    }

    /// Install a regulation target; clamped to the protocol range.
    pub fn set_setpoint_c(&self, celsius: f32) {
        let celsius = celsius.clamp(SETPOINT_MIN_C, SETPOINT_MAX_C);
        self.setpoint_c_bits
            .store(celsius.to_bits(), Ordering::Relaxed);
    }

    pub fn set_fixed_duty_percent(&self, percent: u8) {
        self.fixed_duty_percent
            .store(percent.min(100), Ordering::Relaxed);
    }

    pub fn set_cooler_level(&self, level: u8) {
        self.cooler_level
            .store(level.min(CoolerLevel::High as u8), Ordering::Relaxed);
    }

    /// Sample every field into a plain value.
    pub fn snapshot(&self) -> CommandSnapshot {
        CommandSnapshot {
            running: self.running.load(Ordering::Relaxed),
            mode: ControlMode::from_u8(self.mode.load(Ordering::Relaxed)),
            selected_probe: self.selected_probe.load(Ordering::Relaxed),
            setpoint_c: f32::from_bits(self.setpoint_c_bits.load(Ordering::Relaxed)),
            fixed_duty_percent: self.fixed_duty_percent.load(Ordering::Relaxed),
            cooler_level: CoolerLevel::from_u8(self.cooler_level.load(Ordering::Relaxed)),
        }
    }
}

impl Default for CommandBoard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boot_snapshot_matches_defaults() {
        let board = CommandBoard::new();
        assert_eq!(board.snapshot(), CommandSnapshot::default());
    }

    #[test]
    fn snapshot_reflects_writes() {
        let board = CommandBoard::new();
        board.set_running(true);
        board.set_mode(ControlMode::Pid);
        board.set_selected_probe(3);
        board.set_setpoint_c(42.5);
        board.set_fixed_duty_percent(60);
        board.set_cooler_level(1);

        let snap = board.snapshot();
        assert!(snap.running);
        assert_eq!(snap.mode, ControlMode::Pid);
        assert_eq!(snap.selected_probe, 3);
        assert!((snap.setpoint_c - 42.5).abs() < 1e-6);
        assert_eq!(snap.fixed_duty_percent, 60);
        assert_eq!(snap.cooler_level, CoolerLevel::Low);
    }

    #[test]
    fn setters_clamp_out_of_range_values() {
        let board = CommandBoard::new();

        board.set_selected_probe(0);
        assert_eq!(board.snapshot().selected_probe, PROBE_NODE_FIRST as u8);
        board.set_selected_probe(99);
        assert_eq!(board.snapshot().selected_probe, PROBE_NODE_LAST as u8);

        board.set_setpoint_c(250.0);
        assert!((board.snapshot().setpoint_c - SETPOINT_MAX_C).abs() < 1e-6);
        board.set_setpoint_c(-10.0);
        assert!((board.snapshot().setpoint_c - SETPOINT_MIN_C).abs() < 1e-6);

        board.set_fixed_duty_percent(250);
        assert_eq!(board.snapshot().fixed_duty_percent, 100);

        board.set_cooler_level(9);
        assert_eq!(board.snapshot().cooler_level, CoolerLevel::High);
    }

    #[test]
    fn unknown_mode_decodes_to_fixed() {
        assert_eq!(ControlMode::from_u8(7), ControlMode::FixedDuty);
        assert_eq!(ControlMode::from_u8(1), ControlMode::Pid);
    }
}
