//! Shared mutable context threaded through every FSM handler.
//!
//! `ControlContext` is the single struct that state handlers read from and
//! write to.  It contains the command snapshot sampled at the top of the
//! tick, the latest probe readings, actuator command outputs, timing
//! information, and configuration.  Think of it as the "blackboard" in a
//! blackboard architecture.

use crate::app::commands::CommandSnapshot;
use crate::config::SystemConfig;
use crate::drivers::cooler::CoolerLevel;
use crate::sensors::PROBE_COUNT;

// ---------------------------------------------------------------------------
// Actuator commands (written by state handlers; applied by the service)
// ---------------------------------------------------------------------------

/// Commands that state handlers write to request actuator actions.
/// The service applies these through the [`ActuatorPort`] after each tick.
///
/// [`ActuatorPort`]: crate::app::ports::ActuatorPort
#[derive(Debug, Clone, Copy, Default)]
pub struct ActuatorCommands {
    /// Desired heater duty (0-100 %).
    pub heater_duty_percent: f32,
    /// Desired fan level; mirrors the command snapshot unless a handler
    /// overrides it.
    pub cooler_level: CoolerLevel,
}

// ---------------------------------------------------------------------------
// ControlContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct ControlContext {
    // -- Timing --
    /// Ticks elapsed since the current state was entered.
    pub ticks_in_state: u64,
    /// Monotonic total tick count.
    pub total_ticks: u64,
    /// True when at least one sampling period has elapsed since the last
    /// actuation step — handlers gate their rate-limited work on this.
    pub sample_due: bool,

    // -- Command input --
    /// Command snapshot sampled once at the top of the tick.
    pub commands: CommandSnapshot,

    // -- Probe data --
    /// Cached probe readings, refreshed on sample boundaries.
    pub probes: [f32; PROBE_COUNT],
    /// Devices seen on the last bus refresh (diagnostic).
    pub probes_detected: u8,

    // -- Actuator outputs --
    /// Commands to be applied to actuators after the FSM tick.
    pub outputs: ActuatorCommands,

    // -- Configuration --
    /// System configuration (tunable parameters).
    pub config: SystemConfig,
}

impl ControlContext {
    /// Create a new context with the given configuration.
    pub fn new(config: SystemConfig) -> Self {
        Self {
            ticks_in_state: 0,
            total_ticks: 0,
            sample_due: false,
            commands: CommandSnapshot::default(),
            probes: [0.0; PROBE_COUNT],
            probes_detected: 0,
            outputs: ActuatorCommands::default(),
            config,
        }
    }

    /// Reading of the probe the command snapshot selects.
    pub fn selected_probe_c(&self) -> f32 {
        self.probes[usize::from(self.commands.selected_probe)]
    }
}
