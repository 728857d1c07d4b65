//! System configuration parameters
//!
//! All tunable parameters for the HeatBar rig. The defaults are the values
//! the rig was commissioned with; the control-plane may override them at
//! runtime through its own validated surface.

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Control cadence ---
    /// Sampling period for actuation and telemetry (milliseconds)
    pub sample_period_ms: u32,

    // --- PID tunables (identified on the commissioned bar) ---
    /// Proportional gain
    pub pid_kp: f32,
    /// Integral gain
    pub pid_ki: f32,
    /// Discrete sample time fed to the integrator (seconds)
    pub pid_ts_s: f32,
    /// Anti-windup gain scaling the setpoint term inside the proportional part
    pub pid_kb: f32,
    /// Lower saturation bound of the controller output (engineering units)
    pub pid_output_min: f32,
    /// Upper saturation bound of the controller output (engineering units)
    pub pid_output_max: f32,
    /// Linear scale from controller output to heater duty percent
    pub pid_to_duty_percent: f32,
    /// Setpoint delta that triggers a PID re-configure (°C)
    pub setpoint_epsilon_c: f32,

    // --- Probes ---
    /// Readings at or below this are treated as open-circuit noise (°C)
    pub probe_valid_min_c: f32,

    // --- Cooler ---
    /// Fan level applied at boot (0-3)
    pub cooler_boot_level: u8,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Cadence
            sample_period_ms: 1000, // 1 Hz

            // PID — identified by step response on the commissioned bar
            pid_kp: 0.354_456_66,
            pid_ki: 0.000_259_315_63,
            pid_ts_s: 1.0,
            pid_kb: 1.0,
            pid_output_min: 0.0,
            pid_output_max: 2.32,
            pid_to_duty_percent: 43.1034, // output_max maps to 100 %
            setpoint_epsilon_c: 1e-6,

            // Probes
            probe_valid_min_c: 5.0,

            // Cooler starts at full speed so the bar can always shed heat
            cooler_boot_level: 3,
        }
    }
}
