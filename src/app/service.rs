//! Control service — the hexagonal core.
//!
//! [`ControlService`] owns the FSM, the PID controller, and the shared
//! context.  It exposes a clean, hardware-agnostic API.  All I/O flows
//! through port traits injected at call sites, making the entire service
//! testable with mock adapters.
//!
//! ```text
//!    ProbePort ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                  │     ControlService     │
//! ActuatorPort ◀── │      FSM  ·  PID       │ ◀── CommandBoard
//!                  └────────────────────────┘
//! ```
//!
//! [`tick`](ControlService::tick) is designed to be called on every
//! iteration of the host's main loop, at whatever rate that runs.  The
//! lower-rate work — probe refresh, actuation step, telemetry — is gated
//! internally by comparing the caller-supplied monotonic time against the
//! sampling period.  Nothing in here sleeps or blocks; stopping is the
//! one action that takes effect on the very tick the `running` flag
//! drops, sample boundary or not.

use log::info;

use crate::app::commands::CommandBoard;
use crate::config::SystemConfig;
use crate::control::pid::{PidConfig, PidController};
use crate::fsm::context::ControlContext;
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};
use crate::sensors::PROBE_COUNT;

use super::events::{AppEvent, TelemetrySnapshot};
use super::ports::{ActuatorPort, EventSink, ProbePort};

// ───────────────────────────────────────────────────────────────
// ControlService
// ───────────────────────────────────────────────────────────────

/// The control service orchestrates all domain logic.
pub struct ControlService {
    fsm: Fsm,
    ctx: ControlContext,
    /// PID controller for closed-loop heater regulation.  Unconfigured
    /// until the first closed-loop actuation step installs the snapshot
    /// setpoint.
    pid: PidController,
    /// Setpoint the PID was last configured with; a snapshot setpoint
    /// beyond `setpoint_epsilon_c` of this re-arms the controller.
    configured_setpoint_c: f32,
    /// Monotonic time of the last sample boundary, `None` before the first.
    last_sample_ms: Option<u64>,
    /// Last saturated PID output, kept for telemetry between boundaries.
    last_pid_output: f32,
    tick_count: u64,
}

impl ControlService {
    /// Construct the service from configuration.
    ///
    /// Does **not** start the FSM — call [`start`](ControlService::start)
    /// next.
    pub fn new(config: SystemConfig) -> Self {
        let ctx = ControlContext::new(config);
        let state_table = build_state_table();
        let fsm = Fsm::new(state_table, StateId::Idle);

        Self {
            fsm,
            ctx,
            pid: PidController::new(),
            configured_setpoint_c: f32::NAN,
            last_sample_ms: None,
            last_pid_output: 0.0,
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Start the FSM in its initial state (Idle, heater off).
    pub fn start(&mut self, sink: &mut impl EventSink) {
        self.fsm.start(&mut self.ctx);
        sink.emit(&AppEvent::Started(self.fsm.current_state()));
        info!("ControlService started in {:?}", self.fsm.current_state());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one scheduler tick: sample commands → refresh probes →
    /// FSM → closed-loop actuation → apply actuators → telemetry.
    ///
    /// * `now_ms` — monotonic milliseconds supplied by the driver loop.
    /// * `cmds` — the shared command board the transport writes into.
    /// * `hw` — satisfies **both** [`ProbePort`] and [`ActuatorPort`];
    ///   this avoids a double mutable borrow while keeping the port
    ///   boundary explicit.
    pub fn tick(
        &mut self,
        now_ms: u64,
        cmds: &CommandBoard,
        hw: &mut (impl ProbePort + ActuatorPort),
        sink: &mut impl EventSink,
    ) {
        self.tick_count += 1;
        let prev_state = self.fsm.current_state();

        // 1. Sample the command surface once; no mid-tick re-reads.
        self.ctx.commands = cmds.snapshot();

        // 2. Sampling-period gate from caller-supplied monotonic time.
        let due = match self.last_sample_ms {
            None => true,
            Some(t) => now_ms.saturating_sub(t) >= u64::from(self.ctx.config.sample_period_ms),
        };
        self.ctx.sample_due = due;

        // 3. Probe refresh only on the sample boundary.
        if due {
            self.last_sample_ms = Some(now_ms);
            hw.refresh_probes();
            self.ctx.probes = hw.probe_readings();

            let detected = hw.probes_detected();
            if detected != self.ctx.probes_detected && detected != PROBE_COUNT as u8 {
                sink.emit(&AppEvent::ProbeCountMismatch {
                    expected: PROBE_COUNT as u8,
                    detected,
                });
            }
            self.ctx.probes_detected = detected;
        }

        // 4. The fan follows the command snapshot, running or not.
        self.ctx.outputs.cooler_level = self.ctx.commands.cooler_level;

        // 5. FSM tick: transitions plus the open-loop duty path.
        self.fsm.tick(&mut self.ctx);

        // 6. Closed-loop duty on the sample boundary.
        if self.fsm.current_state() == StateId::RunningPid && due {
            self.rearm_pid_if_needed();

            let measurement = self.ctx.selected_probe_c();
            let output = self.pid.update(measurement);
            self.last_pid_output = output;

            let percent = (output * self.ctx.config.pid_to_duty_percent).clamp(0.0, 100.0);
            self.ctx.outputs.heater_duty_percent = percent;
        }

        // 7. Apply actuator commands through the port.
        hw.set_cooler_level(self.ctx.outputs.cooler_level);
        hw.set_heater_duty(self.ctx.outputs.heater_duty_percent);

        // 8. Telemetry rides the sample cadence.
        if due {
            sink.emit(&AppEvent::Telemetry(self.build_telemetry(hw)));
        }

        // 9. Surface state changes.
        let new_state = self.fsm.current_state();
        if new_state != prev_state {
            sink.emit(&AppEvent::StateChanged {
                from: prev_state,
                to: new_state,
            });
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Build a telemetry snapshot from the current context.
    pub fn build_telemetry(&self, hw: &mut impl ActuatorPort) -> TelemetrySnapshot {
        TelemetrySnapshot {
            state: self.fsm.current_state(),
            probes_c: self.ctx.probes,
            heater_power_w: hw.heater_power_w(),
            heater_duty_percent: hw.heater_duty_percent(),
            pid_output: self.last_pid_output,
            running: self.ctx.commands.running,
            mode: self.ctx.commands.mode,
            selected_probe: self.ctx.commands.selected_probe,
            setpoint_c: self.ctx.commands.setpoint_c,
            fixed_duty_percent: self.ctx.commands.fixed_duty_percent,
            cooler_level: self.ctx.commands.cooler_level,
            probes_expected: PROBE_COUNT as u8,
            probes_detected: self.ctx.probes_detected,
        }
    }

    /// Current FSM state.
    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    /// Total scheduler ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// The PID controller (read access for telemetry consumers and tests).
    pub fn pid(&self) -> &PidController {
        &self.pid
    }

    // ── Internal ──────────────────────────────────────────────

    /// Install the snapshot setpoint into the PID when it moved (or on the
    /// first closed-loop step).  Configuring resets the integrator — an
    /// accepted trade-off: a target move restarts integration from zero.
    fn rearm_pid_if_needed(&mut self) {
        let setpoint = self.ctx.commands.setpoint_c;
        let moved = !self.pid.is_configured()
            || (setpoint - self.configured_setpoint_c).abs() > self.ctx.config.setpoint_epsilon_c;
        if !moved {
            return;
        }

        let cfg = &self.ctx.config;
        self.pid.configure(PidConfig {
            kp: cfg.pid_kp,
            ki: cfg.pid_ki,
            ts: cfg.pid_ts_s,
            kb: cfg.pid_kb,
            setpoint,
            output_min: cfg.pid_output_min,
            output_max: cfg.pid_output_max,
        });
        self.configured_setpoint_c = setpoint;
        info!("PID re-armed at {:.1} °C (integrator reset)", setpoint);
    }
}
