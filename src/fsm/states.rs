//! Concrete state handler functions and table builder.
//!
//! Each state is defined by plain `fn` pointers — no closures, no dynamic
//! dispatch, no heap.  This is the classic embedded C FSM pattern expressed
//! in safe Rust.
//!
//! ```text
//!            ┌──[running ∧ mode=fixed]──▶ RUNNING-FIXED ◀──┐
//!   IDLE ────┤                                │            │ [mode flips]
//!    ▲       └──[running ∧ mode=pid]──▶ RUNNING-PID ◀──────┘
//!    │                                        │
//!    └———————————[running=false]——————————————┘
//! ```
//!
//! Stop is evaluated on every tick, not on sample boundaries: entering
//! Idle zeroes the heater output on the same tick the flag drops.  The
//! closed-loop duty computation for RUNNING-PID lives in the service,
//! which owns the `PidController`; the handlers here only manage
//! transitions and the open-loop fixed duty.

use super::context::ControlContext;
use super::{StateDescriptor, StateId};
use crate::app::commands::ControlMode;
use log::info;

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0 — Idle
        StateDescriptor {
            id: StateId::Idle,
            name: "Idle",
            on_enter: Some(idle_enter),
            on_exit: None,
            on_update: idle_update,
        },
        // Index 1 — RunningFixed
        StateDescriptor {
            id: StateId::RunningFixed,
            name: "RunningFixed",
            on_enter: Some(fixed_enter),
            on_exit: None,
            on_update: fixed_update,
        },
        // Index 2 — RunningPid
        StateDescriptor {
            id: StateId::RunningPid,
            name: "RunningPid",
            on_enter: Some(pid_enter),
            on_exit: None,
            on_update: pid_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE state
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter(ctx: &mut ControlContext) {
    // Heater off immediately — stop must not wait for a sample boundary.
    ctx.outputs.heater_duty_percent = 0.0;
    info!("IDLE: heater forced off");
}

fn idle_update(ctx: &mut ControlContext) -> Option<StateId> {
    if ctx.commands.running {
        return Some(match ctx.commands.mode {
            ControlMode::FixedDuty => StateId::RunningFixed,
            ControlMode::Pid => StateId::RunningPid,
        });
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  RUNNING-FIXED state — open-loop constant duty
// ═══════════════════════════════════════════════════════════════════════════

fn fixed_enter(ctx: &mut ControlContext) {
    info!(
        "FIXED: driving heater at {}%",
        ctx.commands.fixed_duty_percent
    );
    // When entry lands on a sample boundary the first actuation step
    // happens on the same tick instead of waiting a full period.
    if ctx.sample_due {
        ctx.outputs.heater_duty_percent =
            f32::from(ctx.commands.fixed_duty_percent).clamp(0.0, 100.0);
    }
}

fn fixed_update(ctx: &mut ControlContext) -> Option<StateId> {
    if !ctx.commands.running {
        return Some(StateId::Idle);
    }
    if ctx.commands.mode == ControlMode::Pid {
        return Some(StateId::RunningPid);
    }

    if ctx.sample_due {
        ctx.outputs.heater_duty_percent =
            f32::from(ctx.commands.fixed_duty_percent).clamp(0.0, 100.0);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  RUNNING-PID state — closed-loop regulation of the selected node
// ═══════════════════════════════════════════════════════════════════════════

fn pid_enter(ctx: &mut ControlContext) {
    info!(
        "PID: regulating node {} to {:.1} °C",
        ctx.commands.selected_probe, ctx.commands.setpoint_c
    );
}

fn pid_update(ctx: &mut ControlContext) -> Option<StateId> {
    if !ctx.commands.running {
        return Some(StateId::Idle);
    }
    if ctx.commands.mode == ControlMode::FixedDuty {
        return Some(StateId::RunningFixed);
    }
    // Closed-loop duty is computed by the service after this tick.
    None
}
