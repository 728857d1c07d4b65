//! Integration tests for the CommandBoard → ControlService → actuators
//! pipeline.
//!
//! These run on the host (x86_64) and verify the full scheduler behavior —
//! sampling cadence, mode handling, immediate stop, PID re-arm — without
//! any real hardware.  Time is injected as plain milliseconds.

use crate::mock_hw::{ActuatorCall, MockHardware, RecordingSink};

use heatbar::app::commands::{CommandBoard, ControlMode};
use heatbar::app::events::AppEvent;
use heatbar::app::service::ControlService;
use heatbar::config::SystemConfig;
use heatbar::drivers::cooler::CoolerLevel;
use heatbar::fsm::StateId;

fn make_service() -> (ControlService, MockHardware, RecordingSink, CommandBoard) {
    let config = SystemConfig::default();
    let mut svc = ControlService::new(config);
    let hw = MockHardware::at(20.0);
    let mut sink = RecordingSink::new();
    svc.start(&mut sink);
    (svc, hw, sink, CommandBoard::new())
}

// ── Closed-loop drive and saturation ──────────────────────────

#[test]
fn pid_mode_drives_heater_into_saturation() {
    let (mut svc, mut hw, mut sink, cmds) = make_service();
    cmds.set_running(true);
    cmds.set_mode(ControlMode::Pid);

    // 20 °C against a 30 °C target: raw output 3.54 saturates at 2.32,
    // which the fixed scale maps to full duty.
    svc.tick(0, &cmds, &mut hw, &mut sink);

    assert_eq!(svc.state(), StateId::RunningPid);
    let duty = hw.last_heater_duty().unwrap();
    assert!((duty - 100.0).abs() < 0.01, "expected ~100%, got {duty}");

    let t = sink.last_telemetry().unwrap();
    assert!((t.pid_output - 2.32).abs() < 1e-6);
    assert!((t.heater_duty_percent - duty).abs() < 1e-6);
}

// ── Immediate stop (safety property) ──────────────────────────

#[test]
fn stop_zeroes_heater_on_the_same_tick() {
    let (mut svc, mut hw, mut sink, cmds) = make_service();
    cmds.set_running(true);
    cmds.set_mode(ControlMode::Pid);

    svc.tick(0, &cmds, &mut hw, &mut sink);
    assert!(hw.last_heater_duty().unwrap() > 0.0);

    // Stop lands mid-period: the heater must drop on this very tick,
    // not at the next sample boundary.
    cmds.set_running(false);
    svc.tick(500, &cmds, &mut hw, &mut sink);

    assert_eq!(svc.state(), StateId::Idle);
    assert_eq!(hw.last_heater_duty().unwrap(), 0.0);
}

#[test]
fn stop_from_fixed_mode_is_also_immediate() {
    let (mut svc, mut hw, mut sink, cmds) = make_service();
    cmds.set_running(true);
    cmds.set_mode(ControlMode::FixedDuty);
    cmds.set_fixed_duty_percent(40);

    svc.tick(0, &cmds, &mut hw, &mut sink);
    assert_eq!(hw.last_heater_duty().unwrap(), 40.0);

    cmds.set_running(false);
    svc.tick(250, &cmds, &mut hw, &mut sink);
    assert_eq!(hw.last_heater_duty().unwrap(), 0.0);
}

// ── Setpoint re-arm (integrator reset) ────────────────────────

#[test]
fn setpoint_change_rearms_pid_and_resets_integrator() {
    let config = SystemConfig::default();
    let (ki, kp) = (config.pid_ki, config.pid_kp);

    let mut svc = ControlService::new(config);
    let mut hw = MockHardware::at(29.0);
    let mut sink = RecordingSink::new();
    svc.start(&mut sink);

    let cmds = CommandBoard::new();
    cmds.set_running(true);
    cmds.set_mode(ControlMode::Pid);

    // Four sample boundaries against the 30 °C default target.
    for t in [0, 1000, 2000, 3000] {
        svc.tick(t, &cmds, &mut hw, &mut sink);
    }
    let grown = svc.pid().integrator();
    assert!((grown - 4.0 * ki * 1.0).abs() < 1e-7);

    // Move the target: the next boundary re-configures the controller,
    // so its output momentarily drops to the pure-proportional term.
    cmds.set_setpoint_c(31.0);
    svc.tick(4000, &cmds, &mut hw, &mut sink);

    let t = sink.last_telemetry().unwrap();
    assert!((t.pid_output - kp * 2.0).abs() < 1e-5);
    assert!((svc.pid().integrator() - ki * 2.0).abs() < 1e-7);
    assert!(svc.pid().integrator() < grown);
}

// ── Fixed mode ────────────────────────────────────────────────

#[test]
fn fixed_mode_applies_commanded_duty_each_period() {
    let (mut svc, mut hw, mut sink, cmds) = make_service();
    cmds.set_running(true);
    cmds.set_mode(ControlMode::FixedDuty);
    cmds.set_fixed_duty_percent(55);

    svc.tick(0, &cmds, &mut hw, &mut sink);
    assert_eq!(svc.state(), StateId::RunningFixed);
    assert_eq!(hw.last_heater_duty().unwrap(), 55.0);

    // A duty change mid-period only takes effect on the next boundary.
    cmds.set_fixed_duty_percent(80);
    svc.tick(400, &cmds, &mut hw, &mut sink);
    assert_eq!(hw.last_heater_duty().unwrap(), 55.0);

    svc.tick(1000, &cmds, &mut hw, &mut sink);
    assert_eq!(hw.last_heater_duty().unwrap(), 80.0);
}

#[test]
fn mode_flip_moves_between_running_states() {
    let (mut svc, mut hw, mut sink, cmds) = make_service();
    cmds.set_running(true);
    cmds.set_mode(ControlMode::Pid);

    svc.tick(0, &cmds, &mut hw, &mut sink);
    assert_eq!(svc.state(), StateId::RunningPid);

    cmds.set_mode(ControlMode::FixedDuty);
    cmds.set_fixed_duty_percent(25);
    svc.tick(1000, &cmds, &mut hw, &mut sink);
    assert_eq!(svc.state(), StateId::RunningFixed);
    assert_eq!(hw.last_heater_duty().unwrap(), 25.0);

    cmds.set_mode(ControlMode::Pid);
    svc.tick(2000, &cmds, &mut hw, &mut sink);
    assert_eq!(svc.state(), StateId::RunningPid);
}

// ── Sampling cadence ──────────────────────────────────────────

#[test]
fn refresh_and_telemetry_ride_the_sample_cadence() {
    let (mut svc, mut hw, mut sink, cmds) = make_service();

    for t in [0, 10, 20, 1000, 1010, 2000] {
        svc.tick(t, &cmds, &mut hw, &mut sink);
    }

    // Boundaries at 0, 1000 and 2000 only.
    assert_eq!(hw.refreshes, 3);
    assert_eq!(sink.telemetry_count(), 3);
    assert_eq!(svc.tick_count(), 6);
}

// ── Cooler pass-through ───────────────────────────────────────

#[test]
fn cooler_command_applies_while_stopped() {
    let (mut svc, mut hw, mut sink, cmds) = make_service();
    cmds.set_cooler_level(1);

    svc.tick(0, &cmds, &mut hw, &mut sink);
    assert_eq!(svc.state(), StateId::Idle);
    assert!(hw
        .calls
        .iter()
        .any(|c| *c == ActuatorCall::SetCoolerLevel(CoolerLevel::Low)));
}

// ── Probe diagnostics ─────────────────────────────────────────

#[test]
fn count_mismatch_is_reported_once_and_not_fatal() {
    let (mut svc, mut hw, mut sink, cmds) = make_service();
    cmds.set_running(true);
    cmds.set_mode(ControlMode::FixedDuty);
    cmds.set_fixed_duty_percent(30);
    hw.detected = 3;

    svc.tick(0, &cmds, &mut hw, &mut sink);
    svc.tick(1000, &cmds, &mut hw, &mut sink);

    let mismatches = sink
        .events
        .iter()
        .filter(|e| matches!(e, AppEvent::ProbeCountMismatch { .. }))
        .count();
    assert_eq!(mismatches, 1, "mismatch event must not repeat every tick");

    // Control kept running through the degradation.
    assert_eq!(svc.state(), StateId::RunningFixed);
    assert_eq!(hw.last_heater_duty().unwrap(), 30.0);
    assert_eq!(sink.last_telemetry().unwrap().probes_detected, 3);
}

// ── Full stack: sticky cache through the hardware adapter ─────

#[test]
fn probe_glitch_keeps_last_good_reading_in_telemetry() {
    use heatbar::adapters::hardware::HardwareAdapter;
    use heatbar::drivers::cooler::CoolerDriver;
    use heatbar::drivers::heater::HeaterDriver;
    use heatbar::sensors::{
        sim_clear_probe, sim_set_probe_c, ProbeBank, SimProbeBus, PROBE_COUNT,
    };

    let config = SystemConfig::default();
    let valid_min = config.probe_valid_min_c;
    let mut svc = ControlService::new(config);
    let mut sink = RecordingSink::new();
    let mut hw = HardwareAdapter::new(
        SimProbeBus,
        ProbeBank::new(valid_min),
        HeaterDriver::new(),
        CoolerDriver::new(),
    );
    let cmds = CommandBoard::new();
    svc.start(&mut sink);

    for slot in 0..PROBE_COUNT {
        sim_set_probe_c(slot, 24.5);
    }
    svc.tick(0, &cmds, &mut hw, &mut sink);
    assert_eq!(sink.last_telemetry().unwrap().probes_c, [24.5; PROBE_COUNT]);

    // Slot 2 glitches to an implausible value, slot 1 stops answering.
    sim_set_probe_c(2, 2.0);
    sim_clear_probe(1);
    svc.tick(1000, &cmds, &mut hw, &mut sink);

    let t = sink.last_telemetry().unwrap();
    assert_eq!(t.probes_c[2], 24.5);
    assert_eq!(t.probes_c[1], 24.5);

    // Recovery overwrites the cache again.
    sim_set_probe_c(2, 26.0);
    svc.tick(2000, &cmds, &mut hw, &mut sink);
    assert_eq!(sink.last_telemetry().unwrap().probes_c[2], 26.0);
}
