//! HeatBar Firmware — Main Entry Point
//!
//! Hexagonal architecture around a single cooperative control loop.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │                                                              │
//! │  HardwareAdapter        TelemetryLog ── LogEventSink         │
//! │  (Probe+Actuator)       (EventSink, dashboard pull buffer)   │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ──────────────────      │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────┐      │
//! │  │            ControlService (pure logic)             │      │
//! │  │  FSM · PID · sampling-period gate                  │      │
//! │  └────────────────────────────────────────────────────┘      │
//! │                                                              │
//! │  CommandBoard (atomics) ◀── control-plane transport          │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The control-plane transport (HTTP dashboard) lives outside this crate;
//! it writes the [`CommandBoard`] fields and polls the [`TelemetryLog`]
//! from its own task.
#![deny(unused_must_use)]

use anyhow::Result;
use log::info;

use heatbar::adapters::hardware::HardwareAdapter;
use heatbar::adapters::log_sink::LogEventSink;
use heatbar::adapters::telemetry_log::TelemetryLog;
use heatbar::app::commands::CommandBoard;
use heatbar::app::service::ControlService;
use heatbar::config::SystemConfig;
use heatbar::drivers::cooler::CoolerDriver;
use heatbar::drivers::heater::HeaterDriver;
use heatbar::drivers::hw_init;
use heatbar::pins;
use heatbar::sensors::onewire::Ds18b20Bus;
use heatbar::sensors::ProbeBank;

/// Shared command surface; the transport task writes into it concurrently.
static COMMANDS: CommandBoard = CommandBoard::new();

/// Monotonic milliseconds since boot.
fn now_ms() -> u64 {
    // SAFETY: esp_timer_get_time is safe to call from any task after boot.
    let us = unsafe { esp_idf_svc::sys::esp_timer_get_time() };
    (us / 1000) as u64
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("HeatBar v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Peripherals ────────────────────────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        // Peripheral init failure is critical — log and halt.
        // In production this triggers the watchdog reset after timeout.
        log::error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    let config = SystemConfig::default();
    COMMANDS.set_cooler_level(config.cooler_boot_level);

    // ── 3. Hardware adapter ───────────────────────────────────
    // HeaterDriver::new forces the heater off before the loop starts.
    let mut hw = HardwareAdapter::new(
        Ds18b20Bus::new(pins::PROBE_BUS_GPIO),
        ProbeBank::new(config.probe_valid_min_c),
        HeaterDriver::new(),
        CoolerDriver::new(),
    );

    // ── 4. Event sinks ────────────────────────────────────────
    let mut sink = TelemetryLog::new(LogEventSink::new());

    // ── 5. Control service ────────────────────────────────────
    let mut service = ControlService::new(config);
    service.start(&mut sink);

    info!("System ready. Entering control loop.");

    // ── 6. Control loop ───────────────────────────────────────
    // The service gates its own 1 Hz cadence internally; this loop only
    // re-invokes the tick and yields so the idle task can feed the
    // task watchdog.
    loop {
        service.tick(now_ms(), &COMMANDS, &mut hw, &mut sink);
        std::thread::sleep(std::time::Duration::from_millis(10));
    }
}
