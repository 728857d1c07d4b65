//! Driven adapters — implementations of the port traits in
//! [`crate::app::ports`] that bridge the domain core to real peripherals
//! and to the logging/telemetry outputs.

pub mod hardware;
pub mod log_sink;
pub mod telemetry_log;
