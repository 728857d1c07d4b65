//! PID controller for heater power regulation.
//!
//! Discrete PI law with hard output saturation and a partial anti-windup
//! scheme: the `kb` gain pre-scales the setpoint term inside the
//! proportional component, and the integrator advances from the
//! *unsaturated* error on every update, clamped or not.
//!
//! The controller is created unconfigured and must receive a full
//! [`PidConfig`] through [`PidController::configure`] before the first
//! [`PidController::update`]; updating an unconfigured controller is a
//! programming error and panics rather than silently regulating with
//! zeroed gains.

/// Complete tunable set installed by [`PidController::configure`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PidConfig {
    /// Proportional gain.
    pub kp: f32,
    /// Integral gain.
    pub ki: f32,
    /// Discrete sample time in seconds.
    pub ts: f32,
    /// Anti-windup gain applied to the setpoint inside the proportional term.
    pub kb: f32,
    /// Regulation target, engineering units of the measurement.
    pub setpoint: f32,
    /// Lower output saturation bound.
    pub output_min: f32,
    /// Upper output saturation bound.
    pub output_max: f32,
}

/// PI regulator with integrator state carried across calls.
#[derive(Debug, Default)]
pub struct PidController {
    cfg: PidConfig,
    /// Last saturated output.
    output: f32,
    /// Last measurement fed in.
    measurement: f32,
    /// Integrator accumulator. Unbounded in raw form; its contribution is
    /// limited by `kb`, not by clamping the accumulator itself.
    integrator: f32,
    configured: bool,
}

impl PidController {
    /// An unconfigured controller. All state zero, [`update`] rejected.
    ///
    /// [`update`]: PidController::update
    pub fn new() -> Self {
        Self::default()
    }

    /// Install tunables and reset the control state.
    ///
    /// Discards any prior integrator history — callers re-configure on every
    /// setpoint change, so a target move always restarts integration from
    /// zero.
    pub fn configure(&mut self, cfg: PidConfig) {
        self.cfg = cfg;
        self.output = 0.0;
        self.measurement = 0.0;
        self.integrator = 0.0;
        self.configured = true;
    }

    /// One control step: returns the saturated output for `measurement`.
    ///
    /// # Panics
    ///
    /// Panics if called before [`PidController::configure`].
    pub fn update(&mut self, measurement: f32) -> f32 {
        assert!(
            self.configured,
            "PidController::update called before configure"
        );

        self.measurement = measurement;

        let raw = self.cfg.kp * (self.cfg.kb * self.cfg.setpoint - measurement) + self.integrator;

        // Hard clamp, not a soft limiter.
        self.output = raw.clamp(self.cfg.output_min, self.cfg.output_max);

        // Advance the integrator from the unsaturated error, clamped or not.
        self.integrator += self.cfg.ki * self.cfg.ts * (self.cfg.setpoint - measurement);

        self.output
    }

    /// Whether [`PidController::configure`] has run.
    pub fn is_configured(&self) -> bool {
        self.configured
    }

    /// Currently installed setpoint.
    pub fn setpoint(&self) -> f32 {
        self.cfg.setpoint
    }

    /// Last saturated output.
    pub fn output(&self) -> f32 {
        self.output
    }

    /// Last measurement fed to [`PidController::update`].
    pub fn measurement(&self) -> f32 {
        self.measurement
    }

    /// Integrator accumulator (exposed for telemetry and tests).
    pub fn integrator(&self) -> f32 {
        self.integrator
    }
}
