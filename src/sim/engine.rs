#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineConfig {
    pub max_rpm: f32,
    /// RPM gained (throttle held) or shed (throttle released) per second
    pub ramp_rate: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl EngineConfig {
    pub const DEFAULT: Self = Self {
        max_rpm: 5000.0,
        ramp_rate: 3750.0,
    };
}

/// Linear RPM ramp, not a torque curve: the simplest model that still
/// exhibits rise/fall time.
#[derive(Clone, Copy, Debug)]
pub struct Engine {
    config: EngineConfig,
    pub output_rpm: f32,
    throttle_input: f32,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::DEFAULT)
    }
}

impl Engine {
    #[must_use]
    pub const fn new(config: EngineConfig) -> Self {
        Self {
            config,
            output_rpm: 0.0,
            throttle_input: 0.0,
        }
    }

    pub const fn drive(&mut self, throttle_down: bool) {
        self.throttle_input = if throttle_down { 1.0 } else { 0.0 };
    }

    /// Ramps `output_rpm` toward `max_rpm` or 0 depending on throttle state.
    /// The output never leaves `[0, max_rpm]` for any update sequence.
    pub fn update(&mut self, delta: f32) {
        let step = self.config.ramp_rate * delta;
        let ramped = if self.throttle_input > 0.0 {
            self.output_rpm + step
        } else {
            self.output_rpm - step
        };
        self.output_rpm = ramped.clamp(0.0, self.config.max_rpm);
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }
}
