/// Discrete steering input: -1 (left), 0, or 1 (right).
#[derive(Clone, Copy, Debug, Default)]
pub struct Steer {
    pub input: f32,
}

impl Steer {
    #[must_use]
    pub const fn new() -> Self {
        Self { input: 0.0 }
    }

    /// Right wins when both keys are held.
    pub const fn drive(&mut self, left_down: bool, right_down: bool) {
        self.input = if right_down {
            1.0
        } else if left_down {
            -1.0
        } else {
            0.0
        };
    }

    /// Input is applied instantaneously; no smoothing or rate limit.
    pub const fn update(&mut self, _delta: f32) {}
}
