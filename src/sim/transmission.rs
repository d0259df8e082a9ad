/// Selectable gears: reverse plus seven forward ratios.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Gear {
    Reverse,
    #[default]
    First,
    Second,
    Third,
    Fourth,
    Fifth,
    Sixth,
    Seventh,
}

impl Gear {
    /// Input-to-output RPM divisor; negative for reverse.
    #[must_use]
    pub const fn ratio(self) -> f32 {
        match self {
            Self::Reverse => -2.0,
            Self::First => 3.0,
            Self::Second => 2.0,
            Self::Third => 1.0,
            Self::Fourth => 0.5,
            Self::Fifth => 0.33,
            Self::Sixth => 0.25,
            Self::Seventh => 0.2,
        }
    }
}

/// Pure per-tick ratio stage between engine and wheel motors.
///
/// Gear changes apply with zero transition time, so the output jumps
/// discontinuously across a shift. That is the accepted model here; clutch
/// or synchro smoothing would be a new feature, not a fix.
#[derive(Clone, Copy, Debug, Default)]
pub struct Transmission {
    pub input_rpm: f32,
    pub output_rpm: f32,
    pub gear: Gear,
}

impl Transmission {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            input_rpm: 0.0,
            output_rpm: 0.0,
            gear: Gear::First,
        }
    }

    /// Latches a gear while its select key is held; no key keeps the
    /// current gear.
    pub const fn drive(&mut self, select: Option<Gear>) {
        if let Some(gear) = select {
            self.gear = gear;
        }
    }

    pub fn update(&mut self) {
        self.output_rpm = self.input_rpm / self.gear.ratio();
    }
}
