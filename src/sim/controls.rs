use super::Gear;

/// Logical key state sampled by the embedding input layer.
///
/// Only discrete booleans are modeled; there is no analog input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DriveControls {
    pub throttle: bool,
    /// Emergency stop: forces every wheel motor into a position hold,
    /// bypassing the drivetrain chain
    pub brake: bool,
    pub steer_left: bool,
    pub steer_right: bool,
    /// `Some` while a gear-select key is held; the transmission latches it
    pub gear: Option<Gear>,
}

impl DriveControls {
    pub const DEFAULT: Self = Self {
        throttle: false,
        brake: false,
        steer_left: false,
        steer_right: false,
        gear: None,
    };
}
