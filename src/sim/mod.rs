mod car;
mod car_config;
mod controls;
mod engine;
mod steer;
mod suspension;
mod transmission;
mod wheel;

pub use car::*;
pub use car_config::*;
pub use controls::*;
pub use engine::*;
pub use steer::*;
pub use suspension::*;
pub use transmission::*;
pub use wheel::*;

/// Packed membership/filter groups shared by every body of the wheel rig,
/// so the linkage never collides with itself.
pub(crate) const RIG_COLLISION_GROUPS: u32 = 262_145;

/// Packed membership/filter groups for the chassis hull.
pub(crate) const CHASSIS_COLLISION_GROUPS: u32 = 131_073;
