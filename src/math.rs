use glam::Quat;
use std::f32::consts::FRAC_1_SQRT_2;

/// Rotates the backend cylinder's native local-Y spin axis onto local X
/// (-90 degrees about Z).
///
/// Every cylinder collider in the rig (arms, hub, wheel) spins about its
/// local X axis, so this one correction is applied at descriptor-build time
/// instead of scattering per-site rotation literals.
pub const CYLINDER_AXIS_TO_X: Quat = Quat::from_xyzw(0.0, 0.0, -FRAC_1_SQRT_2, FRAC_1_SQRT_2);

/// Upper bound on the per-tick delta fed to the simulation, bounding
/// integration error during frame hitches.
pub const MAX_TICK_DELTA: f32 = 0.1;
