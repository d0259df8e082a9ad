use super::RIG_COLLISION_GROUPS;
use crate::{
    backend::{
        BodyHandle, BodyType, ColliderDesc, ColliderShape, JointDesc, MotorJointHandle,
        MotorModel, RigidBodyBackend,
    },
    math::CYLINDER_AXIS_TO_X,
};
use glam::{Vec2, Vec3A};

/// Stiffness/damping of the position hold that pins wheel rotation while
/// braked or parked.
pub const BRAKE_HOLD_STIFFNESS: f32 = 100_000.0;
pub const BRAKE_HOLD_DAMPING: f32 = 100.0;

/// Damping factor for the velocity-target drive motor.
pub const DRIVE_DAMPING: f32 = 2.0;

/// One rotating rigid body plus the revolute drive joint to its hub.
#[derive(Clone, Copy, Debug)]
pub struct Wheel {
    pub body: BodyHandle,
    /// x = half-width, y = radius
    pub size: Vec2,
    pub mass: f32,
    motor: Option<MotorJointHandle>,
}

impl Wheel {
    pub fn new<B: RigidBodyBackend>(
        backend: &mut B,
        position: Vec3A,
        size: Vec2,
        mass: f32,
    ) -> Self {
        let body = backend.create_body(BodyType::Dynamic, position);

        let mut collider = ColliderDesc::new(ColliderShape::RoundCylinder {
            half_height: size.x - 0.05,
            radius: size.y,
            border_radius: 0.05,
        });
        collider.mass = mass * size.x * size.y;
        collider.collision_groups = RIG_COLLISION_GROUPS;
        collider.rotation = CYLINDER_AXIS_TO_X;
        backend.create_collider(body, collider);

        Self {
            body,
            size,
            mass,
            motor: None,
        }
    }

    /// Creates the revolute drive joint to `hub` with the wheel's rolling
    /// axis free, parked in a position hold until driven.
    pub fn attach_to<B: RigidBodyBackend>(
        &mut self,
        backend: &mut B,
        hub: BodyHandle,
        offset: Vec3A,
    ) {
        let desc = JointDesc::Revolute {
            anchor1: Vec3A::ZERO,
            anchor2: offset,
            axis: Vec3A::X,
        };
        let motor = backend.create_motor_joint(desc, hub, self.body, MotorModel::AccelerationBased);
        backend.set_motor_position(motor, 0.0, BRAKE_HOLD_STIFFNESS, BRAKE_HOLD_DAMPING);
        self.motor = Some(motor);
    }

    /// Commands the drive motor to `rpm`.
    ///
    /// Exactly zero rpm re-engages the position hold: a zero velocity target
    /// under load can still let the wheel roll back on a slope, while the
    /// hold pins rotation outright.
    pub fn update<B: RigidBodyBackend>(&mut self, backend: &mut B, rpm: f32, _delta: f32) {
        let Some(motor) = self.motor else {
            return;
        };

        backend.set_motor_velocity(motor, rpm, DRIVE_DAMPING);
        if rpm == 0.0 {
            backend.set_motor_position(motor, 0.0, BRAKE_HOLD_STIFFNESS, BRAKE_HOLD_DAMPING);
        }
    }
}
