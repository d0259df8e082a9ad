mod recording;

pub use recording::*;

use glam::{Quat, Vec3A};

/// Opaque handle to a rigid body owned by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BodyHandle(pub(crate) u32);

/// Opaque handle to a collider owned by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ColliderHandle(pub(crate) u32);

/// Handle to a plain (un-motorized) constraint joint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct JointHandle(pub(crate) u32);

/// Handle to a joint that was created with a motor.
///
/// Only this handle type can be commanded with `set_motor_position` /
/// `set_motor_velocity`, so no runtime downcast from a plain joint is ever
/// needed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MotorJointHandle(pub(crate) u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyType {
    Dynamic,
    Fixed,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ColliderShape {
    Cuboid {
        half_extents: Vec3A,
    },
    Cylinder {
        half_height: f32,
        radius: f32,
    },
    RoundCylinder {
        half_height: f32,
        radius: f32,
        border_radius: f32,
    },
    Ball {
        radius: f32,
    },
    Capsule {
        half_height: f32,
        radius: f32,
    },
    ConvexHull {
        points: Vec<Vec3A>,
    },
    TriMesh {
        vertices: Vec<Vec3A>,
        indices: Vec<u32>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct ColliderDesc {
    pub shape: ColliderShape,
    pub mass: f32,
    pub friction: f32,
    pub restitution: f32,
    /// Collision group bitmask in the backend's packed membership/filter format
    pub collision_groups: u32,
    /// Rotation of the shape relative to its parent body
    pub rotation: Quat,
}

impl ColliderDesc {
    #[must_use]
    pub const fn new(shape: ColliderShape) -> Self {
        Self {
            shape,
            mass: 1.0,
            friction: 0.5,
            restitution: 0.0,
            collision_groups: u32::MAX,
            rotation: Quat::IDENTITY,
        }
    }
}

/// Joint descriptors mirror the constraint kinds of the physics backend.
/// All anchors are body-local.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum JointDesc {
    Revolute {
        anchor1: Vec3A,
        anchor2: Vec3A,
        axis: Vec3A,
    },
    Spherical {
        anchor1: Vec3A,
        anchor2: Vec3A,
    },
    Prismatic {
        anchor1: Vec3A,
        anchor2: Vec3A,
        axis: Vec3A,
    },
    Fixed {
        anchor1: Vec3A,
        frame1: Quat,
        anchor2: Vec3A,
        frame2: Quat,
    },
    Spring {
        rest_length: f32,
        stiffness: f32,
        damping: f32,
        anchor1: Vec3A,
        anchor2: Vec3A,
    },
    Rope {
        max_length: f32,
        anchor1: Vec3A,
        anchor2: Vec3A,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MotorModel {
    #[default]
    AccelerationBased,
    ForceBased,
}

/// The rigid-body/constraint physics engine consumed by the rig.
///
/// The simulation core never owns bodies or joints; it holds the opaque
/// handles returned here and commands motors through them each tick. The
/// backend owns body/joint lifetime and advances the world with its own
/// integration step, which the embedding loop calls between the core's motor
/// commands and its pose read-back.
pub trait RigidBodyBackend {
    fn create_body(&mut self, body_type: BodyType, translation: Vec3A) -> BodyHandle;

    fn create_collider(&mut self, body: BodyHandle, desc: ColliderDesc) -> ColliderHandle;

    /// Collider with no parent body, placed at a world translation.
    fn create_static_collider(&mut self, desc: ColliderDesc, translation: Vec3A) -> ColliderHandle;

    fn create_joint(&mut self, desc: JointDesc, body1: BodyHandle, body2: BodyHandle)
    -> JointHandle;

    /// Joint with a motor attached to its free axis.
    fn create_motor_joint(
        &mut self,
        desc: JointDesc,
        body1: BodyHandle,
        body2: BodyHandle,
        model: MotorModel,
    ) -> MotorJointHandle;

    /// Drive the motor toward a target position (radians for revolute axes).
    fn set_motor_position(&mut self, motor: MotorJointHandle, target: f32, stiffness: f32, damping: f32);

    /// Drive the motor toward a target velocity along its free axis.
    fn set_motor_velocity(&mut self, motor: MotorJointHandle, target_vel: f32, damping: f32);

    fn body_translation(&self, body: BodyHandle) -> Vec3A;

    fn body_rotation(&self, body: BodyHandle) -> Quat;
}
