use super::RIG_COLLISION_GROUPS;
use crate::{
    backend::{
        BodyHandle, BodyType, ColliderDesc, ColliderShape, JointDesc, MotorJointHandle,
        MotorModel, RigidBodyBackend,
    },
    math::CYLINDER_AXIS_TO_X,
};
use glam::Vec3A;
use log::warn;

/// Position-motor gains for the steer motor, tuned for responsiveness
/// against linkage stability.
pub const STEER_STIFFNESS: f32 = 10_000.0;
pub const STEER_DAMPING: f32 = 100.0;

/// Spring element between chassis and wheel hub.
const SPRING_STIFFNESS: f32 = 20_000.0;
const SPRING_DAMPING: f32 = 1_000.0;

const ARM_RADIUS: f32 = 0.05;
const HUB_HALF_HEIGHT: f32 = 0.05;
const HUB_RADIUS: f32 = 0.25;

/// Double-wishbone-like linkage: lower arm, upper arm, and wheel hub,
/// sprung against the chassis with a rope (hard droop limit) and a spring
/// (compliant ride).
///
/// `size.x` is the hub offset from the mount point (signed by vehicle
/// side), `size.y` the vertical span between the arms. Once attached, the
/// linkage's instantaneous configuration is owned by the physics solver;
/// this struct only commands the steer motor.
#[derive(Clone, Copy, Debug)]
pub struct Suspension {
    pub wheel_hub: BodyHandle,
    lower_arm: BodyHandle,
    upper_arm: BodyHandle,
    steer_motor: MotorJointHandle,
    size: Vec3A,
    /// Degrees; applied as `input * -max` in radians
    max_steer_angle: f32,
}

impl Suspension {
    pub fn new<B: RigidBodyBackend>(
        backend: &mut B,
        position: Vec3A,
        size: Vec3A,
        mass: f32,
        max_steer_angle: f32,
    ) -> Self {
        if size.x == 0.0 {
            warn!("suspension at {position} has zero hub offset, linkage will be degenerate");
        }

        let hub_pos = position + Vec3A::new(size.x, 0.0, 0.0);
        let lower_arm_pos = position + Vec3A::new(size.x / 2.0, -size.y / 2.0, 0.0);
        let upper_arm_pos = position + Vec3A::new(size.x / 2.0, size.y / 2.0, 0.0);

        let wheel_hub = backend.create_body(BodyType::Dynamic, hub_pos);
        let lower_arm = backend.create_body(BodyType::Dynamic, lower_arm_pos);
        let upper_arm = backend.create_body(BodyType::Dynamic, upper_arm_pos);

        // The lower joint pins hub translation, the upper one carries the
        // steer motor about local Y so the hub stays free to yaw.
        backend.create_joint(
            JointDesc::Spherical {
                anchor1: Vec3A::new(size.x / 2.0, 0.0, 0.0),
                anchor2: Vec3A::new(0.0, -size.y / 2.0, 0.0),
            },
            lower_arm,
            wheel_hub,
        );
        let steer_motor = backend.create_motor_joint(
            JointDesc::Revolute {
                anchor1: Vec3A::new(size.x / 2.0, 0.0, 0.0),
                anchor2: Vec3A::new(0.0, size.y / 2.0, 0.0),
                axis: Vec3A::Y,
            },
            upper_arm,
            wheel_hub,
            MotorModel::ForceBased,
        );
        backend.set_motor_position(steer_motor, 0.0, STEER_STIFFNESS, STEER_DAMPING);

        let arm_half_length = size.x.abs() / 2.0;
        for arm in [lower_arm, upper_arm] {
            let mut collider = ColliderDesc::new(ColliderShape::Cylinder {
                half_height: arm_half_length,
                radius: ARM_RADIUS,
            });
            collider.mass = mass * size.x.abs() / 2.0;
            collider.collision_groups = RIG_COLLISION_GROUPS;
            collider.rotation = CYLINDER_AXIS_TO_X;
            backend.create_collider(arm, collider);
        }

        let mut hub_collider = ColliderDesc::new(ColliderShape::Cylinder {
            half_height: HUB_HALF_HEIGHT,
            radius: HUB_RADIUS,
        });
        hub_collider.mass = mass;
        hub_collider.collision_groups = RIG_COLLISION_GROUPS;
        hub_collider.rotation = CYLINDER_AXIS_TO_X;
        backend.create_collider(wheel_hub, hub_collider);

        Self {
            wheel_hub,
            lower_arm,
            upper_arm,
            steer_motor,
            size,
            max_steer_angle,
        }
    }

    /// Hangs the linkage off a chassis point: revolute joints for both arms
    /// plus the rope/spring pair to the hub that caps droop while keeping
    /// the ride compliant.
    pub fn attach_to<B: RigidBodyBackend>(
        &self,
        backend: &mut B,
        chassis: BodyHandle,
        offset: Vec3A,
    ) {
        backend.create_joint(
            JointDesc::Revolute {
                anchor1: offset + Vec3A::new(0.0, -self.size.y / 2.0, 0.0),
                anchor2: Vec3A::new(-self.size.x / 2.0, 0.0, 0.0),
                axis: Vec3A::Z,
            },
            chassis,
            self.lower_arm,
        );
        backend.create_joint(
            JointDesc::Revolute {
                anchor1: offset + Vec3A::new(0.0, self.size.y / 2.0, 0.0),
                anchor2: Vec3A::new(-self.size.x / 2.0, 0.0, 0.0),
                axis: Vec3A::Z,
            },
            chassis,
            self.upper_arm,
        );

        backend.create_joint(
            JointDesc::Rope {
                max_length: self.size.y / 2.0,
                anchor1: offset + Vec3A::new(self.size.x, 0.0, 0.0),
                anchor2: Vec3A::new(0.0, self.size.y / 2.0, 0.0),
            },
            chassis,
            self.wheel_hub,
        );
        backend.create_joint(
            JointDesc::Spring {
                rest_length: self.size.y,
                stiffness: SPRING_STIFFNESS,
                damping: SPRING_DAMPING,
                anchor1: offset + Vec3A::new(self.size.x, self.size.y + 0.25, 0.0),
                anchor2: Vec3A::new(0.0, self.size.y / 2.0, 0.0),
            },
            chassis,
            self.wheel_hub,
        );
    }

    /// Commands the steer motor to hold `steer_input * -max_steer_angle`.
    pub fn update<B: RigidBodyBackend>(&self, backend: &mut B, steer_input: f32) {
        let target = (steer_input * -self.max_steer_angle).to_radians();
        backend.set_motor_position(self.steer_motor, target, STEER_STIFFNESS, STEER_DAMPING);
    }
}
