use super::{
    BodyHandle, BodyType, ColliderDesc, ColliderHandle, JointDesc, JointHandle, MotorJointHandle,
    MotorModel, RigidBodyBackend,
};
use ahash::AHashMap;
use glam::{Quat, Vec3A};

/// The most recent command issued to a motor joint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MotorCommand {
    Position { target: f32, stiffness: f32, damping: f32 },
    Velocity { target: f32, damping: f32 },
}

#[derive(Clone, Debug)]
pub struct BodyRecord {
    pub body_type: BodyType,
    pub translation: Vec3A,
    pub rotation: Quat,
}

#[derive(Clone, Debug)]
pub struct ColliderRecord {
    pub desc: ColliderDesc,
    /// `None` for static colliders created without a parent body
    pub parent: Option<BodyHandle>,
    pub translation: Vec3A,
}

#[derive(Clone, Debug)]
pub struct JointRecord {
    pub desc: JointDesc,
    pub body1: BodyHandle,
    pub body2: BodyHandle,
    pub motor_model: Option<MotorModel>,
}

/// Headless backend that records every descriptor and motor command without
/// simulating anything.
///
/// Bodies keep their spawn transforms, so pose read-back returns whatever a
/// body was created at. Used by this crate's own tests and usable downstream
/// as a mock when wiring a real engine is not wanted.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    next_handle: u32,
    pub bodies: AHashMap<BodyHandle, BodyRecord>,
    pub colliders: AHashMap<ColliderHandle, ColliderRecord>,
    pub joints: AHashMap<JointHandle, JointRecord>,
    pub motor_joints: AHashMap<MotorJointHandle, JointRecord>,
    /// Latest command per motor, overwritten on every set
    pub motor_states: AHashMap<MotorJointHandle, MotorCommand>,
    /// Every command ever issued, in order
    pub command_log: Vec<(MotorJointHandle, MotorCommand)>,
}

impl RecordingBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self) -> u32 {
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }

    #[must_use]
    pub fn latest_command(&self, motor: MotorJointHandle) -> Option<MotorCommand> {
        self.motor_states.get(&motor).copied()
    }

    /// Latest command for every motor, in handle creation order.
    #[must_use]
    pub fn motor_states(&self) -> Vec<(MotorJointHandle, MotorCommand)> {
        let mut states: Vec<_> = self
            .motor_states
            .iter()
            .map(|(handle, command)| (*handle, *command))
            .collect();
        states.sort_by_key(|(handle, _)| handle.0);
        states
    }

    fn record_command(&mut self, motor: MotorJointHandle, command: MotorCommand) {
        self.motor_states.insert(motor, command);
        self.command_log.push((motor, command));
    }
}

impl RigidBodyBackend for RecordingBackend {
    fn create_body(&mut self, body_type: BodyType, translation: Vec3A) -> BodyHandle {
        let handle = BodyHandle(self.alloc());
        self.bodies.insert(
            handle,
            BodyRecord {
                body_type,
                translation,
                rotation: Quat::IDENTITY,
            },
        );
        handle
    }

    fn create_collider(&mut self, body: BodyHandle, desc: ColliderDesc) -> ColliderHandle {
        debug_assert!(self.bodies.contains_key(&body));
        let handle = ColliderHandle(self.alloc());
        self.colliders.insert(
            handle,
            ColliderRecord {
                desc,
                parent: Some(body),
                translation: Vec3A::ZERO,
            },
        );
        handle
    }

    fn create_static_collider(&mut self, desc: ColliderDesc, translation: Vec3A) -> ColliderHandle {
        let handle = ColliderHandle(self.alloc());
        self.colliders.insert(
            handle,
            ColliderRecord {
                desc,
                parent: None,
                translation,
            },
        );
        handle
    }

    fn create_joint(
        &mut self,
        desc: JointDesc,
        body1: BodyHandle,
        body2: BodyHandle,
    ) -> JointHandle {
        let handle = JointHandle(self.alloc());
        self.joints.insert(
            handle,
            JointRecord {
                desc,
                body1,
                body2,
                motor_model: None,
            },
        );
        handle
    }

    fn create_motor_joint(
        &mut self,
        desc: JointDesc,
        body1: BodyHandle,
        body2: BodyHandle,
        model: MotorModel,
    ) -> MotorJointHandle {
        let handle = MotorJointHandle(self.alloc());
        self.motor_joints.insert(
            handle,
            JointRecord {
                desc,
                body1,
                body2,
                motor_model: Some(model),
            },
        );
        handle
    }

    fn set_motor_position(&mut self, motor: MotorJointHandle, target: f32, stiffness: f32, damping: f32) {
        debug_assert!(self.motor_joints.contains_key(&motor));
        self.record_command(
            motor,
            MotorCommand::Position {
                target,
                stiffness,
                damping,
            },
        );
    }

    fn set_motor_velocity(&mut self, motor: MotorJointHandle, target_vel: f32, damping: f32) {
        debug_assert!(self.motor_joints.contains_key(&motor));
        self.record_command(
            motor,
            MotorCommand::Velocity {
                target: target_vel,
                damping,
            },
        );
    }

    fn body_translation(&self, body: BodyHandle) -> Vec3A {
        self.bodies[&body].translation
    }

    fn body_rotation(&self, body: BodyHandle) -> Quat {
        self.bodies[&body].rotation
    }
}
