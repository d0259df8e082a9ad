use drivesim::{
    backend::{
        BodyHandle, BodyType, ColliderDesc, ColliderHandle, JointDesc, JointHandle, MotorCommand,
        MotorJointHandle, MotorModel, RecordingBackend, RigidBodyBackend,
    },
    sim::{
        BRAKE_HOLD_DAMPING, BRAKE_HOLD_STIFFNESS, CarConfig, CarController, DRIVE_DAMPING,
        DriveControls, Gear, STEER_STIFFNESS, Wheel,
    },
};
use glam::{Quat, Vec2, Vec3A};
use std::cell::RefCell;

fn is_position_hold(command: MotorCommand) -> bool {
    match command {
        MotorCommand::Position {
            target,
            stiffness,
            damping,
        } => target == 0.0 && stiffness == BRAKE_HOLD_STIFFNESS && damping == BRAKE_HOLD_DAMPING,
        MotorCommand::Velocity { .. } => false,
    }
}

fn steer_targets(backend: &RecordingBackend) -> Vec<f32> {
    backend
        .motor_states()
        .into_iter()
        .filter_map(|(_, command)| match command {
            MotorCommand::Position {
                target, stiffness, ..
            } if stiffness == STEER_STIFFNESS => Some(target),
            _ => None,
        })
        .collect()
}

#[test]
fn wheel_parks_in_position_hold_after_attach() {
    let mut backend = RecordingBackend::new();
    let hub = backend.create_body(BodyType::Dynamic, Vec3A::ZERO);

    let mut wheel = Wheel::new(&mut backend, Vec3A::new(0.2, 0.0, 0.0), Vec2::new(0.15, 0.36), 30.0);
    wheel.attach_to(&mut backend, hub, Vec3A::new(-0.2, 0.0, 0.0));

    let states = backend.motor_states();
    assert_eq!(states.len(), 1);
    assert!(is_position_hold(states[0].1));
}

#[test]
fn wheel_zero_rpm_boundary_selects_motor_mode() {
    let mut backend = RecordingBackend::new();
    let hub = backend.create_body(BodyType::Dynamic, Vec3A::ZERO);

    let mut wheel = Wheel::new(&mut backend, Vec3A::ZERO, Vec2::new(0.15, 0.36), 30.0);
    wheel.attach_to(&mut backend, hub, Vec3A::ZERO);

    // any nonzero rpm stays a velocity target
    wheel.update(&mut backend, 0.0001, 1.0 / 60.0);
    let (motor, command) = backend.motor_states()[0];
    assert_eq!(
        command,
        MotorCommand::Velocity {
            target: 0.0001,
            damping: DRIVE_DAMPING,
        }
    );

    // exactly zero re-engages the position hold
    wheel.update(&mut backend, 0.0, 1.0 / 60.0);
    assert!(is_position_hold(backend.latest_command(motor).unwrap()));
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TickEvent {
    MotorCommand,
    PoseRead,
}

/// Wraps the recording backend to interleave motor commands and pose reads
/// into one event sequence.
#[derive(Default)]
struct SequencingBackend {
    inner: RecordingBackend,
    events: RefCell<Vec<TickEvent>>,
}

impl RigidBodyBackend for SequencingBackend {
    fn create_body(&mut self, body_type: BodyType, translation: Vec3A) -> BodyHandle {
        self.inner.create_body(body_type, translation)
    }

    fn create_collider(&mut self, body: BodyHandle, desc: ColliderDesc) -> ColliderHandle {
        self.inner.create_collider(body, desc)
    }

    fn create_static_collider(&mut self, desc: ColliderDesc, translation: Vec3A) -> ColliderHandle {
        self.inner.create_static_collider(desc, translation)
    }

    fn create_joint(
        &mut self,
        desc: JointDesc,
        body1: BodyHandle,
        body2: BodyHandle,
    ) -> JointHandle {
        self.inner.create_joint(desc, body1, body2)
    }

    fn create_motor_joint(
        &mut self,
        desc: JointDesc,
        body1: BodyHandle,
        body2: BodyHandle,
        model: MotorModel,
    ) -> MotorJointHandle {
        self.inner.create_motor_joint(desc, body1, body2, model)
    }

    fn set_motor_position(&mut self, motor: MotorJointHandle, target: f32, stiffness: f32, damping: f32) {
        self.events.borrow_mut().push(TickEvent::MotorCommand);
        self.inner.set_motor_position(motor, target, stiffness, damping);
    }

    fn set_motor_velocity(&mut self, motor: MotorJointHandle, target_vel: f32, damping: f32) {
        self.events.borrow_mut().push(TickEvent::MotorCommand);
        self.inner.set_motor_velocity(motor, target_vel, damping);
    }

    fn body_translation(&self, body: BodyHandle) -> Vec3A {
        self.events.borrow_mut().push(TickEvent::PoseRead);
        self.inner.body_translation(body)
    }

    fn body_rotation(&self, body: BodyHandle) -> Quat {
        self.events.borrow_mut().push(TickEvent::PoseRead);
        self.inner.body_rotation(body)
    }
}

#[test]
fn motor_commands_precede_pose_readback_within_a_tick() {
    let mut backend = SequencingBackend::default();
    let mut car = CarController::new(&mut backend, CarConfig::BASIC, Vec3A::ZERO);

    // drop assembly-time events, only the tick matters
    backend.events.borrow_mut().clear();

    car.drive(DriveControls {
        throttle: true,
        steer_right: true,
        gear: Some(Gear::First),
        ..Default::default()
    });
    car.update(&mut backend, 1.0 / 60.0);

    let events = backend.events.borrow();
    let first_read = events
        .iter()
        .position(|event| *event == TickEvent::PoseRead)
        .expect("update never read poses back");
    let last_command = events
        .iter()
        .rposition(|event| *event == TickEvent::MotorCommand)
        .expect("update issued no motor commands");
    assert!(
        last_command < first_read,
        "pose read-back at event {first_read} before the last motor command at {last_command}"
    );

    // 4 wheel velocity targets + 4 steer position targets, then a
    // translation and rotation read for each of the 5 tracked parts
    let commands = events
        .iter()
        .filter(|event| **event == TickEvent::MotorCommand)
        .count();
    assert_eq!(commands, 8);
    assert_eq!(events.len() - commands, 10);
}

#[test]
fn car_assembles_fixed_cardinality() {
    let mut backend = RecordingBackend::new();
    let car = CarController::new(&mut backend, CarConfig::BASIC, Vec3A::new(0.0, 1.0, 0.0));

    // chassis + 4 * (wheel, hub, lower arm, upper arm)
    assert_eq!(backend.bodies.len(), 17);
    // per wheel: one drive motor, one steer motor
    assert_eq!(backend.motor_joints.len(), 8);
    // per wheel: arm spherical, 2 chassis revolutes, rope, spring
    assert_eq!(backend.joints.len(), 20);
    // chassis + 4 wheel visuals
    assert_eq!(car.parts().len(), 5);
}

#[test]
fn update_mirrors_body_transforms_onto_parts() {
    let mut backend = RecordingBackend::new();
    let spawn = Vec3A::new(3.0, 1.0, -2.0);
    let mut car = CarController::new(&mut backend, CarConfig::BASIC, spawn);

    car.update(&mut backend, 1.0 / 60.0);

    let parts = car.parts();
    assert_eq!(parts[0].pose.position, spawn);
    for (part, mount) in parts[1..].iter().zip(&car.config().wheel_mounts) {
        assert_eq!(part.pose.position, spawn + mount.offset);
    }
}

#[test]
fn only_steerable_wheels_receive_steer_input() {
    let mut backend = RecordingBackend::new();
    let mut car = CarController::new(&mut backend, CarConfig::BASIC, Vec3A::ZERO);

    car.drive(DriveControls {
        steer_right: true,
        ..Default::default()
    });
    car.update(&mut backend, 1.0 / 60.0);

    let targets = steer_targets(&backend);
    assert_eq!(targets.len(), 4);

    let expected = (-35.0f32).to_radians();
    let steered = targets.iter().filter(|t| (**t - expected).abs() < 1e-6).count();
    let centered = targets.iter().filter(|t| **t == 0.0).count();
    assert_eq!(steered, 2, "front wheels should steer");
    assert_eq!(centered, 2, "rear wheels should hold center");
}

#[test]
fn throttle_reaches_wheel_motors_through_drivetrain() {
    let mut backend = RecordingBackend::new();
    let mut car = CarController::new(&mut backend, CarConfig::BASIC, Vec3A::ZERO);

    car.drive(DriveControls {
        throttle: true,
        gear: Some(Gear::Third),
        ..Default::default()
    });
    // 1/64 is exact in f32, so the whole chain stays exact
    car.update(&mut backend, 1.0 / 64.0);

    let expected_rpm = 3750.0 / 64.0;
    assert_eq!(car.engine().output_rpm, expected_rpm);
    assert_eq!(car.transmission().output_rpm, expected_rpm);

    let driven: Vec<_> = backend
        .motor_states()
        .into_iter()
        .filter(|(_, command)| {
            matches!(
                command,
                MotorCommand::Velocity { target, .. } if *target == expected_rpm
            )
        })
        .collect();
    assert_eq!(driven.len(), 4);
}

#[test]
fn brake_control_forces_position_hold() {
    let mut backend = RecordingBackend::new();
    let mut car = CarController::new(&mut backend, CarConfig::BASIC, Vec3A::ZERO);

    // spin up first so the motors are in velocity mode
    car.drive(DriveControls {
        throttle: true,
        gear: Some(Gear::First),
        ..Default::default()
    });
    car.update(&mut backend, 1.0 / 60.0);
    assert!(car.engine().output_rpm > 0.0);

    car.drive(DriveControls {
        throttle: true,
        brake: true,
        ..Default::default()
    });
    car.update(&mut backend, 1.0 / 60.0);

    let holds = backend
        .motor_states()
        .into_iter()
        .filter(|(_, command)| is_position_hold(*command))
        .count();
    assert_eq!(holds, 4);
}

#[test]
fn set_brake_bypasses_drivetrain_state() {
    let mut backend = RecordingBackend::new();
    let mut car = CarController::new(&mut backend, CarConfig::BASIC, Vec3A::ZERO);

    car.drive(DriveControls {
        throttle: true,
        gear: Some(Gear::First),
        ..Default::default()
    });
    car.update(&mut backend, 1.0 / 60.0);

    car.set_brake(&mut backend);

    let holds = backend
        .motor_states()
        .into_iter()
        .filter(|(_, command)| is_position_hold(*command))
        .count();
    assert_eq!(holds, 4);
    // the engine state is untouched, only the wheel motors were overridden
    assert!(car.engine().output_rpm > 0.0);
}

#[test]
fn update_clamps_runaway_deltas() {
    let mut backend = RecordingBackend::new();
    let mut car = CarController::new(&mut backend, CarConfig::BASIC, Vec3A::ZERO);

    car.drive(DriveControls {
        throttle: true,
        ..Default::default()
    });
    // a 10 second frame hitch advances the engine by at most 0.1s worth
    car.update(&mut backend, 10.0);
    assert_eq!(car.engine().output_rpm, 375.0);
}
