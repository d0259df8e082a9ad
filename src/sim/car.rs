use super::{
    CHASSIS_COLLISION_GROUPS, CarConfig, DriveControls, Engine, EngineConfig, Steer, Suspension,
    Transmission, Wheel,
};
use crate::{
    backend::{BodyHandle, BodyType, ColliderDesc, ColliderShape, RigidBodyBackend},
    math::MAX_TICK_DELTA,
};
use arrayvec::ArrayVec;
use glam::{Quat, Vec3A};
use log::info;

const NUM_WHEELS: usize = 4;
/// Chassis plus four wheels
const NUM_PARTS: usize = 1 + NUM_WHEELS;

/// World pose written once per tick for the renderer to consume.
#[derive(Clone, Copy, Debug, Default)]
pub struct PartPose {
    pub position: Vec3A,
    pub rotation: Quat,
}

/// A simulated body mirrored onto a visual part.
#[derive(Clone, Copy, Debug)]
pub struct CarPart {
    pub body: BodyHandle,
    /// Fixed part-local correction multiplied into the body rotation
    local_rotation: Quat,
    pub pose: PartPose,
}

impl CarPart {
    const fn new(body: BodyHandle, local_rotation: Quat) -> Self {
        Self {
            body,
            local_rotation,
            pose: PartPose {
                position: Vec3A::ZERO,
                rotation: Quat::IDENTITY,
            },
        }
    }
}

/// One chassis, four suspension+wheel assemblies, and the
/// engine/transmission/steer triad.
///
/// Per-tick contract with the embedding loop: call [`CarController::update`]
/// *before* the backend's integration step so motor targets are consumed by
/// it, and read [`CarController::parts`] *after* the step (the poses written
/// by `update` reflect the previous step's transforms). Reordering yields
/// visuals one frame behind, not a crash.
pub struct CarController {
    pub body: BodyHandle,
    pub controls: DriveControls,
    config: CarConfig,
    suspensions: ArrayVec<Suspension, NUM_WHEELS>,
    wheels: ArrayVec<Wheel, NUM_WHEELS>,
    engine: Engine,
    transmission: Transmission,
    steer: Steer,
    parts: ArrayVec<CarPart, NUM_PARTS>,
}

impl CarController {
    pub fn new<B: RigidBodyBackend>(
        backend: &mut B,
        config: CarConfig,
        position: Vec3A,
    ) -> Self {
        let body = backend.create_body(BodyType::Dynamic, position);
        let mut chassis_collider = ColliderDesc::new(ColliderShape::Cuboid {
            half_extents: config.body.half_extents,
        });
        chassis_collider.mass = config.body.mass;
        chassis_collider.collision_groups = CHASSIS_COLLISION_GROUPS;
        backend.create_collider(body, chassis_collider);

        let mut parts = ArrayVec::new();
        parts.push(CarPart::new(body, config.body.part_rotation));

        let mut wheels = ArrayVec::new();
        let mut suspensions = ArrayVec::new();

        for mount in &config.wheel_mounts {
            let side = if mount.offset.x > 0.0 { 1.0 } else { -1.0 };
            let wheel_pos = position + mount.offset;
            let mut wheel = Wheel::new(backend, wheel_pos, mount.wheel_size, mount.wheel_mass);

            // The linkage sits inboard of the wheel by one hub offset plus
            // the wheel's half-width (with a small clearance gap).
            let size = Vec3A::new(mount.arm_length * side, mount.arm_span, 0.25);
            let wheel_half_width = (mount.wheel_size.x + 0.02) * side;
            let inboard = Vec3A::new(size.x + wheel_half_width, 0.0, 0.0);
            let suspension = Suspension::new(
                backend,
                wheel_pos - inboard,
                size,
                mount.suspension_mass,
                mount.max_steer_angle,
            );

            wheel.attach_to(
                backend,
                suspension.wheel_hub,
                Vec3A::new(-wheel_half_width, 0.0, 0.0),
            );
            suspension.attach_to(backend, body, mount.offset - inboard);

            parts.push(CarPart::new(wheel.body, mount.part_rotation));
            wheels.push(wheel);
            suspensions.push(suspension);
        }

        info!(
            "assembled car at {position}: {} wheels, {} tracked parts",
            wheels.len(),
            parts.len()
        );

        Self {
            body,
            controls: DriveControls::DEFAULT,
            config,
            suspensions,
            wheels,
            engine: Engine::new(EngineConfig::DEFAULT),
            transmission: Transmission::new(),
            steer: Steer::new(),
            parts,
        }
    }

    /// Stores the input sampled by the embedding loop for the next update.
    pub const fn drive(&mut self, controls: DriveControls) {
        self.controls = controls;
    }

    /// Advances the drivetrain one tick and mirrors body transforms onto the
    /// tracked parts.
    pub fn update<B: RigidBodyBackend>(&mut self, backend: &mut B, delta: f32) {
        let delta = delta.min(MAX_TICK_DELTA);

        self.engine.drive(self.controls.throttle);
        self.steer.drive(self.controls.steer_left, self.controls.steer_right);
        self.transmission.drive(self.controls.gear);

        self.engine.update(delta);
        self.steer.update(delta);
        self.transmission.input_rpm = self.engine.output_rpm;
        self.transmission.update();

        let rpm = if self.controls.brake {
            0.0
        } else {
            self.transmission.output_rpm
        };
        for wheel in &mut self.wheels {
            wheel.update(backend, rpm, delta);
        }
        for (suspension, mount) in self.suspensions.iter().zip(&self.config.wheel_mounts) {
            let input = if mount.steerable { self.steer.input } else { 0.0 };
            suspension.update(backend, input);
        }

        for part in &mut self.parts {
            part.pose.position = backend.body_translation(part.body);
            part.pose.rotation = backend.body_rotation(part.body) * part.local_rotation;
        }
    }

    /// Emergency stop: position-holds every wheel motor, bypassing the
    /// drivetrain chain entirely.
    pub fn set_brake<B: RigidBodyBackend>(&mut self, backend: &mut B) {
        for wheel in &mut self.wheels {
            wheel.update(backend, 0.0, 0.0);
        }
    }

    /// Poses of every tracked part, refreshed by the last `update`.
    #[must_use]
    pub fn parts(&self) -> &[CarPart] {
        &self.parts
    }

    #[must_use]
    pub const fn engine(&self) -> &Engine {
        &self.engine
    }

    #[must_use]
    pub const fn transmission(&self) -> &Transmission {
        &self.transmission
    }

    #[must_use]
    pub const fn steer(&self) -> &Steer {
        &self.steer
    }

    #[must_use]
    pub const fn config(&self) -> &CarConfig {
        &self.config
    }
}
