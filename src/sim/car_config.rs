use glam::{Quat, Vec2, Vec3A};

/// One wheel station of the part list: where the wheel sits on the chassis
/// and how its suspension is sized.
#[derive(Clone, Copy, Debug)]
pub struct WheelMount {
    /// Wheel center in chassis-local space
    pub offset: Vec3A,
    /// x = half-width, y = radius
    pub wheel_size: Vec2,
    pub wheel_mass: f32,
    pub suspension_mass: f32,
    /// Unsigned hub offset of the suspension linkage; signed per side at
    /// assembly time from `offset.x`
    pub arm_length: f32,
    /// Vertical span between the suspension arms
    pub arm_span: f32,
    /// Degrees
    pub max_steer_angle: f32,
    /// Whether steering input reaches this wheel's suspension.
    /// Explicit per wheel, never inferred from assembly order.
    pub steerable: bool,
    /// Fixed part-local rotation applied to this wheel's visual at write-back
    pub part_rotation: Quat,
}

#[derive(Clone, Copy, Debug)]
pub struct CarBodyConfig {
    pub half_extents: Vec3A,
    pub mass: f32,
    /// Fixed part-local rotation applied to the chassis visual at write-back
    pub part_rotation: Quat,
}

/// Data-driven car definition: one chassis and exactly four wheel stations.
#[derive(Clone, Copy, Debug)]
pub struct CarConfig {
    pub body: CarBodyConfig,
    pub wheel_mounts: [WheelMount; 4],
}

impl Default for CarConfig {
    fn default() -> Self {
        Self::BASIC
    }
}

const WHEEL_OFFSETS: [Vec3A; 4] = [
    Vec3A::new(1.2, -0.5, 2.0),
    Vec3A::new(-1.2, -0.5, 2.0),
    Vec3A::new(1.2, -0.5, -2.0),
    Vec3A::new(-1.2, -0.5, -2.0),
];

impl CarConfig {
    /// Reference four-wheel assembly: front pair steerable, rear fixed.
    pub const BASIC: Self = Self {
        body: CarBodyConfig {
            half_extents: Vec3A::new(1.0, 0.4, 2.2),
            mass: 1000.0,
            part_rotation: Quat::IDENTITY,
        },
        wheel_mounts: [
            Self::make_mount(0, true),
            Self::make_mount(1, true),
            Self::make_mount(2, false),
            Self::make_mount(3, false),
        ],
    };

    const fn make_mount(index: usize, steerable: bool) -> WheelMount {
        WheelMount {
            offset: WHEEL_OFFSETS[index],
            wheel_size: Vec2::new(0.15, 0.36),
            wheel_mass: 30.0,
            suspension_mass: 30.0,
            arm_length: 0.3,
            arm_span: 0.3,
            max_steer_angle: if steerable { 35.0 } else { 0.0 },
            steerable,
            part_rotation: Quat::IDENTITY,
        }
    }
}
