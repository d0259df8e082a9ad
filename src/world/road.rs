use crate::backend::{ColliderDesc, ColliderHandle, ColliderShape, RigidBodyBackend};
use ahash::AHashMap;
use glam::{Quat, Vec2, Vec3A};
use log::{info, warn};

const DEFAULT_ROAD_WIDTH: f32 = 20.0;

/// Miter offsets are capped at this many half-widths so hairpin vertices do
/// not spike outward.
const MITER_LIMIT: f32 = 3.0;
const MITER_EPS: f32 = 1e-6;

/// Renderer-facing triangle mesh: vertex positions, triangle indices, and
/// per-vertex UVs. The same vertex/index buffers feed the trimesh collider.
#[derive(Clone, Debug, Default)]
pub struct RoadMesh {
    pub vertices: Vec<Vec3A>,
    pub indices: Vec<u32>,
    pub uvs: Vec<Vec2>,
}

impl RoadMesh {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    #[must_use]
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }
}

/// A generated static surface: ribbon road, ground plain, or border skirt.
#[derive(Clone, Debug)]
pub struct Road {
    pub id: u32,
    pub mesh: RoadMesh,
    pub width: f32,
    /// `None` when the mesh came out empty
    pub collider: Option<ColliderHandle>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Generation {
    Idle,
    Road,
}

/// Builds ribbon road surfaces from a waypoint polyline with per-waypoint
/// bank angles.
///
/// Waypoints accumulate between `start_road` and `end_road` and are consumed
/// exactly once when the geometry is emitted; the generator keeps only the
/// finished roads and the last road's edge polylines afterward.
pub struct RoadGenerator {
    phase: Generation,
    next_road_id: u32,
    positions: Vec<Vec3A>,
    /// Bank angle in degrees per waypoint
    angles: Vec<f32>,
    width: f32,
    closed: bool,
    last_position: Vec3A,
    left_edge: Vec<Vec3A>,
    right_edge: Vec<Vec3A>,
    roads: AHashMap<u32, Road>,
}

impl Default for RoadGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl RoadGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: Generation::Idle,
            next_road_id: 1,
            positions: Vec::new(),
            angles: Vec::new(),
            width: DEFAULT_ROAD_WIDTH,
            closed: false,
            last_position: Vec3A::ZERO,
            left_edge: Vec::new(),
            right_edge: Vec::new(),
            roads: AHashMap::new(),
        }
    }

    /// Begins a road at an absolute position, discarding any unfinished one.
    pub fn start_road(&mut self, position: Vec3A, angle: f32, width: f32) {
        self.phase = Generation::Road;
        self.width = width;
        self.closed = false;
        self.last_position = position;
        self.positions.clear();
        self.angles.clear();
        self.left_edge.clear();
        self.right_edge.clear();
        self.positions.push(position);
        self.angles.push(angle);
    }

    /// Extends the road by a step relative to the last waypoint.
    /// Ignored unless a road has been started.
    pub fn move_to(&mut self, step: Vec3A, angle: f32) {
        if self.phase != Generation::Road {
            return;
        }
        self.last_position += step;
        self.positions.push(self.last_position);
        self.angles.push(angle);
    }

    /// Marks the road as a closed loop; `end_road` will weld the last
    /// cross-section to the first.
    pub const fn end_circle(&mut self) {
        self.closed = true;
    }

    /// Emits the ribbon mesh and its static trimesh collider, consuming the
    /// accumulated waypoints. Returns `None` for fewer than two waypoints.
    pub fn end_road<B: RigidBodyBackend>(&mut self, backend: &mut B) -> Option<&Road> {
        self.phase = Generation::Idle;

        let positions = std::mem::take(&mut self.positions);
        let angles = std::mem::take(&mut self.angles);
        if positions.len() < 2 {
            warn!(
                "discarding road with {} waypoint(s), need at least 2",
                positions.len()
            );
            return None;
        }

        let (mesh, lefts, rights) =
            build_road_geometry(&positions, self.width, &angles, self.closed);
        self.left_edge = lefts;
        self.right_edge = rights;

        let id = self.register(backend, mesh, self.width);
        info!(
            "built road {id}: {} waypoints, {} triangles{}",
            positions.len(),
            self.roads[&id].mesh.num_triangles(),
            if self.closed { ", closed" } else { "" }
        );
        self.roads.get(&id)
    }

    /// Flat ground square centered on the origin, with tiled UVs.
    pub fn create_plain<B: RigidBodyBackend>(&mut self, backend: &mut B, half_extent: f32) -> &Road {
        let e = half_extent;
        let mesh = RoadMesh {
            vertices: vec![
                Vec3A::new(-e, 0.0, -e),
                Vec3A::new(e, 0.0, -e),
                Vec3A::new(e, 0.0, e),
                Vec3A::new(-e, 0.0, e),
            ],
            indices: vec![0, 2, 1, 0, 3, 2],
            uvs: vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(0.0, 1.0),
            ],
        };

        let id = self.register(backend, mesh, half_extent * 2.0);
        info!("built ground plain {id} ({half_extent} half extent)");
        &self.roads[&id]
    }

    /// Skirt ribbon dropped from a road edge down to ground level, flared
    /// outward on banked sections in proportion to edge height.
    pub fn add_borders_to_road<B: RigidBodyBackend>(
        &mut self,
        backend: &mut B,
        edge: &[Vec3A],
        flare: f32,
    ) -> Option<&Road> {
        if edge.len() < 2 {
            return None;
        }

        let half = self.width / 2.0;
        let mut vertices = Vec::with_capacity((edge.len() - 1) * 4);
        let mut indices = Vec::with_capacity((edge.len() - 1) * 6);
        let mut uvs = Vec::with_capacity((edge.len() - 1) * 4);

        let mut prev_top = edge[0];
        let mut prev_bottom = Vec3A::new(edge[0].x, 0.0, edge[0].z);
        let mut run_length = 0.0;

        for window in edge.windows(2) {
            let [pos0, pos1] = [window[0], window[1]];
            let mut dir = pos1 - pos0;
            dir.y = 0.0;
            let normal = Vec3A::new(-dir.z, 0.0, dir.x).normalize_or_zero() * half;

            let top = pos1;
            let bottom = Vec3A::new(
                pos1.x + pos1.y * normal.x * flare,
                0.0,
                pos1.z + pos1.y * normal.z * flare,
            );

            let seg_len = (pos1 - pos0).length();
            let v0 = run_length / self.width;
            run_length += seg_len;
            let v1 = run_length / self.width;

            let base = vertices.len() as u32;
            vertices.extend([top, bottom, prev_bottom, prev_top]);
            uvs.extend([
                Vec2::new(0.0, v1),
                Vec2::new(1.0, v1),
                Vec2::new(1.0, v0),
                Vec2::new(0.0, v0),
            ]);
            indices.extend([base, base + 1, base + 2, base, base + 2, base + 3]);

            prev_top = top;
            prev_bottom = bottom;
        }

        let mesh = RoadMesh {
            vertices,
            indices,
            uvs,
        };
        let id = self.register(backend, mesh, self.width);
        info!("built road border {id} ({} edge points)", edge.len());
        self.roads.get(&id)
    }

    /// Left edge polyline of the last built road.
    #[must_use]
    pub fn left_edge(&self) -> &[Vec3A] {
        &self.left_edge
    }

    /// Right edge polyline of the last built road.
    #[must_use]
    pub fn right_edge(&self) -> &[Vec3A] {
        &self.right_edge
    }

    #[must_use]
    pub fn road(&self, id: u32) -> Option<&Road> {
        self.roads.get(&id)
    }

    pub fn roads(&self) -> impl Iterator<Item = &Road> {
        self.roads.values()
    }

    fn register<B: RigidBodyBackend>(&mut self, backend: &mut B, mesh: RoadMesh, width: f32) -> u32 {
        let collider = if mesh.is_empty() {
            None
        } else {
            let desc = ColliderDesc::new(ColliderShape::TriMesh {
                vertices: mesh.vertices.clone(),
                indices: mesh.indices.clone(),
            });
            Some(backend.create_static_collider(desc, Vec3A::ZERO))
        };

        let id = self.next_road_id;
        self.next_road_id += 1;
        self.roads.insert(
            id,
            Road {
                id,
                mesh,
                width,
                collider,
            },
        );
        id
    }
}

/// Offsets the centerline left/right by mitered half-widths and stitches
/// consecutive cross-sections into quads.
fn build_road_geometry(
    positions: &[Vec3A],
    width: f32,
    angles: &[f32],
    closed: bool,
) -> (RoadMesh, Vec<Vec3A>, Vec<Vec3A>) {
    let half = width / 2.0;
    let n = positions.len();
    debug_assert!(n >= 2);
    debug_assert_eq!(n, angles.len());

    // Segment directions, flattened to the ground plane. For open roads the
    // wrap-around entry at n-1 is unused.
    let mut dirs = Vec::with_capacity(n);
    for i in 0..n {
        let mut dir = positions[(i + 1) % n] - positions[i];
        dir.y = 0.0;
        dirs.push(dir.normalize_or_zero());
    }

    let mut lefts = Vec::with_capacity(n);
    let mut rights = Vec::with_capacity(n);

    for i in 0..n {
        let mut prev_dir = dirs[(i + n - 1) % n];
        let mut next_dir = dirs[i];
        if !closed {
            if i == 0 {
                prev_dir = next_dir;
            }
            if i == n - 1 {
                next_dir = prev_dir;
            }
        }

        let normal_prev = Vec3A::new(-prev_dir.z, 0.0, prev_dir.x);
        let normal_next = Vec3A::new(-next_dir.z, 0.0, next_dir.x);

        // Offset along the bisector, scaled to preserve width through the
        // turn and clamped for sharp corners.
        let mut miter = normal_prev + normal_next;
        if miter.length_squared() < MITER_EPS {
            miter = normal_next;
        }
        let miter = miter.normalize_or_zero();

        let mut denom = miter.dot(normal_next);
        if denom.abs() < MITER_EPS {
            denom = MITER_EPS;
        }
        let scale = (half / denom).min(half * MITER_LIMIT);

        let tilt = Quat::from_rotation_z(angles[i].to_radians());
        let p = positions[i];
        lefts.push(tilt * (p - miter * scale));
        rights.push(tilt * (p + miter * scale));
    }

    if closed {
        // Weld the loop so the first and last cross-sections coincide exactly
        lefts[n - 1] = lefts[0];
        rights[n - 1] = rights[0];
    }

    let num_quads = if closed { n } else { n - 1 };
    let mut vertices = Vec::with_capacity(num_quads * 4);
    let mut indices = Vec::with_capacity(num_quads * 6);
    let mut uvs = Vec::with_capacity(num_quads * 4);
    let mut run_length = 0.0;

    for a in 0..num_quads {
        let b = (a + 1) % n;

        let v0 = run_length / width;
        run_length += (positions[b] - positions[a]).length();
        let v1 = run_length / width;

        let base = vertices.len() as u32;
        vertices.extend([lefts[b], rights[b], rights[a], lefts[a]]);
        uvs.extend([
            Vec2::new(0.0, v1),
            Vec2::new(1.0, v1),
            Vec2::new(1.0, v0),
            Vec2::new(0.0, v0),
        ]);
        indices.extend([base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    (
        RoadMesh {
            vertices,
            indices,
            uvs,
        },
        lefts,
        rights,
    )
}
