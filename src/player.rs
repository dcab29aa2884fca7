use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;

use voxland_geom::Vec3;
use voxland_mesh_cpu::ChunkMeshCPU;

use crate::config::PlayerParams;
use crate::raycast::RayQuery;

const MIN_STEP: f32 = 1e-5;

/// Resolves a desired displacement against the mesh set so the mover stops
/// `clearance` short of surfaces and slides along them.
#[derive(Clone, Copy, Debug)]
pub struct CollisionResolver {
    pub clearance: f32,
    pub max_iterations: usize,
}

impl Default for CollisionResolver {
    fn default() -> Self {
        Self {
            clearance: 0.5,
            max_iterations: 8,
        }
    }
}

impl CollisionResolver {
    /// Returns the final position after moving from `position` by `displacement`.
    pub fn resolve(
        &self,
        position: Vec3,
        displacement: Vec3,
        query: &dyn RayQuery,
        meshes: &[Arc<ChunkMeshCPU>],
    ) -> Vec3 {
        let mut pos = position;
        let mut disp = displacement;
        for _ in 0..self.max_iterations {
            let len = disp.length();
            if len <= MIN_STEP {
                break;
            }
            let Some(hit) = query.intersect_first(pos, disp, 0.0, len + self.clearance, meshes) else {
                return pos + disp;
            };
            let n = hit.normal;
            pos = hit.point + n * self.clearance;
            let remaining = len - hit.distance;
            if remaining <= 0.0 {
                break;
            }
            disp = disp.with_length(remaining);
            disp -= n * disp.dot(n);
        }
        pos
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    pub movable: bool,
    pub collidable: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            movable: true,
            collidable: true,
        }
    }
}

/// The viewer: a position with yaw/pitch orientation.
#[derive(Clone, Debug)]
pub struct Body {
    pub position: Vec3,
    /// Radians about +Y; 0 faces -Z.
    pub yaw: f32,
    /// Radians, clamped to `[-π/2, π/2]`; positive looks up.
    pub pitch: f32,
    pub caps: Capabilities,
    pub speed: f32,
    pub sensitivity: f32,
    pub resolver: CollisionResolver,
}

impl Body {
    pub fn new(position: Vec3) -> Self {
        Self::from_params(&PlayerParams {
            spawn: [position.x, position.y, position.z],
            ..PlayerParams::default()
        })
    }

    pub fn from_params(p: &PlayerParams) -> Self {
        Self {
            position: Vec3::new(p.spawn[0], p.spawn[1], p.spawn[2]),
            yaw: 0.0,
            // Camera starts aimed at (0, -1, -5)
            pitch: -(0.2f32).atan(),
            caps: Capabilities::default(),
            speed: p.speed,
            sensitivity: p.sensitivity,
            resolver: CollisionResolver {
                clearance: p.clearance,
                max_iterations: p.max_slide_iterations,
            },
        }
    }

    pub fn look(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * self.sensitivity;
        self.pitch = (self.pitch - dy * self.sensitivity).clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    /// Unit look direction.
    pub fn forward(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        Vec3::new(-sy * cp, sp, -cy * cp)
    }

    /// Rotates a body-local vector by yaw into world space.
    pub fn local_to_world(&self, v: Vec3) -> Vec3 {
        let (s, c) = self.yaw.sin_cos();
        Vec3::new(v.x * c + v.z * s, v.y, -v.x * s + v.z * c)
    }

    /// Applies one tick of key movement. `movement` is key vectors times held
    /// seconds in body-local axes.
    pub fn apply_movement(
        &mut self,
        movement: Vec3,
        query: &dyn RayQuery,
        meshes: &[Arc<ChunkMeshCPU>],
    ) {
        if !self.caps.movable {
            return;
        }
        let disp = self.local_to_world(movement * self.speed);
        self.position = if self.caps.collidable {
            self.resolver.resolve(self.position, disp, query, meshes)
        } else {
            self.position + disp
        };
    }
}
