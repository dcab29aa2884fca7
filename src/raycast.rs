use std::sync::Arc;

use voxland_geom::{Ray, Vec3, ray_triangle};
use voxland_mesh_cpu::ChunkMeshCPU;
use voxland_world::ChunkCoord;

/// A ray hit on a chunk mesh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intersection {
    pub point: Vec3,
    /// Stored normal of the face that was hit.
    pub normal: Vec3,
    pub distance: f32,
    pub coord: ChunkCoord,
}

/// Ray queries against the visible mesh set.
pub trait RayQuery {
    /// All hits within `[near, far]`, nearest first. `dir` need not be unit length.
    fn intersect(
        &self,
        origin: Vec3,
        dir: Vec3,
        near: f32,
        far: f32,
        meshes: &[Arc<ChunkMeshCPU>],
    ) -> Vec<Intersection>;

    fn intersect_first(
        &self,
        origin: Vec3,
        dir: Vec3,
        near: f32,
        far: f32,
        meshes: &[Arc<ChunkMeshCPU>],
    ) -> Option<Intersection> {
        self.intersect(origin, dir, near, far, meshes).into_iter().next()
    }
}

/// CPU ray caster: box test per mesh, then every front-facing triangle.
#[derive(Clone, Copy, Debug, Default)]
pub struct MeshRaycaster;

impl MeshRaycaster {
    fn intersect_mesh(ray: &Ray, near: f32, far: f32, m: &ChunkMeshCPU, out: &mut Vec<Intersection>) {
        if m.mesh.is_empty() || m.world_bbox().ray_interval(ray, near, far).is_none() {
            return;
        }
        let local = Ray {
            origin: ray.origin - m.origin,
            dir: ray.dir,
        };
        for [a, b, c] in m.mesh.triangles() {
            let (pa, pb, pc) = (m.mesh.position(a), m.mesh.position(b), m.mesh.position(c));
            let Some(t) = ray_triangle(&local, pa, pb, pc, true) else {
                continue;
            };
            if t < near || t > far {
                continue;
            }
            out.push(Intersection {
                point: ray.at(t),
                normal: m.mesh.normal(a),
                distance: t,
                coord: m.coord,
            });
        }
    }
}

impl RayQuery for MeshRaycaster {
    fn intersect(
        &self,
        origin: Vec3,
        dir: Vec3,
        near: f32,
        far: f32,
        meshes: &[Arc<ChunkMeshCPU>],
    ) -> Vec<Intersection> {
        let ray = Ray::new(origin, dir);
        if ray.is_degenerate() {
            return Vec::new();
        }
        let mut hits = Vec::new();
        for m in meshes {
            Self::intersect_mesh(&ray, near, far, m, &mut hits);
        }
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}
