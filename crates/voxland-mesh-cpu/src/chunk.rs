use voxland_geom::{Aabb, Vec3};
use voxland_world::ChunkCoord;

use crate::mesh_build::MeshBuild;

/// A finished chunk mesh. Vertex positions and `bbox` are chunk-local; `origin`
/// places the mesh in the world.
#[derive(Clone, Debug)]
pub struct ChunkMeshCPU {
    pub coord: ChunkCoord,
    pub origin: Vec3,
    pub bbox: Aabb,
    pub mesh: MeshBuild,
}

impl ChunkMeshCPU {
    #[inline]
    pub fn world_bbox(&self) -> Aabb {
        self.bbox.translated(self.origin)
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.mesh.triangle_count()
    }
}
