use std::sync::Arc;

use voxland_geom::Vec3;
use voxland_mesh_cpu::ChunkMeshCPU;

use crate::raycast::{Intersection, RayQuery};

/// Tracks which block the viewer is looking at.
#[derive(Clone, Debug)]
pub struct BlockPicker {
    pub near: f32,
    pub far: f32,
    focus: Option<Intersection>,
}

impl Default for BlockPicker {
    fn default() -> Self {
        Self::new(0.1, 10.0)
    }
}

impl BlockPicker {
    pub fn new(near: f32, far: f32) -> Self {
        Self {
            near,
            far,
            focus: None,
        }
    }

    /// Replaces the focus with the nearest hit along the look ray, if any.
    pub fn update_focus(
        &mut self,
        query: &dyn RayQuery,
        origin: Vec3,
        dir: Vec3,
        meshes: &[Arc<ChunkMeshCPU>],
    ) {
        self.focus = query.intersect_first(origin, dir, self.near, self.far, meshes);
    }

    #[inline]
    pub fn focus(&self) -> Option<&Intersection> {
        self.focus.as_ref()
    }

    #[inline]
    pub fn get_focused_position(&self) -> Option<Vec3> {
        self.focus.map(|hit| hit.point)
    }

    /// Block containing the focused face.
    pub fn get_existing_block_position(&self) -> Option<(i32, i32, i32)> {
        self.follow_normal(-0.5)
    }

    /// Empty cell in front of the focused face.
    pub fn get_placement_block_position(&self) -> Option<(i32, i32, i32)> {
        self.follow_normal(0.5)
    }

    fn follow_normal(&self, length: f32) -> Option<(i32, i32, i32)> {
        self.focus
            .map(|hit| (hit.point + hit.normal * length).floor_i32())
    }
}
