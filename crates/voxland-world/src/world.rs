use voxland_geom::Vec3;

use crate::worldgen::{TerrainParams, WorldGenConfig};
use crate::{Block, ChunkCoord};

/// Chunk dimensions and the deterministic terrain function.
#[derive(Clone, Debug)]
pub struct World {
    pub chunk_size_x: usize,
    pub chunk_size_y: usize,
    pub chunk_size_z: usize,
    pub terrain: TerrainParams,
}

impl World {
    pub fn new(chunk_size_x: usize, chunk_size_y: usize, chunk_size_z: usize) -> Self {
        Self::with_terrain(chunk_size_x, chunk_size_y, chunk_size_z, TerrainParams::default())
    }

    pub fn with_terrain(
        chunk_size_x: usize,
        chunk_size_y: usize,
        chunk_size_z: usize,
        terrain: TerrainParams,
    ) -> Self {
        debug_assert!(chunk_size_x > 0 && chunk_size_y > 0 && chunk_size_z > 0);
        Self {
            chunk_size_x,
            chunk_size_y,
            chunk_size_z,
            terrain,
        }
    }

    pub fn from_config(cfg: &WorldGenConfig) -> Self {
        let [sx, sy, sz] = cfg.world.chunk_size;
        Self::with_terrain(sx, sy, sz, cfg.terrain.clone())
    }

    #[inline]
    pub fn chunk_dims(&self) -> (usize, usize, usize) {
        (self.chunk_size_x, self.chunk_size_y, self.chunk_size_z)
    }

    /// `floor(pos / chunk_size)` per axis.
    #[inline]
    pub fn chunk_coord_of(&self, pos: Vec3) -> ChunkCoord {
        ChunkCoord::new(
            (pos.x / self.chunk_size_x as f32).floor() as i32,
            (pos.y / self.chunk_size_y as f32).floor() as i32,
            (pos.z / self.chunk_size_z as f32).floor() as i32,
        )
    }

    #[inline]
    pub fn chunk_coord_of_block(&self, wx: i32, wy: i32, wz: i32) -> ChunkCoord {
        ChunkCoord::containing_block(
            wx,
            wy,
            wz,
            self.chunk_size_x,
            self.chunk_size_y,
            self.chunk_size_z,
        )
    }

    #[inline]
    pub fn chunk_origin(&self, coord: ChunkCoord) -> (i32, i32, i32) {
        coord.origin(self.chunk_size_x, self.chunk_size_y, self.chunk_size_z)
    }

    /// Chunks needed on each side of the viewer's chunk: `ceil(radius / size)` per axis.
    pub fn chunks_in_direction(&self, visibility_radius: f32) -> (i32, i32, i32) {
        let r = visibility_radius as f64;
        (
            (r / self.chunk_size_x as f64).ceil() as i32,
            (r / self.chunk_size_y as f64).ceil() as i32,
            (r / self.chunk_size_z as f64).ceil() as i32,
        )
    }

    /// Terrain block at a world position. The `y == 0` plane is always solid.
    #[inline]
    pub fn block_at(&self, wx: i32, wy: i32, wz: i32) -> Block {
        if wy == 0 || (wy as f64) <= self.terrain.height_at(wx, wz) {
            Block::SOLID
        } else {
            Block::EMPTY
        }
    }
}
