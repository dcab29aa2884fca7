//! Chunk block buffer and terrain generation.
#![forbid(unsafe_code)]

pub use voxland_world::Block;
use voxland_world::{ChunkCoord, World};

/// One chunk's block grid. Storage is x-fastest:
/// `idx = x + y * sx + z * sx * sy`.
#[derive(Clone, Debug, PartialEq)]
pub struct ChunkBuf {
    pub coord: ChunkCoord,
    pub sx: usize,
    pub sy: usize,
    pub sz: usize,
    pub blocks: Vec<Block>,
}

impl ChunkBuf {
    /// All-empty buffer.
    pub fn empty(coord: ChunkCoord, sx: usize, sy: usize, sz: usize) -> Self {
        ChunkBuf {
            coord,
            sx,
            sy,
            sz,
            blocks: vec![Block::EMPTY; sx * sy * sz],
        }
    }

    pub fn from_blocks_local(
        coord: ChunkCoord,
        sx: usize,
        sy: usize,
        sz: usize,
        blocks: Vec<Block>,
    ) -> Self {
        let mut b = blocks;
        let expect = sx * sy * sz;
        if b.len() != expect {
            b.resize(expect, Block::EMPTY);
        }
        ChunkBuf {
            coord,
            sx,
            sy,
            sz,
            blocks: b,
        }
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        debug_assert!(
            x < self.sx && y < self.sy && z < self.sz,
            "local ({x},{y},{z}) outside chunk {}x{}x{}",
            self.sx,
            self.sy,
            self.sz
        );
        x + y * self.sx + z * self.sx * self.sy
    }

    /// Block at local coordinates. Callers check bounds first with
    /// [`ChunkBuf::is_outside`]; out-of-range access panics.
    #[inline]
    pub fn get_local(&self, x: usize, y: usize, z: usize) -> Block {
        self.blocks[self.idx(x, y, z)]
    }

    #[inline]
    pub fn set_local(&mut self, x: usize, y: usize, z: usize, b: Block) {
        let i = self.idx(x, y, z);
        self.blocks[i] = b;
    }

    /// Bounds predicate on signed local coordinates.
    #[inline]
    pub fn is_outside(&self, x: i32, y: i32, z: i32) -> bool {
        x < 0
            || y < 0
            || z < 0
            || x >= self.sx as i32
            || y >= self.sy as i32
            || z >= self.sz as i32
    }

    /// Solid test on signed local coordinates; anything outside counts as empty.
    #[inline]
    pub fn is_solid_local(&self, x: i32, y: i32, z: i32) -> bool {
        !self.is_outside(x, y, z) && self.get_local(x as usize, y as usize, z as usize).is_solid()
    }

    #[inline]
    pub fn origin(&self) -> (i32, i32, i32) {
        self.coord.origin(self.sx, self.sy, self.sz)
    }

    /// World position to local coordinates (may be outside the chunk).
    #[inline]
    pub fn world_to_local(&self, wx: i32, wy: i32, wz: i32) -> (i32, i32, i32) {
        let (bx, by, bz) = self.origin();
        (wx - bx, wy - by, wz - bz)
    }

    #[inline]
    pub fn get_world(&self, wx: i32, wy: i32, wz: i32) -> Option<Block> {
        let (lx, ly, lz) = self.world_to_local(wx, wy, wz);
        if self.is_outside(lx, ly, lz) {
            return None;
        }
        Some(self.get_local(lx as usize, ly as usize, lz as usize))
    }

    /// Writes a block at a world position owned by this chunk.
    pub fn set_world(&mut self, wx: i32, wy: i32, wz: i32, b: Block) {
        let (lx, ly, lz) = self.world_to_local(wx, wy, wz);
        assert!(
            !self.is_outside(lx, ly, lz),
            "world ({wx},{wy},{wz}) not owned by chunk {}",
            self.coord
        );
        self.set_local(lx as usize, ly as usize, lz as usize, b);
    }

    #[inline]
    pub fn has_non_air(&self) -> bool {
        self.blocks.iter().any(|b| b.is_solid())
    }

    #[inline]
    pub fn is_all_air(&self) -> bool {
        !self.has_non_air()
    }

    #[inline]
    pub fn solid_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_solid()).count()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChunkOccupancy {
    Empty,
    Populated,
}

impl ChunkOccupancy {
    #[inline]
    pub fn is_empty(self) -> bool {
        matches!(self, ChunkOccupancy::Empty)
    }

    #[inline]
    pub fn has_blocks(self) -> bool {
        matches!(self, ChunkOccupancy::Populated)
    }
}

#[derive(Clone, Debug)]
pub struct ChunkGenerateResult {
    pub buf: ChunkBuf,
    pub occupancy: ChunkOccupancy,
}

/// Fills a chunk from the world's terrain function, Z outer, Y middle, X inner.
pub fn generate_chunk_buffer(world: &World, coord: ChunkCoord) -> ChunkGenerateResult {
    let (sx, sy, sz) = world.chunk_dims();
    let mut blocks = Vec::with_capacity(sx * sy * sz);
    let (base_x, base_y, base_z) = world.chunk_origin(coord);
    let mut has_blocks = false;
    for z in 0..sz {
        for y in 0..sy {
            for x in 0..sx {
                let block = world.block_at(base_x + x as i32, base_y + y as i32, base_z + z as i32);
                has_blocks |= block.is_solid();
                blocks.push(block);
            }
        }
    }
    ChunkGenerateResult {
        buf: ChunkBuf {
            coord,
            sx,
            sy,
            sz,
            blocks,
        },
        occupancy: if has_blocks {
            ChunkOccupancy::Populated
        } else {
            ChunkOccupancy::Empty
        },
    }
}
