use serde::{Deserialize, Serialize};

/// Integer chunk index: `floor(world_position / chunk_size)` per axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cy: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cy: i32, cz: i32) -> Self {
        Self { cx, cy, cz }
    }

    /// Chunk containing the integer block position, for chunk dims `(sx, sy, sz)`.
    #[inline]
    pub fn containing_block(wx: i32, wy: i32, wz: i32, sx: usize, sy: usize, sz: usize) -> Self {
        Self {
            cx: wx.div_euclid(sx as i32),
            cy: wy.div_euclid(sy as i32),
            cz: wz.div_euclid(sz as i32),
        }
    }

    /// Smallest-coordinate corner of this chunk in world blocks.
    #[inline]
    pub fn origin(self, sx: usize, sy: usize, sz: usize) -> (i32, i32, i32) {
        (
            self.cx * sx as i32,
            self.cy * sy as i32,
            self.cz * sz as i32,
        )
    }
}

impl From<(i32, i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32, i32)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}

impl From<ChunkCoord> for (i32, i32, i32) {
    fn from(value: ChunkCoord) -> Self {
        (value.cx, value.cy, value.cz)
    }
}

impl std::fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},{}", self.cx, self.cy, self.cz)
    }
}
