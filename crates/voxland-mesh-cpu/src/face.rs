use voxland_geom::Vec3;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Face {
    PosX = 0,
    NegX = 1,
    PosY = 2,
    NegY = 3,
    PosZ = 4,
    NegZ = 5,
}

/// Fixed per-quad texture coordinates, in vertex order.
pub const QUAD_UVS: [(f32, f32); 4] = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)];

impl Face {
    pub const ALL: [Face; 6] = [
        Face::PosX,
        Face::NegX,
        Face::PosY,
        Face::NegY,
        Face::PosZ,
        Face::NegZ,
    ];

    #[inline]
    pub fn normal(self) -> Vec3 {
        let (dx, dy, dz) = self.delta();
        Vec3::from_i32(dx, dy, dz)
    }

    /// Grid step `(dx,dy,dz)` to the neighbor across this face.
    #[inline]
    pub fn delta(self) -> (i32, i32, i32) {
        match self {
            Face::PosX => (1, 0, 0),
            Face::NegX => (-1, 0, 0),
            Face::PosY => (0, 1, 0),
            Face::NegY => (0, -1, 0),
            Face::PosZ => (0, 0, 1),
            Face::NegZ => (0, 0, -1),
        }
    }

    /// Unit-cube corners of this face's quad.
    #[inline]
    pub fn corners(self) -> [(u8, u8, u8); 4] {
        match self {
            Face::PosX => [(1, 0, 0), (1, 1, 0), (1, 0, 1), (1, 1, 1)],
            Face::NegX => [(0, 0, 0), (0, 1, 0), (0, 0, 1), (0, 1, 1)],
            Face::PosY => [(0, 1, 0), (1, 1, 0), (0, 1, 1), (1, 1, 1)],
            Face::NegY => [(0, 0, 0), (1, 0, 0), (0, 0, 1), (1, 0, 1)],
            Face::PosZ => [(0, 0, 1), (1, 0, 1), (0, 1, 1), (1, 1, 1)],
            Face::NegZ => [(0, 0, 0), (1, 0, 0), (0, 1, 0), (1, 1, 0)],
        }
    }

    /// Two triangles over `corners()`, counter-clockwise seen from outside.
    #[inline]
    pub fn fan(self) -> [u32; 6] {
        match self {
            Face::PosX | Face::NegY | Face::PosZ => [0, 1, 3, 0, 3, 2],
            Face::NegX | Face::PosY | Face::NegZ => [0, 2, 3, 0, 3, 1],
        }
    }
}
