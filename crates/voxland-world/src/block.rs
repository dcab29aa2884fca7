/// A voxel's block type. `0` is empty space, anything else is solid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Block(pub u8);

impl Block {
    pub const EMPTY: Block = Block(0);
    pub const SOLID: Block = Block(1);

    #[inline]
    pub fn is_solid(self) -> bool {
        self.0 != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}
