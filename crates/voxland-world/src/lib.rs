//! World sizing, chunk coordinates, and the terrain function.
#![forbid(unsafe_code)]

mod block;
mod chunk_coord;
pub mod worldgen;
mod world;

pub use block::Block;
pub use chunk_coord::ChunkCoord;
pub use world::World;
pub use worldgen::{TerrainParams, WorldParams};
