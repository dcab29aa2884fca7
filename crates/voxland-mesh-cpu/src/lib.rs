//! CPU meshing crate: face-culled chunk mesher (engine-only).
#![forbid(unsafe_code)]

mod build;
mod chunk;
pub mod face;
mod mesh_build;

pub use build::{build_chunk_mesh_cpu, count_exposed_faces};
pub use chunk::ChunkMeshCPU;
pub use face::Face;
pub use mesh_build::MeshBuild;
