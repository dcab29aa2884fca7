use std::time::Instant;

use voxland_chunk::ChunkBuf;
use voxland_geom::{Aabb, Vec3};

use crate::chunk::ChunkMeshCPU;
use crate::face::Face;
use crate::mesh_build::MeshBuild;

fn elapsed_ms(start: Instant) -> u32 {
    start.elapsed().as_millis().min(u128::from(u32::MAX)) as u32
}

/// Counts the faces a culled mesh of `buf` would emit.
pub fn count_exposed_faces(buf: &ChunkBuf) -> usize {
    let mut n = 0;
    for_each_exposed_face(buf, |_, _, _, _| n += 1);
    n
}

fn for_each_exposed_face(buf: &ChunkBuf, mut emit: impl FnMut(usize, usize, usize, Face)) {
    for z in 0..buf.sz {
        for y in 0..buf.sy {
            for x in 0..buf.sx {
                if buf.get_local(x, y, z).is_empty() {
                    continue;
                }
                for face in Face::ALL {
                    let (dx, dy, dz) = face.delta();
                    let (nx, ny, nz) = (x as i32 + dx, y as i32 + dy, z as i32 + dz);
                    // Chunk borders always get a face; neighbors are never consulted
                    if !buf.is_solid_local(nx, ny, nz) {
                        emit(x, y, z, face);
                    }
                }
            }
        }
    }
}

/// Builds the face-culled mesh for one chunk.
///
/// A face is emitted for every solid cell whose neighbor across that face is
/// empty or outside the chunk. The bounding box spans the chunk's declared
/// volume even when the mesh is empty.
pub fn build_chunk_mesh_cpu(buf: &ChunkBuf) -> ChunkMeshCPU {
    let start = Instant::now();
    let mut mesh = MeshBuild::default();
    mesh.reserve_quads(count_exposed_faces(buf));
    for_each_exposed_face(buf, |x, y, z, face| mesh.add_face(x, y, z, face));

    let (ox, oy, oz) = buf.origin();
    let bbox = Aabb::new(
        Vec3::ZERO,
        Vec3::new(buf.sx as f32, buf.sy as f32, buf.sz as f32),
    );
    log::info!(
        target: "perf",
        "ms={} mesh_build quads={} dims=({}, {}, {}) chunk={}",
        elapsed_ms(start),
        mesh.idx.len() / 6,
        buf.sx,
        buf.sy,
        buf.sz,
        buf.coord
    );
    ChunkMeshCPU {
        coord: buf.coord,
        origin: Vec3::from_i32(ox, oy, oz),
        bbox,
        mesh,
    }
}
