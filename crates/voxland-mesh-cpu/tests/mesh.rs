use proptest::prelude::*;

use voxland_chunk::{Block, ChunkBuf, generate_chunk_buffer};
use voxland_geom::Vec3;
use voxland_mesh_cpu::{ChunkMeshCPU, build_chunk_mesh_cpu};
use voxland_world::{ChunkCoord, World};

fn make_buf(cx: i32, cz: i32, sx: usize, sy: usize, sz: usize, blocks: Vec<Block>) -> ChunkBuf {
    ChunkBuf::from_blocks_local(ChunkCoord::new(cx, 0, cz), sx, sy, sz, blocks)
}

fn single(sx: usize, sy: usize, sz: usize, at: (usize, usize, usize)) -> ChunkBuf {
    let mut buf = ChunkBuf::empty(ChunkCoord::new(0, 0, 0), sx, sy, sz);
    buf.set_local(at.0, at.1, at.2, Block::SOLID);
    buf
}

fn assert_windings_match_normals(m: &ChunkMeshCPU) {
    for [a, b, c] in m.mesh.triangles() {
        let (pa, pb, pc) = (m.mesh.position(a), m.mesh.position(b), m.mesh.position(c));
        let n = (pb - pa).cross(pc - pa);
        assert!(n.dot(m.mesh.normal(a)) > 0.0);
    }
}

#[test]
fn single_voxel_emits_six_quads() {
    let m = build_chunk_mesh_cpu(&single(3, 3, 3, (1, 1, 1)));
    assert_eq!(m.mesh.vertex_count(), 24);
    assert_eq!(m.mesh.idx.len(), 36);
    assert_eq!(m.mesh.uv.len(), 48);
    assert_eq!(m.mesh.norm.len(), m.mesh.pos.len());
    for i in 0..24 {
        let p = m.mesh.position(i);
        for c in [p.x, p.y, p.z] {
            assert!(c == 1.0 || c == 2.0, "vertex {i} at {p:?}");
        }
    }
    assert_windings_match_normals(&m);
}

#[test]
fn quad_uvs_follow_vertex_order() {
    let m = build_chunk_mesh_cpu(&single(1, 1, 1, (0, 0, 0)));
    for quad in m.mesh.uv.chunks_exact(8) {
        assert_eq!(quad, &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
    }
}

#[test]
fn adjacent_voxels_cull_shared_face() {
    let mut buf = ChunkBuf::empty(ChunkCoord::new(0, 0, 0), 4, 4, 4);
    buf.set_local(1, 1, 1, Block::SOLID);
    buf.set_local(2, 1, 1, Block::SOLID);
    let m = build_chunk_mesh_cpu(&buf);
    assert_eq!(m.mesh.idx.len() / 6, 10);
    // No face sits on the shared x = 2 plane between the two cells
    for [a, b, c] in m.mesh.triangles() {
        let on_plane = [a, b, c].iter().all(|&i| m.mesh.position(i).x == 2.0);
        assert!(!on_plane);
    }
}

#[test]
fn border_faces_emitted_without_neighbor_lookup() {
    // A full chunk only shows its six outer walls
    let buf = make_buf(3, -1, 2, 2, 2, vec![Block::SOLID; 8]);
    let m = build_chunk_mesh_cpu(&buf);
    assert_eq!(m.mesh.idx.len() / 6, 24);
    assert_eq!(m.origin, Vec3::new(6.0, 0.0, -2.0));
    assert_windings_match_normals(&m);
}

#[test]
fn empty_chunk_keeps_declared_bbox() {
    let buf = ChunkBuf::empty(ChunkCoord::new(-1, 0, 2), 16, 32, 16);
    let m = build_chunk_mesh_cpu(&buf);
    assert!(m.mesh.is_empty());
    assert_eq!(m.bbox.min, Vec3::ZERO);
    assert_eq!(m.bbox.max, Vec3::new(16.0, 32.0, 16.0));
    assert_eq!(m.world_bbox().min, Vec3::new(-16.0, 0.0, 32.0));
}

#[test]
fn checkerboard_indices_exceed_u16() {
    let (sx, sy, sz) = (16, 32, 16);
    let mut blocks = vec![Block::EMPTY; sx * sy * sz];
    for z in 0..sz {
        for y in 0..sy {
            for x in 0..sx {
                if (x + y + z) % 2 == 0 {
                    blocks[x + y * sx + z * sx * sy] = Block::SOLID;
                }
            }
        }
    }
    let m = build_chunk_mesh_cpu(&make_buf(0, 0, sx, sy, sz, blocks));
    let solid = sx * sy * sz / 2;
    assert_eq!(m.mesh.vertex_count(), solid * 24);
    assert!(m.mesh.idx.iter().any(|&i| i > u16::MAX as u32));
}

#[test]
fn generated_terrain_mesh_is_well_formed() {
    let world = World::new(16, 32, 16);
    let buf = generate_chunk_buffer(&world, ChunkCoord::new(0, 0, 0)).buf;
    let m = build_chunk_mesh_cpu(&buf);
    assert!(!m.mesh.is_empty());
    assert!(m.mesh.idx.iter().all(|&i| (i as usize) < m.mesh.vertex_count()));
    assert_windings_match_normals(&m);
}

fn reference_face_count(buf: &ChunkBuf) -> usize {
    let mut n = 0;
    for z in 0..buf.sz as i32 {
        for y in 0..buf.sy as i32 {
            for x in 0..buf.sx as i32 {
                if !buf.is_solid_local(x, y, z) {
                    continue;
                }
                for (dx, dy, dz) in [(1, 0, 0), (-1, 0, 0), (0, 1, 0), (0, -1, 0), (0, 0, 1), (0, 0, -1)] {
                    if !buf.is_solid_local(x + dx, y + dy, z + dz) {
                        n += 1;
                    }
                }
            }
        }
    }
    n
}

fn arb_buf() -> impl Strategy<Value = ChunkBuf> {
    (1usize..=5, 1usize..=5, 1usize..=5).prop_flat_map(|(sx, sy, sz)| {
        prop::collection::vec(any::<bool>(), sx * sy * sz).prop_map(move |cells| {
            let blocks = cells
                .into_iter()
                .map(|s| if s { Block::SOLID } else { Block::EMPTY })
                .collect();
            make_buf(0, 0, sx, sy, sz, blocks)
        })
    })
}

proptest! {
    // Quad count matches a direct neighbor count and buffers stay in lockstep
    #[test]
    fn quads_match_exposed_faces(buf in arb_buf()) {
        let m = build_chunk_mesh_cpu(&buf);
        let quads = reference_face_count(&buf);
        prop_assert_eq!(m.mesh.idx.len(), quads * 6);
        prop_assert_eq!(m.mesh.vertex_count(), quads * 4);
        prop_assert_eq!(m.mesh.uv.len(), quads * 8);
        prop_assert!(m.mesh.idx.iter().all(|&i| (i as usize) < m.mesh.vertex_count()));
    }

    // Every vertex lies inside the chunk-local box
    #[test]
    fn vertices_stay_inside_bbox(buf in arb_buf()) {
        let m = build_chunk_mesh_cpu(&buf);
        for i in 0..m.mesh.vertex_count() as u32 {
            prop_assert!(m.bbox.contains(m.mesh.position(i)));
        }
    }
}
