use criterion::{Criterion, black_box, criterion_group, criterion_main};
use std::time::Duration;

use voxland_chunk::{Block, ChunkBuf, generate_chunk_buffer};
use voxland_mesh_cpu::build_chunk_mesh_cpu;
use voxland_world::{ChunkCoord, World};

fn bench_terrain_chunk(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_chunk_mesh_terrain");
    let world = World::new(16, 32, 16);
    let buf = generate_chunk_buffer(&world, ChunkCoord::new(0, 0, 0)).buf;
    group.bench_function("terrain_16x32x16", |b| {
        b.iter(|| black_box(build_chunk_mesh_cpu(black_box(&buf))))
    });
    group.finish();
}

fn bench_checkerboard_chunk(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_chunk_mesh_checkerboard");
    group.measurement_time(Duration::from_secs(8));
    let (sx, sy, sz) = (16, 32, 16);
    let mut buf = ChunkBuf::empty(ChunkCoord::new(0, 0, 0), sx, sy, sz);
    for z in 0..sz {
        for y in 0..sy {
            for x in 0..sx {
                if (x + y + z) % 2 == 0 {
                    buf.set_local(x, y, z, Block::SOLID);
                }
            }
        }
    }
    group.bench_function("checkerboard_16x32x16", |b| {
        b.iter(|| black_box(build_chunk_mesh_cpu(black_box(&buf))))
    });
    group.finish();
}

criterion_group!(benches, bench_terrain_chunk, bench_checkerboard_chunk);
criterion_main!(benches);
