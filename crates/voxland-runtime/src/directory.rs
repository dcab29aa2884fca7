use std::sync::Arc;

use hashbrown::HashMap;
use voxland_chunk::{Block, ChunkBuf, generate_chunk_buffer};
use voxland_geom::Vec3;
use voxland_mesh_cpu::{ChunkMeshCPU, build_chunk_mesh_cpu};
use voxland_world::{ChunkCoord, World};

use crate::{BuildJob, Runtime};

/// Directory slot for one chunk.
#[derive(Debug)]
pub struct ChunkEntry {
    pub coord: ChunkCoord,
    /// Block grid, generated on first need.
    pub buf: Option<ChunkBuf>,
    pub mesh: Option<Arc<ChunkMeshCPU>>,
    pub pending: bool,
    /// Bumped on every edit.
    pub rev: u64,
    /// `rev` the current mesh was built from.
    pub built_rev: u64,
}

impl ChunkEntry {
    fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            buf: None,
            mesh: None,
            pending: false,
            rev: 0,
            built_rev: 0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DirectoryStats {
    pub chunks: usize,
    pub built: usize,
    pub pending: usize,
    pub triangles: usize,
}

/// Lazily materialized chunks around a moving viewer.
///
/// Only the `cy == 0` layer is ever meshed: each chunk spans the full
/// vertical extent of the terrain. Nothing is evicted.
pub struct ChunkDirectory {
    world: Arc<World>,
    runtime: Runtime,
    chunks: HashMap<ChunkCoord, ChunkEntry>,
    visibility_radius: f32,
    chunks_in_direction: (i32, i32, i32),
    next_job_id: u64,
}

impl ChunkDirectory {
    pub fn new(world: Arc<World>, visibility_radius: f32, workers: usize) -> Self {
        let runtime = Runtime::new(world.clone(), workers);
        Self::with_runtime(runtime, visibility_radius)
    }

    pub fn with_runtime(runtime: Runtime, visibility_radius: f32) -> Self {
        let world = runtime.world().clone();
        let chunks_in_direction = world.chunks_in_direction(visibility_radius);
        Self {
            world,
            runtime,
            chunks: HashMap::new(),
            visibility_radius,
            chunks_in_direction,
            next_job_id: 0,
        }
    }

    #[inline]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[inline]
    pub fn visibility_radius(&self) -> f32 {
        self.visibility_radius
    }

    #[inline]
    pub fn chunks_in_direction(&self) -> (i32, i32, i32) {
        self.chunks_in_direction
    }

    #[inline]
    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    #[inline]
    pub fn get_chunk_coordinate(&self, pos: Vec3) -> ChunkCoord {
        self.world.chunk_coord_of(pos)
    }

    #[inline]
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&ChunkEntry> {
        self.chunks.get(&coord)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Entry for the chunk containing `pos`, inserted empty on first reference.
    pub fn get_or_create_chunk(&mut self, pos: Vec3) -> &mut ChunkEntry {
        let coord = self.get_chunk_coordinate(pos);
        self.entry_at(coord)
    }

    fn entry_at(&mut self, coord: ChunkCoord) -> &mut ChunkEntry {
        self.chunks
            .entry(coord)
            .or_insert_with(|| ChunkEntry::new(coord))
    }

    fn ensure_buf<'a>(world: &World, entry: &'a mut ChunkEntry) -> &'a mut ChunkBuf {
        let coord = entry.coord;
        entry
            .buf
            .get_or_insert_with(|| generate_chunk_buffer(world, coord).buf)
    }

    /// Applies finished builds. Results older than the entry's revision are
    /// dropped; the chunk gets rescheduled on its next request.
    pub fn pump_builds(&mut self) -> usize {
        let mut applied = 0;
        for out in self.runtime.drain_worker_results() {
            let Some(entry) = self.chunks.get_mut(&out.coord) else {
                log::warn!("build result for unknown chunk {}", out.coord);
                continue;
            };
            entry.pending = false;
            if out.rev < entry.rev {
                log::debug!(
                    "stale build chunk={} job={} rev={} cur_rev={}",
                    out.coord,
                    out.job_id,
                    out.rev,
                    entry.rev
                );
                continue;
            }
            log::info!(
                target: "perf",
                "ms={} build_chunk gen={} mesh={} chunk={} occupancy={:?}",
                out.t_total_ms,
                out.t_gen_ms,
                out.t_mesh_ms,
                out.coord,
                out.occupancy
            );
            if entry.buf.is_none() {
                entry.buf = Some(out.buf);
            }
            entry.mesh = Some(Arc::new(out.cpu));
            entry.built_rev = out.rev;
            applied += 1;
        }
        applied
    }

    fn schedule_build(&mut self, coord: ChunkCoord) {
        let job_id = self.next_job_id;
        self.next_job_id += 1;
        let Some(entry) = self.chunks.get_mut(&coord) else {
            return;
        };
        entry.pending = true;
        let job = BuildJob {
            coord,
            rev: entry.rev,
            job_id,
            prev_buf: entry.buf.clone(),
        };
        self.runtime.submit_build_job(job);
    }

    /// Built meshes in the visible window around `viewer`.
    ///
    /// Chunks without a mesh get a deferred build and are omitted; they show
    /// up in a later call once the build completes.
    pub fn get_available_meshes(&mut self, viewer: Vec3) -> Vec<Arc<ChunkMeshCPU>> {
        self.pump_builds();
        let center = self.get_chunk_coordinate(viewer);
        let (dx, _, dz) = self.chunks_in_direction;
        let mut meshes = Vec::new();
        let mut to_build = Vec::new();
        for cx in center.cx - dx..=center.cx + dx {
            for cz in center.cz - dz..=center.cz + dz {
                let entry = self.entry_at(ChunkCoord::new(cx, 0, cz));
                if let Some(mesh) = &entry.mesh {
                    meshes.push(mesh.clone());
                } else if !entry.pending {
                    to_build.push(entry.coord);
                }
            }
        }
        for coord in to_build {
            self.schedule_build(coord);
        }
        meshes
    }

    /// Writes one block. A chunk that already has a mesh is remeshed here on
    /// the owning thread, so it never drops out of the mesh set; any build
    /// still in flight for it goes stale.
    fn set_block(&mut self, pos: Vec3, block: Block) {
        let (wx, wy, wz) = pos.floor_i32();
        let coord = self.world.chunk_coord_of_block(wx, wy, wz);
        let world = self.world.clone();
        let entry = self.entry_at(coord);
        Self::ensure_buf(&world, entry).set_world(wx, wy, wz, block);
        entry.rev += 1;
        if entry.mesh.is_some() {
            entry.mesh = entry.buf.as_ref().map(|b| Arc::new(build_chunk_mesh_cpu(b)));
            entry.built_rev = entry.rev;
        }
    }

    pub fn place_block(&mut self, pos: Vec3) {
        self.set_block(pos, Block::SOLID);
    }

    pub fn remove_block(&mut self, pos: Vec3) {
        self.set_block(pos, Block::EMPTY);
    }

    pub fn get_block(&mut self, pos: Vec3) -> Block {
        let (wx, wy, wz) = pos.floor_i32();
        let coord = self.world.chunk_coord_of_block(wx, wy, wz);
        let world = self.world.clone();
        let entry = self.entry_at(coord);
        Self::ensure_buf(&world, entry)
            .get_world(wx, wy, wz)
            .unwrap_or(Block::EMPTY)
    }

    pub fn stats(&self) -> DirectoryStats {
        let mut s = DirectoryStats {
            chunks: self.chunks.len(),
            ..DirectoryStats::default()
        };
        for e in self.chunks.values() {
            if let Some(m) = &e.mesh {
                s.built += 1;
                s.triangles += m.triangle_count();
            }
            if e.pending {
                s.pending += 1;
            }
        }
        s
    }
}
