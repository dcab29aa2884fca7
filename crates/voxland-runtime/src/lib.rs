//! Deferred chunk builds and the chunk directory (engine-only).
#![forbid(unsafe_code)]

mod directory;

pub use directory::{ChunkDirectory, ChunkEntry, DirectoryStats};

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender, unbounded};
use rayon::{ThreadPool, ThreadPoolBuilder};
use voxland_chunk::{ChunkBuf, ChunkOccupancy, generate_chunk_buffer};
use voxland_mesh_cpu::{ChunkMeshCPU, build_chunk_mesh_cpu};
use voxland_world::{ChunkCoord, World};

#[derive(Clone, Debug)]
pub struct BuildJob {
    pub coord: ChunkCoord,
    pub rev: u64,
    pub job_id: u64,
    /// Block grid snapshot; `None` means generate from terrain.
    pub prev_buf: Option<ChunkBuf>,
}

pub struct JobOut {
    pub coord: ChunkCoord,
    pub rev: u64,
    pub job_id: u64,
    pub buf: ChunkBuf,
    pub cpu: ChunkMeshCPU,
    pub occupancy: ChunkOccupancy,
    pub t_total_ms: u32,
    pub t_gen_ms: u32,
    pub t_mesh_ms: u32,
}

fn elapsed_ms(t0: Instant) -> u32 {
    t0.elapsed().as_millis().min(u128::from(u32::MAX)) as u32
}

fn process_build_job(job: BuildJob, world: &World, tx: &Sender<JobOut>) {
    let BuildJob {
        coord,
        rev,
        job_id,
        prev_buf,
    } = job;
    let t_job_start = Instant::now();
    let mut t_gen_ms = 0;

    let (buf, occupancy) = if let Some(prev) = prev_buf {
        let occ = if prev.has_non_air() {
            ChunkOccupancy::Populated
        } else {
            ChunkOccupancy::Empty
        };
        (prev, occ)
    } else {
        let t0 = Instant::now();
        let generated = generate_chunk_buffer(world, coord);
        t_gen_ms = elapsed_ms(t0);
        (generated.buf, generated.occupancy)
    };

    let t0 = Instant::now();
    let cpu = build_chunk_mesh_cpu(&buf);
    let t_mesh_ms = elapsed_ms(t0);

    if tx
        .send(JobOut {
            coord,
            rev,
            job_id,
            buf,
            cpu,
            occupancy,
            t_total_ms: elapsed_ms(t_job_start),
            t_gen_ms,
            t_mesh_ms,
        })
        .is_err()
    {
        log::warn!("result channel closed; dropping build of chunk {coord} job={job_id}");
    }
}

enum Backend {
    Pool {
        job_tx: Sender<BuildJob>,
        _pool: Arc<ThreadPool>,
    },
    /// Jobs wait here until the owner drains results on the next tick.
    TickQueue { jobs: VecDeque<BuildJob> },
}

/// Tick-queue jobs run per drain unless overridden with
/// [`Runtime::with_tick_budget`].
pub const DEFAULT_TICK_BUDGET: usize = 16;

/// Runs chunk generation and meshing off the caller's tick.
///
/// With `workers > 0` jobs go to a rayon pool over a crossbeam queue. With
/// `workers == 0` they are queued and up to `tick_budget` of them run inside
/// each [`Runtime::drain_worker_results`] call on the owning thread.
pub struct Runtime {
    world: Arc<World>,
    backend: Backend,
    res_tx: Sender<JobOut>,
    res_rx: Receiver<JobOut>,
    queued: Arc<AtomicUsize>,
    inflight: Arc<AtomicUsize>,
    tick_budget: usize,
    pub workers: usize,
}

impl Runtime {
    pub fn new(world: Arc<World>, workers: usize) -> Self {
        let (res_tx, res_rx) = unbounded::<JobOut>();
        let queued = Arc::new(AtomicUsize::new(0));
        let inflight = Arc::new(AtomicUsize::new(0));

        let backend = if workers > 0 {
            let (job_tx, job_rx) = unbounded::<BuildJob>();
            let pool = Arc::new(
                ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .thread_name(|i| format!("voxland-build-{i}"))
                    .build()
                    .expect("build pool"),
            );
            for _ in 0..workers {
                let rx = job_rx.clone();
                let tx = res_tx.clone();
                let world = world.clone();
                let queued = queued.clone();
                let inflight = inflight.clone();
                pool.spawn(move || {
                    while let Ok(job) = rx.recv() {
                        queued.fetch_sub(1, Ordering::Relaxed);
                        inflight.fetch_add(1, Ordering::Relaxed);
                        process_build_job(job, world.as_ref(), &tx);
                        inflight.fetch_sub(1, Ordering::Relaxed);
                    }
                });
            }
            Backend::Pool {
                job_tx,
                _pool: pool,
            }
        } else {
            Backend::TickQueue {
                jobs: VecDeque::new(),
            }
        };

        Self {
            world,
            backend,
            res_tx,
            res_rx,
            queued,
            inflight,
            tick_budget: DEFAULT_TICK_BUDGET,
            workers,
        }
    }

    /// Caps tick-queue jobs per drain (at least one). No effect on the pool.
    pub fn with_tick_budget(mut self, budget: usize) -> Self {
        self.tick_budget = budget.max(1);
        self
    }

    #[inline]
    pub fn world(&self) -> &Arc<World> {
        &self.world
    }

    pub fn submit_build_job(&mut self, job: BuildJob) {
        self.queued.fetch_add(1, Ordering::Relaxed);
        match &mut self.backend {
            Backend::Pool { job_tx, .. } => {
                if let Err(err) = job_tx.send(job) {
                    self.queued.fetch_sub(1, Ordering::Relaxed);
                    log::warn!(
                        "build queue closed; chunk {} job={} not scheduled",
                        err.0.coord,
                        err.0.job_id
                    );
                }
            }
            Backend::TickQueue { jobs } => jobs.push_back(job),
        }
    }

    /// Completed builds since the last call. Never blocks on the pool; in
    /// tick-queue mode this first runs up to `tick_budget` queued jobs.
    pub fn drain_worker_results(&mut self) -> Vec<JobOut> {
        if let Backend::TickQueue { jobs } = &mut self.backend {
            for _ in 0..self.tick_budget {
                let Some(job) = jobs.pop_front() else {
                    break;
                };
                self.queued.fetch_sub(1, Ordering::Relaxed);
                self.inflight.fetch_add(1, Ordering::Relaxed);
                process_build_job(job, self.world.as_ref(), &self.res_tx);
                self.inflight.fetch_sub(1, Ordering::Relaxed);
            }
        }
        self.res_rx.try_iter().collect()
    }

    /// `(queued, inflight)` job counts.
    pub fn queue_debug_counts(&self) -> (usize, usize) {
        (
            self.queued.load(Ordering::Relaxed),
            self.inflight.load(Ordering::Relaxed),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn job(coord: ChunkCoord, job_id: u64) -> BuildJob {
        BuildJob {
            coord,
            rev: 0,
            job_id,
            prev_buf: None,
        }
    }

    #[test]
    fn tick_queue_runs_on_drain() {
        let world = Arc::new(World::new(8, 16, 8));
        let mut rt = Runtime::new(world, 0);
        rt.submit_build_job(job(ChunkCoord::new(0, 0, 0), 1));
        rt.submit_build_job(job(ChunkCoord::new(1, 0, 0), 2));
        assert_eq!(rt.queue_debug_counts(), (2, 0));
        let out = rt.drain_worker_results();
        assert_eq!(out.iter().map(|o| o.job_id).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(rt.queue_debug_counts(), (0, 0));
        assert!(rt.drain_worker_results().is_empty());
    }

    #[test]
    fn tick_budget_limits_jobs_per_drain() {
        let world = Arc::new(World::new(8, 16, 8));
        let mut rt = Runtime::new(world, 0).with_tick_budget(2);
        for i in 0..5 {
            rt.submit_build_job(job(ChunkCoord::new(i, 0, 0), i as u64));
        }
        let ids = |out: Vec<JobOut>| out.iter().map(|o| o.job_id).collect::<Vec<_>>();
        assert_eq!(ids(rt.drain_worker_results()), vec![0, 1]);
        assert_eq!(rt.queue_debug_counts(), (3, 0));
        assert_eq!(ids(rt.drain_worker_results()), vec![2, 3]);
        assert_eq!(ids(rt.drain_worker_results()), vec![4]);
        assert_eq!(rt.queue_debug_counts(), (0, 0));
    }

    #[test]
    fn prev_buf_is_meshed_instead_of_generated() {
        let world = Arc::new(World::new(4, 4, 4));
        let mut rt = Runtime::new(world, 0);
        let mut buf = ChunkBuf::empty(ChunkCoord::new(2, 0, 2), 4, 4, 4);
        buf.set_local(1, 1, 1, voxland_chunk::Block::SOLID);
        rt.submit_build_job(BuildJob {
            coord: buf.coord,
            rev: 3,
            job_id: 9,
            prev_buf: Some(buf.clone()),
        });
        let out = rt.drain_worker_results().pop().expect("one result");
        assert_eq!(out.rev, 3);
        assert_eq!(out.buf, buf);
        assert_eq!(out.cpu.mesh.idx.len(), 36);
        assert_eq!(out.t_gen_ms, 0);
    }

    #[test]
    fn pool_delivers_results() {
        let world = Arc::new(World::new(8, 16, 8));
        let mut rt = Runtime::new(world, 2);
        for i in 0..4 {
            rt.submit_build_job(job(ChunkCoord::new(i, 0, 0), i as u64));
        }
        let mut got = Vec::new();
        for _ in 0..500 {
            got.extend(rt.drain_worker_results());
            if got.len() == 4 {
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        let mut ids: Vec<_> = got.iter().map(|o| o.job_id).collect();
        ids.sort();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }
}
