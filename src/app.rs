use std::sync::Arc;

use voxland_geom::Vec3;
use voxland_mesh_cpu::ChunkMeshCPU;
use voxland_runtime::{ChunkDirectory, Runtime};
use voxland_world::World;

use crate::config::Config;
use crate::event::{Event, EventQueue, log_event};
use crate::input::{Action, InputSource};
use crate::picker::BlockPicker;
use crate::player::Body;
use crate::raycast::{MeshRaycaster, RayQuery};
use crate::scene::{SceneSink, diff_meshes};

/// Ticks between stats lines.
pub const STATS_INTERVAL_TICKS: u64 = 60;

/// Simulation state plus its collaborators. One [`App::step`] is one tick.
pub struct App {
    pub directory: ChunkDirectory,
    pub body: Body,
    pub picker: BlockPicker,
    pub events: EventQueue,
    query: Box<dyn RayQuery>,
    input: Box<dyn InputSource>,
    scene: Box<dyn SceneSink>,
    current_meshes: Vec<Arc<ChunkMeshCPU>>,
    pending_edits: Vec<Action>,
    view_center: Option<(i32, i32)>,
}

impl App {
    pub fn new(cfg: &Config, input: Box<dyn InputSource>, scene: Box<dyn SceneSink>) -> Self {
        let world = Arc::new(World::from_config(&cfg.world_gen));
        let runtime =
            Runtime::new(world, cfg.runtime.workers).with_tick_budget(cfg.runtime.tick_budget);
        let directory =
            ChunkDirectory::with_runtime(runtime, cfg.world_gen.world.visibility_radius);
        log::info!(
            "world chunk_size={:?} radius={} chunks_in_direction={:?} workers={}",
            cfg.world_gen.world.chunk_size,
            directory.visibility_radius(),
            directory.chunks_in_direction(),
            cfg.runtime.workers
        );
        let body = Body::from_params(&cfg.player);
        let cc = directory.get_chunk_coordinate(body.position);
        let mut events = EventQueue::new();
        events.emit_now(Event::ViewCenterChanged { ccx: cc.cx, ccz: cc.cz });
        events.emit_after(STATS_INTERVAL_TICKS, Event::StatsDue);
        Self {
            directory,
            body,
            picker: BlockPicker::new(cfg.picker.near, cfg.picker.far),
            events,
            query: Box::new(MeshRaycaster),
            input,
            scene,
            current_meshes: Vec::new(),
            pending_edits: Vec::new(),
            view_center: None,
        }
    }

    /// Swaps the ray query backend.
    pub fn with_query(mut self, query: Box<dyn RayQuery>) -> Self {
        self.query = query;
        self
    }

    #[inline]
    pub fn meshes(&self) -> &[Arc<ChunkMeshCPU>] {
        &self.current_meshes
    }

    /// Chunk `(cx, cz)` the window is centered on, once known.
    #[inline]
    pub fn view_center(&self) -> Option<(i32, i32)> {
        self.view_center
    }

    pub fn step(&mut self, dt: f32) {
        let tick = self.events.now;

        let frame = self.input.poll(dt);
        self.events.emit_now(Event::Tick);
        if frame.movement != Vec3::ZERO {
            self.events.emit_now(Event::MovementRequested {
                movement: frame.movement,
            });
        }
        if frame.look != (0.0, 0.0) {
            self.events.emit_now(Event::LookRequested {
                dx: frame.look.0,
                dy: frame.look.1,
            });
        }
        for action in frame.actions {
            self.events.emit_now(Event::EditRequested { action });
        }

        while let Some(env) = self.events.pop_ready() {
            if env.tick < tick {
                log::debug!(target: "events", "[tick {}] event #{} carried over from tick {}", tick, env.id, env.tick);
            }
            log_event(tick, &env.kind);
            self.handle_event(tick, env.kind);
        }

        let meshes = self.directory.get_available_meshes(self.body.position);
        let diff = diff_meshes(&self.current_meshes, &meshes);
        if !diff.is_empty() {
            self.scene.update_meshes(&diff.added, &diff.removed);
        }
        self.current_meshes = meshes;

        self.picker.update_focus(
            self.query.as_ref(),
            self.body.position,
            self.body.forward(),
            &self.current_meshes,
        );
        for action in std::mem::take(&mut self.pending_edits) {
            self.apply_edit(tick, action);
        }

        let p = self.body.position;
        log::trace!(target: "hud", "{}, {}, {}", p.x, p.y, p.z);

        self.events.advance_tick();
    }

    fn handle_event(&mut self, tick: u64, ev: Event) {
        match ev {
            Event::Tick => {}
            Event::MovementRequested { movement } => {
                self.body
                    .apply_movement(movement, self.query.as_ref(), &self.current_meshes);
                let cc = self.directory.get_chunk_coordinate(self.body.position);
                if self.view_center != Some((cc.cx, cc.cz)) {
                    self.events
                        .emit_now(Event::ViewCenterChanged { ccx: cc.cx, ccz: cc.cz });
                }
            }
            Event::LookRequested { dx, dy } => self.body.look(dx, dy),
            // Resolved against this tick's focus
            Event::EditRequested { action } => self.pending_edits.push(action),
            Event::ViewCenterChanged { ccx, ccz } => self.view_center = Some((ccx, ccz)),
            Event::StatsDue => {
                self.log_stats(tick);
                self.events.emit_after(STATS_INTERVAL_TICKS, Event::StatsDue);
            }
        }
    }

    fn apply_edit(&mut self, tick: u64, action: Action) {
        let target = match action {
            Action::Primary => self.picker.get_existing_block_position(),
            Action::Secondary => self.picker.get_placement_block_position(),
        };
        let Some((x, y, z)) = target else {
            log::debug!(target: "events", "[tick {}] {:?} with no focus", tick, action);
            return;
        };
        let pos = Vec3::from_i32(x, y, z);
        match action {
            Action::Primary => self.directory.remove_block(pos),
            Action::Secondary => self.directory.place_block(pos),
        }
        log::info!(target: "events", "[tick {}] {} block ({}, {}, {})",
            tick, if action == Action::Primary { "removed" } else { "placed" }, x, y, z);
    }

    fn log_stats(&self, tick: u64) {
        let s = self.directory.stats();
        let (queued, inflight) = self.directory.runtime().queue_debug_counts();
        log::info!(
            "[tick {}] chunks={} built={} pending={} tris={} queue={} inflight={}",
            tick,
            s.chunks,
            s.built,
            s.pending,
            s.triangles,
            queued,
            inflight
        );
    }
}
