use std::sync::{Arc, Mutex};

use voxland::app::{App, STATS_INTERVAL_TICKS};
use voxland::input::{Action, Key, ScriptStep, ScriptedInput};
use voxland::scene::{SceneSink, diff_meshes};
use voxland::{Config, Intersection, RayQuery};
use voxland_chunk::Block;
use voxland_geom::Vec3;
use voxland_mesh_cpu::ChunkMeshCPU;
use voxland_runtime::ChunkDirectory;
use voxland_world::{ChunkCoord, World};

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<(usize, usize)>>>);

impl SceneSink for Recorder {
    fn update_meshes(&mut self, added: &[Arc<ChunkMeshCPU>], removed: &[Arc<ChunkMeshCPU>]) {
        self.0.lock().unwrap().push((added.len(), removed.len()));
    }
}

struct NoHits;

impl RayQuery for NoHits {
    fn intersect(
        &self,
        _origin: Vec3,
        _dir: Vec3,
        _near: f32,
        _far: f32,
        _meshes: &[Arc<ChunkMeshCPU>],
    ) -> Vec<Intersection> {
        Vec::new()
    }
}

fn config(spawn: (f32, f32, f32), workers: usize) -> Config {
    Config::from_toml_str(&format!(
        "[world]\nvisibility_radius = 16.0\n\
         [player]\nspawn = [{:?}, {:?}, {:?}]\n\
         [runtime]\nworkers = {}\n",
        spawn.0, spawn.1, spawn.2, workers
    ))
    .unwrap()
}

/// A column in chunk (0,0,0) with its top solid block at y >= 2.
fn tall_column() -> (i32, i32, i32) {
    let world = World::new(16, 32, 16);
    for z in 0..16 {
        for x in 0..16 {
            let top = (0..32).rev().find(|&y| world.block_at(x, y, z).is_solid()).unwrap();
            if top >= 2 {
                return (x, top, z);
            }
        }
    }
    panic!("no tall column in chunk 0");
}

fn dig_and_refill_script() -> ScriptedInput {
    ScriptedInput::new(vec![
        ScriptStep::look(0.0, 1000.0),
        ScriptStep::idle(2),
        ScriptStep::action(Action::Primary),
        ScriptStep::idle(2),
        ScriptStep::action(Action::Secondary),
        ScriptStep::idle(2),
    ])
}

#[test]
fn digging_and_refilling_the_focused_column() {
    let (x, top, z) = tall_column();
    let cfg = config((x as f32 + 0.3, top as f32 + 4.0, z as f32 + 0.6), 0);
    let recorder = Recorder::default();
    let mut app = App::new(&cfg, Box::new(dig_and_refill_script()), Box::new(recorder.clone()));
    let block = Vec3::from_i32(x, top, z);

    // Look down; window builds land on the next tick
    app.step(0.016);
    assert!(app.meshes().is_empty());
    app.step(0.016);
    assert_eq!(app.meshes().len(), 9);
    assert_eq!(app.picker.get_existing_block_position(), Some((x, top, z)));
    assert_eq!(app.picker.get_placement_block_position(), Some((x, top + 1, z)));

    app.step(0.016);
    app.step(0.016); // primary
    assert_eq!(app.directory.get_block(block), Block::EMPTY);

    // The edited chunk is remeshed in place and never leaves the set
    app.step(0.016);
    assert_eq!(app.meshes().len(), 9);
    assert_eq!(app.picker.get_existing_block_position(), Some((x, top - 1, z)));
    app.step(0.016);
    app.step(0.016); // secondary
    assert_eq!(app.directory.get_block(block), Block::SOLID);

    assert_eq!(app.events.now, 7);
    let updates = recorder.0.lock().unwrap().clone();
    assert_eq!(updates, vec![(9, 0), (1, 1)]);
}

#[test]
fn edits_without_focus_are_ignored() {
    let (x, top, z) = tall_column();
    let cfg = config((x as f32 + 0.3, top as f32 + 4.0, z as f32 + 0.6), 0);
    let mut app = App::new(&cfg, Box::new(dig_and_refill_script()), Box::new(Recorder::default()))
        .with_query(Box::new(NoHits));
    for _ in 0..7 {
        app.step(0.016);
    }
    assert!(app.picker.focus().is_none());
    assert_eq!(app.directory.get_block(Vec3::from_i32(x, top, z)), Block::SOLID);
}

#[test]
fn moving_one_chunk_shifts_one_column() {
    fn settle(d: &mut ChunkDirectory, viewer: Vec3) -> Vec<Arc<ChunkMeshCPU>> {
        let mut meshes = d.get_available_meshes(viewer);
        while d.stats().pending > 0 {
            meshes = d.get_available_meshes(viewer);
        }
        meshes
    }
    let mut d = ChunkDirectory::new(Arc::new(World::new(16, 32, 16)), 16.0, 0);
    let before = settle(&mut d, Vec3::new(8.0, 20.0, 8.0));
    let after = settle(&mut d, Vec3::new(24.0, 20.0, 8.0));
    let diff = diff_meshes(&before, &after);
    assert_eq!(diff.removed.len(), 3);
    assert_eq!(diff.added.len(), 3);
    assert!(diff.removed.iter().all(|m| m.coord.cx == -1));
    assert!(diff.added.iter().all(|m| m.coord.cx == 2));
    assert!(after.iter().any(|m| m.coord == ChunkCoord::new(1, 0, -1)));
}

#[test]
fn stats_reschedule_themselves() {
    let cfg = config((8.0, 20.0, 8.0), 0);
    let mut app = App::new(
        &cfg,
        Box::new(ScriptedInput::new(Vec::new())),
        Box::new(Recorder::default()),
    );
    // Only the next stats line stays queued
    for _ in 0..(2 * STATS_INTERVAL_TICKS + 1) {
        app.step(0.016);
        assert_eq!(app.events.len(), 1);
    }
}

#[test]
fn crossing_a_chunk_border_moves_the_view_center() {
    let cfg = config((15.0, 28.0, 8.0), 0);
    let script = ScriptedInput::new(vec![ScriptStep::hold(&[Key::D], 11)]);
    let mut app = App::new(&cfg, Box::new(script), Box::new(Recorder::default()));
    app.step(0.016);
    assert_eq!(app.view_center(), Some((0, 0)));
    for _ in 0..10 {
        app.step(0.016);
    }
    assert!(app.body.position.x > 16.0, "{:?}", app.body.position);
    assert_eq!(app.view_center(), Some((1, 0)));
}

#[test]
fn scripted_flight_moves_the_body() {
    let cfg = config((0.0, 20.0, 50.0), 2);
    let mut app = App::new(
        &cfg,
        Box::new(ScriptedInput::fly_through()),
        Box::new(Recorder::default()),
    );
    let start = app.body.position;
    for _ in 0..200 {
        app.step(0.016);
    }
    assert_eq!(app.events.now, 200);
    assert!((app.body.position - start).length() > 1.0);
    assert!(app.body.position.x.is_finite() && app.body.position.y.is_finite());
}
