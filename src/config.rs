use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;
use std::thread;

use voxland_world::worldgen::WorldGenConfig;

/// `[player]` section.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct PlayerParams {
    #[serde(default = "default_spawn")]
    pub spawn: [f32; 3],
    /// Units per second of key-held time.
    #[serde(default = "default_speed")]
    pub speed: f32,
    /// Radians per unit of look delta.
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f32,
    #[serde(default = "default_clearance")]
    pub clearance: f32,
    #[serde(default = "default_max_slide_iterations")]
    pub max_slide_iterations: usize,
}

fn default_spawn() -> [f32; 3] {
    [0.0, 20.0, 50.0]
}
fn default_speed() -> f32 {
    50.0
}
fn default_sensitivity() -> f32 {
    0.01
}
fn default_clearance() -> f32 {
    0.5
}
fn default_max_slide_iterations() -> usize {
    8
}

impl Default for PlayerParams {
    fn default() -> Self {
        Self {
            spawn: default_spawn(),
            speed: default_speed(),
            sensitivity: default_sensitivity(),
            clearance: default_clearance(),
            max_slide_iterations: default_max_slide_iterations(),
        }
    }
}

/// `[picker]` section: ray range for block focus.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct PickerParams {
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
}

fn default_near() -> f32 {
    0.1
}
fn default_far() -> f32 {
    10.0
}

impl Default for PickerParams {
    fn default() -> Self {
        Self {
            near: default_near(),
            far: default_far(),
        }
    }
}

/// `[runtime]` section. `workers = 0` runs builds on the tick thread.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RuntimeParams {
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Builds run per tick when `workers = 0`.
    #[serde(default = "default_tick_budget")]
    pub tick_budget: usize,
}

fn default_tick_budget() -> usize {
    voxland_runtime::DEFAULT_TICK_BUDGET
}

fn default_workers() -> usize {
    thread::available_parallelism()
        .map(|n| n.get().saturating_sub(1).max(1))
        .unwrap_or(2)
}

impl Default for RuntimeParams {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            tick_budget: default_tick_budget(),
        }
    }
}

/// Contents of `voxland.toml`. Every key is optional.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(flatten)]
    pub world_gen: WorldGenConfig,
    #[serde(default)]
    pub player: PlayerParams,
    #[serde(default)]
    pub picker: PickerParams,
    #[serde(default)]
    pub runtime: RuntimeParams,
}

impl Config {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: Config = toml::from_str(toml_str)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s).map_err(|e| format!("{}: {e}", path.display()).into())
    }

    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        self.world_gen.validate()?;
        let p = &self.player;
        if !(p.clearance.is_finite() && p.clearance >= 0.0) {
            return Err(format!("player.clearance must be finite and >= 0, got {}", p.clearance).into());
        }
        if !p.speed.is_finite() || !p.sensitivity.is_finite() {
            return Err("player.speed and player.sensitivity must be finite".into());
        }
        if p.spawn.iter().any(|c| !c.is_finite()) {
            return Err(format!("player.spawn must be finite, got {:?}", p.spawn).into());
        }
        if p.max_slide_iterations == 0 {
            return Err("player.max_slide_iterations must be at least 1".into());
        }
        if self.runtime.tick_budget == 0 {
            return Err("runtime.tick_budget must be at least 1".into());
        }
        let r = &self.picker;
        if !(r.near >= 0.0 && r.near < r.far && r.far.is_finite()) {
            return Err(format!("picker range must satisfy 0 <= near < far, got {}..{}", r.near, r.far).into());
        }
        Ok(())
    }
}
