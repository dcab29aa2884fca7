use serde::Deserialize;
use std::error::Error;

/// `[world]` section: chunk dimensions and how far the viewer sees.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct WorldParams {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: [usize; 3],
    #[serde(default = "default_visibility_radius")]
    pub visibility_radius: f32,
}

fn default_chunk_size() -> [usize; 3] {
    [16, 32, 16]
}
fn default_visibility_radius() -> f32 {
    50.0
}

impl Default for WorldParams {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            visibility_radius: default_visibility_radius(),
        }
    }
}

impl WorldParams {
    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.chunk_size.iter().any(|&d| d == 0) {
            return Err(format!("world.chunk_size must be non-zero, got {:?}", self.chunk_size).into());
        }
        if !(self.visibility_radius.is_finite() && self.visibility_radius > 0.0) {
            return Err(format!(
                "world.visibility_radius must be positive, got {}",
                self.visibility_radius
            )
            .into());
        }
        Ok(())
    }
}

/// `[terrain]` section: the rolling sine heightfield.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct TerrainParams {
    #[serde(default = "default_amplitude")]
    pub amplitude: f64,
    #[serde(default = "default_period")]
    pub period: f64,
}

fn default_amplitude() -> f64 {
    5.0
}
fn default_period() -> f64 {
    10.0
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            amplitude: default_amplitude(),
            period: default_period(),
        }
    }
}

impl TerrainParams {
    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        if !self.amplitude.is_finite() {
            return Err(format!("terrain.amplitude must be finite, got {}", self.amplitude).into());
        }
        if !(self.period.is_finite() && self.period != 0.0) {
            return Err(format!("terrain.period must be finite and non-zero, got {}", self.period).into());
        }
        Ok(())
    }

    /// Surface height of the column at `(x, z)`.
    #[inline]
    pub fn height_at(&self, x: i32, z: i32) -> f64 {
        let (x, z) = (x as f64, z as f64);
        let p = self.period;
        self.amplitude * ((2.0 * x + z) / p).sin()
            + self.amplitude * (x / p).sin()
            + self.amplitude * (z / p).sin()
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct WorldGenConfig {
    #[serde(default)]
    pub world: WorldParams,
    #[serde(default)]
    pub terrain: TerrainParams,
}

impl WorldGenConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: WorldGenConfig = toml::from_str(toml_str)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        self.world.validate()?;
        self.terrain.validate()
    }
}
