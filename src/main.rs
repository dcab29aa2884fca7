use std::error::Error;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Parser;
use log::LevelFilter;
use simplelog::{ColorChoice, CombinedLogger, TermLogger, TerminalMode, WriteLogger};

use voxland::Config;
use voxland::app::App;
use voxland::input::ScriptedInput;
use voxland::scene::LoggingSink;

const DEFAULT_CONFIG: &str = "voxland.toml";

#[derive(Parser, Debug)]
#[command(name = "voxland", about = "Headless scripted fly-through of the voxel landscape")]
struct Cli {
    /// Path to a TOML config; `voxland.toml` is used when present
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of ticks to simulate
    #[arg(long, default_value_t = 600)]
    ticks: u64,
    /// Build workers (0 = build on the tick thread)
    #[arg(long)]
    workers: Option<usize>,
    /// Visibility radius in world units
    #[arg(long)]
    radius: Option<f32>,
    /// Also write the log to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Tick length in milliseconds
    #[arg(long, default_value_t = 16)]
    dt_ms: u32,
}

fn init_logging(log_file: Option<&Path>) -> Result<(), Box<dyn Error>> {
    match log_file {
        Some(path) => {
            CombinedLogger::init(vec![
                TermLogger::new(
                    LevelFilter::Info,
                    simplelog::Config::default(),
                    TerminalMode::Mixed,
                    ColorChoice::Auto,
                ),
                WriteLogger::new(
                    LevelFilter::Debug,
                    simplelog::Config::default(),
                    File::create(path)?,
                ),
            ])?;
        }
        None => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .init();
        }
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config, Box<dyn Error>> {
    let mut cfg = match &cli.config {
        Some(path) => Config::load(path)?,
        None if Path::new(DEFAULT_CONFIG).exists() => Config::load(Path::new(DEFAULT_CONFIG))?,
        None => Config::default(),
    };
    if let Some(w) = cli.workers {
        cfg.runtime.workers = w;
    }
    if let Some(r) = cli.radius {
        cfg.world_gen.world.visibility_radius = r;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;
    let cfg = load_config(&cli)?;

    let dt = cli.dt_ms as f32 / 1000.0;
    let mut app = App::new(
        &cfg,
        Box::new(ScriptedInput::fly_through()),
        Box::new(LoggingSink::default()),
    );

    let start = Instant::now();
    for _ in 0..cli.ticks {
        app.step(dt);
    }
    let stats = app.directory.stats();
    let p = app.body.position;
    log::info!(
        "done ticks={} ms={} chunks={} built={} tris={} pos=({:.2}, {:.2}, {:.2})",
        cli.ticks,
        start.elapsed().as_millis(),
        stats.chunks,
        stats.built,
        stats.triangles,
        p.x,
        p.y,
        p.z
    );
    Ok(())
}
