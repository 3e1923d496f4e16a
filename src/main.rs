//! Pilot Adventures entry point
//!
//! Loads settings, levels and assets (any failure aborts before the first
//! frame), then runs the engine headless: input comes from an optional replay
//! script and the last frame can be saved as a screenshot.

use std::path::{Path, PathBuf};

use clap::Parser;

use pilot_adventures::audio::{AudioManager, LogBackend};
use pilot_adventures::consts::{SPAWN_LIFT, TILE_SIZE};
use pilot_adventures::persistence::{PROGRESS_FILE, Progress};
use pilot_adventures::platform::{FramePacer, HeadlessPlatform, ReplayScript};
use pilot_adventures::renderer::Assets;
use pilot_adventures::sim::load_levels;
use pilot_adventures::{Engine, EngineError, Settings};

/// Pilot Adventures
#[derive(Parser)]
#[command(version, about = "A tile-based 2D platformer")]
struct Cli {
    /// Settings JSON (defaults are used when the file is missing)
    #[arg(long, value_name = "PATH", default_value = "settings.json")]
    settings: PathBuf,

    /// Directory of level bitmaps
    #[arg(long, value_name = "DIR", default_value = "levels")]
    levels: PathBuf,

    /// Directory of sprites and sounds
    #[arg(long, value_name = "DIR", default_value = "assets")]
    assets: PathBuf,

    /// Progress file
    #[arg(long, value_name = "PATH", default_value = PROGRESS_FILE)]
    progress: PathBuf,

    /// Replay script of input events to feed the engine
    #[arg(long, value_name = "PATH")]
    replay: Option<PathBuf>,

    /// Stop after this many frames
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Draw flat-colour stand-ins instead of loading sprites and sounds
    #[arg(long)]
    placeholder_art: bool,

    /// Save the last frame as a PNG
    #[arg(long, value_name = "PATH")]
    screenshot: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    log::info!("Pilot Adventures starting...");

    if let Err(e) = run(&cli) {
        log::error!("{}", e);
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), EngineError> {
    let settings = Settings::load(&cli.settings)?;
    let levels = load_levels(&cli.levels, TILE_SIZE, SPAWN_LIFT)?;
    let assets = load_assets(cli, &settings)?;

    let audio = AudioManager::new(Box::new(LogBackend), &settings);
    let replay = cli.replay.as_deref().map(ReplayScript::load).transpose()?;
    let pacer = if replay.is_some() {
        FramePacer::fixed(settings.target_fps)
    } else {
        FramePacer::new(settings.target_fps)
    };

    let mut engine = Engine::new(
        &settings,
        levels,
        assets,
        audio,
        Progress::new(&cli.progress),
        pacer,
    )?;

    let mut platform = replay.map(|script| HeadlessPlatform::new(script, engine.event_sender()));
    engine.run(Some(cli.frames), platform.as_mut());
    if platform.as_ref().is_some_and(|p| !p.finished()) {
        log::warn!("Replay has unsent events after {} frames", cli.frames);
    }

    if let Some(path) = &cli.screenshot {
        engine.framebuffer().save_png(path)?;
    }
    Ok(())
}

fn load_assets(cli: &Cli, settings: &Settings) -> Result<Assets, EngineError> {
    if cli.placeholder_art {
        return Ok(Assets::placeholder(
            settings.buffer_width,
            settings.buffer_height,
            TILE_SIZE,
            &settings.tuning,
        ));
    }
    let dir: &Path = &cli.assets;
    AudioManager::verify_assets(dir)?;
    Assets::load(dir)
}
