#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots a Cubesnake session.

mod layout_file;
mod settings;
mod simulation;

use std::{
    fs,
    io::{self, IsTerminal},
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use cubesnake_core::{Event, SessionConfig};
use cubesnake_rendering::{
    Color, FrameInput, FrameSimulationBreakdown, Presentation, RenderingBackend, Scene,
};
use cubesnake_rendering_macroquad::MacroquadBackend;
use cubesnake_world::{query, Layout};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use self::{
    settings::{Overrides, Preset, StrategyArg},
    simulation::Simulation,
};

/// Fixed step used when no window paces the frames.
const HEADLESS_FRAME: Duration = Duration::from_nanos(16_666_667);

/// Command-line arguments accepted by the Cubesnake binary.
#[derive(Debug, Parser)]
#[command(
    name = "cubesnake",
    version,
    about = "Steer a segmented chain through a wrapping cube"
)]
struct Args {
    /// TOML file whose keys replace the preset's values.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Starting configuration.
    #[arg(long, value_enum, default_value_t = Preset::Classic)]
    preset: Preset,
    /// Movement strategy, overriding the preset and config file.
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,
    /// Seed for target placement.
    #[arg(long)]
    seed: Option<u64>,
    /// TOML file that pins the head and every target.
    #[arg(long, value_name = "FILE")]
    layout: Option<PathBuf>,
    /// Runs the given number of frames without opening a window.
    #[arg(long, value_name = "FRAMES")]
    headless: Option<u64>,
    /// Controls whether presentation waits for the display refresh.
    #[arg(long, value_enum, default_value_t = VsyncMode::On)]
    vsync: VsyncMode,
    /// Prints frame timing once per second.
    #[arg(long)]
    show_fps: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum VsyncMode {
    On,
    Off,
}

/// Entry point for the Cubesnake command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = settings::resolve(
        args.preset,
        args.config.as_deref(),
        Overrides {
            strategy: args.strategy,
            seed: args.seed,
        },
    )?;
    let layout = args.layout.as_deref().map(load_layout).transpose()?;

    match args.headless {
        Some(frames) => run_headless(config, layout, frames),
        None => run_interactive(config, layout, args.vsync, args.show_fps),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(io::stdout().is_terminal())
        .try_init();
}

fn load_layout(path: &Path) -> Result<Layout> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read layout file {}", path.display()))?;
    layout_file::parse(&contents)
        .with_context(|| format!("failed to load layout file {}", path.display()))
}

fn run_headless(config: SessionConfig, layout: Option<Layout>, frames: u64) -> Result<()> {
    let mut simulation = Simulation::new(config, layout);
    let input = FrameInput::default();

    for _ in 0..frames {
        simulation.advance(HEADLESS_FRAME, &input);
        for event in simulation.last_events() {
            if let Event::ScoreChanged { score, speed, .. } = event {
                debug!(score, speed, "score changed");
            }
        }
    }

    let world = simulation.world();
    info!(
        frames = query::frame_index(world),
        score = query::score(world),
        remaining_targets = query::remaining_targets(world),
        stage = ?query::end_stage(world),
        strategy = ?query::config(world).strategy,
        "headless session finished"
    );
    Ok(())
}

fn run_interactive(
    config: SessionConfig,
    layout: Option<Layout>,
    vsync: VsyncMode,
    show_fps: bool,
) -> Result<()> {
    let mut simulation = Simulation::new(config, layout);
    let world = simulation.world();
    let mut scene = Scene::new(
        query::volume(world).side(),
        query::camera_distance(world),
    );
    simulation.populate_scene(&mut scene);

    let presentation = Presentation::new("Cubesnake", Color::from_rgb_u8(0, 0, 0), scene);
    let backend = MacroquadBackend::new()
        .with_vsync(vsync == VsyncMode::On)
        .with_show_fps(show_fps);

    backend
        .run(presentation, move |dt, input, scene| {
            let simulation_start = Instant::now();
            simulation.advance(dt, &input);
            let simulation_time = simulation_start.elapsed();

            if input.toggle_auto_rotate {
                scene.camera.auto_rotate = !scene.camera.auto_rotate;
            }

            let population_start = Instant::now();
            simulation.populate_scene(scene);
            FrameSimulationBreakdown {
                simulation: simulation_time,
                scene_population: population_start.elapsed(),
            }
        })
        .context("failed to run the macroquad backend")
}
