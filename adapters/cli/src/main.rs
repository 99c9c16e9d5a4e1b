#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Pocket Snake experience.

mod shell;

use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::Parser;
use pocket_snake_core::{Command, GridSize, SessionPhase};
use pocket_snake_rendering::{
    GridPresentation, Presentation, RenderingBackend, Scene, SceneTheme,
};
use pocket_snake_rendering_macroquad::MacroquadBackend;
use pocket_snake_session::{self as session, query, Config as SessionConfig, Session};
use pocket_snake_system_cadence::{Cadence, Config as CadenceConfig};
use pocket_snake_system_input::Input;
use rand::Rng;

const WINDOW_TITLE: &str = "Pocket Snake";

/// Options accepted by the `pocket-snake` binary.
#[derive(Debug, Parser)]
#[command(name = "pocket-snake", about = "Grid snake on a fixed tick cadence")]
struct Options {
    /// Drawing surface width in pixels.
    #[arg(long, default_value_t = 400)]
    surface_width: u32,
    /// Drawing surface height in pixels.
    #[arg(long, default_value_t = 300)]
    surface_height: u32,
    /// Side length of a grid cell in pixels.
    #[arg(long, default_value_t = 20)]
    cell_length: u32,
    /// Milliseconds between simulation ticks.
    #[arg(long, default_value_t = 180)]
    tick_interval_ms: u64,
    /// Seed for food placement; drawn from entropy when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Path to a TOML key-binding table overriding the defaults.
    #[arg(long)]
    bindings: Option<PathBuf>,
    /// Print frame timing metrics once per second.
    #[arg(long)]
    show_fps: bool,
}

/// Entry point for the Pocket Snake command-line interface.
fn main() -> Result<()> {
    let options = Options::parse();

    let grid = GridSize::from_surface(
        options.surface_width,
        options.surface_height,
        options.cell_length,
    )
    .context("failed to derive the grid from the drawing surface")?;

    let seed = options
        .seed
        .unwrap_or_else(|| rand::thread_rng().gen());

    let mut session = Session::new(SessionConfig::new(grid, seed))
        .context("drawing surface cannot host the snake spawn")?;
    let input = Input::new(shell::load_bindings(options.bindings.as_deref())?);
    let mut cadence = Cadence::new(CadenceConfig::new(Duration::from_millis(
        options.tick_interval_ms,
    )));

    let grid_presentation =
        GridPresentation::new(grid.columns(), grid.rows(), options.cell_length as f32)
            .context("failed to build the grid presentation")?;
    let mut scene = Scene::new(grid_presentation, SceneTheme::default());

    println!(
        "{WINDOW_TITLE} - {}x{} grid, seed {seed:#x}",
        grid.columns(),
        grid.rows()
    );

    // The window opens onto a running game, matching the source overlay
    // which starts a session the moment it is shown.
    let mut events = Vec::new();
    session::apply(&mut session, Command::Start, &mut events);
    shell::report_events(&events);
    shell::refresh_scene(&mut scene, &session);

    let backend = MacroquadBackend::default().with_fps_metrics(options.show_fps);
    backend.run(
        Presentation::new(WINDOW_TITLE, scene),
        move |frame_dt, frame_input, scene| {
            let update_start = Instant::now();
            let mut commands = Vec::new();

            if frame_input.exit {
                commands.push(Command::Exit);
            }
            if frame_input.restart && query::phase(&session) == SessionPhase::Ended {
                commands.push(Command::Start);
            }

            let pressed: Vec<&str> = frame_input
                .pressed_keys
                .iter()
                .map(String::as_str)
                .collect();
            input.handle(&pressed, &mut commands);
            cadence.handle(query::phase(&session), frame_dt, &mut commands);

            events.clear();
            for command in commands {
                session::apply(&mut session, command, &mut events);
            }

            shell::report_events(&events);
            shell::refresh_scene(scene, &session);
            update_start.elapsed()
        },
    )
}
