#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Pocket Snake.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! The backend owns the window loop: it polls the keyboard into
//! backend-agnostic key identifiers, hands the frame delta and input to the
//! shell's update closure, then draws the returned scene (food circle, inset
//! body squares, head marker, score line, and the game-over dialog).

use std::time::{Duration, Instant};

use anyhow::Result;
use glam::Vec2;
use macroquad::input::{is_key_pressed, KeyCode};
use pocket_snake_core::SessionPhase;
use pocket_snake_rendering::{
    Color, FrameInput, GridPresentation, Presentation, RenderingBackend, Scene,
};

/// Physical keys the backend reports, paired with their identifiers.
///
/// Identifiers are the lowercased names a browser would report for the same
/// keys, which keeps binding tables portable across backends.
const DIRECTIONAL_KEYS: [(KeyCode, &str); 8] = [
    (KeyCode::Up, "arrowup"),
    (KeyCode::Down, "arrowdown"),
    (KeyCode::Left, "arrowleft"),
    (KeyCode::Right, "arrowright"),
    (KeyCode::W, "w"),
    (KeyCode::A, "a"),
    (KeyCode::S, "s"),
    (KeyCode::D, "d"),
];

/// Snapshot of edge-triggered keyboard shortcuts observed during a frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Escape` exits the session and closes the window.
    exit_requested: bool,
    /// `Enter` or `Space` restarts from the game-over dialog.
    restart_requested: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            exit_requested: is_key_pressed(KeyCode::Escape),
            restart_requested: is_key_pressed(KeyCode::Enter) || is_key_pressed(KeyCode::Space),
        }
    }
}

fn poll_directional_keys() -> Vec<String> {
    DIRECTIONAL_KEYS
        .iter()
        .filter(|(code, _)| is_key_pressed(*code))
        .map(|(_, identifier)| (*identifier).to_owned())
        .collect()
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            show_fps: false,
        }
    }
}

impl MacroquadBackend {
    /// Configures the backend to request a specific swap interval.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: i32) -> Self {
        self.swap_interval = Some(swap_interval);
        self
    }

    /// Configures whether frame timing metrics are printed once per second.
    #[must_use]
    pub fn with_fps_metrics(mut self, show_fps: bool) -> Self {
        self.show_fps = show_fps;
        self
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> Duration + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: scene.grid.width().ceil() as i32,
            window_height: scene.grid.height().ceil() as i32,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let mut fps_counter = FpsCounter::default();

            loop {
                let shortcuts = KeyboardShortcuts::poll();
                let frame_input = FrameInput {
                    pressed_keys: poll_directional_keys(),
                    restart: shortcuts.restart_requested,
                    exit: shortcuts.exit_requested,
                };
                let exit_requested = frame_input.exit;

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));

                let simulation_duration = update_scene(frame_dt, frame_input, &mut scene);

                macroquad::window::clear_background(to_macroquad_color(scene.theme.background));

                let metrics = ScreenMetrics::from_grid(
                    &scene.grid,
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );

                let render_start = Instant::now();
                draw_food(&scene, &metrics);
                draw_snake(&scene, &metrics);
                draw_score(&scene, &metrics);
                if scene.phase == SessionPhase::Ended {
                    draw_game_over_dialog(&scene, &metrics);
                }
                let render_duration = render_start.elapsed();

                if show_fps {
                    if let Some(FpsMetrics {
                        per_second,
                        avg_simulation,
                        avg_render,
                    }) = fps_counter.record(frame_dt, simulation_duration, render_duration)
                    {
                        println!(
                            "FPS: {:.2} | sim: {:>6.3}ms render: {:>6.3}ms",
                            per_second,
                            avg_simulation.as_secs_f64() * 1_000.0,
                            avg_render.as_secs_f64() * 1_000.0,
                        );
                    }
                }

                if exit_requested {
                    break;
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Scale and letterbox offsets that fit the grid into the window.
#[derive(Clone, Copy, Debug, PartialEq)]
struct ScreenMetrics {
    scale: f32,
    offset: Vec2,
}

impl ScreenMetrics {
    fn from_grid(grid: &GridPresentation, screen_width: f32, screen_height: f32) -> Self {
        let grid_width = grid.width();
        let grid_height = grid.height();
        if grid_width <= f32::EPSILON || grid_height <= f32::EPSILON {
            return Self {
                scale: 0.0,
                offset: Vec2::ZERO,
            };
        }

        let scale = (screen_width / grid_width).min(screen_height / grid_height);
        let offset = Vec2::new(
            (screen_width - grid_width * scale) / 2.0,
            (screen_height - grid_height * scale) / 2.0,
        );
        Self { scale, offset }
    }

    fn project(&self, point: Vec2) -> Vec2 {
        self.offset + point * self.scale
    }

    fn length(&self, length: f32) -> f32 {
        length * self.scale
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

fn draw_food(scene: &Scene, metrics: &ScreenMetrics) {
    let Some(cell) = scene.food else {
        return;
    };

    let center = metrics.project(scene.grid.cell_center(cell));
    macroquad::shapes::draw_circle(
        center.x,
        center.y,
        metrics.length(scene.grid.food_radius()),
        to_macroquad_color(scene.theme.food),
    );
}

fn draw_snake(scene: &Scene, metrics: &ScreenMetrics) {
    let body_size = scene.grid.body_cell_size() * metrics.scale;
    let body_color = to_macroquad_color(scene.theme.snake_body);

    for (index, cell) in scene.snake.iter().enumerate() {
        let origin = metrics.project(scene.grid.body_cell_origin(*cell));
        macroquad::shapes::draw_rectangle(origin.x, origin.y, body_size.x, body_size.y, body_color);

        if index == 0 {
            let marker_origin =
                metrics.project(scene.grid.head_marker_origin(*cell, scene.heading));
            let marker_size = scene.grid.head_marker_size() * metrics.scale;
            macroquad::shapes::draw_rectangle(
                marker_origin.x,
                marker_origin.y,
                marker_size.x,
                marker_size.y,
                to_macroquad_color(scene.theme.head_marker),
            );
        }
    }
}

fn draw_score(scene: &Scene, metrics: &ScreenMetrics) {
    let anchor = metrics.project(Vec2::new(8.0, 22.0));
    macroquad::text::draw_text(
        &format!("Score: {}", scene.score.get()),
        anchor.x,
        anchor.y,
        metrics.length(20.0),
        to_macroquad_color(scene.theme.score_text),
    );
}

fn draw_game_over_dialog(scene: &Scene, metrics: &ScreenMetrics) {
    let origin = metrics.project(Vec2::ZERO);
    macroquad::shapes::draw_rectangle(
        origin.x,
        origin.y,
        metrics.length(scene.grid.width()),
        metrics.length(scene.grid.height()),
        to_macroquad_color(scene.theme.dialog_scrim),
    );

    let center_x = metrics.project(Vec2::new(scene.grid.width() / 2.0, 0.0)).x;
    let text_color = to_macroquad_color(scene.theme.dialog_text);
    let final_score_line = format!("Final score: {}", scene.score.get());
    let lines: [(&str, f32, f32); 3] = [
        ("GAME OVER", 36.0, 0.42),
        (final_score_line.as_str(), 24.0, 0.52),
        ("Enter to restart - Esc to exit", 18.0, 0.62),
    ];

    for (text, size, vertical) in lines {
        let font_size = metrics.length(size);
        let dimensions = macroquad::text::measure_text(text, None, font_size as u16, 1.0);
        let baseline = metrics
            .project(Vec2::new(0.0, scene.grid.height() * vertical))
            .y;
        macroquad::text::draw_text(
            text,
            center_x - dimensions.width / 2.0,
            baseline,
            font_size,
            text_color,
        );
    }
}

/// Frame timing sampler that aggregates one second of frames at a time.
#[derive(Debug, Default)]
struct FpsCounter {
    frames: u32,
    elapsed: Duration,
    simulation: Duration,
    render: Duration,
}

/// Aggregated timings reported once per elapsed second.
#[derive(Clone, Copy, Debug, PartialEq)]
struct FpsMetrics {
    per_second: f64,
    avg_simulation: Duration,
    avg_render: Duration,
}

impl FpsCounter {
    fn record(
        &mut self,
        frame: Duration,
        simulation: Duration,
        render: Duration,
    ) -> Option<FpsMetrics> {
        self.frames += 1;
        self.elapsed = self.elapsed.saturating_add(frame);
        self.simulation = self.simulation.saturating_add(simulation);
        self.render = self.render.saturating_add(render);

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let frames = self.frames.max(1);
        let metrics = FpsMetrics {
            per_second: f64::from(self.frames) / self.elapsed.as_secs_f64(),
            avg_simulation: self.simulation / frames,
            avg_render: self.render / frames,
        };
        *self = Self::default();
        Some(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> GridPresentation {
        GridPresentation::new(20, 15, 20.0).expect("valid grid")
    }

    #[test]
    fn metrics_scale_the_grid_to_the_window() {
        let metrics = ScreenMetrics::from_grid(&grid(), 800.0, 600.0);
        assert_eq!(metrics.scale, 2.0);
        assert_eq!(metrics.offset, Vec2::ZERO);
        assert_eq!(metrics.project(Vec2::new(10.0, 10.0)), Vec2::new(20.0, 20.0));
        assert_eq!(metrics.length(7.0), 14.0);
    }

    #[test]
    fn metrics_letterbox_the_shorter_axis() {
        let metrics = ScreenMetrics::from_grid(&grid(), 800.0, 800.0);
        assert_eq!(metrics.scale, 2.0);
        assert_eq!(metrics.offset, Vec2::new(0.0, 100.0));
        assert_eq!(metrics.project(Vec2::ZERO), Vec2::new(0.0, 100.0));
    }

    #[test]
    fn degenerate_grids_collapse_the_metrics() {
        let grid = GridPresentation::new(0, 15, 20.0).expect("valid descriptor");
        let metrics = ScreenMetrics::from_grid(&grid, 800.0, 600.0);
        assert_eq!(metrics.scale, 0.0);
    }

    #[test]
    fn fps_counter_reports_once_per_second() {
        let mut counter = FpsCounter::default();
        let frame = Duration::from_millis(500);
        let sim = Duration::from_millis(2);
        let render = Duration::from_millis(4);

        assert_eq!(counter.record(frame, sim, render), None);
        let metrics = counter
            .record(frame, sim, render)
            .expect("one second elapsed");

        assert!((metrics.per_second - 2.0).abs() < f64::EPSILON);
        assert_eq!(metrics.avg_simulation, sim);
        assert_eq!(metrics.avg_render, render);

        // The window resets after each report.
        assert_eq!(counter.record(frame, sim, render), None);
    }

    #[test]
    fn directional_key_table_is_disjoint_and_complete() {
        let mut identifiers: Vec<&str> = DIRECTIONAL_KEYS
            .iter()
            .map(|(_, identifier)| *identifier)
            .collect();
        identifiers.sort_unstable();
        identifiers.dedup();
        assert_eq!(identifiers.len(), 8);
    }
}
