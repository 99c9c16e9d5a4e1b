#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Pocket Snake adapters.
//!
//! Backends receive a declarative [`Scene`] (grid geometry, snake body,
//! food, score, phase) and draw it however they like; the scene is a pure
//! read of session state and carries no behavior. Geometry helpers on
//! [`GridPresentation`] keep the pixel math (cell rects, food radius, head
//! marker placement) identical across backends.

use anyhow::Result as AnyResult;
use glam::Vec2;
use pocket_snake_core::{CellCoord, Heading, Score, SessionPhase, SnakeView};
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with its alpha channel replaced.
    #[must_use]
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }
}

/// Describes the playable grid geometry in surface pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridPresentation {
    /// Number of columns contained in the grid.
    pub columns: u32,
    /// Number of rows contained in the grid.
    pub rows: u32,
    /// Side length of a single square cell expressed in pixels.
    pub cell_length: f32,
}

impl GridPresentation {
    /// Pixels shaved off each side of a body cell when drawing it.
    pub const CELL_INSET: f32 = 2.0;

    /// Food circle radius expressed as a fraction of the cell length.
    pub const FOOD_RADIUS_FACTOR: f32 = 0.38;

    /// Head marker size expressed as a fraction of the cell length.
    pub const HEAD_MARKER_FACTOR: f32 = 0.2;

    /// Creates a new grid descriptor.
    ///
    /// Returns an error when `cell_length` is not strictly positive.
    pub fn new(columns: u32, rows: u32, cell_length: f32) -> Result<Self, RenderingError> {
        if !cell_length.is_finite() || cell_length <= 0.0 {
            return Err(RenderingError::InvalidCellLength { cell_length });
        }

        Ok(Self {
            columns,
            rows,
            cell_length,
        })
    }

    /// Total width of the grid in pixels.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.cell_length
    }

    /// Total height of the grid in pixels.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.cell_length
    }

    /// Top-left pixel of the provided cell.
    #[must_use]
    pub fn cell_origin(&self, cell: CellCoord) -> Vec2 {
        Vec2::new(
            cell.column() as f32 * self.cell_length,
            cell.row() as f32 * self.cell_length,
        )
    }

    /// Pixel at the center of the provided cell.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> Vec2 {
        self.cell_origin(cell) + Vec2::splat(self.cell_length / 2.0)
    }

    /// Top-left pixel of the inset square drawn for a body cell.
    #[must_use]
    pub fn body_cell_origin(&self, cell: CellCoord) -> Vec2 {
        self.cell_origin(cell) + Vec2::splat(Self::CELL_INSET)
    }

    /// Side lengths of the inset square drawn for a body cell.
    #[must_use]
    pub fn body_cell_size(&self) -> Vec2 {
        Vec2::splat((self.cell_length - 2.0 * Self::CELL_INSET).max(0.0))
    }

    /// Radius of the food circle.
    #[must_use]
    pub fn food_radius(&self) -> f32 {
        self.cell_length * Self::FOOD_RADIUS_FACTOR
    }

    /// Side lengths of the directional marker drawn on the head cell.
    #[must_use]
    pub fn head_marker_size(&self) -> Vec2 {
        Vec2::splat(self.cell_length * Self::HEAD_MARKER_FACTOR)
    }

    /// Top-left pixel of the directional marker on the head cell.
    ///
    /// The marker sits between the cell center and the edge the snake is
    /// about to cross, so the travel direction reads at a glance.
    #[must_use]
    pub fn head_marker_origin(&self, cell: CellCoord, heading: Heading) -> Vec2 {
        let (column_delta, row_delta) = heading.unit_offset();
        let nudge = Vec2::new(column_delta as f32, row_delta as f32) * (self.cell_length * 0.25);
        self.cell_center(cell) + nudge - self.head_marker_size() / 2.0
    }
}

/// Colors applied when presenting a scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneTheme {
    /// Solid color used to clear the surface each frame.
    pub background: Color,
    /// Fill applied to every snake body cell.
    pub snake_body: Color,
    /// Fill applied to the directional marker on the head cell.
    pub head_marker: Color,
    /// Fill applied to the food circle.
    pub food: Color,
    /// Color of the score line.
    pub score_text: Color,
    /// Scrim drawn over the grid behind the game-over dialog.
    pub dialog_scrim: Color,
    /// Color of the game-over dialog text.
    pub dialog_text: Color,
}

impl Default for SceneTheme {
    fn default() -> Self {
        Self {
            background: Color::from_rgb_u8(0x10, 0x12, 0x16),
            snake_body: Color::from_rgb_u8(0x2b, 0xdc, 0x76),
            head_marker: Color::from_rgb_u8(0x11, 0x11, 0x11),
            food: Color::from_rgb_u8(0x4a, 0xd8, 0xff),
            score_text: Color::from_rgb_u8(0xf4, 0xf4, 0xf4),
            dialog_scrim: Color::from_rgb_u8(0x00, 0x00, 0x00).with_alpha(0.55),
            dialog_text: Color::from_rgb_u8(0xff, 0xff, 0xff),
        }
    }
}

/// Scene description combining grid geometry and session content.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Grid that composes the play area.
    pub grid: GridPresentation,
    /// Snake body captured head-first.
    pub snake: SnakeView,
    /// Heading committed by the most recent tick, for the head marker.
    pub heading: Heading,
    /// Cell holding the food, if any.
    pub food: Option<CellCoord>,
    /// Score accumulated over the play-through.
    pub score: Score,
    /// Lifecycle phase driving the dialog and restart affordances.
    pub phase: SessionPhase,
    /// Colors applied when drawing.
    pub theme: SceneTheme,
}

impl Scene {
    /// Creates an empty idle scene over the provided grid.
    #[must_use]
    pub fn new(grid: GridPresentation, theme: SceneTheme) -> Self {
        Self {
            grid,
            snake: SnakeView::default(),
            heading: Heading::East,
            food: None,
            score: Score::ZERO,
            phase: SessionPhase::Idle,
            theme,
        }
    }
}

/// Input snapshot gathered by backends before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Physical keys that went down this frame, in press order, lowercased.
    pub pressed_keys: Vec<String>,
    /// Whether the backend detected the restart affordance this frame.
    pub restart: bool,
    /// Whether the backend detected the exit affordance this frame.
    pub exit: bool,
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            scene,
        }
    }
}

/// Rendering backend capable of presenting Pocket Snake scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// per-frame input captured by the backend, may mutate the scene before
    /// it is drawn, and reports the time the simulation update consumed so
    /// the backend can fold it into its frame metrics.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> Duration + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Cell length must be strictly positive to derive pixel geometry.
    InvalidCellLength {
        /// Provided length that failed validation.
        cell_length: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCellLength { cell_length } => {
                write!(f, "cell_length must be positive (received {cell_length})")
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> GridPresentation {
        GridPresentation::new(20, 15, 20.0).expect("valid grid")
    }

    #[test]
    fn grid_creation_rejects_non_positive_cell_lengths() {
        let error = GridPresentation::new(20, 15, 0.0)
            .expect_err("zero cell length must be rejected");
        assert!(matches!(
            error,
            RenderingError::InvalidCellLength { cell_length } if cell_length == 0.0
        ));
        assert!(GridPresentation::new(20, 15, -4.0).is_err());
        assert!(GridPresentation::new(20, 15, f32::NAN).is_err());
    }

    #[test]
    fn grid_spans_surface_pixels() {
        let grid = grid();
        assert_eq!(grid.width(), 400.0);
        assert_eq!(grid.height(), 300.0);
    }

    #[test]
    fn cell_geometry_matches_the_canvas_layout() {
        let grid = grid();
        let cell = CellCoord::new(3, 2);
        assert_eq!(grid.cell_origin(cell), Vec2::new(60.0, 40.0));
        assert_eq!(grid.cell_center(cell), Vec2::new(70.0, 50.0));
        assert_eq!(grid.body_cell_origin(cell), Vec2::new(62.0, 42.0));
        assert_eq!(grid.body_cell_size(), Vec2::splat(16.0));
        assert!((grid.food_radius() - 7.6).abs() < 1e-5);
    }

    #[test]
    fn head_marker_leans_toward_the_heading() {
        let grid = grid();
        let cell = CellCoord::new(1, 1);
        // Center of (1,1) is (30,30); marker is 4x4 pixels.
        assert!(grid
            .head_marker_origin(cell, Heading::East)
            .abs_diff_eq(Vec2::new(33.0, 28.0), 1e-4));
        assert!(grid
            .head_marker_origin(cell, Heading::North)
            .abs_diff_eq(Vec2::new(28.0, 23.0), 1e-4));
    }

    #[test]
    fn tiny_cells_clamp_the_body_inset() {
        let grid = GridPresentation::new(4, 4, 3.0).expect("valid grid");
        assert_eq!(grid.body_cell_size(), Vec2::ZERO);
    }

    #[test]
    fn with_alpha_clamps_to_unit_range() {
        let color = Color::from_rgb_u8(10, 20, 30).with_alpha(1.5);
        assert_eq!(color.alpha, 1.0);
        assert_eq!(Color::new(0.0, 0.0, 0.0, 1.0).with_alpha(-0.5).alpha, 0.0);
    }

    #[test]
    fn fresh_scenes_start_idle_and_empty() {
        let scene = Scene::new(grid(), SceneTheme::default());
        assert_eq!(scene.phase, SessionPhase::Idle);
        assert!(scene.snake.is_empty());
        assert_eq!(scene.food, None);
        assert_eq!(scene.score, Score::ZERO);
    }
}
