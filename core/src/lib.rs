#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Pocket Snake engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative session, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the session executes
//! those commands via its `apply` entry point, and then broadcasts [`Event`]
//! values for the UI shell to react to. The session is the only writer;
//! everything else observes it through read-only snapshots.

use serde::{Deserialize, Serialize};

/// Commands that express all permissible session mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Begins a fresh play-through, restarting from any phase.
    Start,
    /// Tears the session down without recording a final score.
    Exit,
    /// Buffers a heading change to be committed at the start of the next tick.
    RequestHeading {
        /// Direction the snake should travel once the next tick commits it.
        heading: Heading,
    },
    /// Advances the simulation by exactly one discrete step.
    Tick,
}

/// Events broadcast by the session after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that a fresh play-through began accepting ticks and input.
    SessionStarted,
    /// Confirms that the snake's head moved between two cells.
    SnakeAdvanced {
        /// Cell the head occupied before the tick.
        from: CellCoord,
        /// Cell the head occupies after the tick.
        to: CellCoord,
    },
    /// Confirms that the snake consumed the food in the named cell.
    FoodEaten {
        /// Cell the food occupied when it was eaten.
        cell: CellCoord,
    },
    /// Announces the cell a fresh piece of food was placed into.
    FoodPlaced {
        /// Cell now holding the food.
        cell: CellCoord,
    },
    /// Reports the score after it changed, including the reset to zero.
    ScoreChanged {
        /// Score now held by the session.
        score: Score,
    },
    /// Reports that the play-through ended in a collision.
    GameOver {
        /// Score accumulated over the finished play-through.
        final_score: Score,
    },
    /// Confirms that the session was torn down without a final score.
    SessionExited,
}

/// Unit-vector direction the snake's head moves each tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Heading {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Heading {
    /// Column and row deltas applied when stepping one cell along the heading.
    #[must_use]
    pub const fn unit_offset(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }

    /// Returns the heading pointing exactly 180 degrees away.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Discrete cols-by-rows coordinate space the game is played on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridSize {
    columns: u32,
    rows: u32,
}

impl GridSize {
    /// Creates a grid with explicit column and row counts.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Derives the grid from a drawing surface, truncating toward zero.
    ///
    /// Grid resolution is surface size divided by cell length; a surface
    /// smaller than a single cell along either axis is rejected.
    pub fn from_surface(
        surface_width: u32,
        surface_height: u32,
        cell_length: u32,
    ) -> Result<Self, GridSizeError> {
        if cell_length == 0 {
            return Err(GridSizeError::ZeroCellLength);
        }

        let columns = surface_width / cell_length;
        let rows = surface_height / cell_length;
        if columns == 0 || rows == 0 {
            return Err(GridSizeError::EmptySurface { columns, rows });
        }

        Ok(Self { columns, rows })
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of cells contained in the grid.
    #[must_use]
    pub const fn cell_count(&self) -> u64 {
        self.columns as u64 * self.rows as u64
    }

    /// Reports whether the cell lies inside the grid bounds.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Cell at the center of the grid, rounding toward the origin.
    #[must_use]
    pub const fn center(&self) -> CellCoord {
        CellCoord::new(self.columns / 2, self.rows / 2)
    }

    /// Steps one cell along the heading, or `None` when leaving the grid.
    #[must_use]
    pub fn step(&self, cell: CellCoord, heading: Heading) -> Option<CellCoord> {
        let (column_delta, row_delta) = heading.unit_offset();
        let column = cell.column().checked_add_signed(column_delta)?;
        let row = cell.row().checked_add_signed(row_delta)?;
        let stepped = CellCoord::new(column, row);
        self.contains(stepped).then_some(stepped)
    }
}

/// Errors produced while deriving a grid from a drawing surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridSizeError {
    /// The cell length was zero, so no grid resolution can be derived.
    ZeroCellLength,
    /// The surface is smaller than a single cell along at least one axis.
    EmptySurface {
        /// Columns derived before the rejection.
        columns: u32,
        /// Rows derived before the rejection.
        rows: u32,
    },
}

impl std::fmt::Display for GridSizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroCellLength => write!(f, "cell length must be positive"),
            Self::EmptySurface { columns, rows } => {
                write!(
                    f,
                    "surface yields an empty {columns}x{rows} grid; it must cover at least one cell"
                )
            }
        }
    }
}

impl std::error::Error for GridSizeError {}

/// Number of food cells consumed during the current play-through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Score(u32);

impl Score {
    /// Score held at the start of every play-through.
    pub const ZERO: Self = Self(0);

    /// Creates a score with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the score.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns the score grown by one consumed food cell.
    #[must_use]
    pub const fn incremented(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Lifecycle phase of a game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    /// No play-through exists; ticks and input are ignored.
    Idle,
    /// A play-through is active, accepting ticks and heading requests.
    Running,
    /// The play-through ended in a collision and awaits a restart.
    Ended,
}

/// Read-only snapshot of the snake's body captured for adapters and tests.
///
/// Cells are stored head-first; insertion order is body order, so unlike
/// identifier-keyed views this one is never sorted.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SnakeView {
    cells: Vec<CellCoord>,
}

impl SnakeView {
    /// Creates a view over the provided head-first body cells.
    #[must_use]
    pub fn from_cells(cells: Vec<CellCoord>) -> Self {
        Self { cells }
    }

    /// Cell occupied by the snake's head, if a body exists.
    #[must_use]
    pub fn head(&self) -> Option<CellCoord> {
        self.cells.first().copied()
    }

    /// Number of cells composing the body.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the view captured an empty body.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Reports whether any body cell occupies the provided coordinate.
    #[must_use]
    pub fn occupies(&self, cell: CellCoord) -> bool {
        self.cells.contains(&cell)
    }

    /// Iterator over the body cells from head to tail.
    pub fn iter(&self) -> impl Iterator<Item = &CellCoord> {
        self.cells.iter()
    }

    /// Consumes the view, yielding the underlying head-first cells.
    #[must_use]
    pub fn into_vec(self) -> Vec<CellCoord> {
        self.cells
    }
}
