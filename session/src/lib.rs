#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game session state for Pocket Snake.
//!
//! The session is the only writer of simulation state. Adapters and systems
//! submit [`Command`] values through [`apply`], the session mutates itself
//! deterministically, and observers consume the broadcast [`Event`] stream
//! plus the read-only accessors in [`query`]. Rendering never mutates the
//! session and the session never draws.

use std::collections::VecDeque;

use pocket_snake_core::{CellCoord, Command, Event, GridSize, Heading, Score, SessionPhase};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Cells composing the snake when a play-through starts.
const INITIAL_SNAKE_LENGTH: u32 = 3;

/// Heading assigned to a freshly spawned snake.
const SPAWN_HEADING: Heading = Heading::East;

/// Fewest columns that can host the centered spawn with its tail on-grid.
const MIN_SPAWN_COLUMNS: u32 = 2 * (INITIAL_SNAKE_LENGTH - 1);

/// Configuration parameters required to construct a session.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    grid: GridSize,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided grid and food seed.
    #[must_use]
    pub const fn new(grid: GridSize, rng_seed: u64) -> Self {
        Self { grid, rng_seed }
    }
}

/// Represents the authoritative Pocket Snake session state.
#[derive(Debug)]
pub struct Session {
    grid: GridSize,
    phase: SessionPhase,
    snake: VecDeque<CellCoord>,
    current: Heading,
    requested: Heading,
    food: Option<CellCoord>,
    score: Score,
    rng: ChaCha8Rng,
}

impl Session {
    /// Creates a new idle session ready to start a play-through.
    ///
    /// Rejects grids too small to host the centered three-cell spawn.
    pub fn new(config: Config) -> Result<Self, SessionError> {
        let grid = config.grid;
        if grid.columns() < MIN_SPAWN_COLUMNS || grid.rows() == 0 {
            return Err(SessionError::GridTooSmall {
                columns: grid.columns(),
                rows: grid.rows(),
            });
        }

        Ok(Self {
            grid,
            phase: SessionPhase::Idle,
            snake: VecDeque::new(),
            current: SPAWN_HEADING,
            requested: SPAWN_HEADING,
            food: None,
            score: Score::ZERO,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        })
    }

    /// Draws a food cell uniformly over the cells free of the snake's body.
    ///
    /// Rejection sampling: draw a random cell, retry while occupied. The
    /// free-cell existence check up front keeps the loop finite on a board
    /// the snake has filled completely.
    fn roll_food(&mut self) -> Option<CellCoord> {
        if self.snake.len() as u64 >= self.grid.cell_count() {
            return None;
        }

        loop {
            let cell = CellCoord::new(
                self.rng.gen_range(0..self.grid.columns()),
                self.rng.gen_range(0..self.grid.rows()),
            );
            if !self.snake.contains(&cell) {
                return Some(cell);
            }
        }
    }
}

/// Applies the provided command to the session, mutating state deterministically.
pub fn apply(session: &mut Session, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Start => start(session, out_events),
        Command::Exit => exit(session, out_events),
        Command::RequestHeading { heading } => request_heading(session, heading),
        Command::Tick => tick(session, out_events),
    }
}

fn start(session: &mut Session, out_events: &mut Vec<Event>) {
    session.score = Score::ZERO;
    session.snake = initial_body(session.grid);
    session.current = SPAWN_HEADING;
    session.requested = SPAWN_HEADING;
    session.phase = SessionPhase::Running;
    out_events.push(Event::SessionStarted);
    out_events.push(Event::ScoreChanged { score: Score::ZERO });

    session.food = session.roll_food();
    if let Some(cell) = session.food {
        out_events.push(Event::FoodPlaced { cell });
    }
}

fn exit(session: &mut Session, out_events: &mut Vec<Event>) {
    if session.phase == SessionPhase::Idle {
        return;
    }

    session.phase = SessionPhase::Idle;
    session.snake.clear();
    session.food = None;
    out_events.push(Event::SessionExited);
}

fn request_heading(session: &mut Session, heading: Heading) {
    if session.phase != SessionPhase::Running {
        return;
    }

    // An exact reversal would fold the head into its neighbor on the next
    // tick; the request is dropped silently at request time so the latest
    // surviving request is always the one a tick commits.
    if heading == session.current.reversed() {
        return;
    }

    session.requested = heading;
}

fn tick(session: &mut Session, out_events: &mut Vec<Event>) {
    if session.phase != SessionPhase::Running {
        return;
    }

    session.current = session.requested;

    let Some(head) = session.snake.front().copied() else {
        return;
    };

    let Some(new_head) = session.grid.step(head, session.current) else {
        // Wall collision only. The body is deliberately not consulted, so
        // the snake may pass through itself without ending the run.
        session.phase = SessionPhase::Ended;
        out_events.push(Event::GameOver {
            final_score: session.score,
        });
        return;
    };

    session.snake.push_front(new_head);
    out_events.push(Event::SnakeAdvanced {
        from: head,
        to: new_head,
    });

    if session.food == Some(new_head) {
        session.score = session.score.incremented();
        out_events.push(Event::FoodEaten { cell: new_head });
        out_events.push(Event::ScoreChanged {
            score: session.score,
        });

        session.food = session.roll_food();
        if let Some(cell) = session.food {
            out_events.push(Event::FoodPlaced { cell });
        }
    } else {
        let _ = session.snake.pop_back();
    }
}

fn initial_body(grid: GridSize) -> VecDeque<CellCoord> {
    let center = grid.center();
    (0..INITIAL_SNAKE_LENGTH)
        .map(|offset| CellCoord::new(center.column() - offset, center.row()))
        .collect()
}

/// Errors produced while constructing a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionError {
    /// The grid cannot host the centered three-cell spawn.
    GridTooSmall {
        /// Columns offered by the rejected grid.
        columns: u32,
        /// Rows offered by the rejected grid.
        rows: u32,
    },
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GridTooSmall { columns, rows } => write!(
                f,
                "{columns}x{rows} grid is too small for the centered spawn \
                 (needs at least {MIN_SPAWN_COLUMNS} columns and 1 row)"
            ),
        }
    }
}

impl std::error::Error for SessionError {}

/// Query functions that provide read-only access to the session state.
pub mod query {
    use super::Session;
    use pocket_snake_core::{CellCoord, GridSize, Heading, Score, SessionPhase, SnakeView};

    /// Lifecycle phase the session currently occupies.
    #[must_use]
    pub fn phase(session: &Session) -> SessionPhase {
        session.phase
    }

    /// Score accumulated over the current play-through.
    #[must_use]
    pub fn score(session: &Session) -> Score {
        session.score
    }

    /// Grid the session is being played on.
    #[must_use]
    pub fn grid(session: &Session) -> GridSize {
        session.grid
    }

    /// Heading the most recent tick committed.
    #[must_use]
    pub fn heading(session: &Session) -> Heading {
        session.current
    }

    /// Cell currently holding the food, if any.
    #[must_use]
    pub fn food(session: &Session) -> Option<CellCoord> {
        session.food
    }

    /// Captures a head-first view of the snake's body.
    #[must_use]
    pub fn snake_view(session: &Session) -> SnakeView {
        SnakeView::from_cells(session.snake.iter().copied().collect())
    }
}
