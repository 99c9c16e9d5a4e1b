//! Glue between the session's event stream and the player-facing shell.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use pocket_snake_core::Event;
use pocket_snake_rendering::Scene;
use pocket_snake_session::{query, Session};
use pocket_snake_system_input::Bindings;

/// Translates observable signals into the stdout lines the shell prints.
pub(crate) fn signal_lines(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::ScoreChanged { score } => Some(format!("score: {}", score.get())),
            Event::GameOver { final_score } => {
                Some(format!("game over - final score {}", final_score.get()))
            }
            _ => None,
        })
        .collect()
}

/// Prints every shell-facing signal contained in the event batch.
pub(crate) fn report_events(events: &[Event]) {
    for line in signal_lines(events) {
        println!("{line}");
    }
}

/// Mirrors the session state into the scene handed to the backend.
pub(crate) fn refresh_scene(scene: &mut Scene, session: &Session) {
    scene.snake = query::snake_view(session);
    scene.heading = query::heading(session);
    scene.food = query::food(session);
    scene.score = query::score(session);
    scene.phase = query::phase(session);
}

/// Loads the binding table from disk, falling back to the defaults.
pub(crate) fn load_bindings(path: Option<&Path>) -> Result<Bindings> {
    let Some(path) = path else {
        return Ok(Bindings::default());
    };

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read bindings file {}", path.display()))?;
    Bindings::from_toml_str(&contents)
        .with_context(|| format!("failed to parse bindings file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pocket_snake_core::{CellCoord, Command, GridSize, Score, SessionPhase};
    use pocket_snake_rendering::{GridPresentation, SceneTheme};
    use pocket_snake_session::{self as session, Config};

    #[test]
    fn only_shell_facing_signals_become_lines() {
        let events = vec![
            Event::SessionStarted,
            Event::ScoreChanged {
                score: Score::new(2),
            },
            Event::FoodPlaced {
                cell: CellCoord::new(1, 1),
            },
            Event::GameOver {
                final_score: Score::new(2),
            },
        ];

        assert_eq!(
            signal_lines(&events),
            vec![
                "score: 2".to_owned(),
                "game over - final score 2".to_owned(),
            ]
        );
    }

    #[test]
    fn refreshed_scenes_mirror_the_session() {
        let grid = GridSize::new(20, 15);
        let mut session = Session::new(Config::new(grid, 11)).expect("grid hosts the spawn");
        let mut events = Vec::new();
        session::apply(&mut session, Command::Start, &mut events);

        let presentation =
            GridPresentation::new(grid.columns(), grid.rows(), 20.0).expect("valid grid");
        let mut scene = Scene::new(presentation, SceneTheme::default());
        refresh_scene(&mut scene, &session);

        assert_eq!(scene.phase, SessionPhase::Running);
        assert_eq!(scene.score, Score::ZERO);
        assert_eq!(scene.snake.head(), Some(CellCoord::new(10, 7)));
        assert_eq!(scene.food, query::food(&session));
    }

    #[test]
    fn missing_bindings_path_falls_back_to_defaults() {
        let bindings = load_bindings(None).expect("defaults always load");
        assert_eq!(bindings.len(), 8);
    }

    #[test]
    fn unreadable_bindings_paths_surface_context() {
        let error = load_bindings(Some(Path::new("/nonexistent/bindings.toml")))
            .expect_err("missing file must fail");
        assert!(error.to_string().contains("bindings file"));
    }
}
