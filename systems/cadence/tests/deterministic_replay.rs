use std::time::Duration;

use pocket_snake_core::{CellCoord, Command, Event, GridSize, Heading, Score, SessionPhase};
use pocket_snake_session::{self as session, query, Config as SessionConfig, Session};
use pocket_snake_system_cadence::{Cadence, Config as CadenceConfig, DEFAULT_TICK_INTERVAL};

const SEED: u64 = 0x0dd_ba11;

#[derive(Clone, Copy, Debug)]
enum Step {
    Start,
    Head(Heading),
    Frame(u64),
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct ReplayOutcome {
    phase: SessionPhase,
    heading: Heading,
    head: Option<CellCoord>,
    length: usize,
    score: Score,
    events: Vec<Event>,
}

fn replay(script: &[Step]) -> ReplayOutcome {
    let mut session = Session::new(SessionConfig::new(GridSize::new(20, 15), SEED))
        .expect("20x15 grid hosts the spawn");
    let mut cadence = Cadence::new(CadenceConfig::new(DEFAULT_TICK_INTERVAL));
    let mut log = Vec::new();

    for step in script {
        let mut commands = Vec::new();
        match step {
            Step::Start => commands.push(Command::Start),
            Step::Head(heading) => commands.push(Command::RequestHeading { heading: *heading }),
            Step::Frame(millis) => cadence.handle(
                query::phase(&session),
                Duration::from_millis(*millis),
                &mut commands,
            ),
        }

        for command in commands {
            session::apply(&mut session, command, &mut log);
        }
    }

    let view = query::snake_view(&session);
    ReplayOutcome {
        phase: query::phase(&session),
        heading: query::heading(&session),
        head: view.head(),
        length: view.len(),
        score: query::score(&session),
        events: log,
    }
}

fn scripted_turn() -> Vec<Step> {
    vec![
        Step::Start,
        Step::Frame(100),
        Step::Frame(100),
        Step::Head(Heading::North),
        Step::Frame(180),
        Step::Frame(500),
    ]
}

#[test]
fn deterministic_replay_produces_identical_outcomes() {
    let first = replay(&scripted_turn());
    let second = replay(&scripted_turn());

    assert_eq!(first, second, "replay diverged between runs");

    // 200ms east, then 680ms north: one tick to (11,7), three more up to (11,4).
    assert_eq!(first.phase, SessionPhase::Running);
    assert_eq!(first.heading, Heading::North);
    assert_eq!(first.head, Some(CellCoord::new(11, 4)));

    // Every meal grows the spawn body by exactly one cell.
    assert_eq!(first.length, 3 + first.score.get() as usize);
}

#[test]
fn replayed_wall_collision_silences_the_cadence() {
    let mut script = vec![Step::Start];
    // Twelve ticks due in a single long frame; the tenth steps off the
    // right edge and the two queued behind the collision must be ignored.
    script.push(Step::Frame(2160));

    let outcome = replay(&script);

    assert_eq!(outcome.phase, SessionPhase::Ended);
    assert_eq!(outcome.head, Some(CellCoord::new(19, 7)));
    assert_eq!(
        outcome.events.last(),
        Some(&Event::GameOver {
            final_score: outcome.score,
        })
    );

    // Frames after the terminal state drain silently.
    script.push(Step::Frame(1000));
    script.push(Step::Frame(1000));
    let after = replay(&script);
    assert_eq!(after.events, outcome.events);
}
