#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic tick scheduler that turns frame time into discrete ticks.
//!
//! The cadence accumulates wall-clock frame deltas and emits one
//! [`Command::Tick`] per elapsed interval, so the session can be driven by a
//! render loop of any frame rate, or synchronously in tests with synthetic
//! durations. Outside the `Running` phase the accumulator drains to zero and
//! nothing is emitted, which guarantees no tick fires after a stop request
//! has been applied.

use std::time::Duration;

use pocket_snake_core::{Command, SessionPhase};

/// Interval between simulation steps.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(180);

/// Configuration parameters required to construct the cadence.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    tick_interval: Duration,
}

impl Config {
    /// Creates a new configuration using the provided tick interval.
    #[must_use]
    pub const fn new(tick_interval: Duration) -> Self {
        Self { tick_interval }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL)
    }
}

/// Pure system that deterministically schedules simulation ticks.
#[derive(Debug)]
pub struct Cadence {
    tick_interval: Duration,
    accumulator: Duration,
}

impl Cadence {
    /// Creates a new cadence using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            tick_interval: config.tick_interval,
            accumulator: Duration::ZERO,
        }
    }

    /// Consumes a frame delta and emits the ticks that fell due.
    pub fn handle(&mut self, phase: SessionPhase, frame_dt: Duration, out: &mut Vec<Command>) {
        if phase != SessionPhase::Running {
            self.accumulator = Duration::ZERO;
            return;
        }

        if self.tick_interval.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(frame_dt);
        for _ in 0..self.resolve_due_ticks() {
            out.push(Command::Tick);
        }
    }

    fn resolve_due_ticks(&mut self) -> usize {
        let mut due = 0;
        while self.accumulator >= self.tick_interval {
            self.accumulator -= self.tick_interval;
            due += 1;
        }
        due
    }
}

impl Default for Cadence {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
