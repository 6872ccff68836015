//! Scripted, terminal-free runs.
//!
//! A script is a string of per-tick commands: `U`/`D`/`L`/`R` queue a turn and
//! then tick, `.` just ticks. Whitespace is skipped and any other character is
//! an unrecognized heading, which is ignored like any invalid input.

use serde::Serialize;
use tracing::{debug, info};

use crate::game::{
    BoardView, Command, Direction, GameConfig, GameEngine, GameSession, ManualScheduler, Phase,
};

/// Outcome of a headless run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadlessReport {
    pub seed: u64,
    pub ticks: usize,
    pub turns_rejected: usize,
    pub unknown_commands: usize,
    pub board: BoardView,
}

pub struct HeadlessMode {
    session: GameSession<ManualScheduler>,
    seed: u64,
}

impl HeadlessMode {
    /// A missing seed is drawn at random and reported back
    pub fn new(config: GameConfig, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(rand::random);
        Self {
            session: GameSession::new(GameEngine::with_seed(config, seed), ManualScheduler::new()),
            seed,
        }
    }

    /// Start a game, play `script`, then keep ticking until `max_ticks`
    /// ticks have been applied in total or the game ends
    pub fn run(&mut self, script: &str, max_ticks: usize) -> HeadlessReport {
        self.session.handle(Command::Start);

        let mut ticks = 0;
        let mut turns_rejected = 0;
        let mut unknown_commands = 0;

        for c in script.chars().filter(|c| !c.is_whitespace()) {
            if self.session.phase() != Phase::Running {
                break;
            }

            if c != '.' {
                match Direction::from_letter(c) {
                    Some(direction) => {
                        if !self.session.handle(Command::Turn(direction)) {
                            turns_rejected += 1;
                        }
                    }
                    None => {
                        debug!(command = %c, "unknown script command");
                        unknown_commands += 1;
                        continue;
                    }
                }
            }

            if self.session.tick().is_some() {
                ticks += 1;
            }
        }

        ticks += self.session.advance(max_ticks.saturating_sub(ticks));

        let board = self.session.view();
        info!(
            seed = self.seed,
            ticks,
            score = board.score,
            phase = ?board.phase,
            "headless run finished"
        );

        HeadlessReport {
            seed: self.seed,
            ticks,
            turns_rejected,
            unknown_commands,
            board,
        }
    }
}
