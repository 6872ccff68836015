//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The session is driven by commands and ticks, so it can be stepped directly
//! from tests or from a real timer.

pub mod action;
pub mod config;
pub mod engine;
pub mod scheduler;
pub mod session;
pub mod state;

// Re-export commonly used types
pub use action::{Command, Direction};
pub use config::GameConfig;
pub use engine::{GameEngine, StepInfo, StepResult};
pub use scheduler::{ManualScheduler, Scheduler};
pub use session::GameSession;
pub use state::{BoardView, CollisionType, GameState, Phase, Position, Snake};
