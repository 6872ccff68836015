//! Tick Snake - a deterministic Snake simulation with a terminal front end
//!
//! This library provides:
//! - Core game logic and the tick scheduler seam (game module)
//! - Key mapping (input module) and TUI rendering (render module)
//! - Play statistics (metrics module)
//! - Interactive and headless execution modes (modes module)

pub mod game;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod modes;
pub mod render;
