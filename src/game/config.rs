use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::action::Direction;
use super::state::Position;

/// Configuration for the game
///
/// Every field has a default, so a config file only needs the fields it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Cell the single-segment snake starts on
    pub origin: Position,
    /// Heading the direction queue is reset to
    pub initial_heading: Direction,
    /// Food shown on the board before the first start
    pub initial_food: Position,
    /// Milliseconds between ticks
    pub tick_interval_ms: u64,
    /// Reset snake, food and queue in the same transition that ends the game
    pub reset_board_on_game_over: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 20,
            origin: Position::new(5, 5),
            initial_heading: Direction::Right,
            initial_food: Position::new(10, 10),
            tick_interval_ms: 100,
            reset_board_on_game_over: false,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self {
            origin: Position::new(2, 2),
            initial_food: Position::new(7, 7),
            ..Self::new(10, 10)
        }
    }

    /// Read a JSON config file and validate it
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: GameConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    /// Whether a cell lies on the grid
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && (pos.x as usize) < self.grid_width
            && (pos.y as usize) < self.grid_height
    }

    pub fn validate(&self) -> Result<()> {
        if self.grid_width == 0 || self.grid_height == 0 {
            bail!(
                "Grid must be at least 1x1, got {}x{}",
                self.grid_width,
                self.grid_height
            );
        }
        if self.grid_width > i32::MAX as usize || self.grid_height > i32::MAX as usize {
            bail!("Grid dimensions overflow cell coordinates");
        }
        if !self.contains(self.origin) {
            bail!("Origin {:?} is outside the grid", self.origin);
        }
        if !self.contains(self.initial_food) {
            bail!("Initial food {:?} is outside the grid", self.initial_food);
        }
        if self.tick_interval_ms == 0 {
            bail!("Tick interval must be positive");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_width, 20);
        assert_eq!(config.grid_height, 20);
        assert_eq!(config.origin, Position::new(5, 5));
        assert_eq!(config.initial_food, Position::new(10, 10));
        assert_eq!(config.initial_heading, Direction::Right);
        assert_eq!(config.tick_interval_ms, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(15, 15);
        assert_eq!(config.grid_width, 15);
        assert_eq!(config.grid_height, 15);
        assert!(GameConfig::small().validate().is_ok());
    }

    #[test]
    fn test_contains() {
        let config = GameConfig::default();
        assert!(config.contains(Position::new(0, 0)));
        assert!(config.contains(Position::new(19, 19)));
        assert!(!config.contains(Position::new(-1, 5)));
        assert!(!config.contains(Position::new(20, 0)));
        assert!(!config.contains(Position::new(0, 20)));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = GameConfig::new(0, 10);
        assert!(config.validate().is_err());

        config = GameConfig::new(4, 4);
        assert!(config.validate().is_err()); // origin (5,5) off a 4x4 grid

        config = GameConfig {
            tick_interval_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"tick_interval_ms": 80, "initial_heading": "down"}}"#).unwrap();

        let config = GameConfig::load(file.path()).unwrap();
        assert_eq!(config.tick_interval_ms, 80);
        assert_eq!(config.initial_heading, Direction::Down);
        assert_eq!(config.grid_width, 20);
        assert!(!config.reset_board_on_game_over);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"origin": {{"x": 40, "y": 0}}}}"#).unwrap();
        assert!(GameConfig::load(file.path()).is_err());

        let mut garbage = tempfile::NamedTempFile::new().unwrap();
        write!(garbage, "not json").unwrap();
        assert!(GameConfig::load(garbage.path()).is_err());
    }
}
