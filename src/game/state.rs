use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::action::Direction;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Keep the tail on the next shift
    pub pending_growth: bool,
}

impl Snake {
    /// Single-segment snake
    pub fn new(head: Position) -> Self {
        Self {
            body: vec![head],
            pending_growth: false,
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        &self.body[1..]
    }

    /// Check if position collides with snake body (excluding head)
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body_segments().contains(&pos)
    }

    /// The snake after one move in `direction`.
    ///
    /// Every segment takes its predecessor's cell. The old tail is dropped
    /// unless growth was pending, in which case the flag is consumed.
    pub fn shifted(&self, direction: Direction) -> Snake {
        let new_head = self.head().moved_in_direction(direction);
        let kept = if self.pending_growth {
            self.body.len()
        } else {
            self.body.len() - 1
        };

        let mut body = Vec::with_capacity(kept + 1);
        body.push(new_head);
        body.extend_from_slice(&self.body[..kept]);

        Snake {
            body,
            pending_growth: false,
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Discrete state of a game session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    NotStarted,
    Running,
    GameOver,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    /// Front is the heading in effect; later entries are queued turns
    pub headings: VecDeque<Direction>,
    pub grid_width: usize,
    pub grid_height: usize,
    pub score: u32,
    pub steps: u32,
    pub phase: Phase,
    pub collision: Option<CollisionType>,
}

impl GameState {
    /// Create a new game state in the `NotStarted` phase
    pub fn new(
        snake: Snake,
        food: Position,
        heading: Direction,
        grid_width: usize,
        grid_height: usize,
    ) -> Self {
        Self {
            snake,
            food,
            headings: VecDeque::from([heading]),
            grid_width,
            grid_height,
            score: 0,
            steps: 0,
            phase: Phase::NotStarted,
            collision: None,
        }
    }

    /// Heading the next tick moves with
    pub fn heading(&self) -> Direction {
        self.headings.front().copied().unwrap_or(Direction::Right)
    }

    /// Heading the snake will be travelling once every queued turn is applied
    pub fn last_queued_heading(&self) -> Direction {
        self.headings.back().copied().unwrap_or(Direction::Right)
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x < self.grid_width as i32
            && pos.y >= 0
            && pos.y < self.grid_height as i32
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.body.contains(&pos)
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Snapshot for the presentation layer
    pub fn view(&self) -> BoardView {
        BoardView {
            width: self.grid_width,
            height: self.grid_height,
            snake: self.snake.body.clone(),
            food: self.food,
            score: self.score,
            steps: self.steps,
            phase: self.phase,
            collision: self.collision,
        }
    }
}

/// What a frame needs to draw the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardView {
    pub width: usize,
    pub height: usize,
    /// Occupied cells, head first
    pub snake: Vec<Position>,
    pub food: Position,
    pub score: u32,
    pub steps: u32,
    pub phase: Phase,
    pub collision: Option<CollisionType>,
}

impl BoardView {
    pub fn is_snake(&self, pos: Position) -> bool {
        self.snake.contains(&pos)
    }

    pub fn is_head(&self, pos: Position) -> bool {
        self.snake.first() == Some(&pos)
    }
}
