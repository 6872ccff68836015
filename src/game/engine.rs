use super::{
    action::Direction,
    config::GameConfig,
    state::{CollisionType, GameState, Phase, Position, Snake},
};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use std::collections::VecDeque;
use tracing::{debug, trace};

/// Random draws before falling back to enumerating free cells
const FOOD_SAMPLE_ATTEMPTS: usize = 64;

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// State after the step
    pub state: GameState,
    /// Whether the game has terminated
    pub terminated: bool,
    /// Additional information about the step
    pub info: StepInfo,
}

/// The game engine that handles all game logic.
///
/// Transitions take a state by value and hand back the next one; the engine
/// itself only holds the configuration and the food RNG.
pub struct GameEngine<R: Rng = StdRng> {
    config: GameConfig,
    rng: R,
}

impl GameEngine<StdRng> {
    /// Create a new game engine with an entropy-seeded RNG
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create an engine whose food placement is reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> GameEngine<R> {
    pub fn with_rng(config: GameConfig, rng: R) -> Self {
        Self { config, rng }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Board shown before the first game starts
    pub fn initial_state(&self) -> GameState {
        GameState::new(
            Snake::new(self.config.origin),
            self.config.initial_food,
            self.config.initial_heading,
            self.config.grid_width,
            self.config.grid_height,
        )
    }

    /// Fresh running game: single-cell snake at the origin, score 0, default
    /// heading, food on a random free cell
    pub fn start(&mut self) -> GameState {
        let mut state = self.initial_state();
        if let Some(food) = self.spawn_food_avoid_snake(&state.snake) {
            state.food = food;
        }
        state.phase = Phase::Running;
        state
    }

    /// Whether `direction` would be queued.
    ///
    /// Rejected when it repeats or reverses the current heading, or the last
    /// queued one. The queue therefore never holds more than one pending turn.
    pub fn accepts_turn(&self, state: &GameState, direction: Direction) -> bool {
        if !state.is_running() {
            return false;
        }
        [state.heading(), state.last_queued_heading()]
            .iter()
            .all(|&heading| direction != heading && !direction.is_opposite(heading))
    }

    /// Queue a heading change; rejected turns leave the state as it was
    pub fn steer(&self, mut state: GameState, direction: Direction) -> GameState {
        if self.accepts_turn(&state, direction) {
            state.headings.push_back(direction);
        } else {
            debug!(?direction, queued = state.headings.len(), "turn rejected");
        }
        state
    }

    /// Execute one tick of the game
    pub fn step(&mut self, mut state: GameState) -> StepResult {
        if !state.is_running() {
            let terminated = state.phase == Phase::GameOver;
            return StepResult {
                state,
                terminated,
                info: StepInfo {
                    ate_food: false,
                    collision_type: None,
                },
            };
        }

        // move with the front, then advance the queue
        let heading = state.heading();
        if state.headings.len() > 1 {
            state.headings.pop_front();
        }

        let moved = state.snake.shifted(heading);
        let new_head = moved.head();
        state.steps += 1;

        if let Some(collision_type) = self.check_collision(&state, &moved) {
            self.end_game(&mut state, collision_type);
            return StepResult {
                state,
                terminated: true,
                info: StepInfo {
                    ate_food: false,
                    collision_type: Some(collision_type),
                },
            };
        }

        state.snake = moved;
        trace!(x = new_head.x, y = new_head.y, ?heading, "tick");

        let ate_food = new_head == state.food;
        if ate_food {
            state.score += 1;
            state.snake.pending_growth = true;
            if let Some(food) = self.spawn_food_avoid_snake(&state.snake) {
                state.food = food;
            }
            debug!(score = state.score, food_x = state.food.x, food_y = state.food.y, "food eaten");
        }

        StepResult {
            state,
            terminated: false,
            info: StepInfo {
                ate_food,
                collision_type: None,
            },
        }
    }

    /// Check whether the moved snake's head is fatal
    fn check_collision(&self, state: &GameState, moved: &Snake) -> Option<CollisionType> {
        let head = moved.head();

        if !state.is_in_bounds(head) {
            return Some(CollisionType::Wall);
        }

        if moved.collides_with_body(head) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    fn end_game(&self, state: &mut GameState, collision: CollisionType) {
        state.phase = Phase::GameOver;
        state.collision = Some(collision);

        // score is kept either way
        if self.config.reset_board_on_game_over {
            state.snake = Snake::new(self.config.origin);
            state.food = self.config.initial_food;
            state.headings = VecDeque::from([self.config.initial_heading]);
        }
    }

    /// Pick a cell not covered by the snake, or `None` when the board is full
    fn spawn_food_avoid_snake(&mut self, snake: &Snake) -> Option<Position> {
        let width = self.config.grid_width as i32;
        let height = self.config.grid_height as i32;

        for _ in 0..FOOD_SAMPLE_ATTEMPTS {
            let pos = Position::new(self.rng.gen_range(0..width), self.rng.gen_range(0..height));
            if !snake.body.contains(&pos) {
                return Some(pos);
            }
        }

        let free: Vec<Position> = (0..height)
            .flat_map(|y| (0..width).map(move |x| Position::new(x, y)))
            .filter(|pos| !snake.body.contains(pos))
            .collect();
        free.choose(&mut self.rng).copied()
    }
}
