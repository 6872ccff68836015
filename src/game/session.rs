use rand::{Rng, rngs::StdRng};
use std::time::Duration;
use tracing::{info, warn};

use super::{
    action::Command,
    engine::{GameEngine, StepInfo},
    scheduler::Scheduler,
    state::{BoardView, GameState, Phase},
};

/// One playable game: the engine, its current state, and the tick source.
///
/// Commands and ticks are the only way state changes, and each runs to
/// completion before the next is accepted.
pub struct GameSession<S: Scheduler, R: Rng = StdRng> {
    engine: GameEngine<R>,
    state: GameState,
    scheduler: S,
    closed: bool,
}

impl<S: Scheduler, R: Rng> GameSession<S, R> {
    pub fn new(engine: GameEngine<R>, scheduler: S) -> Self {
        let state = engine.initial_state();
        Self {
            engine,
            state,
            scheduler,
            closed: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn view(&self) -> BoardView {
        self.state.view()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Apply a command. Returns false when it was ignored.
    pub fn handle(&mut self, command: Command) -> bool {
        if self.closed {
            return false;
        }

        match command {
            Command::Start | Command::Restart => {
                if self.state.is_running() {
                    return false;
                }
                self.begin();
                true
            }
            Command::Turn(direction) => {
                if !self.engine.accepts_turn(&self.state, direction) {
                    return false;
                }
                let state = self.take_state();
                self.state = self.engine.steer(state, direction);
                true
            }
            Command::Quit => {
                self.scheduler.cancel();
                self.closed = true;
                info!(score = self.state.score, phase = ?self.state.phase, "game closed");
                true
            }
        }
    }

    /// Deliver one timer tick. Ignored unless a game is running.
    pub fn tick(&mut self) -> Option<StepInfo> {
        if self.closed || !self.state.is_running() {
            return None;
        }
        if !self.scheduler.is_active() {
            warn!("tick delivered while scheduler is inactive");
            return None;
        }

        let state = self.take_state();
        let result = self.engine.step(state);
        self.state = result.state;

        if result.terminated {
            self.scheduler.cancel();
            info!(
                score = self.state.score,
                steps = self.state.steps,
                collision = ?result.info.collision_type,
                "game over"
            );
        }

        Some(result.info)
    }

    /// Tick until `max` ticks have been applied or the game stops running.
    /// Returns how many ticks were applied.
    pub fn advance(&mut self, max: usize) -> usize {
        let mut applied = 0;
        while applied < max && self.tick().is_some() {
            applied += 1;
        }
        applied
    }

    fn begin(&mut self) {
        self.state = self.engine.start();
        let period = Duration::from_millis(self.engine.config().tick_interval_ms);
        self.scheduler.cancel();
        self.scheduler.start(period);
        info!(
            food_x = self.state.food.x,
            food_y = self.state.food.y,
            tick_ms = self.engine.config().tick_interval_ms,
            "game started"
        );
    }

    fn take_state(&mut self) -> GameState {
        let placeholder = self.engine.initial_state();
        std::mem::replace(&mut self.state, placeholder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{
        CollisionType, Direction, GameConfig, ManualScheduler, Position, Snake,
    };

    fn session() -> GameSession<ManualScheduler> {
        GameSession::new(
            GameEngine::with_seed(GameConfig::default(), 42),
            ManualScheduler::new(),
        )
    }

    #[test]
    fn test_starts_not_started() {
        let session = session();
        assert_eq!(session.phase(), Phase::NotStarted);
        assert!(!session.scheduler().is_active());
        assert_eq!(session.view().snake, vec![Position::new(5, 5)]);
        assert_eq!(session.view().food, Position::new(10, 10));
    }

    #[test]
    fn test_tick_before_start_is_ignored() {
        let mut session = session();
        assert!(session.tick().is_none());
        assert_eq!(session.state().steps, 0);
    }

    #[test]
    fn test_start_runs_scheduler() {
        let mut session = session();
        assert!(session.handle(Command::Start));
        assert_eq!(session.phase(), Phase::Running);
        assert_eq!(
            session.scheduler().period(),
            Some(Duration::from_millis(100))
        );

        // already running
        assert!(!session.handle(Command::Start));
        assert!(!session.handle(Command::Restart));
        assert_eq!(session.scheduler().starts, 1);
    }

    #[test]
    fn test_five_ticks_right() {
        let mut session = session();
        session.handle(Command::Start);
        session.state.food = Position::new(10, 10);

        assert_eq!(session.advance(5), 5);
        assert_eq!(session.state().snake.head(), Position::new(10, 5));
        assert_eq!(session.state().steps, 5);
    }

    #[test]
    fn test_reverse_input_rejected() {
        let mut session = session();
        session.handle(Command::Start);
        session.state.food = Position::new(10, 10);

        assert!(!session.handle(Command::Turn(Direction::Left)));
        session.tick();
        assert_eq!(session.state().snake.head(), Position::new(6, 5));
    }

    #[test]
    fn test_scheduler_stops_on_game_over() {
        let mut session = session();
        session.handle(Command::Start);
        session.state.food = Position::new(0, 0);
        session.state.snake = Snake::new(Position::new(19, 5));

        let info = session.tick();
        assert_eq!(
            info.and_then(|i| i.collision_type),
            Some(CollisionType::Wall)
        );
        assert_eq!(session.phase(), Phase::GameOver);
        assert!(!session.scheduler().is_active());
        assert_eq!(session.scheduler().cancels, 1);

        // no more ticks
        assert!(session.tick().is_none());
        assert!(!session.handle(Command::Turn(Direction::Up)));
    }

    #[test]
    fn test_restart_from_game_over() {
        let mut session = session();
        session.handle(Command::Start);
        session.state.snake = Snake::new(Position::new(19, 5));
        session.state.score = 3;
        session.tick();
        assert_eq!(session.phase(), Phase::GameOver);
        assert_eq!(session.state().score, 3);

        assert!(session.handle(Command::Restart));
        let state = session.state();
        assert_eq!(state.phase, Phase::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.steps, 0);
        assert_eq!(state.snake.body, vec![Position::new(5, 5)]);
        assert_eq!(state.heading(), Direction::Right);
        assert_eq!(state.headings.len(), 1);
        assert!(session.scheduler().is_active());
        assert_eq!(session.scheduler().starts, 2);
    }

    #[test]
    fn test_quit_closes_session() {
        let mut session = session();
        session.handle(Command::Start);
        assert!(session.handle(Command::Quit));

        assert!(session.is_closed());
        assert!(!session.scheduler().is_active());
        assert!(session.tick().is_none());
        assert!(!session.handle(Command::Restart));
        assert!(!session.handle(Command::Quit));
    }

    #[test]
    fn test_quit_from_game_over() {
        let mut session = session();
        session.handle(Command::Start);
        session.state.snake = Snake::new(Position::new(19, 5));
        session.tick();
        assert_eq!(session.phase(), Phase::GameOver);
        assert_eq!(session.scheduler().cancels, 1);

        assert!(session.handle(Command::Quit));
        assert!(session.is_closed());
        assert!(!session.scheduler().is_active());
        // already cancelled at game over
        assert_eq!(session.scheduler().cancels, 1);

        assert!(!session.handle(Command::Restart));
        assert!(!session.handle(Command::Start));
        assert_eq!(session.phase(), Phase::GameOver);
        assert_eq!(session.scheduler().starts, 1);
        assert!(session.tick().is_none());
    }

    #[test]
    fn test_advance_stops_at_game_over() {
        let mut session = session();
        session.handle(Command::Start);
        session.state.food = Position::new(0, 0);

        // (5,5) going right leaves the board on the 15th tick
        assert_eq!(session.advance(100), 15);
        assert_eq!(session.phase(), Phase::GameOver);
        assert_eq!(session.state().steps, 15);
    }

    #[test]
    fn test_tick_without_active_scheduler_is_ignored() {
        let mut session = session();
        session.handle(Command::Start);
        session.scheduler_mut().cancel();
        assert!(session.tick().is_none());
        assert_eq!(session.state().steps, 0);
    }
}
