use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::interval;
use tracing::{error, info};

use crate::game::{Command, GameConfig, GameEngine, GameSession, Scheduler, StepInfo};
use crate::input::InputHandler;
use crate::metrics::GameMetrics;
use crate::modes::IntervalScheduler;
use crate::render::Renderer;

/// Render at ~30 FPS, independent of the game tick
const RENDER_INTERVAL: Duration = Duration::from_millis(33);

/// Interactive terminal game
pub struct PlayMode {
    session: GameSession<IntervalScheduler>,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
}

impl PlayMode {
    pub fn new(config: GameConfig, seed: Option<u64>) -> Self {
        let engine = match seed {
            Some(seed) => GameEngine::with_seed(config, seed),
            None => GameEngine::new(config),
        };

        Self {
            session: GameSession::new(engine, IntervalScheduler::new()),
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let result = self.run_game_loop(&mut terminal).await;
        if let Err(err) = &result {
            error!(?err, "game loop failed");
        }

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut render_timer = interval(RENDER_INTERVAL);

        while !self.session.is_closed() {
            let ticking = self.session.scheduler().is_active();

            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => {
                            return Err(err).context("Failed to read terminal event");
                        }
                        None => self.apply(Command::Quit),
                    }
                }

                // Game logic tick
                _ = self.session.scheduler_mut().tick(), if ticking => {
                    if let Some(info) = self.session.tick() {
                        self.record_tick(&info);
                    }
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    let view = self.session.view();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &view, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.apply(Command::Quit);
                }
            }
        }

        info!(
            games_played = self.metrics.games_played,
            high_score = self.metrics.high_score,
            food_eaten = self.metrics.food_eaten,
            "leaving play mode"
        );
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            if let Some(command) = self.input_handler.handle_key_event(key) {
                self.apply(command);
            }
        }
    }

    fn apply(&mut self, command: Command) {
        let starting = matches!(command, Command::Start | Command::Restart);
        if self.session.handle(command) && starting {
            self.metrics.on_game_start();
        }
    }

    fn record_tick(&mut self, info: &StepInfo) {
        if info.ate_food {
            self.metrics.on_food();
        }
        if info.collision_type.is_some() {
            self.metrics.on_game_over(self.session.state().score);
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Phase, Position, Scheduler};

    #[test]
    fn test_game_initialization() {
        let mode = PlayMode::new(GameConfig::default(), Some(1));
        assert_eq!(mode.session.phase(), Phase::NotStarted);
        assert_eq!(mode.session.state().score, 0);
        assert!(!mode.session.scheduler().is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_and_game_over_update_metrics() {
        let mut mode = PlayMode::new(GameConfig::default(), Some(1));
        mode.apply(Command::Start);
        assert_eq!(mode.session.phase(), Phase::Running);
        assert!(mode.session.scheduler().is_active());

        // run straight into the right wall
        let mut ticks = 0;
        while mode.session.phase() == Phase::Running && ticks < 50 {
            mode.session.scheduler_mut().tick().await;
            if let Some(info) = mode.session.tick() {
                mode.record_tick(&info);
            }
            ticks += 1;
        }

        assert_eq!(mode.session.phase(), Phase::GameOver);
        assert_eq!(mode.metrics.games_played, 1);
        assert_eq!(mode.metrics.high_score, mode.session.state().score);
        // terminal board kept on screen
        assert_eq!(mode.session.state().snake.head(), Position::new(19, 5));
    }

    #[test]
    fn test_quit() {
        let mut mode = PlayMode::new(GameConfig::default(), Some(1));
        mode.apply(Command::Quit);
        assert!(mode.session.is_closed());
    }
}
