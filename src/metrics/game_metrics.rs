use std::time::{Duration, Instant};

/// Per-process play statistics shown in the header
pub struct GameMetrics {
    /// Set while a game is running; the clock freezes at game over
    running_since: Option<Instant>,
    pub elapsed_time: Duration,
    pub high_score: u32,
    pub games_played: u32,
    pub food_eaten: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            running_since: None,
            elapsed_time: Duration::ZERO,
            high_score: 0,
            games_played: 0,
            food_eaten: 0,
        }
    }

    pub fn update(&mut self) {
        if let Some(since) = self.running_since {
            self.elapsed_time = since.elapsed();
        }
    }

    pub fn on_game_start(&mut self) {
        self.running_since = Some(Instant::now());
        self.elapsed_time = Duration::ZERO;
    }

    pub fn on_food(&mut self) {
        self.food_eaten += 1;
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.update();
        self.running_since = None;
        self.games_played += 1;
        self.high_score = self.high_score.max(final_score);
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
