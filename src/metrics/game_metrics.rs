use std::time::{Duration, Instant};

/// Per-process play statistics shown next to the board
///
/// Nothing here outlives the process.
pub struct GameMetrics {
    running_since: Option<Instant>,
    accumulated: Duration,
    pub elapsed_time: Duration,
    pub best_score: u32,
    pub games_played: u32,
    pub food_eaten: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            running_since: None,
            accumulated: Duration::ZERO,
            elapsed_time: Duration::ZERO,
            best_score: 0,
            games_played: 0,
            food_eaten: 0,
        }
    }

    pub fn update(&mut self) {
        self.elapsed_time = self.accumulated
            + self
                .running_since
                .map(|since| since.elapsed())
                .unwrap_or(Duration::ZERO);
    }

    pub fn on_game_start(&mut self) {
        self.running_since = Some(Instant::now());
        self.accumulated = Duration::ZERO;
        self.elapsed_time = Duration::ZERO;
        self.food_eaten = 0;
    }

    /// Stop or restart the session clock
    pub fn on_pause_changed(&mut self, paused: bool) {
        match (paused, self.running_since) {
            (true, Some(since)) => {
                self.accumulated += since.elapsed();
                self.running_since = None;
            }
            (false, None) => self.running_since = Some(Instant::now()),
            _ => {}
        }
        self.update();
    }

    pub fn on_food_eaten(&mut self) {
        self.food_eaten += 1;
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.on_pause_changed(true);
        self.games_played += 1;
        if final_score > self.best_score {
            self.best_score = final_score;
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
