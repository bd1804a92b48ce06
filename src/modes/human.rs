use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{Instant, Interval, interval, interval_at};
use tracing::{debug, info};

use crate::game::{Command, GameConfig, GameEngine, GameEvent, GameStatus};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::{Overlay, Renderer};

/// Interactive terminal session: owns the engine and both clocks
pub struct HumanMode {
    engine: GameEngine,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    confirming_restart: bool,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Result<Self> {
        let engine = GameEngine::new(config).context("Invalid game configuration")?;

        Ok(Self {
            engine,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            confirming_restart: false,
            should_quit: false,
        })
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

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Game ticks at the engine's cadence, which shortens as the snake eats
        let mut cadence = self.engine.cadence();
        let mut tick_timer = interval(cadence);

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    self.update_game();
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    let snapshot = self.engine.snapshot();
                    let overlay = self.overlay();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot, &self.metrics, overlay);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }

            if self.engine.cadence() != cadence {
                cadence = self.engine.cadence();
                tick_timer = reschedule(cadence);
                debug!(?cadence, "tick cadence changed");
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };

        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return;
        }

        let action = self.input_handler.handle_key_event(key);
        if action == KeyAction::Quit {
            self.should_quit = true;
            return;
        }

        if self.confirming_restart {
            // Declining leaves the session paused
            self.confirming_restart = false;
            if action == KeyAction::Confirm {
                self.start_session();
            }
            return;
        }

        match self.engine.status() {
            GameStatus::Idle | GameStatus::Over => self.start_session(),
            GameStatus::Running | GameStatus::Paused => match action {
                KeyAction::Command(command) => self.apply(command),
                KeyAction::Restart => self.request_restart(),
                KeyAction::Confirm | KeyAction::Quit | KeyAction::None => {}
            },
        }
    }

    fn apply(&mut self, command: Command) {
        self.engine.apply(command);
        if command == Command::TogglePause {
            self.metrics
                .on_pause_changed(self.engine.status() == GameStatus::Paused);
        }
    }

    fn request_restart(&mut self) {
        if self.engine.status() == GameStatus::Running {
            self.apply(Command::TogglePause);
        }
        self.confirming_restart = true;
    }

    fn start_session(&mut self) {
        self.engine.reset();
        self.metrics.on_game_start();
        info!(games_played = self.metrics.games_played, "session started");
    }

    fn update_game(&mut self) {
        let result = self.engine.tick();

        for event in result.events {
            match event {
                GameEvent::ScoreChanged { .. } => self.metrics.on_food_eaten(),
                GameEvent::SpeedChanged { speed, .. } => debug!(speed, "speed up"),
                GameEvent::GameEnded { score, .. } => self.metrics.on_game_over(score),
            }
        }
    }

    fn overlay(&self) -> Option<Overlay> {
        if self.confirming_restart {
            return Some(Overlay::ConfirmRestart);
        }

        match self.engine.status() {
            GameStatus::Idle => Some(Overlay::Welcome),
            GameStatus::Running => None,
            GameStatus::Paused => Some(Overlay::Paused),
            GameStatus::Over => Some(Overlay::GameOver),
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

/// Replace the tick timer with one running at `cadence`, first firing one
/// full period from now
fn reschedule(cadence: Duration) -> Interval {
    interval_at(Instant::now() + cadence, cadence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Cell;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mode() -> HumanMode {
        let config = GameConfig {
            seed: Some(8),
            ..GameConfig::small()
        };
        HumanMode::new(config).unwrap()
    }

    #[test]
    fn test_game_initialization() {
        let mode = mode();
        assert_eq!(mode.engine.status(), GameStatus::Idle);
        assert_eq!(mode.engine.score(), 0);
        assert_eq!(mode.overlay(), Some(Overlay::Welcome));
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(HumanMode::new(GameConfig::new(0, 0)).is_err());
    }

    #[test]
    fn test_any_key_starts() {
        let mut mode = mode();
        mode.handle_event(key(KeyCode::Char('x')));
        assert_eq!(mode.engine.status(), GameStatus::Running);
        assert_eq!(mode.overlay(), None);
    }

    #[test]
    fn test_quit_does_not_start() {
        let mut mode = mode();
        mode.handle_event(key(KeyCode::Char('q')));
        assert!(mode.should_quit);
        assert_eq!(mode.engine.status(), GameStatus::Idle);
    }

    #[test]
    fn test_pause_toggle() {
        let mut mode = mode();
        mode.handle_event(key(KeyCode::Enter));
        mode.handle_event(key(KeyCode::Char(' ')));
        assert_eq!(mode.engine.status(), GameStatus::Paused);
        assert_eq!(mode.overlay(), Some(Overlay::Paused));

        mode.update_game();
        assert_eq!(mode.engine.ticks(), 0);

        mode.handle_event(key(KeyCode::Enter));
        assert_eq!(mode.engine.status(), GameStatus::Running);
    }

    #[test]
    fn test_steering() {
        let mut mode = mode();
        mode.handle_event(key(KeyCode::Enter));
        mode.handle_event(key(KeyCode::Down));
        mode.update_game();
        assert_eq!(mode.engine.snake().head(), Cell::new(2, 1));
    }

    #[test]
    fn test_restart_confirmed() {
        let mut mode = mode();
        mode.handle_event(key(KeyCode::Enter));
        mode.update_game();
        mode.update_game();

        mode.handle_event(key(KeyCode::Char('r')));
        assert_eq!(mode.engine.status(), GameStatus::Paused);
        assert_eq!(mode.overlay(), Some(Overlay::ConfirmRestart));

        mode.handle_event(key(KeyCode::Char('y')));
        assert_eq!(mode.engine.status(), GameStatus::Running);
        assert_eq!(mode.engine.ticks(), 0);
        assert!(!mode.confirming_restart);
    }

    #[test]
    fn test_restart_declined_stays_paused() {
        let mut mode = mode();
        mode.handle_event(key(KeyCode::Enter));
        mode.update_game();

        mode.handle_event(key(KeyCode::Char('r')));
        mode.handle_event(key(KeyCode::Char('n')));

        assert_eq!(mode.engine.status(), GameStatus::Paused);
        assert_eq!(mode.engine.ticks(), 1);
        assert_eq!(mode.overlay(), Some(Overlay::Paused));
    }

    #[test]
    fn test_game_over_and_retry() {
        let mut mode = mode();
        mode.handle_event(key(KeyCode::Enter));
        mode.handle_event(key(KeyCode::Up));
        mode.update_game();

        assert_eq!(mode.engine.status(), GameStatus::Over);
        assert_eq!(mode.metrics.games_played, 1);
        assert_eq!(mode.overlay(), Some(Overlay::GameOver));

        mode.update_game();
        assert_eq!(mode.metrics.games_played, 1);

        mode.handle_event(key(KeyCode::Char('z')));
        assert_eq!(mode.engine.status(), GameStatus::Running);
    }

    #[tokio::test]
    async fn test_reschedule_uses_new_period() {
        let cadence = Duration::from_millis(25);
        let timer = reschedule(cadence);
        assert_eq!(timer.period(), cadence);
    }
}
