use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::{Cell, CollisionType, GameSnapshot};
use crate::metrics::GameMetrics;

/// Message panel drawn over the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Welcome,
    Paused,
    ConfirmRestart,
    GameOver,
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        snapshot: &GameSnapshot,
        metrics: &GameMetrics,
        overlay: Option<Overlay>,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(snapshot, metrics);
        frame.render_widget(stats, chunks[0]);

        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        let grid = self.render_grid(snapshot);
        frame.render_widget(grid, game_area);

        if let Some(overlay) = overlay {
            let area = centered(game_area, 44, 9);
            frame.render_widget(Clear, area);
            frame.render_widget(self.render_message(overlay, snapshot), area);
        }

        let controls = self.render_controls();
        frame.render_widget(controls, chunks[2]);
    }

    fn render_grid(&self, snapshot: &GameSnapshot) -> Paragraph<'_> {
        let head = snapshot.head();
        let mut lines = Vec::new();

        for y in 0..snapshot.grid.height() as i32 {
            let mut spans = Vec::new();

            for x in 0..snapshot.grid.width() as i32 {
                let cell = Cell::new(x, y);

                let span = if Some(cell) == head {
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if snapshot.is_snake(cell) {
                    Span::styled("□ ", Style::default().fg(Color::Green))
                } else if Some(cell) == snapshot.food {
                    Span::styled(
                        "O ",
                        Style::default()
                            .fg(Color::Rgb(255, 165, 0))
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(span);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Snake "),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, snapshot: &GameSnapshot, metrics: &GameMetrics) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = vec![Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(
                snapshot.score.to_string(),
                value.add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Speed: ", label),
            Span::styled(snapshot.speed.to_string(), value),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(metrics.best_score.to_string(), value),
            Span::raw("    "),
            Span::styled("Games: ", label),
            Span::styled(metrics.games_played.to_string(), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_message(&self, overlay: Overlay, snapshot: &GameSnapshot) -> Paragraph<'_> {
        let (title, subtitle, color) = match overlay {
            Overlay::Welcome => (
                "Welcome to Snake".to_string(),
                "press any key to start",
                Color::Green,
            ),
            Overlay::Paused => ("Paused".to_string(), "press Space to resume", Color::Yellow),
            Overlay::ConfirmRestart => (
                "Restart?".to_string(),
                "Y restarts, any other key stays paused",
                Color::Yellow,
            ),
            Overlay::GameOver => {
                let reason = match snapshot.end_reason {
                    Some(CollisionType::BoardFull) => "Board cleared",
                    _ => "Game Over",
                };
                (
                    format!("{reason} - Final Score: {}", snapshot.score),
                    "press any key to try again",
                    Color::Red,
                )
            }
        };

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                title,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(subtitle, Style::default().fg(Color::Gray))),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("Space", Style::default().fg(Color::Cyan)),
            Span::raw(" to pause | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" to restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// A `width` x `height` rectangle centred in `area`, clipped to fit
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
