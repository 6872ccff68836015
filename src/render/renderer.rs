use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::{BoardView, CollisionType, Phase, Position};
use crate::metrics::GameMetrics;

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, view: &BoardView, metrics: &GameMetrics) {
        let [header, body, footer] = Layout::vertical([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Game area
            Constraint::Length(3), // Footer
        ])
        .areas(frame.area());

        frame.render_widget(self.render_stats(view, metrics), header);

        // two terminal columns per cell plus the border
        let board_area = centered(
            body,
            board_extent(view.width).saturating_mul(2).saturating_add(2),
            board_extent(view.height).saturating_add(2),
        );
        frame.render_widget(self.render_grid(view), board_area);

        match view.phase {
            Phase::NotStarted => {
                let area = centered(board_area, 28, 5);
                frame.render_widget(Clear, area);
                frame.render_widget(self.render_start(), area);
            }
            Phase::GameOver => {
                let area = centered(board_area, 34, 8);
                frame.render_widget(Clear, area);
                frame.render_widget(self.render_game_over(view), area);
            }
            Phase::Running => {}
        }

        frame.render_widget(self.render_controls(view.phase), footer);
    }

    fn render_grid(&self, view: &BoardView) -> Paragraph<'_> {
        let mut lines = Vec::with_capacity(view.height);

        for y in 0..view.height {
            let mut spans = Vec::with_capacity(view.width);

            for x in 0..view.width {
                let pos = Position::new(x as i32, y as i32);

                let cell = if view.is_head(pos) {
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if view.is_snake(pos) {
                    Span::styled("□ ", Style::default().fg(Color::Green))
                } else if pos == view.food {
                    Span::styled(
                        "O ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::White))
                .title(" Snake "),
        )
    }

    fn render_stats(&self, view: &BoardView, metrics: &GameMetrics) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = vec![Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(view.score.to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(metrics.high_score.to_string(), value),
            Span::raw("    "),
            Span::styled("Steps: ", label),
            Span::styled(view.steps.to_string(), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_start(&self) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Enter",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to start", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green)),
        )
    }

    fn render_game_over(&self, view: &BoardView) -> Paragraph<'_> {
        let reason = match view.collision {
            Some(CollisionType::Wall) => "hit the wall",
            Some(CollisionType::SelfCollision) => "ran into itself",
            None => "",
        };

        let text = vec![
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(Span::styled(reason, Style::default().fg(Color::DarkGray))),
            Line::from(""),
            Line::from(vec![
                Span::styled("Your score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    view.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" Again?   ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" Quit?", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, phase: Phase) -> Paragraph<'_> {
        let line = match phase {
            Phase::Running => Line::from(vec![
                Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
                Span::raw(" or "),
                Span::styled("WASD", Style::default().fg(Color::Cyan)),
                Span::raw(" to move | "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" to quit"),
            ]),
            Phase::NotStarted | Phase::GameOver => Line::from(vec![
                Span::styled("Enter", Style::default().fg(Color::Cyan)),
                Span::raw("/"),
                Span::styled("R", Style::default().fg(Color::Cyan)),
                Span::raw(" to play | "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" to quit"),
            ]),
        };

        Paragraph::new(vec![line]).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Grid dimension in terminal cells, saturating instead of wrapping
fn board_extent(cells: usize) -> u16 {
    u16::try_from(cells).unwrap_or(u16::MAX)
}

/// A `width` x `height` rect centred in `area`, clipped to it
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    cell
}
