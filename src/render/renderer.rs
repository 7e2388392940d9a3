use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use std::collections::HashSet;

use crate::game::{Cell, FruitKind, GameOverCause, RunState, Snapshot, Speed};
use crate::metrics::GameMetrics;

/// What occupies a grid cell on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Head,
    Body,
    Fruit(FruitKind),
    Empty,
}

/// Classify every cell of the snapshot, row by row
pub fn tiles(snapshot: &Snapshot) -> Vec<Vec<Tile>> {
    let head = snapshot.head();
    let fruit = snapshot.fruit;
    let body: HashSet<Cell> = snapshot.cells.iter().copied().collect();

    (0..snapshot.grid_rows as i32)
        .map(|y| {
            (0..snapshot.grid_cols as i32)
                .map(|x| {
                    let cell = Cell::new(x, y);
                    if Some(cell) == head {
                        Tile::Head
                    } else if body.contains(&cell) {
                        Tile::Body
                    } else {
                        match fruit {
                            Some(fruit) if fruit.cell == cell => Tile::Fruit(fruit.kind),
                            _ => Tile::Empty,
                        }
                    }
                })
                .collect()
        })
        .collect()
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        snapshot: &Snapshot,
        speed: Speed,
        metrics: &GameMetrics,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(snapshot, speed, metrics);
        frame.render_widget(stats, chunks[0]);

        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        match snapshot.run_state {
            RunState::Over => {
                frame.render_widget(self.render_game_over(snapshot), game_area);
            }
            RunState::Idle => {
                frame.render_widget(self.render_grid(snapshot, " Snake - press Enter "), game_area);
            }
            RunState::Paused => {
                frame.render_widget(self.render_grid(snapshot, " Paused "), game_area);
            }
            RunState::Running => {
                frame.render_widget(self.render_grid(snapshot, " Snake "), game_area);
            }
        }

        let controls = self.render_controls();
        frame.render_widget(controls, chunks[2]);
    }

    fn render_grid(&self, snapshot: &Snapshot, title: &'static str) -> Paragraph<'static> {
        let lines: Vec<Line> = tiles(snapshot)
            .into_iter()
            .map(|row| Line::from(row.into_iter().map(tile_span).collect::<Vec<_>>()))
            .collect();

        let border = if snapshot.run_state == RunState::Paused {
            Color::Yellow
        } else {
            Color::White
        };

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(border))
                    .title(title),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(
        &self,
        snapshot: &Snapshot,
        speed: Speed,
        metrics: &GameMetrics,
    ) -> Paragraph<'static> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = vec![Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(snapshot.score.to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(metrics.high_score.max(snapshot.score).to_string(), value),
            Span::raw("    "),
            Span::styled("Speed: ", label),
            Span::styled(format!("{:.0}/s", speed.ticks_per_second()), value),
            Span::raw("    "),
            Span::styled("Fruit: ", label),
            Span::styled(fruit_label(snapshot.fruit_kind), fruit_style(snapshot.fruit_kind)),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_game_over(&self, snapshot: &Snapshot) -> Paragraph<'static> {
        let (headline, color) = match snapshot.last_game_over {
            Some(GameOverCause::BoardFilled) => ("BOARD CLEARED", Color::Green),
            _ => ("GAME OVER", Color::Red),
        };
        let reason = match snapshot.last_game_over {
            Some(GameOverCause::Wall) => "Hit the wall",
            Some(GameOverCause::SelfCollision) => "Ran into yourself",
            Some(GameOverCause::BoardFilled) => "No room left for fruit",
            None => "",
        };

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                headline,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )]),
            Line::from(Span::styled(reason, Style::default().fg(Color::Gray))),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    snapshot.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        )
    }

    fn render_controls(&self) -> Paragraph<'static> {
        let key = Style::default().fg(Color::Cyan);
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→/WASD", key),
            Span::raw(" move | "),
            Span::styled("Enter", key),
            Span::raw(" start | "),
            Span::styled("Space", key),
            Span::raw(" pause | "),
            Span::styled("R", key),
            Span::raw(" restart | "),
            Span::styled("+/-", key),
            Span::raw(" speed | "),
            Span::styled("1/2", key),
            Span::raw(" fruit | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn tile_span(tile: Tile) -> Span<'static> {
    match tile {
        Tile::Head => Span::styled(
            "■ ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Tile::Body => Span::styled("□ ", Style::default().fg(Color::Green)),
        Tile::Fruit(kind) => Span::styled(
            match kind {
                FruitKind::Normal => "● ",
                FruitKind::Bonus => "★ ",
            },
            fruit_style(kind).add_modifier(Modifier::BOLD),
        ),
        Tile::Empty => Span::styled(". ", Style::default().fg(Color::DarkGray)),
    }
}

fn fruit_label(kind: FruitKind) -> &'static str {
    match kind {
        FruitKind::Normal => "apple",
        FruitKind::Bonus => "gold",
    }
}

fn fruit_style(kind: FruitKind) -> Style {
    match kind {
        FruitKind::Normal => Style::default().fg(Color::Red),
        FruitKind::Bonus => Style::default().fg(Color::Yellow),
    }
}
