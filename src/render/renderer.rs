use std::collections::HashSet;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{Cell, GameStatus, Grid, Snapshot};
use crate::metrics::GameMetrics;

/// Terminal columns used per board cell
const CELL_COLUMNS: u16 = 2;

const GAME_OVER_WIDTH: u16 = 44;
const GAME_OVER_HEIGHT: u16 = 8;

/// Where the board was last drawn, for mapping mouse clicks back to cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardGeometry {
    /// Board interior, without the border
    pub inner: Rect,
    pub grid: Grid,
}

impl BoardGeometry {
    /// Cell under a terminal position, clamped onto the board
    pub fn cell_at(&self, column: u16, row: u16) -> Option<Cell> {
        let inside = column >= self.inner.x
            && column < self.inner.x + self.inner.width
            && row >= self.inner.y
            && row < self.inner.y + self.inner.height;
        if !inside {
            return None;
        }
        let x = ((column - self.inner.x) / CELL_COLUMNS) as i32;
        let y = (row - self.inner.y) as i32;
        Some(self.grid.clamp(x, y))
    }
}

pub struct Renderer {
    board: Option<BoardGeometry>,
}

impl Renderer {
    pub fn new() -> Self {
        Self { board: None }
    }

    /// Geometry of the most recently drawn board
    pub fn board(&self) -> Option<BoardGeometry> {
        self.board
    }

    pub fn cell_at(&self, column: u16, row: u16) -> Option<Cell> {
        self.board.and_then(|board| board.cell_at(column, row))
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        grid: &Grid,
        snapshot: &Snapshot,
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

        let stats = self.render_stats(snapshot, metrics);
        frame.render_widget(stats, chunks[0]);

        let board_area = centered(
            chunks[1],
            terminal_span(grid.width(), CELL_COLUMNS),
            terminal_span(grid.height(), 1),
        );

        if snapshot.status == GameStatus::Running {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::White))
                .title(" Snake ");
            let inner = block.inner(board_area);
            self.board = Some(BoardGeometry { inner, grid: *grid });

            frame.render_widget(self.render_grid(grid, snapshot).block(block), board_area);
        } else {
            self.board = None;
            let panel = centered(
                chunks[1],
                board_area.width.max(GAME_OVER_WIDTH),
                board_area.height.max(GAME_OVER_HEIGHT),
            );
            frame.render_widget(self.render_game_over(snapshot), panel);
        }

        let controls = self.render_controls();
        frame.render_widget(controls, chunks[2]);
    }

    fn render_grid(&self, grid: &Grid, snapshot: &Snapshot) -> Paragraph<'_> {
        let head = snapshot.body.first().copied();
        let body: HashSet<Cell> = snapshot.body.iter().copied().collect();
        let mut lines = Vec::new();

        for y in 0..grid.height() {
            let mut spans = Vec::new();

            for x in 0..grid.width() {
                let pos = Cell::new(x, y);

                let cell = if Some(pos) == head {
                    // Snake head - distinct color
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if body.contains(&pos) {
                    Span::styled("□ ", Style::default().fg(Color::Green))
                } else if pos == snapshot.food {
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

        Paragraph::new(lines)
    }

    fn render_stats(&self, snapshot: &Snapshot, metrics: &GameMetrics) -> Paragraph<'_> {
        let (pilot, pilot_color) = if snapshot.autopilot {
            ("ON", Color::Green)
        } else {
            ("OFF", Color::DarkGray)
        };

        let text = vec![Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                snapshot.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Best: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                metrics.high_score.to_string(),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Tick: ", Style::default().fg(Color::Yellow)),
            Span::styled(snapshot.tick.to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Autopilot: ", Style::default().fg(Color::Yellow)),
            Span::styled(pilot, Style::default().fg(pilot_color)),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_game_over(&self, snapshot: &Snapshot) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
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
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("P", Style::default().fg(Color::Cyan)),
            Span::raw(" autopilot | "),
            Span::styled("Click", Style::default().fg(Color::Cyan)),
            Span::raw(" to place food | "),
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

/// Terminal extent of `cells` board cells plus the two border lines
fn terminal_span(cells: i32, per_cell: u16) -> u16 {
    u16::try_from(cells)
        .unwrap_or(u16::MAX)
        .saturating_mul(per_cell)
        .saturating_add(2)
}

/// A `width` x `height` rectangle centered in `area`, shrunk to fit
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
