//! Interactive terminal play
//!
//! The engine ticks on a fixed interval while the board is redrawn at a
//! higher rate. Keys and mouse clicks are turned into commands for the next
//! tick.

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::interval;
use tracing::info;

use crate::game::{Command, GameConfig, SimulationEngine};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// Render at 30 FPS
const RENDER_INTERVAL: Duration = Duration::from_millis(33);

pub struct PlayMode {
    engine: SimulationEngine,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    tick_interval: Duration,
    should_quit: bool,
    /// Autopilot state requested since the last tick
    requested_autopilot: Option<bool>,
}

impl PlayMode {
    pub fn new(config: GameConfig, tick_interval: Duration) -> Result<Self> {
        let engine = SimulationEngine::new(config).context("Failed to create game")?;

        Ok(Self {
            engine,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            tick_interval,
            should_quit: false,
            requested_autopilot: None,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        info!(
            width = self.engine.grid().width(),
            height = self.engine.grid().height(),
            autopilot = self.engine.autopilot(),
            "starting interactive game"
        );

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        self.cleanup_terminal(&mut terminal)?;

        info!(
            games = self.metrics.games_played,
            high_score = self.metrics.high_score,
            "session finished"
        );
        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut tick_timer = interval(self.tick_interval);
        let mut render_timer = interval(RENDER_INTERVAL);

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event)?;
                    }
                }

                _ = tick_timer.tick() => {
                    self.update_game()?;
                }

                _ = render_timer.tick() => {
                    self.metrics.update();
                    let snapshot = self.engine.snapshot();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, self.engine.grid(), &snapshot, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        let action = match event {
            // Only process key press events, not release
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                self.input_handler.handle_key_event(key)
            }
            Event::Mouse(mouse) => self
                .input_handler
                .handle_mouse_event(mouse, |column, row| self.renderer.cell_at(column, row)),
            _ => KeyAction::None,
        };

        self.apply(action)
    }

    fn apply(&mut self, action: KeyAction) -> Result<()> {
        match action {
            KeyAction::Command(command) => {
                self.engine.submit(command)?;
            }
            KeyAction::ToggleAutopilot if !self.engine.is_running() => {
                // The engine drops commands after game over
                self.requested_autopilot = None;
            }
            KeyAction::ToggleAutopilot => {
                let enabled = !self.requested_autopilot.unwrap_or(self.engine.autopilot());
                self.requested_autopilot = Some(enabled);
                self.engine.submit(Command::ToggleAutopilot(enabled))?;
            }
            KeyAction::Restart => {
                self.reset_game();
            }
            KeyAction::Quit => {
                self.should_quit = true;
            }
            KeyAction::None => {}
        }
        Ok(())
    }

    fn update_game(&mut self) -> Result<()> {
        if !self.engine.is_running() {
            return Ok(());
        }

        let result = self.engine.tick()?;
        self.requested_autopilot = None;
        self.metrics.on_step(&result);
        Ok(())
    }

    fn reset_game(&mut self) {
        self.engine.reset();
        self.metrics.on_game_start();
        self.requested_autopilot = None;
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )
        .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
