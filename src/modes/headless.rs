//! Headless runs: whole games played without a terminal
//!
//! Useful for checking how far the autopilot gets on a given board and seed.
//! With `trace` enabled every snapshot is written as one JSON line.

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use tracing::info;

use crate::game::{GameConfig, SimulationEngine};
use crate::metrics::GameMetrics;

/// Configuration for headless mode
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    /// Number of games to play
    pub games: usize,
    /// A game still running after this many ticks is cut off
    pub max_ticks: u64,
    /// Write each snapshot as a JSON line
    pub trace: bool,
    pub game_config: GameConfig,
}

impl HeadlessConfig {
    pub fn new(game_config: GameConfig) -> Self {
        Self {
            games: 1,
            max_ticks: 10_000,
            trace: false,
            game_config,
        }
    }
}

/// Totals over all games of a headless run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeadlessSummary {
    pub games: usize,
    pub total_score: u64,
    pub best_score: u32,
    pub total_ticks: u64,
    pub blind_ticks: u64,
    /// Games stopped by the tick cap rather than a collision
    pub timeouts: usize,
}

impl HeadlessSummary {
    pub fn mean_score(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.total_score as f64 / self.games as f64
    }
}

impl std::fmt::Display for HeadlessSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "games:       {}", self.games)?;
        writeln!(f, "mean score:  {:.2}", self.mean_score())?;
        writeln!(f, "best score:  {}", self.best_score)?;
        writeln!(f, "ticks:       {}", self.total_ticks)?;
        writeln!(f, "blind ticks: {}", self.blind_ticks)?;
        write!(f, "timeouts:    {}", self.timeouts)
    }
}

pub struct HeadlessMode {
    engine: SimulationEngine,
    config: HeadlessConfig,
    metrics: GameMetrics,
}

impl HeadlessMode {
    pub fn new(config: HeadlessConfig) -> Result<Self> {
        let engine =
            SimulationEngine::new(config.game_config.clone()).context("Failed to create game")?;
        Ok(Self {
            engine,
            config,
            metrics: GameMetrics::new(),
        })
    }

    /// Play every game, writing traces to `out` when enabled
    pub fn run<W: Write>(&mut self, out: &mut W) -> Result<HeadlessSummary> {
        let mut summary = HeadlessSummary::default();

        for game in 0..self.config.games {
            if game > 0 {
                self.engine.reset();
            }
            self.metrics.on_game_start();

            while self.engine.is_running() && self.engine.tick_count() < self.config.max_ticks {
                let result = self.engine.tick()?;
                self.metrics.on_step(&result);

                if self.config.trace {
                    serde_json::to_writer(&mut *out, &result.snapshot)
                        .context("Failed to write snapshot")?;
                    writeln!(out).context("Failed to write snapshot")?;
                }
            }

            let score = self.engine.snake().score();
            let timed_out = self.engine.is_running();
            if timed_out {
                self.metrics.on_game_over(score);
                summary.timeouts += 1;
            }

            summary.games += 1;
            summary.total_score += u64::from(score);
            summary.best_score = summary.best_score.max(score);
            summary.total_ticks += self.metrics.ticks;
            summary.blind_ticks += self.metrics.blind_ticks;

            info!(
                game = game + 1,
                score,
                ticks = self.metrics.ticks,
                blind_ticks = self.metrics.blind_ticks,
                timed_out,
                "game finished"
            );
        }

        Ok(summary)
    }
}
