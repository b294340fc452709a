use anyhow::Result;
use bfs_snake::game::GameConfig;
use bfs_snake::logging::{self, LogTarget};
use bfs_snake::modes::{HeadlessConfig, HeadlessMode, PlayMode};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "bfs_snake")]
#[command(version, about = "Snake with a breadth-first-search autopilot")]
struct Cli {
    /// Game mode
    #[arg(long, default_value = "play")]
    mode: Mode,

    /// JSON config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width
    #[arg(long)]
    width: Option<usize>,

    /// Grid height
    #[arg(long)]
    height: Option<usize>,

    /// Random seed for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    /// Start with the autopilot off
    #[arg(long)]
    manual: bool,

    /// Milliseconds per tick in play mode
    #[arg(long, default_value = "100", value_parser = clap::value_parser!(u64).range(1..))]
    tick_ms: u64,

    /// Games to play in headless mode
    #[arg(long, default_value = "1")]
    games: usize,

    /// Tick cap per game in headless mode
    #[arg(long, default_value = "10000")]
    max_ticks: u64,

    /// Print every snapshot as a JSON line in headless mode
    #[arg(long)]
    trace: bool,

    /// Log file; in play mode logs are discarded without one
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Default log filter when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Play in the terminal; arrows steer, P toggles the autopilot
    Play,
    /// Let the autopilot play without a terminal UI
    Headless,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };

        if let Some(width) = self.width {
            config.grid_width = width;
        }
        if let Some(height) = self.height {
            config.grid_height = height;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.manual {
            config.autopilot = false;
        }

        config.validate()?;
        Ok(config)
    }

    fn log_target(&self) -> LogTarget {
        match (&self.log_file, &self.mode) {
            (Some(path), _) => LogTarget::File(path.clone()),
            (None, Mode::Headless) => LogTarget::Stderr,
            (None, Mode::Play) => LogTarget::Off,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level, cli.log_target())?;

    let config = cli.game_config()?;

    // Dispatch to appropriate mode
    match cli.mode {
        Mode::Play => {
            let mut play_mode = PlayMode::new(config, Duration::from_millis(cli.tick_ms))?;
            play_mode.run().await?;
        }
        Mode::Headless => {
            let mut headless = HeadlessMode::new(HeadlessConfig {
                games: cli.games,
                max_ticks: cli.max_ticks,
                trace: cli.trace,
                game_config: config,
            })?;
            let summary = headless.run(&mut std::io::stdout().lock())?;
            if cli.trace {
                eprintln!("{}", summary);
            } else {
                println!("{}", summary);
            }
        }
    }

    Ok(())
}
