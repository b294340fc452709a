//! Core game logic module for Snake
//!
//! This module contains the simulation and the autopilot without any I/O or
//! rendering dependencies. Terminal play and headless runs both drive it
//! through [`SimulationEngine`].

pub mod action;
pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod pathfinder;
pub mod state;

// Re-export commonly used types
pub use action::{Command, Direction};
pub use config::GameConfig;
pub use engine::{GameStatus, SimulationEngine, Snapshot, Steering, StepInfo, StepResult};
pub use error::GameError;
pub use grid::{Cell, Grid};
pub use pathfinder::{find_first_step, shortest_path_len};
pub use state::{CollisionType, Food, Snake};
