//! BFS Snake - a terminal Snake game with a shortest-path autopilot
//!
//! This library provides:
//! - Core simulation and BFS pathfinding (game module)
//! - TUI rendering (render module)
//! - Keyboard and mouse mapping (input module)
//! - Session statistics (metrics module)
//! - Interactive and headless execution modes (modes module)

pub mod game;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod modes;
pub mod render;
