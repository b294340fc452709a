use std::time::{Duration, Instant};

use crate::game::{Steering, StepResult};

/// Session statistics shown next to the board; kept in memory only
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub high_score: u32,
    pub games_played: u32,
    /// Ticks in the current game
    pub ticks: u64,
    /// Ticks in the current game where the autopilot had no path
    pub blind_ticks: u64,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            high_score: 0,
            games_played: 0,
            ticks: 0,
            blind_ticks: 0,
        }
    }

    pub fn update(&mut self) {
        self.elapsed_time = self.start_time.elapsed();
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
        self.ticks = 0;
        self.blind_ticks = 0;
    }

    pub fn on_step(&mut self, result: &StepResult) {
        self.ticks += 1;
        if result.info.steering == Steering::Blind {
            self.blind_ticks += 1;
        }
        if result.terminated {
            self.on_game_over(result.snapshot.score);
        }
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.games_played += 1;
        self.high_score = self.high_score.max(final_score);
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Cell, Direction, GameStatus, Snapshot, StepInfo};

    fn step(steering: Steering, terminated: bool, score: u32) -> StepResult {
        StepResult {
            snapshot: Snapshot {
                tick: 1,
                body: vec![Cell::new(0, 0)],
                food: Cell::new(1, 1),
                score,
                status: if terminated {
                    GameStatus::GameOver
                } else {
                    GameStatus::Running
                },
                direction: Direction::Up,
                autopilot: true,
            },
            terminated,
            info: StepInfo {
                ate_food: false,
                collision_type: None,
                steering,
            },
        }
    }

    #[test]
    fn test_time_formatting() {
        let mut metrics = GameMetrics::new();
        metrics.elapsed_time = Duration::from_secs(125);
        assert_eq!(metrics.format_time(), "02:05");

        metrics.elapsed_time = Duration::from_secs(0);
        assert_eq!(metrics.format_time(), "00:00");

        metrics.elapsed_time = Duration::from_secs(3661);
        assert_eq!(metrics.format_time(), "61:01");
    }

    #[test]
    fn test_high_score_tracking() {
        let mut metrics = GameMetrics::new();

        metrics.on_game_over(10);
        metrics.on_game_over(5);
        assert_eq!(metrics.high_score, 10);
        assert_eq!(metrics.games_played, 2);

        metrics.on_game_over(15);
        assert_eq!(metrics.high_score, 15);
    }

    #[test]
    fn test_step_counting() {
        let mut metrics = GameMetrics::new();

        metrics.on_step(&step(
            Steering::Autopilot {
                direction: Direction::Up,
                accepted: true,
            },
            false,
            0,
        ));
        metrics.on_step(&step(Steering::Blind, false, 0));
        metrics.on_step(&step(Steering::Blind, true, 4));

        assert_eq!(metrics.ticks, 3);
        assert_eq!(metrics.blind_ticks, 2);
        assert_eq!(metrics.games_played, 1);
        assert_eq!(metrics.high_score, 4);

        metrics.on_game_start();
        assert_eq!(metrics.ticks, 0);
        assert_eq!(metrics.blind_ticks, 0);
        assert_eq!(metrics.high_score, 4);
    }
}
