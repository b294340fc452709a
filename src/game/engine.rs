use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use super::{
    action::{Command, Direction},
    config::GameConfig,
    error::GameError,
    grid::{Cell, Grid},
    pathfinder::find_first_step,
    state::{CollisionType, Food, Snake},
};

/// Whether a game is still being played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Running,
    GameOver,
}

/// What decided the snake's direction during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Steering {
    /// A queued manual turn; `accepted` is false for a rejected reversal
    Manual { direction: Direction, accepted: bool },
    /// The autopilot found a path and queued its first step; `accepted` is
    /// false when that step would reverse the snake
    Autopilot { direction: Direction, accepted: bool },
    /// The autopilot found no path; the snake kept its heading
    Blind,
    /// No command and no autopilot
    Straight,
}

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
    pub steering: Steering,
}

/// Everything a presentation layer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    /// Head first
    pub body: Vec<Cell>,
    pub food: Cell,
    pub score: u32,
    pub status: GameStatus,
    pub direction: Direction,
    pub autopilot: bool,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    pub snapshot: Snapshot,
    /// Whether the game has terminated
    pub terminated: bool,
    /// Additional information about the step
    pub info: StepInfo,
}

/// Runs one game: owns the snake, the food and the random source, and
/// advances them one tick at a time.
///
/// Commands submitted between ticks are held until the next [`tick`]; later
/// commands of the same kind replace earlier ones.
///
/// [`tick`]: SimulationEngine::tick
#[derive(Debug, Clone)]
pub struct SimulationEngine<R = StdRng> {
    config: GameConfig,
    grid: Grid,
    snake: Snake,
    food: Food,
    status: GameStatus,
    tick: u64,
    autopilot: bool,
    rng: R,
    pending_turn: Option<Direction>,
    pending_food: Option<Cell>,
    pending_autopilot: Option<bool>,
}

impl SimulationEngine<StdRng> {
    /// Build an engine seeded from `config.seed`, or from OS entropy if unset
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> SimulationEngine<R> {
    /// Build an engine around a caller-supplied random source
    pub fn with_rng(config: GameConfig, mut rng: R) -> Result<Self, GameError> {
        let grid = Grid::new(config.grid_width, config.grid_height)?;
        let (snake, food) = new_round(&config, &grid, &mut rng);
        Ok(Self::assemble(config, grid, snake, food, rng))
    }

    /// Build an engine from a prepared position, e.g. a test scenario
    pub fn from_parts(
        config: GameConfig,
        snake: Snake,
        food: Cell,
        rng: R,
    ) -> Result<Self, GameError> {
        let grid = Grid::new(config.grid_width, config.grid_height)?;
        Ok(Self::assemble(config, grid, snake, Food::new(food), rng))
    }

    fn assemble(config: GameConfig, grid: Grid, snake: Snake, food: Food, rng: R) -> Self {
        let autopilot = config.autopilot;
        Self {
            config,
            grid,
            snake,
            food,
            status: GameStatus::Running,
            tick: 0,
            autopilot,
            rng,
            pending_turn: None,
            pending_food: None,
            pending_autopilot: None,
        }
    }

    /// Start a new game on the same board, continuing the random stream
    pub fn reset(&mut self) {
        let (snake, food) = new_round(&self.config, &self.grid, &mut self.rng);
        self.snake = snake;
        self.food = food;
        self.status = GameStatus::Running;
        self.tick = 0;
        self.autopilot = self.config.autopilot;
        self.pending_turn = None;
        self.pending_food = None;
        self.pending_autopilot = None;
        debug!(head = %self.snake.head(), food = %self.food.position(), "new game");
    }

    /// Queue a command for the next tick.
    ///
    /// Commands arriving after game over are dropped. A food override outside
    /// the board is a caller bug and is rejected.
    pub fn submit(&mut self, command: Command) -> Result<(), GameError> {
        if let Command::FoodOverride(cell) = command {
            if !self.grid.contains(cell) {
                return Err(GameError::FoodOutOfBounds {
                    cell,
                    width: self.grid.width(),
                    height: self.grid.height(),
                });
            }
        }

        if self.status == GameStatus::GameOver {
            trace!(?command, "ignoring command after game over");
            return Ok(());
        }

        match command {
            Command::Turn(direction) => self.pending_turn = Some(direction),
            Command::FoodOverride(cell) => self.pending_food = Some(cell),
            Command::ToggleAutopilot(enabled) => self.pending_autopilot = Some(enabled),
        }
        Ok(())
    }

    /// Execute one step of the game
    pub fn tick(&mut self) -> Result<StepResult, GameError> {
        if self.status == GameStatus::GameOver {
            return Ok(StepResult {
                snapshot: self.snapshot(),
                terminated: true,
                info: StepInfo {
                    ate_food: false,
                    collision_type: None,
                    steering: Steering::Straight,
                },
            });
        }

        self.tick += 1;
        if let Some(enabled) = self.pending_autopilot.take() {
            self.autopilot = enabled;
        }
        let food_override = self.pending_food.take();
        if let Some(cell) = food_override {
            self.food.override_position(cell);
            debug!(at = %cell, "food placed by override");
        }

        let steering = self.steer();
        self.snake.advance(self.tick)?;

        if let Some(collision_type) = self.snake.detect_collision(&self.grid) {
            self.status = GameStatus::GameOver;
            info!(
                tick = self.tick,
                score = self.snake.score(),
                head = %self.snake.head(),
                ?collision_type,
                "game over"
            );
            return Ok(StepResult {
                snapshot: self.snapshot(),
                terminated: true,
                info: StepInfo {
                    ate_food: false,
                    collision_type: Some(collision_type),
                    steering,
                },
            });
        }

        let ate_food = self.snake.head() == self.food.position();
        if ate_food {
            self.snake.queue_growth();
            debug!(
                tick = self.tick,
                score = self.snake.score(),
                at = %self.food.position(),
                "food eaten"
            );
        }

        // Food placed by this tick's override stays put even when eaten
        if ate_food && food_override.is_none() {
            let forbidden = self
                .config
                .food_avoids_snake
                .then(|| self.snake.occupied());
            self.food.relocate(&mut self.rng, &self.grid, forbidden);
            debug!(at = %self.food.position(), "food relocated");
        }

        Ok(StepResult {
            snapshot: self.snapshot(),
            terminated: false,
            info: StepInfo {
                ate_food,
                collision_type: None,
                steering,
            },
        })
    }

    /// Pick this tick's direction: a manual turn wins over the autopilot
    fn steer(&mut self) -> Steering {
        if let Some(direction) = self.pending_turn.take() {
            let accepted = self.snake.queue_turn(direction);
            if self.config.manual_disables_autopilot && self.autopilot {
                self.autopilot = false;
                info!(tick = self.tick, "manual input, autopilot disengaged");
            }
            return Steering::Manual {
                direction,
                accepted,
            };
        }

        if !self.autopilot {
            return Steering::Straight;
        }

        let step = find_first_step(
            &self.grid,
            self.snake.occupied(),
            self.snake.head(),
            self.food.position(),
        );

        match step {
            Some(direction) => {
                let accepted = self.snake.queue_turn(direction);
                trace!(tick = self.tick, ?direction, accepted, "autopilot step");
                Steering::Autopilot {
                    direction,
                    accepted,
                }
            }
            None => {
                debug!(
                    tick = self.tick,
                    heading = ?self.snake.direction(),
                    "no path to food, keeping heading"
                );
                Steering::Blind
            }
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.tick,
            body: self.snake.body().copied().collect(),
            food: self.food.position(),
            score: self.snake.score(),
            status: self.status,
            direction: self.snake.direction(),
            autopilot: self.autopilot,
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == GameStatus::Running
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Cell {
        self.food.position()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    /// Ticks played in the current game
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

/// Fresh snake at the center heading a random way, plus its first food
fn new_round<R: Rng>(config: &GameConfig, grid: &Grid, rng: &mut R) -> (Snake, Food) {
    let direction = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];
    let snake = Snake::new(grid.center(), direction);

    let mut food = Food::new(grid.center());
    let forbidden = config.food_avoids_snake.then(|| snake.occupied());
    food.relocate(rng, grid, forbidden);

    (snake, food)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with(
        config: GameConfig,
        body: &[(i32, i32)],
        dir: Direction,
        food: (i32, i32),
    ) -> SimulationEngine {
        let snake = Snake::from_body(body.iter().map(|&(x, y)| Cell::new(x, y)), dir);
        SimulationEngine::from_parts(
            config,
            snake,
            Cell::new(food.0, food.1),
            StdRng::seed_from_u64(1),
        )
        .unwrap()
    }

    fn manual() -> GameConfig {
        GameConfig::small().with_autopilot(false)
    }

    fn autopilot(direction: Direction) -> Steering {
        Steering::Autopilot {
            direction,
            accepted: true,
        }
    }

    #[test]
    fn test_new_game() {
        let engine = SimulationEngine::new(GameConfig::small().with_seed(7)).unwrap();

        assert!(engine.is_running());
        assert_eq!(engine.tick_count(), 0);
        assert_eq!(engine.snake().len(), 1);
        assert_eq!(engine.snake().head(), Cell::new(5, 5));
        assert_eq!(engine.snake().score(), 0);
        assert!(engine.grid().contains(engine.food()));
        assert_ne!(engine.food(), engine.snake().head());
    }

    #[test]
    fn test_invalid_grid_rejected() {
        let result = SimulationEngine::new(GameConfig::new(0, 4));
        assert!(matches!(result, Err(GameError::InvalidGrid { width: 0, height: 4 })));
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = engine_with(manual(), &[(5, 5)], Direction::Right, (0, 0));

        let result = engine.tick().unwrap();

        assert!(!result.terminated);
        assert!(!result.info.ate_food);
        assert_eq!(result.info.steering, Steering::Straight);
        assert_eq!(result.snapshot.tick, 1);
        assert_eq!(result.snapshot.body, vec![Cell::new(6, 5)]);
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = engine_with(manual(), &[(5, 5)], Direction::Right, (6, 5));

        let result = engine.tick().unwrap();
        assert!(result.info.ate_food);
        assert_eq!(result.snapshot.score, 1);
        // growth lands on the next advance
        assert_eq!(engine.snake().len(), 1);
        assert_ne!(engine.food(), Cell::new(6, 5));
        assert!(engine.grid().contains(engine.food()));
        assert!(!engine.snake().contains(engine.food()));

        engine.tick().unwrap();
        assert_eq!(engine.snake().len(), 2);
    }

    #[test]
    fn test_wall_collision() {
        let mut engine = engine_with(manual(), &[(0, 5), (1, 5)], Direction::Left, (5, 5));

        let result = engine.tick().unwrap();

        assert!(result.terminated);
        assert_eq!(engine.status(), GameStatus::GameOver);
        assert_eq!(result.snapshot.status, GameStatus::GameOver);
        assert_eq!(result.info.collision_type, Some(CollisionType::Wall));
        assert_eq!(engine.snake().head(), Cell::new(-1, 5));
    }

    #[test]
    fn test_right_wall_collision() {
        let mut engine = engine_with(manual(), &[(9, 2)], Direction::Right, (5, 5));
        let result = engine.tick().unwrap();
        assert_eq!(result.info.collision_type, Some(CollisionType::Wall));
        assert_eq!(engine.snake().head(), Cell::new(10, 2));
    }

    #[test]
    fn test_self_collision() {
        // Right, Down, Left, then Up into the segment at (5,5)
        let mut engine = engine_with(
            manual(),
            &[(5, 5), (4, 5), (3, 5), (2, 5), (1, 5)],
            Direction::Right,
            (8, 8),
        );

        engine.tick().unwrap();
        engine.submit(Command::Turn(Direction::Down)).unwrap();
        engine.tick().unwrap();
        engine.submit(Command::Turn(Direction::Left)).unwrap();
        engine.tick().unwrap();
        engine.submit(Command::Turn(Direction::Up)).unwrap();
        let result = engine.tick().unwrap();

        assert!(result.terminated);
        assert_eq!(
            result.info.collision_type,
            Some(CollisionType::SelfCollision)
        );
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let mut engine = engine_with(manual(), &[(5, 5), (4, 5)], Direction::Right, (0, 0));

        engine.submit(Command::Turn(Direction::Left)).unwrap();
        let result = engine.tick().unwrap();

        assert_eq!(
            result.info.steering,
            Steering::Manual {
                direction: Direction::Left,
                accepted: false
            }
        );
        assert_eq!(engine.snake().direction(), Direction::Right);
        assert_eq!(engine.snake().head(), Cell::new(6, 5));
    }

    #[test]
    fn test_last_turn_wins() {
        let mut engine = engine_with(manual(), &[(5, 5)], Direction::Right, (0, 0));

        engine.submit(Command::Turn(Direction::Up)).unwrap();
        engine.submit(Command::Turn(Direction::Down)).unwrap();
        engine.tick().unwrap();

        assert_eq!(engine.snake().head(), Cell::new(5, 6));
    }

    #[test]
    fn test_autopilot_steers_towards_food() {
        let config = GameConfig::small();
        let mut engine = engine_with(config, &[(5, 5)], Direction::Right, (5, 2));

        let result = engine.tick().unwrap();
        assert_eq!(result.info.steering, autopilot(Direction::Up));
        assert_eq!(engine.snake().head(), Cell::new(5, 4));

        engine.tick().unwrap();
        let result = engine.tick().unwrap();
        assert!(result.info.ate_food);
    }

    #[test]
    fn test_manual_turn_suppresses_autopilot_for_one_tick() {
        let mut engine = engine_with(GameConfig::small(), &[(5, 5)], Direction::Right, (5, 2));

        engine.submit(Command::Turn(Direction::Down)).unwrap();
        let result = engine.tick().unwrap();
        assert!(matches!(result.info.steering, Steering::Manual { .. }));
        assert_eq!(engine.snake().head(), Cell::new(5, 6));
        assert!(engine.autopilot());

        let result = engine.tick().unwrap();
        assert!(matches!(result.info.steering, Steering::Autopilot { .. }));
    }

    #[test]
    fn test_manual_turn_can_disengage_autopilot() {
        let mut config = GameConfig::small();
        config.manual_disables_autopilot = true;
        let mut engine = engine_with(config, &[(5, 5)], Direction::Right, (5, 2));

        engine.submit(Command::Turn(Direction::Down)).unwrap();
        engine.tick().unwrap();
        assert!(!engine.autopilot());

        let result = engine.tick().unwrap();
        assert_eq!(result.info.steering, Steering::Straight);
        assert_eq!(engine.snake().head(), Cell::new(5, 7));
    }

    #[test]
    fn test_toggle_autopilot() {
        let mut engine = engine_with(manual(), &[(5, 5)], Direction::Right, (5, 2));
        assert!(!engine.autopilot());

        engine.submit(Command::ToggleAutopilot(true)).unwrap();
        let result = engine.tick().unwrap();
        assert!(engine.autopilot());
        assert!(result.snapshot.autopilot);
        assert_eq!(result.info.steering, autopilot(Direction::Up));
    }

    #[test]
    fn test_no_path_keeps_heading() {
        // 3x3 board, head in the corner sealed off by its own body
        let config = GameConfig::new(3, 3);
        let mut engine = engine_with(
            config,
            &[(0, 0), (1, 0), (1, 1), (0, 1)],
            Direction::Left,
            (2, 2),
        );

        let result = engine.tick().unwrap();

        assert_eq!(result.info.steering, Steering::Blind);
        assert_eq!(engine.snake().direction(), Direction::Left);
        assert_eq!(engine.snake().head(), Cell::new(-1, 0));
        assert_eq!(result.info.collision_type, Some(CollisionType::Wall));
    }

    #[test]
    fn test_autopilot_reversal_is_rejected() {
        // Food right behind a one-cell snake heading Right
        let mut engine = engine_with(GameConfig::small(), &[(5, 5)], Direction::Right, (4, 5));

        let result = engine.tick().unwrap();
        assert_eq!(
            result.info.steering,
            Steering::Autopilot {
                direction: Direction::Left,
                accepted: false
            }
        );
        assert_eq!(engine.snake().direction(), Direction::Right);
        assert_eq!(engine.snake().head(), Cell::new(6, 5));
    }

    #[test]
    fn test_food_override_applies_before_steering() {
        let mut engine = engine_with(GameConfig::small(), &[(5, 5)], Direction::Right, (5, 0));

        engine.submit(Command::FoodOverride(Cell::new(5, 9))).unwrap();
        assert_eq!(engine.food(), Cell::new(5, 0));

        let result = engine.tick().unwrap();
        assert_eq!(result.info.steering, autopilot(Direction::Down));
        assert_eq!(engine.snake().head(), Cell::new(5, 6));
        assert_eq!(result.snapshot.food, Cell::new(5, 9));
    }

    #[test]
    fn test_food_override_on_next_cell_is_eaten() {
        let mut engine = engine_with(
            manual(),
            &[(5, 5), (4, 5), (3, 5)],
            Direction::Right,
            (0, 0),
        );

        engine.submit(Command::FoodOverride(Cell::new(6, 5))).unwrap();
        let result = engine.tick().unwrap();

        assert!(result.info.ate_food);
        assert_eq!(result.snapshot.score, 1);
        assert_eq!(engine.snake().head(), Cell::new(6, 5));
        // an override wins over relocation for the tick it arrives in
        assert_eq!(engine.food(), Cell::new(6, 5));

        engine.tick().unwrap();
        assert_eq!(engine.snake().len(), 4);
    }

    #[test]
    fn test_food_override_moves_food_before_eat_check() {
        let mut engine = engine_with(manual(), &[(5, 5)], Direction::Right, (6, 5));

        engine.submit(Command::FoodOverride(Cell::new(2, 3))).unwrap();
        let result = engine.tick().unwrap();

        assert!(!result.info.ate_food);
        assert_eq!(result.snapshot.score, 0);
        assert_eq!(engine.food(), Cell::new(2, 3));
    }

    #[test]
    fn test_food_override_may_land_on_snake() {
        let mut engine = engine_with(manual(), &[(5, 5), (4, 5)], Direction::Right, (0, 0));

        engine.submit(Command::FoodOverride(Cell::new(5, 5))).unwrap();
        engine.tick().unwrap();

        assert_eq!(engine.food(), Cell::new(5, 5));
        assert!(engine.snake().contains(Cell::new(5, 5)));
    }

    #[test]
    fn test_food_override_out_of_bounds_rejected() {
        let mut engine = engine_with(manual(), &[(5, 5)], Direction::Right, (0, 0));

        let err = engine
            .submit(Command::FoodOverride(Cell::new(10, 3)))
            .unwrap_err();
        assert_eq!(
            err,
            GameError::FoodOutOfBounds {
                cell: Cell::new(10, 3),
                width: 10,
                height: 10
            }
        );
        engine.tick().unwrap();
        assert_eq!(engine.food(), Cell::new(0, 0));
    }

    #[test]
    fn test_terminated_game_no_update() {
        let mut engine = engine_with(manual(), &[(0, 0)], Direction::Up, (5, 5));
        engine.tick().unwrap();
        assert_eq!(engine.status(), GameStatus::GameOver);
        let frozen = engine.snapshot();

        engine.submit(Command::Turn(Direction::Down)).unwrap();
        engine.submit(Command::FoodOverride(Cell::new(1, 1))).unwrap();
        let result = engine.tick().unwrap();

        assert!(result.terminated);
        assert_eq!(result.snapshot, frozen);
        assert_eq!(engine.tick_count(), 1);
    }

    #[test]
    fn test_reset_starts_a_new_game() {
        let mut engine = engine_with(manual(), &[(0, 0)], Direction::Up, (5, 5));
        engine.tick().unwrap();
        assert!(!engine.is_running());

        engine.reset();
        assert!(engine.is_running());
        assert_eq!(engine.tick_count(), 0);
        assert_eq!(engine.snake().len(), 1);
        assert_eq!(engine.snake().head(), Cell::new(5, 5));
        assert_eq!(engine.snake().score(), 0);
    }

    #[test]
    fn test_same_seed_same_start() {
        let a = SimulationEngine::new(GameConfig::small().with_seed(99)).unwrap();
        let b = SimulationEngine::new(GameConfig::small().with_seed(99)).unwrap();
        assert_eq!(a.snapshot(), b.snapshot());
    }
}
