use std::collections::{HashSet, VecDeque};

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::action::Direction;
use super::error::GameError;
use super::grid::{Cell, Grid};

/// Rejection-sampling attempts before food placement falls back to
/// enumerating the free cells.
const FOOD_PLACEMENT_ATTEMPTS: usize = 100;

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionType {
    /// Snake left the board
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// The snake in the game
///
/// The body is kept twice: in movement order for drawing and in a set for
/// constant-time membership checks. Both are updated together in `advance`.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    body: VecDeque<Cell>,
    body_set: HashSet<Cell>,
    /// Set when the head landed on a cell the body already held
    overlapping: bool,
    /// Current direction of movement
    direction: Direction,
    pending_growth: bool,
    score: u32,
    last_advanced_tick: Option<u64>,
}

impl Snake {
    /// A one-segment snake
    pub fn new(head: Cell, direction: Direction) -> Self {
        Self {
            body: VecDeque::from([head]),
            body_set: HashSet::from([head]),
            overlapping: false,
            direction,
            pending_growth: false,
            score: 0,
            last_advanced_tick: None,
        }
    }

    /// Build a snake from explicit segments, head first
    #[cfg(test)]
    pub(crate) fn from_body(
        segments: impl IntoIterator<Item = Cell>,
        direction: Direction,
    ) -> Self {
        let mut body = VecDeque::new();
        let mut body_set = HashSet::new();
        let mut overlapping = false;
        for cell in segments {
            overlapping |= !body_set.insert(cell);
            body.push_back(cell);
        }
        assert!(!body.is_empty(), "snake needs at least one segment");

        Self {
            body,
            body_set,
            overlapping,
            ..Self::new(Cell::new(0, 0), direction)
        }
    }

    /// Get the head position
    pub fn head(&self) -> Cell {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Cell {
        self.body[self.body.len() - 1]
    }

    /// Segments in movement order, head first
    pub fn body(&self) -> impl ExactSizeIterator<Item = &Cell> + '_ {
        self.body.iter()
    }

    /// Occupied cells, for membership checks
    pub fn occupied(&self) -> &HashSet<Cell> {
        &self.body_set
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.body_set.contains(&cell)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn pending_growth(&self) -> bool {
        self.pending_growth
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false; a snake has at least a head
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Change direction unless it would reverse the snake onto its neck.
    ///
    /// Returns whether the turn was taken. A rejected turn is not an error.
    pub fn queue_turn(&mut self, direction: Direction) -> bool {
        if self.direction.is_opposite(direction) {
            return false;
        }
        self.direction = direction;
        true
    }

    /// Grow by one segment on the next advance and score the food
    pub fn queue_growth(&mut self) {
        self.pending_growth = true;
        self.score += 1;
    }

    /// Move one cell in the current direction during tick `tick`.
    ///
    /// The tail leaves before the head arrives, so following the tail into
    /// the cell it vacates is a legal move.
    pub fn advance(&mut self, tick: u64) -> Result<(), GameError> {
        if self.last_advanced_tick == Some(tick) {
            return Err(GameError::AlreadyAdvanced { tick });
        }
        self.last_advanced_tick = Some(tick);

        let new_head = self.head().moved_in_direction(self.direction);

        if self.pending_growth {
            self.pending_growth = false;
        } else if let Some(tail) = self.body.pop_back() {
            self.body_set.remove(&tail);
        }

        self.overlapping |= !self.body_set.insert(new_head);
        self.body.push_front(new_head);
        Ok(())
    }

    /// Inspect the post-move body for a wall or self collision
    pub fn detect_collision(&self, grid: &Grid) -> Option<CollisionType> {
        if !grid.contains(self.head()) {
            return Some(CollisionType::Wall);
        }
        if self.overlapping {
            return Some(CollisionType::SelfCollision);
        }
        None
    }
}

/// The single piece of food on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Food {
    position: Cell,
}

impl Food {
    pub fn new(position: Cell) -> Self {
        Self { position }
    }

    pub fn position(&self) -> Cell {
        self.position
    }

    /// Move the food to a uniformly random cell, avoiding `forbidden` if given.
    ///
    /// When every cell is forbidden the unrestricted draw is kept.
    pub fn relocate<R: Rng>(
        &mut self,
        rng: &mut R,
        grid: &Grid,
        forbidden: Option<&HashSet<Cell>>,
    ) {
        let Some(forbidden) = forbidden else {
            self.position = random_cell(rng, grid);
            return;
        };

        for _ in 0..FOOD_PLACEMENT_ATTEMPTS {
            let candidate = random_cell(rng, grid);
            if !forbidden.contains(&candidate) {
                self.position = candidate;
                return;
            }
        }

        // Crowded board: pick among what is left
        let free: Vec<Cell> = grid.cells().filter(|c| !forbidden.contains(c)).collect();
        self.position = if free.is_empty() {
            random_cell(rng, grid)
        } else {
            free[rng.gen_range(0..free.len())]
        };
    }

    /// Unconditional placement; callers validate bounds
    pub fn override_position(&mut self, cell: Cell) {
        self.position = cell;
    }
}

fn random_cell<R: Rng>(rng: &mut R, grid: &Grid) -> Cell {
    Cell::new(
        rng.gen_range(0..grid.width()),
        rng.gen_range(0..grid.height()),
    )
}
