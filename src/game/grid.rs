use serde::{Deserialize, Serialize};

use super::action::Direction;
use super::error::GameError;

/// A position on the game grid
///
/// Coordinates are signed so a head that just left the board is still
/// representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Rectangular, bounded board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Result<Self, GameError> {
        let invalid = GameError::InvalidGrid { width, height };
        if width == 0 || height == 0 {
            return Err(invalid);
        }
        let w = i32::try_from(width).map_err(|_| invalid.clone())?;
        let h = i32::try_from(height).map_err(|_| invalid)?;
        Ok(Self {
            width: w,
            height: h,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Number of cells on the board
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Check if a position is within the grid bounds
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.x < self.width && cell.y >= 0 && cell.y < self.height
    }

    /// Where a fresh snake starts
    pub fn center(&self) -> Cell {
        Cell::new(self.width / 2, self.height / 2)
    }

    /// Nearest cell on the board to an arbitrary coordinate
    pub fn clamp(&self, x: i32, y: i32) -> Cell {
        Cell::new(x.clamp(0, self.width - 1), y.clamp(0, self.height - 1))
    }

    /// Row-major iteration over every cell
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let (width, height) = (self.width, self.height);
        (0..height).flat_map(move |y| (0..width).map(move |x| Cell::new(x, y)))
    }
}
