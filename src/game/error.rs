use super::grid::Cell;

/// Misuse of the core by its caller.
///
/// Collisions and unreachable food are ordinary outcomes and never show up
/// here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The snake was advanced twice within one tick
    AlreadyAdvanced { tick: u64 },
    /// A food override pointed outside the board
    FoodOutOfBounds { cell: Cell, width: i32, height: i32 },
    /// The board has a zero or unrepresentable dimension
    InvalidGrid { width: usize, height: usize },
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameError::AlreadyAdvanced { tick } => {
                write!(f, "snake already advanced during tick {}", tick)
            }
            GameError::FoodOutOfBounds {
                cell,
                width,
                height,
            } => write!(
                f,
                "food override {} is outside the {}x{} grid",
                cell, width, height
            ),
            GameError::InvalidGrid { width, height } => {
                write!(f, "invalid grid size {}x{}", width, height)
            }
        }
    }
}

impl std::error::Error for GameError {}
