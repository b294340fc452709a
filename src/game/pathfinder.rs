//! Breadth-first search over the free cells of the board
//!
//! Every discovered cell remembers the first step taken out of `start` on the
//! way to it, so the answer is available the moment the target is dequeued
//! without storing whole paths in the queue. Neighbors are expanded in
//! [`Direction::ALL`] order, which makes tie-breaking between equally short
//! paths deterministic.

use std::collections::{HashMap, HashSet, VecDeque};

use super::action::Direction;
use super::grid::{Cell, Grid};

/// First move along a shortest path from `start` to `target`.
///
/// Cells outside `grid` or in `obstacles` are not traversable; `start` itself
/// is exempt. Returns `None` when the target is unreachable or already
/// reached.
pub fn find_first_step(
    grid: &Grid,
    obstacles: &HashSet<Cell>,
    start: Cell,
    target: Cell,
) -> Option<Direction> {
    search(grid, obstacles, start, target).and_then(|(first_step, _)| first_step)
}

/// Number of moves on a shortest path, `Some(0)` when `start == target`.
pub fn shortest_path_len(
    grid: &Grid,
    obstacles: &HashSet<Cell>,
    start: Cell,
    target: Cell,
) -> Option<usize> {
    search(grid, obstacles, start, target).map(|(_, distance)| distance)
}

fn search(
    grid: &Grid,
    obstacles: &HashSet<Cell>,
    start: Cell,
    target: Cell,
) -> Option<(Option<Direction>, usize)> {
    // cell -> (first step out of start, distance from start)
    let mut visited: HashMap<Cell, (Option<Direction>, usize)> = HashMap::new();
    let mut queue = VecDeque::new();

    visited.insert(start, (None, 0));
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        let (first_step, distance) = visited[&current];
        if current == target {
            return Some((first_step, distance));
        }

        for direction in Direction::ALL {
            let neighbor = current.moved_in_direction(direction);
            if !grid.contains(neighbor)
                || obstacles.contains(&neighbor)
                || visited.contains_key(&neighbor)
            {
                continue;
            }
            visited.insert(neighbor, (first_step.or(Some(direction)), distance + 1));
            queue.push_back(neighbor);
        }
    }

    None
}
