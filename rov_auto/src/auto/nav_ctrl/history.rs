//! Path history and the backtrack path built from it

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::collections::{HashSet, VecDeque};

use nalgebra::Vector2;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Integer grid cell visited by the rover, `(x, y)`.
pub type GridCell = (i64, i64);

/// Ordered record of the distinct grid cells the rover has visited.
///
/// Cells are only ever appended, and a cell already in the history is never added twice.
#[derive(Debug, Clone, Default)]
pub struct PathHistory {
    cells: Vec<GridCell>,
    visited: HashSet<GridCell>,
}

/// Queue of waypoints leading back along the path history.
#[derive(Debug, Clone, Default)]
pub struct BacktrackPath {
    waypoints: VecDeque<GridCell>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PathHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the cell containing the given position.
    ///
    /// Positions are truncated towards zero. Returns true if the cell was new.
    pub fn record(&mut self, position_m: &Vector2<f64>) -> bool {
        let cell = (position_m.x as i64, position_m.y as i64);

        if self.visited.insert(cell) {
            self.cells.push(cell);
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells in the order they were visited.
    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    /// Build the path back along the history, most recently visited cell first.
    pub fn backtrack(&self) -> BacktrackPath {
        BacktrackPath {
            waypoints: self.cells.iter().rev().copied().collect(),
        }
    }
}

impl BacktrackPath {
    /// The next waypoint to head for, as a world position.
    pub fn next(&self) -> Option<Vector2<f64>> {
        self.waypoints
            .front()
            .map(|&(x, y)| Vector2::new(x as f64, y as f64))
    }

    /// Drop the next waypoint once it's been reached.
    pub fn pop(&mut self) -> Option<GridCell> {
        self.waypoints.pop_front()
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
