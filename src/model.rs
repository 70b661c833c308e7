//! Core data types for the grid editor: cell addresses, screen points and
//! the sparse set of alive cells.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A cell's address in grid space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: i64,
    pub y: i64,
}

impl GridCoord {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// The eight Chebyshev-distance-1 neighbours. Neighbours that would
    /// overflow the coordinate range are skipped.
    pub fn neighbors(self) -> impl Iterator<Item = GridCoord> {
        const OFFSETS: [(i64, i64); 8] = [
            (-1, -1),
            (0, -1),
            (1, -1),
            (-1, 0),
            (1, 0),
            (-1, 1),
            (0, 1),
            (1, 1),
        ];
        OFFSETS.into_iter().filter_map(move |(dx, dy)| {
            Some(GridCoord {
                x: self.x.checked_add(dx)?,
                y: self.y.checked_add(dy)?,
            })
        })
    }
}

/// Pixel position relative to the drawing surface's top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: ScreenPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Set of alive cells. No "dead" entries are stored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CellStore {
    cells: HashSet<GridCoord>,
}

impl CellStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `coord`; returns whether it is alive afterwards.
    pub fn toggle(&mut self, coord: GridCoord) -> bool {
        if self.cells.remove(&coord) {
            false
        } else {
            self.cells.insert(coord);
            true
        }
    }

    pub fn contains(&self, coord: GridCoord) -> bool {
        self.cells.contains(&coord)
    }

    /// Enumerate alive cells. Order is unspecified; call again to restart.
    pub fn all(&self) -> impl Iterator<Item = GridCoord> + '_ {
        self.cells.iter().copied()
    }

    /// Swap in a whole new generation in one assignment.
    pub fn replace_all(&mut self, next: HashSet<GridCoord>) {
        self.cells = next;
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl FromIterator<GridCoord> for CellStore {
    fn from_iter<I: IntoIterator<Item = GridCoord>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}
