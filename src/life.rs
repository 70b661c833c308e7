//! One generation of Conway's Game of Life over the sparse cell store.
//!
//! The step runs in two separate passes against the current generation:
//! first the candidate set (alive cells plus every neighbour), then an
//! independent neighbour count for each candidate. Nothing reads the
//! generation being built, so the result does not depend on iteration
//! order.

use std::collections::HashSet;

use crate::model::{CellStore, GridCoord};

/// Compute the next generation without touching `cells`.
pub fn next_generation(cells: &CellStore) -> HashSet<GridCoord> {
    let candidates: HashSet<GridCoord> = cells
        .all()
        .flat_map(|c| std::iter::once(c).chain(c.neighbors()))
        .collect();

    candidates
        .into_iter()
        .filter(|&c| {
            let alive = cells.contains(c);
            let neighbors = c.neighbors().filter(|&n| cells.contains(n)).count();
            matches!((alive, neighbors), (true, 2) | (true, 3) | (false, 3))
        })
        .collect()
}

/// Advance `cells` by one generation in place.
pub fn step(cells: &mut CellStore) {
    let next = next_generation(cells);
    cells.replace_all(next);
}

/// Random soup over the inclusive rectangle `first..=last`. `random` yields
/// values in `[0, 1)`; a cell is born when the draw falls below `density`.
pub fn random_soup(
    first: GridCoord,
    last: GridCoord,
    density: f64,
    mut random: impl FnMut() -> f64,
) -> HashSet<GridCoord> {
    let mut soup = HashSet::new();
    for y in first.y..=last.y {
        for x in first.x..=last.x {
            if random() < density {
                soup.insert(GridCoord::new(x, y));
            }
        }
    }
    soup
}
