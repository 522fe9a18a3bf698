//! Maze carving and braiding
//!
//! Carving is an iterative recursive backtracker from cell (0, 0): it yields a
//! spanning tree, so every pair of cells is joined by exactly one path.
//! Braiding then knocks through some dead ends to add loops.

use rand::Rng;

use super::grid::{Grid, Side};

/// Carve a perfect maze into `grid` (walls should all be standing).
pub fn carve<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) {
    if grid.is_empty() {
        return;
    }

    let mut stack: Vec<usize> = Vec::with_capacity(grid.len());
    let mut current = 0;
    grid.cell_mut(current).visited = true;

    let mut candidates: Vec<(Side, usize)> = Vec::with_capacity(4);
    loop {
        candidates.clear();
        for side in Side::ALL {
            if let Some(n) = grid.neighbor(current, side) {
                if !grid.cell(n).visited {
                    candidates.push((side, n));
                }
            }
        }

        if !candidates.is_empty() {
            let (side, next) = candidates[rng.random_range(0..candidates.len())];
            grid.cell_mut(next).visited = true;
            grid.remove_wall(current, side);
            stack.push(current);
            current = next;
        } else if let Some(prev) = stack.pop() {
            current = prev;
        } else {
            break;
        }
    }
}

/// Remove dead ends with the given probability.
///
/// Each cell is judged on its wall state at the moment it is visited, so a
/// cell opened by an earlier neighbor may no longer count as a dead end.
/// Returns the number of walls removed.
pub fn braid<R: Rng + ?Sized>(grid: &mut Grid, probability: f64, rng: &mut R) -> usize {
    let probability = if probability.is_finite() {
        probability.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let mut removed = 0;
    let mut candidates: Vec<Side> = Vec::with_capacity(4);

    for idx in 0..grid.len() {
        if grid.cell(idx).open_sides() != 1 || !rng.random_bool(probability) {
            continue;
        }

        candidates.clear();
        candidates.extend(
            Side::ALL
                .into_iter()
                .filter(|&side| grid.cell(idx).has_wall(side) && grid.neighbor(idx, side).is_some()),
        );

        if !candidates.is_empty() {
            let side = candidates[rng.random_range(0..candidates.len())];
            if grid.remove_wall(idx, side) {
                removed += 1;
            }
        }
    }

    removed
}

/// Carve then braid.
pub fn generate<R: Rng + ?Sized>(grid: &mut Grid, braid_probability: f64, rng: &mut R) {
    carve(grid, rng);
    let removed = braid(grid, braid_probability, rng);
    log::debug!(
        "Maze {}x{}: {} passages ({} from braiding)",
        grid.cols(),
        grid.rows(),
        grid.passage_count(),
        removed
    );
}
