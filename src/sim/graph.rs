//! Breadth-first analysis of the passage graph
//!
//! Two cells are adjacent iff the wall between them is open.

use std::collections::VecDeque;

use super::grid::Grid;

/// BFS distance from `start` to every cell (`None` = unreachable)
pub fn distances_from(grid: &Grid, start: usize) -> Vec<Option<u32>> {
    let mut dist = vec![None; grid.len()];
    if start >= grid.len() {
        return dist;
    }

    let mut queue = VecDeque::new();
    dist[start] = Some(0);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        let d = dist[current].unwrap_or(0);
        for n in grid.open_neighbors(current) {
            if dist[n].is_none() {
                dist[n] = Some(d + 1);
                queue.push_back(n);
            }
        }
    }

    dist
}

/// Cell with the greatest BFS distance from `start`.
///
/// Ties go to the first such cell in row-major order; if nothing else is
/// reachable the start cell itself is returned.
pub fn farthest_cell(grid: &Grid, start: usize) -> usize {
    let dist = distances_from(grid, start);
    let mut farthest = start;
    let mut max_dist = 0;
    for (idx, d) in dist.iter().enumerate() {
        let d = d.unwrap_or(0);
        if d > max_dist {
            max_dist = d;
            farthest = idx;
        }
    }
    farthest
}

/// Shortest path from `start` to `goal`, both inclusive.
///
/// Returns `None` if `goal` cannot be reached. Used for reference and
/// analytics only; gameplay never consults it.
pub fn solve_path(grid: &Grid, start: usize, goal: usize) -> Option<Vec<usize>> {
    if start >= grid.len() || goal >= grid.len() {
        return None;
    }

    let mut came_from: Vec<Option<usize>> = vec![None; grid.len()];
    let mut seen = vec![false; grid.len()];
    let mut queue = VecDeque::new();
    seen[start] = true;
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        if current == goal {
            break;
        }
        for n in grid.open_neighbors(current) {
            if !seen[n] {
                seen[n] = true;
                came_from[n] = Some(current);
                queue.push_back(n);
            }
        }
    }

    if !seen[goal] {
        return None;
    }

    let mut path = vec![goal];
    let mut current = goal;
    while let Some(prev) = came_from[current] {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    Some(path)
}
