//! Hazard placement
//!
//! Obstacles sit near the outer border, away from the spawn cell and never on
//! the goal. From level 4 some of them oscillate along one axis.

use glam::Vec2;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::grid::{Cell, Grid};
use crate::consts::OBSTACLE_RADIUS_FACTOR;
use crate::uniform;

/// Cells within this many rows/columns of the edge are eligible
pub const BORDER_BAND: usize = 2;
/// Minimum cell-coordinate distance from spawn
pub const SAFE_DISTANCE: f32 = 3.0;
/// First level where obstacles may move
pub const MOVING_FROM_LEVEL: u32 = 4;

/// Oscillation axis of a moving obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    Vertical,
    Horizontal,
}

/// A hazard attached to a cell; touching it ends the run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Obstacle {
    Static {
        radius: f32,
    },
    Moving {
        direction: Axis,
        /// Peak offset from the cell center, pixels
        amplitude: f32,
        /// Angular speed, radians per millisecond
        speed: f32,
        radius: f32,
    },
}

impl Obstacle {
    pub fn radius(&self) -> f32 {
        match *self {
            Obstacle::Static { radius } | Obstacle::Moving { radius, .. } => radius,
        }
    }

    pub fn is_moving(&self) -> bool {
        matches!(self, Obstacle::Moving { .. })
    }

    /// Position at clock time `t_ms`, given the owning cell's center
    pub fn position(&self, center: Vec2, t_ms: f64) -> Vec2 {
        match *self {
            Obstacle::Static { .. } => center,
            Obstacle::Moving {
                direction,
                amplitude,
                speed,
                ..
            } => {
                let offset = amplitude * (t_ms * speed as f64).sin() as f32;
                match direction {
                    Axis::Vertical => center + Vec2::new(0.0, offset),
                    Axis::Horizontal => center + Vec2::new(offset, 0.0),
                }
            }
        }
    }
}

/// Number of obstacles requested for a level
pub fn obstacle_count(level: u32) -> usize {
    match level {
        0 | 1 => 0,
        2 => 1,
        3 => 3,
        n => n as usize,
    }
}

/// Whether `cell` may hold an obstacle
pub fn is_candidate(cell: &Cell, cols: usize, rows: usize, spawn: &Cell, goal: &Cell) -> bool {
    let near_border = cell.i < BORDER_BAND
        || cell.j < BORDER_BAND
        || cell.i + BORDER_BAND >= cols
        || cell.j + BORDER_BAND >= rows;
    let di = cell.i as f32 - spawn.i as f32;
    let dj = cell.j as f32 - spawn.j as f32;
    let far_from_spawn = (di * di + dj * dj).sqrt() >= SAFE_DISTANCE;
    let not_goal = !(cell.i == goal.i && cell.j == goal.j);
    near_border && far_from_spawn && not_goal
}

/// Roll one obstacle for `level`
fn roll_obstacle<R: Rng + ?Sized>(rng: &mut R, level: u32, cell_w: f32, cell_h: f32) -> Obstacle {
    let radius = cell_w.min(cell_h) * OBSTACLE_RADIUS_FACTOR;
    if level < MOVING_FROM_LEVEL || !rng.random_bool(0.5) {
        return Obstacle::Static { radius };
    }

    let difficulty = 1.0 + 0.1 * level as f32;
    let direction = if rng.random_bool(0.5) {
        Axis::Vertical
    } else {
        Axis::Horizontal
    };
    Obstacle::Moving {
        direction,
        amplitude: uniform(rng, 3.0, cell_w / 8.0 * difficulty),
        speed: uniform(rng, 0.002, 0.01 * difficulty),
        radius,
    }
}

/// Place the level's obstacles. Returns how many were placed.
pub fn place_obstacles<R: Rng + ?Sized>(
    grid: &mut Grid,
    level: u32,
    spawn: usize,
    goal: usize,
    cell_w: f32,
    cell_h: f32,
    rng: &mut R,
) -> usize {
    let (cols, rows) = (grid.cols(), grid.rows());
    let spawn_cell = grid.cell(spawn).clone();
    let goal_cell = grid.cell(goal).clone();

    let mut candidates: Vec<usize> = (0..grid.len())
        .filter(|&idx| is_candidate(grid.cell(idx), cols, rows, &spawn_cell, &goal_cell))
        .collect();
    candidates.shuffle(rng);

    let count = obstacle_count(level).min(candidates.len());
    for &idx in &candidates[..count] {
        let obstacle = roll_obstacle(rng, level, cell_w, cell_h);
        grid.cell_mut(idx).obstacle = Some(obstacle);
    }

    log::debug!(
        "Level {}: {} obstacles from {} candidates",
        level,
        count,
        candidates.len()
    );
    count
}
