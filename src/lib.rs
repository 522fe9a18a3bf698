//! Dash MazeX - a gravity maze arcade game
//!
//! Core modules:
//! - `sim`: Simulation (maze generation, graph analysis, physics, level state machine)
//! - `input`: Gesture and touch adapters producing semantic intents
//! - `stats`: Per-level counters and the level statistics event
//! - `commentary`: Fire-and-forget commentary task for the level-complete panel
//! - `renderer`: CPU-side draw lists and HUD text
//! - `settings`: Configuration

pub mod commentary;
pub mod input;
pub mod palette;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod stats;

pub use settings::{ConfigError, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one tick per 60 Hz display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Downward acceleration, pixels/tick²
    pub const GRAVITY: f32 = 0.5;
    /// Per-tick vertical velocity damping
    pub const DAMPING_Y: f32 = 0.99;
    /// Per-tick horizontal velocity damping
    pub const DAMPING_X: f32 = 0.95;
    /// Horizontal speed while steering, pixels/tick
    pub const MOVE_SPEED: f32 = 5.0;
    /// Vertical velocity set by a jump (negative is up)
    pub const JUMP_IMPULSE: f32 = -8.0;

    /// Ball radius as a fraction of the smaller cell side
    pub const BALL_RADIUS_FACTOR: f32 = 0.15;
    /// Obstacle radius as a fraction of the smaller cell side
    pub const OBSTACLE_RADIUS_FACTOR: f32 = 0.05;

    /// Cell size at level 1
    pub const BASE_CELL_SIZE: f32 = 80.0;
    /// Cell size lost per level
    pub const CELL_SHRINK_PER_LEVEL: f32 = 5.0;
    /// Smallest cell size
    pub const MIN_CELL_SIZE: f32 = 20.0;

    /// Dead-end removal probability
    pub const BRAID_PROBABILITY: f64 = 0.3;

    /// Seconds allowed for level 1
    pub const BASE_ALLOWED_SECS: u32 = 60;
    /// Extra seconds per level
    pub const ALLOWED_SECS_PER_LEVEL: u32 = 3;
}

/// Center of cell `(i, j)` for the given cell dimensions
#[inline]
pub fn cell_center(i: usize, j: usize, cell_w: f32, cell_h: f32) -> Vec2 {
    Vec2::new(
        i as f32 * cell_w + cell_w / 2.0,
        j as f32 * cell_h + cell_h / 2.0,
    )
}

/// Uniform sample in `[lo, hi)`; reversed bounds sample `(hi, lo]`
#[inline]
pub fn uniform<R: rand::Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    lo + (hi - lo) * rng.random::<f32>()
}
