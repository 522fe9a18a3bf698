//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Row-major iteration order for cells
//! - No rendering or platform dependencies

pub mod collision;
pub mod graph;
pub mod grid;
pub mod maze;
pub mod obstacles;
pub mod state;
pub mod tick;

pub use collision::{WallSegment, build_wall_segments, circle_hits_any, circle_segment_intersect};
pub use graph::{distances_from, farthest_cell, solve_path};
pub use grid::{Cell, Grid, Side};
pub use obstacles::{Axis, Obstacle, place_obstacles};
pub use state::{
    GameEvent, GameOverCause, GamePhase, GameSession, Layout, Level, Player, allowed_time,
    base_cell_size,
};
pub use tick::{Command, Intent, TickInput, apply_command, apply_intent, move_player, tick};
