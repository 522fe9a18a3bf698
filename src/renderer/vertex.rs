//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position (canvas pixels) and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const FRAME: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const GOAL: [f32; 4] = [0.0, 1.0, 0.0, 150.0 / 255.0];
    pub const BALL: [f32; 4] = [0.0, 0.0, 1.0, 1.0];
    pub const OBSTACLE_STATIC: [f32; 4] = [150.0 / 255.0, 0.0, 0.0, 1.0];
    pub const OBSTACLE_MOVING: [f32; 4] = [1.0, 165.0 / 255.0, 0.0, 1.0];
}
