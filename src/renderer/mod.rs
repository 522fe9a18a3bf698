//! CPU-side rendering
//!
//! Builds a flat triangle list in canvas pixels for the current frame. Any
//! backend that can draw colored triangles can present it.

pub mod hud;
pub mod shapes;
pub mod vertex;

use glam::Vec2;

use crate::sim::obstacles::Obstacle;
use crate::sim::state::{GamePhase, GameSession};
pub use hud::{HudLines, format_time};
pub use vertex::{Vertex, colors};

/// Wall stroke width in pixels
pub const WALL_WIDTH: f32 = 5.0;
/// Outer canvas frame width in pixels
pub const FRAME_WIDTH: f32 = 4.0;
const CIRCLE_SEGMENTS: u32 = 24;

/// Everything needed to present one frame
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub clear_color: [f32; 4],
    pub vertices: Vec<Vertex>,
    /// Present only while a level is on screen
    pub hud: Option<HudLines>,
}

/// Build the frame for the session's current level.
///
/// Menu and info screens have no level and produce an empty frame.
pub fn build_frame(session: &GameSession) -> Frame {
    let Some(level) = session.level.as_ref() else {
        return Frame::default();
    };
    if matches!(session.phase, GamePhase::Menu | GamePhase::Info) {
        return Frame::default();
    }

    let border = level.palette.border.to_rgba(1.0);
    let mut vertices = Vec::new();

    for wall in &level.walls {
        vertices.extend(shapes::thick_line(wall.a, wall.b, WALL_WIDTH, border));
    }

    let canvas = Vec2::new(
        session.settings.canvas_width,
        session.settings.canvas_height,
    );
    vertices.extend(shapes::frame(Vec2::ZERO, canvas, FRAME_WIDTH, colors::FRAME));

    let (goal_min, goal_max) = level.goal_rect();
    vertices.extend(shapes::rect(goal_min, goal_max - goal_min, colors::GOAL));

    for (center, obstacle) in level.obstacles() {
        let color = match obstacle {
            Obstacle::Static { .. } => colors::OBSTACLE_STATIC,
            Obstacle::Moving { .. } => colors::OBSTACLE_MOVING,
        };
        vertices.extend(shapes::circle(
            obstacle.position(center, session.clock_ms),
            obstacle.radius(),
            color,
            CIRCLE_SEGMENTS,
        ));
    }

    vertices.extend(shapes::circle(
        session.player.pos,
        session.player.radius,
        colors::BALL,
        CIRCLE_SEGMENTS,
    ));

    Frame {
        clear_color: level.palette.background.to_rgba(1.0),
        vertices,
        hud: Some(HudLines::for_level(level)),
    }
}
