//! Shape generation for 2D primitives

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Axis-aligned filled rectangle from its top-left corner and size
pub fn rect(min: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let max = min + size;
    vec![
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

/// Line from `a` to `b` as a quad `width` pixels thick
pub fn thick_line(a: Vec2, b: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (b - a).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);
    // Extend past the endpoints so joints at cell corners close up
    let a = a - dir * (width / 2.0);
    let b = b + dir * (width / 2.0);

    let (a1, a2, b1, b2) = (a + perp, a - perp, b + perp, b - perp);
    vec![
        Vertex::new(a1.x, a1.y, color),
        Vertex::new(a2.x, a2.y, color),
        Vertex::new(b1.x, b1.y, color),
        Vertex::new(b1.x, b1.y, color),
        Vertex::new(a2.x, a2.y, color),
        Vertex::new(b2.x, b2.y, color),
    ]
}

/// Rectangle outline drawn inside its bounds
pub fn frame(min: Vec2, size: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let max = min + size;
    let mut vertices = Vec::with_capacity(24);
    vertices.extend(rect(min, Vec2::new(size.x, width), color));
    vertices.extend(rect(Vec2::new(min.x, max.y - width), Vec2::new(size.x, width), color));
    vertices.extend(rect(min, Vec2::new(width, size.y), color));
    vertices.extend(rect(Vec2::new(max.x - width, min.y), Vec2::new(width, size.y), color));
    vertices
}
