//! Wall segments and circle-vs-segment overlap
//!
//! The physics step only ever tests the ball against the compiled segment
//! list, which is rebuilt whenever the grid is regenerated.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::grid::{Grid, Side};

/// A standing wall as a line segment in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallSegment {
    pub a: Vec2,
    pub b: Vec2,
}

impl WallSegment {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            a: Vec2::new(x1, y1),
            b: Vec2::new(x2, y2),
        }
    }

    /// Closest point on the segment to `p`
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        let line_vec = self.b - self.a;
        let len_sq = line_vec.length_squared();
        if len_sq == 0.0 {
            return self.a;
        }
        let t = ((p - self.a).dot(line_vec) / len_sq).clamp(0.0, 1.0);
        self.a + line_vec * t
    }
}

/// Compile every standing wall into segments, each wall exactly once.
///
/// A cell owns its top and left walls; the last column also owns its right
/// wall and the last row its bottom wall. Every interior wall is therefore
/// the top or left wall of exactly one cell.
pub fn build_wall_segments(grid: &Grid, cell_w: f32, cell_h: f32) -> Vec<WallSegment> {
    let mut segments = Vec::new();
    let last_col = grid.cols().saturating_sub(1);
    let last_row = grid.rows().saturating_sub(1);

    for cell in grid.cells() {
        let x = cell.i as f32 * cell_w;
        let y = cell.j as f32 * cell_h;

        if cell.has_wall(Side::Top) {
            segments.push(WallSegment::new(x, y, x + cell_w, y));
        }
        if cell.has_wall(Side::Left) {
            segments.push(WallSegment::new(x, y, x, y + cell_h));
        }
        if cell.i == last_col && cell.has_wall(Side::Right) {
            segments.push(WallSegment::new(x + cell_w, y, x + cell_w, y + cell_h));
        }
        if cell.j == last_row && cell.has_wall(Side::Bottom) {
            segments.push(WallSegment::new(x, y + cell_h, x + cell_w, y + cell_h));
        }
    }

    segments
}

/// True iff a circle at `center` strictly overlaps `segment`.
///
/// Tangency (distance exactly equal to `radius`) is not a hit. A zero-length
/// segment degrades to a point-distance test.
#[inline]
pub fn circle_segment_intersect(center: Vec2, radius: f32, segment: &WallSegment) -> bool {
    center.distance(segment.closest_point(center)) < radius
}

/// True if the circle strictly overlaps any segment
pub fn circle_hits_any(center: Vec2, radius: f32, segments: &[WallSegment]) -> bool {
    segments
        .iter()
        .any(|seg| circle_segment_intersect(center, radius, seg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::maze;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::collections::HashSet;

    #[test]
    fn test_tangent_circle_does_not_intersect() {
        let seg = WallSegment::new(0.0, 0.0, 10.0, 0.0);
        assert!(!circle_segment_intersect(Vec2::new(5.0, 2.0), 2.0, &seg));
        assert!(circle_segment_intersect(Vec2::new(5.0, 1.999), 2.0, &seg));
    }

    #[test]
    fn test_projection_clamped_to_endpoints() {
        let seg = WallSegment::new(0.0, 0.0, 10.0, 0.0);
        // Beyond the end: distance is to (10, 0)
        assert!(!circle_segment_intersect(Vec2::new(13.0, 0.0), 3.0, &seg));
        assert!(circle_segment_intersect(Vec2::new(12.9, 0.0), 3.0, &seg));
        // On the infinite line's extension but far from the segment
        assert!(!circle_segment_intersect(Vec2::new(-5.0, 0.5), 1.0, &seg));
    }

    #[test]
    fn test_degenerate_segment_point_distance() {
        let seg = WallSegment::new(4.0, 4.0, 4.0, 4.0);
        assert!(circle_segment_intersect(Vec2::new(5.0, 4.0), 1.5, &seg));
        assert!(!circle_segment_intersect(Vec2::new(5.5, 4.0), 1.5, &seg));
    }

    #[test]
    fn test_closed_grid_segments() {
        // 2x2 with all walls: 2 tops + 2 lefts per row, plus 2 right, plus 2 bottom
        let grid = Grid::new(2, 2);
        let segs = build_wall_segments(&grid, 10.0, 10.0);
        assert_eq!(segs.len(), 12);
    }

    #[test]
    fn test_circle_hits_any() {
        let segs = vec![
            WallSegment::new(0.0, 0.0, 10.0, 0.0),
            WallSegment::new(0.0, 10.0, 10.0, 10.0),
        ];
        assert!(!circle_hits_any(Vec2::new(5.0, 5.0), 4.0, &segs));
        assert!(circle_hits_any(Vec2::new(5.0, 7.0), 4.0, &segs));
    }

    /// Standing walls as unordered pairs of cell-corner coordinates
    fn standing_walls(grid: &Grid) -> HashSet<((usize, usize), (usize, usize))> {
        let mut set = HashSet::new();
        for c in grid.cells() {
            let (i, j) = (c.i, c.j);
            if c.has_wall(Side::Top) { set.insert(((i, j), (i + 1, j))); }
            if c.has_wall(Side::Right) { set.insert(((i + 1, j), (i + 1, j + 1))); }
            if c.has_wall(Side::Bottom) { set.insert(((i, j + 1), (i + 1, j + 1))); }
            if c.has_wall(Side::Left) { set.insert(((i, j), (i, j + 1))); }
        }
        set
    }

    proptest! {
        #[test]
        fn prop_segments_cover_each_wall_once(
            cols in 1usize..12,
            rows in 1usize..12,
            seed in any::<u64>(),
        ) {
            let mut grid = Grid::new(cols, rows);
            let mut rng = Pcg32::seed_from_u64(seed);
            maze::generate(&mut grid, 0.3, &mut rng);

            // Unit cells make segment endpoints exact corner coordinates
            let segs = build_wall_segments(&grid, 1.0, 1.0);
            let mut emitted = HashSet::new();
            for s in &segs {
                let p = (s.a.x as usize, s.a.y as usize);
                let q = (s.b.x as usize, s.b.y as usize);
                let key = if p <= q { (p, q) } else { (q, p) };
                prop_assert!(emitted.insert(key), "duplicate segment {:?}", key);
            }
            prop_assert_eq!(emitted, standing_walls(&grid));
        }
    }
}
