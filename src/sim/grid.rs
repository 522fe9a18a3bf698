//! Maze grid: cells, wall state and neighbor addressing
//!
//! Cells are stored row-major. Every neighbor lookup goes through
//! [`Grid::index`], which returns `None` for coordinates off the grid.

use serde::{Deserialize, Serialize};

use super::obstacles::Obstacle;

/// One side of a cell. The discriminant indexes [`Cell::walls`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Top = 0,
    Right = 1,
    Bottom = 2,
    Left = 3,
}

impl Side {
    /// Scan order used by generation and search: up, right, down, left
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn opposite(self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Right => Side::Left,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
        }
    }

    /// Column/row step toward the neighbor on this side
    pub fn offset(self) -> (isize, isize) {
        match self {
            Side::Top => (0, -1),
            Side::Right => (1, 0),
            Side::Bottom => (0, 1),
            Side::Left => (-1, 0),
        }
    }
}

/// A single maze tile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Column
    pub i: usize,
    /// Row
    pub j: usize,
    /// Wall flags indexed by [`Side`]; `true` blocks passage
    pub walls: [bool; 4],
    /// Carving marker, only meaningful during generation
    pub visited: bool,
    /// Hazard placed in this cell, if any
    pub obstacle: Option<Obstacle>,
}

impl Cell {
    pub fn new(i: usize, j: usize) -> Self {
        Self {
            i,
            j,
            walls: [true; 4],
            visited: false,
            obstacle: None,
        }
    }

    #[inline]
    pub fn has_wall(&self, side: Side) -> bool {
        self.walls[side.index()]
    }

    /// Number of open sides (a dead end has exactly one)
    pub fn open_sides(&self) -> usize {
        self.walls.iter().filter(|&&w| !w).count()
    }
}

/// Rectangular array of cells
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a grid with every wall standing and nothing visited
    pub fn new(cols: usize, rows: usize) -> Self {
        let mut cells = Vec::with_capacity(cols * rows);
        for j in 0..rows {
            for i in 0..cols {
                cells.push(Cell::new(i, j));
            }
        }
        Self { cols, rows, cells }
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Linear index of `(i, j)`, or `None` when off the grid
    #[inline]
    pub fn index(&self, i: isize, j: isize) -> Option<usize> {
        if i < 0 || j < 0 || i as usize >= self.cols || j as usize >= self.rows {
            return None;
        }
        Some(i as usize + j as usize * self.cols)
    }

    pub fn cell(&self, idx: usize) -> &Cell {
        &self.cells[idx]
    }

    pub fn cell_mut(&mut self, idx: usize) -> &mut Cell {
        &mut self.cells[idx]
    }

    pub fn cell_at(&self, i: usize, j: usize) -> Option<&Cell> {
        self.index(i as isize, j as isize).map(|idx| &self.cells[idx])
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Index of the neighbor across `side`, if it is on the grid
    pub fn neighbor(&self, idx: usize, side: Side) -> Option<usize> {
        let cell = &self.cells[idx];
        let (di, dj) = side.offset();
        self.index(cell.i as isize + di, cell.j as isize + dj)
    }

    /// Open the wall on `side` of `idx` and the matching wall of its neighbor.
    ///
    /// Returns false (and changes nothing) when there is no neighbor on that side.
    pub fn remove_wall(&mut self, idx: usize, side: Side) -> bool {
        let Some(other) = self.neighbor(idx, side) else {
            return false;
        };
        self.cells[idx].walls[side.index()] = false;
        self.cells[other].walls[side.opposite().index()] = false;
        true
    }

    /// Neighbors reachable through an open wall, in [`Side::ALL`] order
    pub fn open_neighbors(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        Side::ALL.into_iter().filter_map(move |side| {
            if self.cells[idx].has_wall(side) {
                None
            } else {
                self.neighbor(idx, side)
            }
        })
    }

    /// Count of open passages between adjacent cells (each counted once)
    pub fn passage_count(&self) -> usize {
        self.cells
            .iter()
            .map(|c| {
                let right = c.i + 1 < self.cols && !c.has_wall(Side::Right);
                let down = c.j + 1 < self.rows && !c.has_wall(Side::Bottom);
                right as usize + down as usize
            })
            .sum()
    }

    /// True if every shared wall agrees on both sides
    pub fn walls_symmetric(&self) -> bool {
        (0..self.cells.len()).all(|idx| {
            [Side::Right, Side::Bottom].into_iter().all(|side| {
                match self.neighbor(idx, side) {
                    Some(other) => {
                        self.cells[idx].has_wall(side)
                            == self.cells[other].has_wall(side.opposite())
                    }
                    None => true,
                }
            })
        })
    }

    /// Reset carving markers and clear obstacles
    pub fn clear_marks(&mut self) {
        for cell in &mut self.cells {
            cell.visited = false;
            cell.obstacle = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_grid_all_walls_standing() {
        let grid = Grid::new(4, 3);
        assert_eq!(grid.len(), 12);
        assert!(grid.cells().iter().all(|c| c.walls == [true; 4] && !c.visited));
        assert_eq!(grid.passage_count(), 0);
    }

    #[test]
    fn test_index_row_major_and_sentinel() {
        let grid = Grid::new(4, 3);
        assert_eq!(grid.index(0, 0), Some(0));
        assert_eq!(grid.index(3, 0), Some(3));
        assert_eq!(grid.index(0, 1), Some(4));
        assert_eq!(grid.index(3, 2), Some(11));
        assert_eq!(grid.index(-1, 0), None);
        assert_eq!(grid.index(4, 0), None);
        assert_eq!(grid.index(0, 3), None);
    }

    #[test]
    fn test_remove_wall_is_symmetric() {
        let mut grid = Grid::new(3, 3);
        let center = grid.index(1, 1).unwrap();
        assert!(grid.remove_wall(center, Side::Right));
        let right = grid.index(2, 1).unwrap();
        assert!(!grid.cell(center).has_wall(Side::Right));
        assert!(!grid.cell(right).has_wall(Side::Left));
        assert!(grid.walls_symmetric());
        assert_eq!(grid.passage_count(), 1);
    }

    #[test]
    fn test_remove_border_wall_refused() {
        let mut grid = Grid::new(2, 2);
        assert!(!grid.remove_wall(0, Side::Top));
        assert!(!grid.remove_wall(0, Side::Left));
        assert!(grid.cell(0).has_wall(Side::Top));
    }

    #[test]
    fn test_open_neighbors_follow_walls() {
        let mut grid = Grid::new(3, 1);
        grid.remove_wall(1, Side::Left);
        let open: Vec<_> = grid.open_neighbors(1).collect();
        assert_eq!(open, vec![0]);
        assert_eq!(grid.cell(1).open_sides(), 1);
    }

    proptest! {
        #[test]
        fn prop_index_matches_bounds(i in -5isize..15, j in -5isize..15) {
            let grid = Grid::new(10, 7);
            let inside = (0..10).contains(&i) && (0..7).contains(&j);
            prop_assert_eq!(grid.index(i, j).is_some(), inside);
            if let Some(idx) = grid.index(i, j) {
                let cell = grid.cell(idx);
                prop_assert_eq!((cell.i as isize, cell.j as isize), (i, j));
            }
        }
    }
}
