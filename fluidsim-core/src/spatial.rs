//! Uniform-grid neighbour lookup
//!
//! Cells are `radius` wide, so every particle within `radius` of a query point
//! lives in the query's cell or one of its eight neighbours.

use glam::Vec2;
use std::collections::HashMap;

const NEIGHBOR_OFFSETS: [(i32, i32); 9] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (0, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Particle indices bucketed by `floor(position / cell_size)`.
#[derive(Debug, Default)]
pub struct SpatialGrid {
    cell_size: f32,
    cells: HashMap<(i32, i32), Vec<usize>>,
}

impl SpatialGrid {
    /// Bucket `positions` into cells of `cell_size`, which must be positive.
    pub fn build(positions: &[Vec2], cell_size: f32) -> Self {
        let mut cells: HashMap<(i32, i32), Vec<usize>> = HashMap::new();
        for (i, &p) in positions.iter().enumerate() {
            cells.entry(cell_of(p, cell_size)).or_default().push(i);
        }
        Self { cell_size, cells }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn cell(&self, position: Vec2) -> (i32, i32) {
        cell_of(position, self.cell_size)
    }

    /// Visit every candidate in the 3×3 block around `position`.
    ///
    /// Candidates may lie farther than the cell size; callers filter by distance.
    /// Each index is visited at most once, cells in a fixed order.
    pub fn for_each_candidate(&self, position: Vec2, mut f: impl FnMut(usize)) {
        let (cx, cy) = self.cell(position);
        for (dx, dy) in NEIGHBOR_OFFSETS {
            // Cells past the i32 range do not exist.
            let (Some(x), Some(y)) = (cx.checked_add(dx), cy.checked_add(dy)) else {
                continue;
            };
            if let Some(bucket) = self.cells.get(&(x, y)) {
                for &idx in bucket {
                    f(idx);
                }
            }
        }
    }

    /// Collected form of [`for_each_candidate`](Self::for_each_candidate).
    pub fn candidates(&self, position: Vec2) -> Vec<usize> {
        let mut out = Vec::new();
        self.for_each_candidate(position, |idx| out.push(idx));
        out
    }
}

fn cell_of(position: Vec2, cell_size: f32) -> (i32, i32) {
    // `as` saturates for out-of-range floats and maps NaN to 0.
    (
        (position.x / cell_size).floor() as i32,
        (position.y / cell_size).floor() as i32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_floor_towards_negative_infinity() {
        let grid = SpatialGrid::build(&[], 2.0);
        assert_eq!(grid.cell(Vec2::new(0.5, 1.9)), (0, 0));
        assert_eq!(grid.cell(Vec2::new(2.0, -0.1)), (1, -1));
        assert_eq!(grid.cell(Vec2::new(-4.0, -4.1)), (-2, -3));
    }

    #[test]
    fn candidates_cover_neighbouring_cells_only() {
        let positions = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(0.5, 0.5),
            Vec2::new(1.5, -0.5),
            Vec2::new(5.0, 5.0),
        ];
        let grid = SpatialGrid::build(&positions, 1.0);
        let found = grid.candidates(Vec2::new(0.2, 0.2));
        assert!(found.contains(&0));
        assert!(found.contains(&1));
        assert!(found.contains(&2));
        assert!(!found.contains(&3));
    }

    #[test]
    fn every_particle_within_radius_is_a_candidate() {
        let positions: Vec<Vec2> = (0..200)
            .map(|i| {
                let t = i as f32 * 0.37;
                Vec2::new((t * 1.3).sin() * 7.0, (t * 0.7).cos() * 7.0)
            })
            .collect();
        let radius = 1.25;
        let grid = SpatialGrid::build(&positions, radius);
        for &p in &positions {
            let found = grid.candidates(p);
            for (j, &q) in positions.iter().enumerate() {
                if p.distance(q) < radius {
                    assert!(found.contains(&j));
                }
            }
        }
    }

    #[test]
    fn cells_at_the_integer_limits_are_visited_once() {
        let positions = vec![
            Vec2::new(1e30, 1e30),
            Vec2::new(-1e30, -1e30),
            Vec2::new(1e30, -1e30),
        ];
        let grid = SpatialGrid::build(&positions, 1.0);
        assert_eq!(grid.cell(positions[0]), (i32::MAX, i32::MAX));
        assert_eq!(grid.cell(positions[1]), (i32::MIN, i32::MIN));
        for (i, &p) in positions.iter().enumerate() {
            let found = grid.candidates(p);
            assert_eq!(found, vec![i], "particle {i}");
        }
    }
}
