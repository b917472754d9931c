//! Uniform spatial hash grid for neighbour queries
//!
//! Cells are square with side `cell_size` and keyed by the floor of the
//! coordinates divided by that size. A query looks at the 3×3 block of cells
//! around a point, so it finds every neighbour within `cell_size` of it.

use std::collections::HashMap;

use glam::Vec2;

pub type CellKey = (i32, i32);

#[derive(Debug, Clone)]
pub struct SpatialHash {
    cell_size: f32,
    cells: HashMap<CellKey, Vec<usize>>,
}

impl SpatialHash {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn cell_of(&self, p: Vec2) -> CellKey {
        (
            (p.x / self.cell_size).floor() as i32,
            (p.y / self.cell_size).floor() as i32,
        )
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn insert(&mut self, index: usize, p: Vec2) {
        let key = self.cell_of(p);
        self.cells.entry(key).or_default().push(index);
    }

    /// Rebuild from scratch; entries are indices into `positions`
    pub fn rebuild<I>(&mut self, positions: I)
    where
        I: IntoIterator<Item = Vec2>,
    {
        self.cells.clear();
        for (index, p) in positions.into_iter().enumerate() {
            self.insert(index, p);
        }
    }

    /// Occupied cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Every entry in the 3×3 block around `p`, including `p`'s own
    pub fn candidates(&self, p: Vec2) -> impl Iterator<Item = usize> + '_ {
        let (cx, cy) = self.cell_of(p);
        (-1..=1)
            .flat_map(move |dx| (-1..=1).map(move |dy| (cx + dx, cy + dy)))
            .filter_map(move |key| self.cells.get(&key))
            .flat_map(|bucket| bucket.iter().copied())
    }

    /// Indices of points strictly closer than `radius` to `p`.
    /// Complete only when `radius <= cell_size`.
    pub fn neighbors_within(&self, positions: &[Vec2], p: Vec2, radius: f32) -> Vec<usize> {
        debug_assert!(radius <= self.cell_size);
        self.candidates(p)
            .filter(|&j| positions[j].distance(p) < radius)
            .collect()
    }
}

/// Reference O(n) neighbour search
pub fn brute_force_neighbors(positions: &[Vec2], p: Vec2, radius: f32) -> Vec<usize> {
    positions
        .iter()
        .enumerate()
        .filter(|(_, q)| q.distance(p) < radius)
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_cell_keys_floor_negative() {
        let grid = SpatialHash::new(20.0);
        assert_eq!(grid.cell_of(Vec2::new(19.9, 0.0)), (0, 0));
        assert_eq!(grid.cell_of(Vec2::new(20.0, 40.0)), (1, 2));
        assert_eq!(grid.cell_of(Vec2::new(-0.1, -20.1)), (-1, -2));
    }

    #[test]
    fn test_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(7);
        let positions: Vec<Vec2> = (0..600)
            .map(|_| Vec2::new(rng.gen_range(-50.0..250.0), rng.gen_range(-50.0..250.0)))
            .collect();

        let mut grid = SpatialHash::new(20.0);
        grid.rebuild(positions.iter().copied());

        for p in &positions {
            let mut fast = grid.neighbors_within(&positions, *p, 20.0);
            let mut slow = brute_force_neighbors(&positions, *p, 20.0);
            fast.sort_unstable();
            slow.sort_unstable();
            assert_eq!(fast, slow, "neighbour sets differ around {p:?}");
        }
    }

    #[test]
    fn test_rebuild_discards_old_entries() {
        let mut grid = SpatialHash::new(10.0);
        grid.rebuild([Vec2::ZERO, Vec2::new(100.0, 100.0)]);
        assert_eq!(grid.cell_count(), 2);
        grid.rebuild([Vec2::ZERO]);
        assert_eq!(grid.cell_count(), 1);
        assert_eq!(grid.candidates(Vec2::new(100.0, 100.0)).count(), 0);
    }
}
