//! Uniform bucket grid for broad-phase proximity queries
//!
//! A query returns every item stored in the buckets overlapping the query
//! circle's bounding ring, so callers must still run the exact test on the
//! candidates. It never drops an item that is within the query radius.

use std::collections::HashMap;

use super::vector::Vector2D;

#[derive(Debug, Clone)]
pub struct SpatialGrid<T> {
    origin: Vector2D,
    cell_size: f64,
    buckets: HashMap<(i64, i64), Vec<(Vector2D, T)>>,
    len: usize,
}

impl<T> SpatialGrid<T> {
    /// `cell_size` is clamped to a small positive minimum
    pub fn new(origin: Vector2D, cell_size: f64) -> Self {
        Self {
            origin,
            cell_size: cell_size.max(f64::EPSILON),
            buckets: HashMap::new(),
            len: 0,
        }
    }

    #[inline]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    #[inline]
    fn key(&self, pos: Vector2D) -> (i64, i64) {
        let rel = pos - self.origin;
        (
            (rel.x / self.cell_size).floor() as i64,
            (rel.y / self.cell_size).floor() as i64,
        )
    }

    pub fn insert(&mut self, pos: Vector2D, item: T) {
        let key = self.key(pos);
        self.buckets.entry(key).or_default().push((pos, item));
        self.len += 1;
    }

    /// Candidates whose bucket lies within `ceil(radius / cell_size)` cells
    /// of the query cell
    pub fn query(&self, center: Vector2D, radius: f64) -> Vec<(Vector2D, &T)> {
        let (cx, cy) = self.key(center);
        let ring = (radius.max(0.0) / self.cell_size).ceil() as i64;
        let mut out = Vec::new();
        for gx in (cx - ring)..=(cx + ring) {
            for gy in (cy - ring)..=(cy + ring) {
                if let Some(bucket) = self.buckets.get(&(gx, gy)) {
                    out.extend(bucket.iter().map(|(pos, item)| (*pos, item)));
                }
            }
        }
        out
    }

    pub fn clear(&mut self) {
        self.buckets.clear();
        self.len = 0;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_query_finds_neighbors() {
        let mut grid = SpatialGrid::new(Vector2D::ZERO, 10.0);
        grid.insert(Vector2D::new(5.0, 5.0), 1);
        grid.insert(Vector2D::new(14.0, 5.0), 2);
        grid.insert(Vector2D::new(95.0, 95.0), 3);
        assert_eq!(grid.len(), 3);

        let ids: Vec<i32> = grid
            .query(Vector2D::new(6.0, 6.0), 9.0)
            .into_iter()
            .map(|(_, id)| *id)
            .collect();
        assert!(ids.contains(&1));
        assert!(ids.contains(&2));
        assert!(!ids.contains(&3));
    }

    #[test]
    fn test_negative_coordinates_and_origin() {
        let mut grid = SpatialGrid::new(Vector2D::new(-50.0, -50.0), 8.0);
        grid.insert(Vector2D::new(-49.0, -49.0), "corner");
        let hits = grid.query(Vector2D::new(-45.0, -45.0), 6.0);
        assert_eq!(hits.len(), 1);

        grid.clear();
        assert!(grid.is_empty());
        assert!(grid.query(Vector2D::new(-45.0, -45.0), 6.0).is_empty());
    }

    proptest! {
        #[test]
        fn never_misses_points_within_radius(
            points in proptest::collection::vec((-200.0f64..200.0, -200.0f64..200.0), 1..60),
            qx in -200.0f64..200.0,
            qy in -200.0f64..200.0,
            radius in 0.0f64..80.0,
            cell in 1.0f64..50.0,
        ) {
            let mut grid = SpatialGrid::new(Vector2D::ZERO, cell);
            for (i, (x, y)) in points.iter().enumerate() {
                grid.insert(Vector2D::new(*x, *y), i);
            }
            let center = Vector2D::new(qx, qy);
            let candidates: Vec<usize> =
                grid.query(center, radius).into_iter().map(|(_, i)| *i).collect();
            for (i, (x, y)) in points.iter().enumerate() {
                if Vector2D::new(*x, *y).distance(center) <= radius {
                    prop_assert!(candidates.contains(&i));
                }
            }
        }
    }
}
