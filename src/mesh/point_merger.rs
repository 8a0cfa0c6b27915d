use super::PointId;
use std::collections::HashMap;

/// Finds coincident points (within a tolerance) while building a mesh
///
/// The points are stored in square buckets whose side equals the tolerance;
/// thus, a search only needs to inspect the 3 × 3 neighboring buckets.
pub struct PointMerger {
    /// Tolerance to consider two points coincident
    tolerance: f64,

    /// Coordinates of the unique points
    coords: Vec<[f64; 2]>,

    /// Maps the bucket key to the points in the bucket
    buckets: HashMap<(i64, i64), Vec<PointId>>,
}

impl PointMerger {
    /// Allocates a new instance
    pub fn new(tolerance: f64) -> Self {
        PointMerger {
            tolerance,
            coords: Vec::new(),
            buckets: HashMap::new(),
        }
    }

    /// Returns the id of the point at (x, y), inserting a new point if none exists
    pub fn insert(&mut self, x: f64, y: f64) -> PointId {
        if let Some(id) = self.find(x, y) {
            return id;
        }
        let id = self.coords.len();
        self.coords.push([x, y]);
        self.buckets.entry(self.key(x, y)).or_insert_with(Vec::new).push(id);
        id
    }

    /// Returns the id of an existing point at (x, y), if any
    pub fn find(&self, x: f64, y: f64) -> Option<PointId> {
        let (i, j) = self.key(x, y);
        for di in -1..=1 {
            for dj in -1..=1 {
                if let Some(ids) = self.buckets.get(&(i + di, j + dj)) {
                    for id in ids {
                        let [xx, yy] = self.coords[*id];
                        if f64::abs(xx - x) <= self.tolerance && f64::abs(yy - y) <= self.tolerance {
                            return Some(*id);
                        }
                    }
                }
            }
        }
        None
    }

    /// Returns the coordinates of a point
    pub fn coords(&self, id: PointId) -> [f64; 2] {
        self.coords[id]
    }

    /// Returns the number of unique points
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Returns the coordinates of the unique points (consumes the merger)
    pub fn into_coords(self) -> Vec<[f64; 2]> {
        self.coords
    }

    /// Computes the bucket key
    fn key(&self, x: f64, y: f64) -> (i64, i64) {
        (
            f64::floor(x / self.tolerance) as i64,
            f64::floor(y / self.tolerance) as i64,
        )
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::PointMerger;

    #[test]
    fn insert_and_find_work() {
        let mut merger = PointMerger::new(1e-6);
        assert_eq!(merger.insert(0.0, 0.0), 0);
        assert_eq!(merger.insert(1.0, 0.0), 1);
        assert_eq!(merger.insert(1.0 + 1e-9, 0.0), 1);
        assert_eq!(merger.insert(-1e-9, 1e-9), 0); // neighbor bucket
        assert_eq!(merger.insert(1.0, 1.0), 2);
        assert_eq!(merger.find(1.0, 1.0 - 5e-7), Some(2));
        assert_eq!(merger.find(1.0, 1.0 - 5e-6), None);
        assert_eq!(merger.len(), 3);
        let coords = merger.into_coords();
        assert_eq!(coords, &[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]);
    }
}
