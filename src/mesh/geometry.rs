use crate::base::{ParamPack, BACKGROUND_MARKER};
use crate::StrError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Holds a circle
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct Circle {
    /// Coordinates of the center
    pub center: [f64; 2],

    /// Radius
    pub radius: f64,
}

impl Circle {
    /// Returns the distance between the centers of two circles
    pub fn distance(&self, other: &Circle) -> f64 {
        let dx = other.center[0] - self.center[0];
        let dy = other.center[1] - self.center[1];
        f64::sqrt(dx * dx + dy * dy)
    }

    /// Returns true if the point is strictly inside the circle
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let dx = x - self.center[0];
        let dy = y - self.center[1];
        dx * dx + dy * dy < self.radius * self.radius
    }

    /// Returns the area of the full circle
    pub fn area(&self) -> f64 {
        std::f64::consts::PI * self.radius * self.radius
    }
}

/// Holds the geometry of the battery pack cross-section
///
/// ```text
///  side ┌───(o)──────(o)──────(o)──────(o)
///       │     ╭─────╮  ╭─────╮  ╭─────╮  │
///       │     │  7  │  │  8  │  │  9  │  │
///       │     ╰─────╯  ╰─────╯  ╰─────╯  │
///      (o)───────(o)──────(o)──────(o)
///       │     ╭─────╮  ╭─────╮  ╭─────╮  │
///       │     │  4  │  │  5  │  │  6  │  │
///       │     ╰─────╯  ╰─────╯  ╰─────╯  │
///      (o)───────(o)──────(o)──────(o)
///       │     ╭─────╮  ╭─────╮  ╭─────╮  │
///       │     │  1  │  │  2  │  │  3  │  │
///       │     ╰─────╯  ╰─────╯  ╰─────╯  │
///    0 (o)───────(o)──────(o)──────(o)───┘
///       0                               side
/// ```
///
/// `(o)` are the cutouts (holes) at the corners of the battery grid and
/// the numbered circles are the battery sub-domains (tags).
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct PackGeometry {
    /// Number of cells along each side
    pub n_cells: usize,

    /// Length of the side of the square plate
    pub side: f64,

    /// Distance between the centers of adjacent batteries
    pub offset: f64,

    /// Target length of the triangle edges
    pub target_edge: f64,

    /// Circular cutouts subtracted from the plate, (n_cells+1)² of them
    pub holes: Vec<Circle>,

    /// Maps the battery tag (1..=n_cells²) to its circle
    pub batteries: BTreeMap<usize, Circle>,
}

impl PackGeometry {
    /// Allocates a new instance and validates the layout
    pub fn new(param: &ParamPack) -> Result<Self, StrError> {
        param.validate()?;
        let n = param.n_cells;
        let side = param.side();
        let offset = param.offset();
        let rh = param.hole_radius();
        let rb = param.battery_radius();
        let mut holes = Vec::with_capacity((n + 1) * (n + 1));
        for j in 0..(n + 1) {
            for i in 0..(n + 1) {
                holes.push(Circle {
                    center: [offset * (i as f64), offset * (j as f64)],
                    radius: rh,
                });
            }
        }
        let mut batteries = BTreeMap::new();
        let start = side / (2.0 * n as f64);
        for j in 0..n {
            for i in 0..n {
                let tag = PackGeometry::battery_tag(n, i, j);
                batteries.insert(
                    tag,
                    Circle {
                        center: [start + offset * (i as f64), start + offset * (j as f64)],
                        radius: rb,
                    },
                );
            }
        }
        let geometry = PackGeometry {
            n_cells: n,
            side,
            offset,
            target_edge: param.target_edge(),
            holes,
            batteries,
        };
        geometry.validate()?;
        Ok(geometry)
    }

    /// Returns the tag of the battery at the grid location (i, j)
    pub fn battery_tag(n_cells: usize, i: usize, j: usize) -> usize {
        1 + i + n_cells * j
    }

    /// Checks the layout of holes and batteries
    ///
    /// The checks are carried out before meshing; any overlap is an error.
    pub fn validate(&self) -> Result<(), StrError> {
        if self.n_cells < 1 {
            return Err("n_cells must be ≥ 1");
        }
        if self.side <= 0.0 || self.offset <= 0.0 {
            return Err("side and offset must be > 0.0");
        }
        if self.target_edge <= 0.0 {
            return Err("target edge length must be > 0.0");
        }
        if self.holes.len() != (self.n_cells + 1) * (self.n_cells + 1) {
            return Err("the number of holes must be equal to (n_cells+1)²");
        }
        if self.batteries.len() != self.n_cells * self.n_cells {
            return Err("the number of batteries must be equal to n_cells²");
        }
        for (tag, battery) in &self.batteries {
            if *tag == BACKGROUND_MARKER {
                return Err("battery tag 0 is reserved for the background");
            }
            if battery.radius <= 0.0 {
                return Err("battery radius must be > 0.0");
            }
        }
        for hole in &self.holes {
            if hole.radius <= 0.0 {
                return Err("hole radius must be > 0.0");
            }
        }
        let batteries: Vec<_> = self.batteries.values().collect();
        for a in 0..batteries.len() {
            for b in (a + 1)..batteries.len() {
                if batteries[a].distance(batteries[b]) <= batteries[a].radius + batteries[b].radius {
                    return Err("batteries overlap each other");
                }
            }
        }
        for battery in &batteries {
            for hole in &self.holes {
                if battery.distance(hole) <= battery.radius + hole.radius {
                    return Err("batteries touch the holes");
                }
            }
        }
        for a in 0..self.holes.len() {
            for b in (a + 1)..self.holes.len() {
                if self.holes[a].distance(&self.holes[b]) <= self.holes[a].radius + self.holes[b].radius {
                    return Err("holes overlap each other");
                }
            }
        }
        for battery in &batteries {
            let [x, y] = battery.center;
            let r = battery.radius;
            if x - r <= 0.0 || x + r >= self.side || y - r <= 0.0 || y + r >= self.side {
                return Err("batteries must lie strictly inside the plate");
            }
        }
        // each battery must be inside its own grid cell (the mesher relies on it)
        for j in 0..self.n_cells {
            for i in 0..self.n_cells {
                let tag = PackGeometry::battery_tag(self.n_cells, i, j);
                let battery = self.batteries.get(&tag).ok_or("battery tag is missing")?;
                let [xc, yc] = self.cell_center(i, j);
                let dx = f64::abs(battery.center[0] - xc);
                let dy = f64::abs(battery.center[1] - yc);
                let tol = 1e-10 * self.offset;
                if dx > tol || dy > tol {
                    return Err("batteries must be centered in the grid cells");
                }
            }
        }
        Ok(())
    }

    /// Returns the center of the grid cell (i, j)
    pub fn cell_center(&self, i: usize, j: usize) -> [f64; 2] {
        let half = self.offset / 2.0;
        [self.offset * (i as f64) + half, self.offset * (j as f64) + half]
    }

    /// Returns the holes touching the grid cell (i, j); i.e., the ones at its corners
    pub fn cell_holes(&self, i: usize, j: usize) -> [&Circle; 4] {
        let m = self.n_cells + 1;
        [
            &self.holes[i + m * j],
            &self.holes[(i + 1) + m * j],
            &self.holes[(i + 1) + m * (j + 1)],
            &self.holes[i + m * (j + 1)],
        ]
    }

    /// Returns the area of the plate (without the holes)
    pub fn plate_area(&self) -> f64 {
        self.side * self.side
    }

    /// Returns the area of the domain (plate minus the parts of the holes inside the plate)
    ///
    /// Interior holes are full circles, holes on the edges are halves, and holes on the corners are quarters.
    pub fn domain_area(&self) -> f64 {
        let n = self.n_cells as f64;
        match self.holes.first() {
            Some(hole) => self.plate_area() - hole.area() * n * n,
            None => self.plate_area(),
        }
    }

    /// Returns the sub-domain marker at (x, y)
    ///
    /// Returns None if the point is outside the plate or inside a hole,
    /// otherwise returns the battery tag or 0 (background).
    pub fn subdomain_at(&self, x: f64, y: f64) -> Option<usize> {
        if x < 0.0 || x > self.side || y < 0.0 || y > self.side {
            return None;
        }
        if self.holes.iter().any(|h| h.contains(x, y)) {
            return None;
        }
        for (tag, battery) in &self.batteries {
            if battery.contains(x, y) {
                return Some(*tag);
            }
        }
        Some(BACKGROUND_MARKER)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
