use super::{signed_double_area, Mesh, PackGeometry, PointId, PointMerger};
use crate::base::{ParamPack, BACKGROUND_MARKER};
use crate::StrError;
use std::f64::consts::PI;

/// Defines the minimum number of points along a ring
pub const GENERATOR_MIN_RING_POINTS: usize = 8;

/// Generates the triangular mesh of the battery pack
///
/// Each grid cell (a square of side `offset` around one battery, minus the quarter
/// holes at its corners) is star-shaped with respect to the battery center. Thus,
/// the cell is meshed by rays emanating from the center:
///
/// ```text
///   (o)───────────────────(o)
///     ╲ · · · · · · · · · ╱      annulus: radial layers from the battery
///     │ ·   ╭───────╮   · │      circle to the cell boundary (edges and
///     │ ·  ╱ ╲  │  ╱ ╲  · │      hole arcs); marker 0
///     │ · │ ─ ─ ● ─ ─ │ · │
///     │ ·  ╲ ╱  │  ╲ ╱  · │      disk: concentric rings with the number of
///     │ ·   ╰───────╯   · │      points halved towards the center; the
///     ╱ · · · · · · · · · ╲      battery tag is the marker
///   (o)───────────────────(o)
/// ```
///
/// The number of rays is a power of two (at least 8) and is the same for all cells;
/// hence, the points on the edges shared by neighboring cells coincide and are
/// merged (within a tolerance).
pub struct Generator<'a> {
    /// Holds the pack geometry
    geometry: &'a PackGeometry,

    /// Target length of the triangle edges
    h: f64,

    /// Number of rays (points along each battery circle)
    n_ray: usize,

    /// Merges coincident points
    merger: PointMerger,

    /// Holds the triangles (marker, points)
    triangles: Vec<(usize, [PointId; 3])>,
}

impl<'a> Generator<'a> {
    /// Allocates a new instance
    pub fn new(geometry: &'a PackGeometry) -> Result<Self, StrError> {
        geometry.validate()?;
        let h = geometry.target_edge;
        let r_max = geometry.batteries.values().fold(0.0, |acc, b| f64::max(acc, b.radius));
        let n_ray = ray_count(r_max, h);
        Ok(Generator {
            geometry,
            h,
            n_ray,
            merger: PointMerger::new(1e-9 * geometry.side),
            triangles: Vec::new(),
        })
    }

    /// Builds the pack geometry and generates its mesh
    pub fn pack(param: &ParamPack) -> Result<(PackGeometry, Mesh), StrError> {
        let geometry = PackGeometry::new(param)?;
        let mesh = Generator::new(&geometry)?.generate()?;
        Ok((geometry, mesh))
    }

    /// Returns the number of rays (points along each battery circle)
    pub fn n_ray(&self) -> usize {
        self.n_ray
    }

    /// Generates the mesh
    pub fn generate(mut self) -> Result<Mesh, StrError> {
        let n = self.geometry.n_cells;
        for j in 0..n {
            for i in 0..n {
                self.mesh_cell(i, j)?;
            }
        }
        Mesh::new(self.merger.into_coords(), self.triangles)
    }

    /// Meshes the grid cell (i, j)
    fn mesh_cell(&mut self, i: usize, j: usize) -> Result<(), StrError> {
        let tag = PackGeometry::battery_tag(self.geometry.n_cells, i, j);
        let battery = *self.geometry.batteries.get(&tag).ok_or("battery tag is missing")?;
        let [xc, yc] = battery.center;
        let rb = battery.radius;
        let half = self.geometry.offset / 2.0;
        let m = self.n_ray;

        // annulus: layers from the battery circle (k = 0) to the cell boundary (k = n_layer)
        let n_layer = usize::max(1, f64::ceil((half - rb) / self.h) as usize);
        let mut layers = vec![vec![0; m]; n_layer + 1];
        for q in 0..m {
            let theta = 2.0 * PI * (q as f64) / (m as f64);
            let (sn, cs) = theta.sin_cos();
            let boundary = self.cell_boundary_point(i, j, cs, sn);
            let dist = f64::sqrt((boundary[0] - xc).powi(2) + (boundary[1] - yc).powi(2));
            if dist <= rb {
                return Err("the cell boundary must be outside the battery");
            }
            for k in 0..n_layer {
                let r = rb + (dist - rb) * (k as f64) / (n_layer as f64);
                layers[k][q] = self.merger.insert(xc + r * cs, yc + r * sn);
            }
            layers[n_layer][q] = self.merger.insert(boundary[0], boundary[1]);
        }
        for k in 0..n_layer {
            self.connect_rings(BACKGROUND_MARKER, &layers[k], &layers[k + 1])?;
        }

        // disk: rings from the center (k = 1) to the battery circle (k = n_ring)
        let counts = ring_counts(rb, self.h, m);
        let n_ring = counts.len() - 1;
        let mut rings: Vec<Vec<PointId>> = vec![Vec::new(); n_ring + 1];
        rings[n_ring] = layers[0].clone();
        for k in 1..n_ring {
            let r = rb * (k as f64) / (n_ring as f64);
            let mk = counts[k];
            rings[k] = (0..mk)
                .map(|q| {
                    let theta = 2.0 * PI * (q as f64) / (mk as f64);
                    let (sn, cs) = theta.sin_cos();
                    self.merger.insert(xc + r * cs, yc + r * sn)
                })
                .collect();
        }
        for k in 1..n_ring {
            self.connect_rings(tag, &rings[k], &rings[k + 1])?;
        }
        let center = self.merger.insert(xc, yc);
        let first = &rings[1];
        for q in 0..first.len() {
            self.triangles
                .push((tag, [center, first[q], first[(q + 1) % first.len()]]));
        }
        Ok(())
    }

    /// Finds the point where the ray from the center of cell (i, j) reaches the cell boundary
    ///
    /// The boundary consists of the square edges and the arcs of the corner holes.
    /// Points on the square edges are snapped onto the exact edge coordinate.
    fn cell_boundary_point(&self, i: usize, j: usize, cs: f64, sn: f64) -> [f64; 2] {
        let a = self.geometry.offset;
        let [xc, yc] = self.geometry.cell_center(i, j);

        // square
        let t_square = (a / 2.0) / f64::max(f64::abs(cs), f64::abs(sn));
        let mut point = [xc + t_square * cs, yc + t_square * sn];
        if f64::abs(cs) >= f64::abs(sn) {
            point[0] = if cs > 0.0 { a * ((i + 1) as f64) } else { a * (i as f64) };
        }
        if f64::abs(sn) >= f64::abs(cs) {
            point[1] = if sn > 0.0 { a * ((j + 1) as f64) } else { a * (j as f64) };
        }

        // holes
        let mut t_best = t_square;
        for hole in self.geometry.cell_holes(i, j) {
            let (dx, dy) = (xc - hole.center[0], yc - hole.center[1]);
            let b = cs * dx + sn * dy;
            let c = dx * dx + dy * dy - hole.radius * hole.radius;
            let disc = b * b - c;
            if disc < 0.0 {
                continue;
            }
            let t = -b - f64::sqrt(disc);
            if t > 0.0 && t < t_best {
                t_best = t;
                point = [xc + t * cs, yc + t * sn];
            }
        }
        point
    }

    /// Connects two rings with triangles
    ///
    /// The outer ring has either the same number of points as the inner ring or twice as many.
    fn connect_rings(&mut self, marker: usize, inner: &[PointId], outer: &[PointId]) -> Result<(), StrError> {
        let (mi, mo) = (inner.len(), outer.len());
        if mo == mi {
            for q in 0..mi {
                let q1 = (q + 1) % mi;
                self.split_quad(marker, inner[q], outer[q], outer[q1], inner[q1])?;
            }
        } else if mo == 2 * mi {
            for q in 0..mi {
                let (i0, i1) = (inner[q], inner[(q + 1) % mi]);
                let (o0, o1, o2) = (outer[2 * q], outer[2 * q + 1], outer[(2 * q + 2) % mo]);
                self.triangles.push((marker, [i0, o0, o1]));
                self.triangles.push((marker, [i0, o1, i1]));
                self.triangles.push((marker, [i1, o1, o2]));
            }
        } else {
            return Err("the number of points of adjacent rings is incompatible");
        }
        Ok(())
    }

    /// Splits the counter-clockwise quadrilateral (a, b, c, d) into two triangles
    ///
    /// Uses the shorter diagonal unless it yields an inverted triangle.
    fn split_quad(&mut self, marker: usize, a: PointId, b: PointId, c: PointId, d: PointId) -> Result<(), StrError> {
        let (xa, xb, xc, xd) = (
            self.merger.coords(a),
            self.merger.coords(b),
            self.merger.coords(c),
            self.merger.coords(d),
        );
        let ac_ok = signed_double_area(&xa, &xb, &xc) > 0.0 && signed_double_area(&xa, &xc, &xd) > 0.0;
        let bd_ok = signed_double_area(&xa, &xb, &xd) > 0.0 && signed_double_area(&xb, &xc, &xd) > 0.0;
        let len_ac = (xc[0] - xa[0]).powi(2) + (xc[1] - xa[1]).powi(2);
        let len_bd = (xd[0] - xb[0]).powi(2) + (xd[1] - xb[1]).powi(2);
        if ac_ok && (len_ac <= len_bd || !bd_ok) {
            self.triangles.push((marker, [a, b, c]));
            self.triangles.push((marker, [a, c, d]));
        } else if bd_ok {
            self.triangles.push((marker, [a, b, d]));
            self.triangles.push((marker, [b, c, d]));
        } else {
            return Err("cannot split a degenerate quadrilateral");
        }
        Ok(())
    }
}

/// Returns the number of rays: a power of two with at least 8 and such that the arc length along the circle ≤ h
pub fn ray_count(radius: f64, h: f64) -> usize {
    let required = usize::max(GENERATOR_MIN_RING_POINTS, f64::ceil(2.0 * PI * radius / h) as usize);
    required.next_power_of_two()
}

/// Returns the number of points of each ring of the disk
///
/// The result has `n_ring + 1` entries where the first one (k = 0, the center) is unused
/// and the last one equals `n_ray`. From the outside to the inside, the number of points
/// is halved whenever the (halved) arc length remains ≤ h and at least 8 points are kept.
pub fn ring_counts(radius: f64, h: f64, n_ray: usize) -> Vec<usize> {
    let n_ring = usize::max(1, f64::ceil(radius / h) as usize);
    let mut counts = vec![0; n_ring + 1];
    counts[n_ring] = n_ray;
    for k in (1..n_ring).rev() {
        let r = radius * (k as f64) / (n_ring as f64);
        let required = usize::max(GENERATOR_MIN_RING_POINTS, f64::ceil(2.0 * PI * r / h) as usize);
        let halved = counts[k + 1] / 2;
        counts[k] = if halved >= required { halved } else { counts[k + 1] };
    }
    counts
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
