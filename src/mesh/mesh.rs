use crate::base::{BACKGROUND_MARKER, BATTERY_BOUNDARY_MARKER, OUTER_BOUNDARY_MARKER};
use crate::StrError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// Defines the index of a point
pub type PointId = usize;

/// Defines the index of a cell (triangle)
pub type CellId = usize;

/// Holds the point data
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Point {
    /// Identification number which equals the index of the point in the mesh
    pub id: PointId,

    /// Point coordinates
    pub coords: [f64; 2],
}

/// Holds the cell (3-node triangle) data
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Cell {
    /// Identification number which equals the index of the cell in the mesh
    pub id: CellId,

    /// Sub-domain marker: 0 for the background or the battery tag
    pub marker: usize,

    /// List of points defining the triangle (counter-clockwise)
    pub points: [PointId; 3],
}

/// Holds the facet (triangle edge) data
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Facet {
    /// The two points of the edge, sorted in ascending order
    pub points: [PointId; 2],

    /// Cells sharing this facet (one for boundary facets, two otherwise)
    pub cells: Vec<CellId>,

    /// Boundary marker
    ///
    /// * `-1` -- outer boundary (plate edges and hole arcs)
    /// * `2` -- battery boundary (between one battery and the background)
    /// * `0` -- otherwise
    pub marker: i32,
}

/// Holds the triangular mesh of the battery pack
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Mesh {
    /// All points
    pub points: Vec<Point>,

    /// All cells
    pub cells: Vec<Cell>,

    /// All facets, sorted by their points
    pub facets: Vec<Facet>,
}

impl Mesh {
    /// Allocates a new instance from coordinates and triangles
    ///
    /// The triangles are given as `(marker, [a, b, c])`. The orientation is fixed such
    /// that all triangles are counter-clockwise; the facets are extracted and marked.
    pub fn new(coords: Vec<[f64; 2]>, triangles: Vec<(usize, [PointId; 3])>) -> Result<Self, StrError> {
        if coords.len() < 3 {
            return Err("the mesh must have at least 3 points");
        }
        if triangles.len() == 0 {
            return Err("the mesh must have at least 1 cell");
        }
        let points: Vec<_> = coords
            .into_iter()
            .enumerate()
            .map(|(id, coords)| Point { id, coords })
            .collect();
        let mut cells = Vec::with_capacity(triangles.len());
        for (id, (marker, mut abc)) in triangles.into_iter().enumerate() {
            if abc.iter().any(|p| *p >= points.len()) {
                return Err("cell references a non-existent point");
            }
            if abc[0] == abc[1] || abc[1] == abc[2] || abc[2] == abc[0] {
                return Err("cell has repeated points");
            }
            let det = signed_double_area(&points[abc[0]].coords, &points[abc[1]].coords, &points[abc[2]].coords);
            if det < 0.0 {
                abc.swap(1, 2);
            }
            cells.push(Cell {
                id,
                marker,
                points: abc,
            });
        }
        let mut mesh = Mesh {
            points,
            cells,
            facets: Vec::new(),
        };
        mesh.check()?;
        mesh.extract_facets()?;
        Ok(mesh)
    }

    /// Checks that all cells have a positive area (counter-clockwise)
    pub fn check(&self) -> Result<(), StrError> {
        let tol = 1e-14 * self.bounding_box_diagonal().powi(2);
        for cell in &self.cells {
            if 0.5 * self.signed_double_area(cell.id) <= tol {
                return Err("found a degenerate or clockwise triangle");
            }
        }
        Ok(())
    }

    /// Returns the area of a cell
    pub fn cell_area(&self, cell_id: CellId) -> f64 {
        0.5 * self.signed_double_area(cell_id)
    }

    /// Returns the total area of the mesh
    pub fn area(&self) -> f64 {
        self.cells.iter().map(|c| self.cell_area(c.id)).sum()
    }

    /// Returns the area of all cells with the given marker
    pub fn area_of(&self, marker: usize) -> f64 {
        self.cells
            .iter()
            .filter(|c| c.marker == marker)
            .map(|c| self.cell_area(c.id))
            .sum()
    }

    /// Returns the coordinates of the cell centroid
    pub fn cell_centroid(&self, cell_id: CellId) -> [f64; 2] {
        let [a, b, c] = self.cells[cell_id].points;
        let (xa, xb, xc) = (&self.points[a].coords, &self.points[b].coords, &self.points[c].coords);
        [(xa[0] + xb[0] + xc[0]) / 3.0, (xa[1] + xb[1] + xc[1]) / 3.0]
    }

    /// Returns the (sorted) set of battery markers; i.e., all markers except the background
    pub fn battery_markers(&self) -> BTreeSet<usize> {
        self.cells
            .iter()
            .filter(|c| c.marker != BACKGROUND_MARKER)
            .map(|c| c.marker)
            .collect()
    }

    /// Returns the facets with a given boundary marker
    pub fn facets_with_marker(&self, marker: i32) -> Vec<&Facet> {
        self.facets.iter().filter(|f| f.marker == marker).collect()
    }

    /// Returns the boundary facets of a battery sub-domain
    pub fn battery_boundary_facets(&self, battery: usize) -> Vec<&Facet> {
        self.facets
            .iter()
            .filter(|f| f.marker == BATTERY_BOUNDARY_MARKER && f.cells.iter().any(|c| self.cells[*c].marker == battery))
            .collect()
    }

    /// Returns the boundary facets of the selected batteries (an empty selection means all batteries)
    ///
    /// Returns an error if a selected marker does not correspond to a battery of the mesh.
    pub fn heated_facets(&self, selection: &[usize]) -> Result<Vec<&Facet>, StrError> {
        if selection.len() == 0 {
            return Ok(self.facets_with_marker(BATTERY_BOUNDARY_MARKER));
        }
        let batteries = self.battery_markers();
        if selection.iter().any(|m| !batteries.contains(m)) {
            return Err("cannot find a battery with the selected marker");
        }
        Ok(self
            .facets
            .iter()
            .filter(|f| {
                f.marker == BATTERY_BOUNDARY_MARKER
                    && f.cells.iter().any(|c| selection.contains(&self.cells[*c].marker))
            })
            .collect())
    }

    /// Returns the limits of the mesh: `(xmin, xmax, ymin, ymax)`
    pub fn limits(&self) -> (f64, f64, f64, f64) {
        let mut lim = (f64::MAX, f64::MIN, f64::MAX, f64::MIN);
        for p in &self.points {
            lim.0 = f64::min(lim.0, p.coords[0]);
            lim.1 = f64::max(lim.1, p.coords[0]);
            lim.2 = f64::min(lim.2, p.coords[1]);
            lim.3 = f64::max(lim.3, p.coords[1]);
        }
        lim
    }

    /// Reads a JSON file containing the mesh data
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn read_json<P>(full_path: &P) -> Result<Self, StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        let input = File::open(path).map_err(|_| "cannot open file")?;
        let buffered = BufReader::new(input);
        let mesh = serde_json::from_reader(buffered).map_err(|_| "cannot parse JSON file")?;
        Ok(mesh)
    }

    /// Writes a JSON file with the mesh data
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn write_json<P>(&self, full_path: &P) -> Result<(), StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        if let Some(p) = path.parent() {
            fs::create_dir_all(p).map_err(|_| "cannot create directory")?;
        }
        let mut file = File::create(&path).map_err(|_| "cannot create file")?;
        serde_json::to_writer(&mut file, &self).map_err(|_| "cannot write file")?;
        Ok(())
    }

    /// Extracts the facets from the cell connectivity and sets their markers
    fn extract_facets(&mut self) -> Result<(), StrError> {
        let mut map: BTreeMap<[PointId; 2], Vec<CellId>> = BTreeMap::new();
        for cell in &self.cells {
            for k in 0..3 {
                let a = cell.points[k];
                let b = cell.points[(k + 1) % 3];
                let key = if a < b { [a, b] } else { [b, a] };
                map.entry(key).or_insert_with(Vec::new).push(cell.id);
            }
        }
        self.facets = Vec::with_capacity(map.len());
        for (points, cells) in map {
            let marker = match cells.len() {
                1 => OUTER_BOUNDARY_MARKER,
                2 => {
                    let ma = self.cells[cells[0]].marker;
                    let mb = self.cells[cells[1]].marker;
                    if ma != mb && (ma == BACKGROUND_MARKER || mb == BACKGROUND_MARKER) {
                        BATTERY_BOUNDARY_MARKER
                    } else {
                        0
                    }
                }
                _ => return Err("found a facet shared by more than two cells"),
            };
            self.facets.push(Facet { points, cells, marker });
        }
        Ok(())
    }

    /// Computes twice the signed area of a cell
    fn signed_double_area(&self, cell_id: CellId) -> f64 {
        let [a, b, c] = self.cells[cell_id].points;
        signed_double_area(&self.points[a].coords, &self.points[b].coords, &self.points[c].coords)
    }

    /// Returns the diagonal of the bounding box
    fn bounding_box_diagonal(&self) -> f64 {
        let (xmin, xmax, ymin, ymax) = self.limits();
        f64::sqrt((xmax - xmin) * (xmax - xmin) + (ymax - ymin) * (ymax - ymin))
    }
}

/// Computes twice the signed area of the triangle (a, b, c); positive if counter-clockwise
pub(crate) fn signed_double_area(a: &[f64; 2], b: &[f64; 2], c: &[f64; 2]) -> f64 {
    (b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1])
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
