use super::{Cell, Facet, Generator, Mesh, PackGeometry, Point};
use crate::base::ParamPack;
use crate::StrError;

/// Holds samples of meshes
pub struct Samples;

impl Samples {
    /// Returns a mesh with two unit squares, each one with two triangles
    ///
    /// ```text
    /// 3-------2-------5
    /// |  [1] /|  [3] /|
    /// |    /  |    /  |
    /// |  /    |  /    |
    /// |/  [0] |/  [2] |
    /// 0-------1-------4
    /// ```
    ///
    /// Cells 0 and 1 belong to battery 1; cells 2 and 3 belong to the background.
    /// Thus, facet (1,2) is a battery boundary.
    pub fn two_squares() -> Mesh {
        Mesh {
            points: vec![
                Point { id: 0, coords: [0.0, 0.0] },
                Point { id: 1, coords: [1.0, 0.0] },
                Point { id: 2, coords: [1.0, 1.0] },
                Point { id: 3, coords: [0.0, 1.0] },
                Point { id: 4, coords: [2.0, 0.0] },
                Point { id: 5, coords: [2.0, 1.0] },
            ],
            cells: vec![
                Cell { id: 0, marker: 1, points: [0, 1, 2] },
                Cell { id: 1, marker: 1, points: [0, 2, 3] },
                Cell { id: 2, marker: 0, points: [1, 4, 5] },
                Cell { id: 3, marker: 0, points: [1, 5, 2] },
            ],
            facets: vec![
                Facet { points: [0, 1], cells: vec![0], marker: -1 },
                Facet { points: [0, 2], cells: vec![0, 1], marker: 0 },
                Facet { points: [0, 3], cells: vec![1], marker: -1 },
                Facet { points: [1, 2], cells: vec![0, 3], marker: 2 },
                Facet { points: [1, 4], cells: vec![2], marker: -1 },
                Facet { points: [1, 5], cells: vec![2, 3], marker: 0 },
                Facet { points: [2, 3], cells: vec![1], marker: -1 },
                Facet { points: [2, 5], cells: vec![3], marker: -1 },
                Facet { points: [4, 5], cells: vec![2], marker: -1 },
            ],
        }
    }

    /// Returns a coarse pack with a single battery (n_cells = 1, resolution = 6)
    pub fn coarse_single_battery() -> Result<(PackGeometry, Mesh), StrError> {
        let mut param = ParamPack::new();
        param.n_cells = 1;
        param.resolution = 6;
        Generator::pack(&param)
    }

    /// Returns a coarse pack with 2 × 2 batteries (resolution = 8)
    pub fn coarse_four_batteries() -> Result<(PackGeometry, Mesh), StrError> {
        let mut param = ParamPack::new();
        param.n_cells = 2;
        param.resolution = 8;
        Generator::pack(&param)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
