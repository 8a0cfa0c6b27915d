use crate::StrError;
use serde::{Deserialize, Serialize};

/// Holds the parameters defining the battery pack cross-section
///
/// The pack is a square plate with a grid of `n_cells × n_cells` circular batteries.
/// A grid of `(n_cells+1) × (n_cells+1)` circular cutouts (holes) is placed at the
/// corners of the battery grid.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct ParamPack {
    /// Diameter of a battery cell
    pub cell_d: f64,

    /// Ratio between the cell diameter and the cutout (hole) diameter
    pub ratio: f64,

    /// Number of cells along each side
    pub n_cells: usize,

    /// Extra spacing factor along the diagonal
    pub extra: f64,

    /// Mesh resolution (approximate number of triangle edges along one side of the plate)
    pub resolution: usize,
}

impl ParamPack {
    /// Allocates a new instance with the reference 3 × 3 pack
    pub fn new() -> Self {
        ParamPack {
            cell_d: 1.8,
            ratio: 2.0,
            n_cells: 3,
            extra: 1.5,
            resolution: 30,
        }
    }

    /// Returns the diagonal distance from corner to corner
    pub fn diagonal(&self) -> f64 {
        let n = self.n_cells as f64;
        n * self.cell_d + n * (self.cell_d / self.ratio) * self.extra
    }

    /// Returns the length of the side of the square plate
    pub fn side(&self) -> f64 {
        self.diagonal() / f64::sqrt(2.0)
    }

    /// Returns the distance between the centers of adjacent cells
    pub fn offset(&self) -> f64 {
        self.side() / (self.n_cells as f64)
    }

    /// Returns the radius of the batteries
    pub fn battery_radius(&self) -> f64 {
        self.cell_d / 2.0
    }

    /// Returns the radius of the cutouts
    pub fn hole_radius(&self) -> f64 {
        self.cell_d / (2.0 * self.ratio)
    }

    /// Returns the target length of the triangle edges
    pub fn target_edge(&self) -> f64 {
        self.side() / (self.resolution as f64)
    }

    /// Checks the parameters
    pub fn validate(&self) -> Result<(), StrError> {
        if self.n_cells < 1 {
            return Err("n_cells must be ≥ 1");
        }
        if self.cell_d <= 0.0 {
            return Err("cell_d must be > 0.0");
        }
        if self.ratio <= 1.0 {
            return Err("ratio must be > 1.0");
        }
        if self.extra < 0.0 {
            return Err("extra must be ≥ 0.0");
        }
        if self.resolution < 1 {
            return Err("resolution must be ≥ 1");
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::ParamPack;
    use russell_lab::approx_eq;

    #[test]
    fn side_formula_works() {
        let param = ParamPack::new();
        let diagonal = 3.0 * 1.8 + 3.0 * 0.9 * 1.5;
        approx_eq(param.diagonal(), diagonal, 1e-15);
        approx_eq(param.side(), diagonal / f64::sqrt(2.0), 1e-15);
        approx_eq(param.offset(), param.side() / 3.0, 1e-15);
        assert_eq!(param.battery_radius(), 0.9);
        assert_eq!(param.hole_radius(), 0.45);
        approx_eq(param.target_edge(), param.side() / 30.0, 1e-15);

        for n in 1..6 {
            for (cell_d, ratio, extra) in [(1.0, 1.5, 0.5), (2.0, 3.0, 2.0), (0.018, 2.0, 1.5)] {
                let param = ParamPack {
                    cell_d,
                    ratio,
                    n_cells: n,
                    extra,
                    resolution: 10,
                };
                let nf = n as f64;
                let correct = ((nf * cell_d) + nf * (cell_d / ratio) * extra) / f64::sqrt(2.0);
                approx_eq(param.side(), correct, 1e-14);
            }
        }
    }

    #[test]
    fn validate_captures_errors() {
        let mut param = ParamPack::new();
        assert_eq!(param.validate(), Ok(()));
        param.n_cells = 0;
        assert_eq!(param.validate().err(), Some("n_cells must be ≥ 1"));
        let mut param = ParamPack::new();
        param.cell_d = 0.0;
        assert_eq!(param.validate().err(), Some("cell_d must be > 0.0"));
        let mut param = ParamPack::new();
        param.ratio = 1.0;
        assert_eq!(param.validate().err(), Some("ratio must be > 1.0"));
        let mut param = ParamPack::new();
        param.extra = -0.1;
        assert_eq!(param.validate().err(), Some("extra must be ≥ 0.0"));
        let mut param = ParamPack::new();
        param.resolution = 0;
        assert_eq!(param.validate().err(), Some("resolution must be ≥ 1"));
    }
}
