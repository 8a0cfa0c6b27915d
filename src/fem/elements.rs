use super::{ElementDiffusion, FemState};
use crate::base::Config;
use crate::mesh::{Cell, Mesh};
use crate::StrError;
use russell_lab::{Matrix, Vector};
use russell_sparse::CooMatrix;

/// Defines a finite element together with its local residual vector and Jacobian matrix
pub struct GenericElement<'a> {
    /// Connects to the actual implementation of local equations
    pub actual: ElementDiffusion<'a>,

    /// Implements the residual vector
    pub residual: Vector,

    /// Implements the Jacobian matrix
    pub jacobian: Matrix,
}

/// Holds a collection of finite elements
pub struct Elements<'a> {
    /// All elements
    pub all: Vec<GenericElement<'a>>,
}

impl<'a> GenericElement<'a> {
    /// Allocates new instance
    pub fn new(mesh: &Mesh, config: &'a Config, cell: &Cell) -> Result<Self, StrError> {
        Ok(GenericElement {
            actual: ElementDiffusion::new(mesh, config, cell)?,
            residual: Vector::new(3),
            jacobian: Matrix::new(3, 3),
        })
    }

    /// Calculates the residual vector
    pub fn calc_residual(&mut self, state: &FemState) {
        self.actual.calc_residual(&mut self.residual, state);
    }

    /// Calculates the Jacobian matrix
    pub fn calc_jacobian(&mut self, state: &FemState) {
        self.actual.calc_jacobian(&mut self.jacobian, state);
    }
}

impl<'a> Elements<'a> {
    /// Allocates new instance
    pub fn new(mesh: &Mesh, config: &'a Config) -> Result<Self, StrError> {
        let all: Result<Vec<_>, _> = mesh
            .cells
            .iter()
            .map(|cell| GenericElement::new(mesh, config, cell))
            .collect();
        Ok(Elements { all: all? })
    }

    /// Computes the residual vectors
    pub fn calc_residuals(&mut self, state: &FemState) {
        self.all.iter_mut().for_each(|e| e.calc_residual(state));
    }

    /// Computes the Jacobian matrices
    pub fn calc_jacobians(&mut self, state: &FemState) {
        self.all.iter_mut().for_each(|e| e.calc_jacobian(state));
    }

    /// Assembles the residual vectors
    ///
    /// **Note:** The global vector is cleared first and the prescribed equations are skipped.
    pub fn assemble_residuals(&self, rr: &mut Vector, prescribed: &[bool]) {
        rr.fill(0.0);
        for e in &self.all {
            for (l, g) in e.actual.local_to_global.iter().enumerate() {
                if !prescribed[*g] {
                    rr[*g] += e.residual[l];
                }
            }
        }
    }

    /// Assembles the Jacobian matrices
    ///
    /// **Note:** The global matrix is reset first and the rows and columns of the prescribed
    /// equations are skipped.
    pub fn assemble_jacobians(&self, kk: &mut CooMatrix, prescribed: &[bool]) -> Result<(), StrError> {
        kk.reset(); // << important
        for e in &self.all {
            let l2g = &e.actual.local_to_global;
            for l in 0..3 {
                if prescribed[l2g[l]] {
                    continue;
                }
                for ll in 0..3 {
                    if !prescribed[l2g[ll]] {
                        kk.put(l2g[l], l2g[ll], e.jacobian.get(l, ll))?;
                    }
                }
            }
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
