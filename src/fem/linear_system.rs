use super::{Elements, PrescribedValues};
use crate::StrError;
use russell_lab::Vector;
use russell_sparse::{Genie, LinSolver, SparseMatrix, Sym};

/// Holds variables to solve the global linear system
pub struct LinearSystem<'a> {
    /// Total number of global equations (one temperature per point)
    pub n_equation: usize,

    /// Holds the supremum of the number of nonzero values (nnz) in the global matrix
    ///
    /// **Notes:**
    ///
    /// 1. The local matrices of the triangles have 3 × 3 entries
    /// 2. The elements share points; thus, the exact nnz is (much) less than the sum of the local entries
    /// 3. The least upper bound (supremum) is `nnz_sup = 9 ncell + n_prescribed` because
    ///    the prescribed equations receive ones on the diagonal
    pub nnz_sup: usize,

    /// Holds the residual vector R
    pub rr: Vector,

    /// Holds the global Jacobian matrix K
    pub kk: SparseMatrix,

    /// Holds the linear solver
    pub solver: LinSolver<'a>,

    /// Holds the "minus-delta-U" vector (the solution of the linear system)
    pub mdu: Vector,
}

impl<'a> LinearSystem<'a> {
    /// Allocates a new instance
    pub fn new(prescribed: &PrescribedValues, elements: &Elements) -> Result<Self, StrError> {
        let n_equation = prescribed.flags.len();
        if n_equation == 0 {
            return Err("the number of equations must be ≥ 1");
        }
        let nnz_sup = 9 * elements.all.len() + prescribed.equations.len();
        Ok(LinearSystem {
            n_equation,
            nnz_sup,
            rr: Vector::new(n_equation),
            kk: SparseMatrix::new_coo(n_equation, n_equation, nnz_sup, Sym::No)?,
            solver: LinSolver::new(Genie::Umfpack)?,
            mdu: Vector::new(n_equation),
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
