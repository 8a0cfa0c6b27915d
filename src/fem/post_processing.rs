use super::{Elements, FemOutput, FemState};
use crate::mesh::{CellId, Mesh};
use crate::StrError;
use russell_lab::Vector;
use russell_sparse::{Genie, LinSolver, SparseMatrix, Sym};

/// Assists in post-processing the results
///
/// The heat flux `q = -k ∇T` is constant within each linear triangle. The nodal values are
/// computed with the L2 projection onto the space of (continuous) linear functions:
///
/// ```text
/// M qx = ∫ N qx dΩ
/// M qy = ∫ N qy dΩ
/// ```
///
/// where `M` is the consistent mass matrix.
pub struct PostProc<'a> {
    /// Holds the mesh
    mesh: &'a Mesh,

    /// Holds the elements (conductivities and gradients of shape functions)
    elements: &'a Elements<'a>,
}

impl<'a> PostProc<'a> {
    /// Reads the summary and the associated mesh file for post-processing
    ///
    /// # Input
    ///
    /// * `out_dir` -- the output directory where the summary and associated files are located.
    /// * `fn_stem` -- the filename stem used to construct the full path to the summary file.
    ///
    /// # Returns
    ///
    /// Returns `(output, mesh)`
    pub fn read_summary(out_dir: &str, fn_stem: &str) -> Result<(FemOutput, Mesh), StrError> {
        let full_path = format!("{}/{}-summary.json", out_dir, fn_stem);
        let mut output = FemOutput::read_json(&full_path)?;
        // the files may have been moved
        output.output_dir = out_dir.to_string();
        let mesh = Mesh::read_json(&output.path_mesh())?;
        Ok((output, mesh))
    }

    /// Reads a JSON file with the FEM state at a given index (time station)
    pub fn read_state(output: &FemOutput, index: usize) -> Result<FemState, StrError> {
        FemState::read_json(&output.path_state(index))
    }

    /// Allocates a new instance
    pub fn new(mesh: &'a Mesh, elements: &'a Elements<'a>) -> Result<Self, StrError> {
        if elements.all.len() != mesh.cells.len() {
            return Err("the number of elements must be equal to the number of cells");
        }
        Ok(PostProc { mesh, elements })
    }

    /// Returns the heat flux of a cell
    pub fn cell_flux(&self, cell_id: CellId, state: &FemState) -> [f64; 2] {
        self.elements.all[cell_id].actual.flux(&state.uu)
    }

    /// Returns the heat flux of all cells
    pub fn cell_fluxes(&self, state: &FemState) -> Vec<[f64; 2]> {
        self.elements.all.iter().map(|e| e.actual.flux(&state.uu)).collect()
    }

    /// Computes the nodal values of the heat flux (L2 projection)
    ///
    /// Returns `(qx, qy)` with the components at each point
    pub fn nodal_fluxes(&self, state: &FemState) -> Result<(Vector, Vector), StrError> {
        let npoint = self.mesh.points.len();
        let ncell = self.mesh.cells.len();

        // assemble the mass matrix and the right-hand sides
        let mut mm = SparseMatrix::new_coo(npoint, npoint, 9 * ncell, Sym::No)?;
        let mut bx = Vector::new(npoint);
        let mut by = Vector::new(npoint);
        let coo = mm.get_coo_mut()?;
        for e in &self.elements.all {
            let area = e.actual.area;
            let q = e.actual.flux(&state.uu);
            let l2g = &e.actual.local_to_global;
            for m in 0..3 {
                for n in 0..3 {
                    let value = if m == n { area / 6.0 } else { area / 12.0 };
                    coo.put(l2g[m], l2g[n], value)?;
                }
                bx[l2g[m]] += q[0] * area / 3.0;
                by[l2g[m]] += q[1] * area / 3.0;
            }
        }

        // solve the linear systems
        let mut solver = LinSolver::new(Genie::Umfpack)?;
        solver.actual.factorize(&mut mm, None)?;
        let mut qx = Vector::new(npoint);
        let mut qy = Vector::new(npoint);
        solver.actual.solve(&mut qx, &mm, &bx, false)?;
        solver.actual.solve(&mut qy, &mm, &by, false)?;
        Ok((qx, qy))
    }

    /// Returns the (projected) nodal heat flux as one vector per point
    pub fn nodal_flux_vectors(&self, state: &FemState) -> Result<Vec<[f64; 2]>, StrError> {
        let (qx, qy) = self.nodal_fluxes(state)?;
        Ok((0..qx.dim()).map(|i| [qx[i], qy[i]]).collect())
    }

    /// Returns the maximum magnitude of the (projected) nodal heat flux
    pub fn max_flux(&self, state: &FemState) -> Result<f64, StrError> {
        Ok(max_magnitude(&self.nodal_flux_vectors(state)?))
    }

    /// Returns the temperatures at the points of the boundaries of the selected batteries
    ///
    /// An empty selection means all batteries.
    pub fn battery_boundary_temperatures(&self, state: &FemState, selection: &[usize]) -> Result<Vec<f64>, StrError> {
        let mut ids: Vec<_> = self
            .mesh
            .heated_facets(selection)?
            .iter()
            .flat_map(|f| f.points)
            .collect();
        ids.sort();
        ids.dedup();
        Ok(ids.iter().map(|id| state.uu[*id]).collect())
    }
}

/// Returns the maximum magnitude of a set of 2D vectors
pub fn max_magnitude(vectors: &[[f64; 2]]) -> f64 {
    vectors
        .iter()
        .fold(0.0, |acc, v| f64::max(acc, f64::sqrt(v[0] * v[0] + v[1] * v[1])))
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
