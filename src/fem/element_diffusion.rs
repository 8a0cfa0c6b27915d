use super::FemState;
use crate::base::Config;
use crate::mesh::{signed_double_area, Cell, Mesh};
use crate::StrError;
use russell_lab::{Matrix, Vector};

/// Implements the local equations of the transient heat conduction with a linear triangle
///
/// The local residual of the θ-method is
///
/// ```text
///      ρc
/// r = ─── M (u - uₒ) + K (θ u + (1 - θ) uₒ) - f
///      Δt
/// ```
///
/// where `uₒ` are the temperatures at the previous timestep, `K = k A Bᵀ B` is the
/// conductivity matrix, `M` is the (consistent or lumped) mass matrix, and `f = s A / 3`
/// holds the nodal contributions of a volumetric heat source `s`.
///
/// The local Jacobian matrix is `J = (ρc/Δt) M + θ K` and does not depend on the temperature.
pub struct ElementDiffusion<'a> {
    /// Holds configuration parameters
    config: &'a Config,

    /// Holds the local-to-global mapping (there is one equation per point)
    pub local_to_global: Vec<usize>,

    /// Area of the triangle
    pub area: f64,

    /// Gradients of the shape functions (constant): `gg[m] = ∂Nm/∂x`
    pub gg: [[f64; 2]; 3],

    /// Thermal conductivity
    pub conductivity: f64,

    /// Volumetric heat source
    pub source: f64,

    /// Conductivity matrix
    kk: Matrix,

    /// Mass matrix
    mm: Matrix,
}

impl<'a> ElementDiffusion<'a> {
    /// Allocates a new instance
    pub fn new(mesh: &Mesh, config: &'a Config, cell: &Cell) -> Result<Self, StrError> {
        // coordinates
        let xx = [
            mesh.points[cell.points[0]].coords,
            mesh.points[cell.points[1]].coords,
            mesh.points[cell.points[2]].coords,
        ];
        let two_area = signed_double_area(&xx[0], &xx[1], &xx[2]);
        if two_area <= 0.0 {
            return Err("the area of the triangle must be positive");
        }
        let area = two_area / 2.0;

        // gradients: ∂Nm/∂x = (yj - yk) / 2A and ∂Nm/∂y = (xk - xj) / 2A
        let mut gg = [[0.0; 2]; 3];
        for m in 0..3 {
            let j = (m + 1) % 3;
            let k = (m + 2) % 3;
            gg[m][0] = (xx[j][1] - xx[k][1]) / two_area;
            gg[m][1] = (xx[k][0] - xx[j][0]) / two_area;
        }

        // materials
        let conductivity = config.conductivity.value(cell.marker);
        let source = match config.heat_source.get(&cell.marker) {
            Some(s) => *s,
            None => 0.0,
        };

        // local matrices
        let mut kk = Matrix::new(3, 3);
        let mut mm = Matrix::new(3, 3);
        for m in 0..3 {
            for n in 0..3 {
                kk.set(m, n, conductivity * area * (gg[m][0] * gg[n][0] + gg[m][1] * gg[n][1]));
                if config.lumped_mass {
                    mm.set(m, n, if m == n { area / 3.0 } else { 0.0 });
                } else {
                    mm.set(m, n, if m == n { area / 6.0 } else { area / 12.0 });
                }
            }
        }

        Ok(ElementDiffusion {
            config,
            local_to_global: cell.points.to_vec(),
            area,
            gg,
            conductivity,
            source,
            kk,
            mm,
        })
    }

    /// Calculates the residual vector
    pub fn calc_residual(&self, residual: &mut Vector, state: &FemState) {
        let alpha = self.config.rho_cp / state.dt;
        let theta = self.config.theta;
        for m in 0..3 {
            let mut r = -self.source * self.area / 3.0;
            for n in 0..3 {
                let g = self.local_to_global[n];
                let u = state.uu[g];
                let u_old = state.uu_old[g];
                r += alpha * self.mm.get(m, n) * (u - u_old);
                r += self.kk.get(m, n) * (theta * u + (1.0 - theta) * u_old);
            }
            residual[m] = r;
        }
    }

    /// Calculates the Jacobian matrix
    pub fn calc_jacobian(&self, jacobian: &mut Matrix, state: &FemState) {
        let alpha = self.config.rho_cp / state.dt;
        let theta = self.config.theta;
        for m in 0..3 {
            for n in 0..3 {
                jacobian.set(m, n, alpha * self.mm.get(m, n) + theta * self.kk.get(m, n));
            }
        }
    }

    /// Calculates the (constant) temperature gradient
    pub fn gradient(&self, uu: &Vector) -> [f64; 2] {
        let mut grad = [0.0; 2];
        for m in 0..3 {
            let u = uu[self.local_to_global[m]];
            grad[0] += self.gg[m][0] * u;
            grad[1] += self.gg[m][1] * u;
        }
        grad
    }

    /// Calculates the heat flux `q = -k ∇u`
    pub fn flux(&self, uu: &Vector) -> [f64; 2] {
        let grad = self.gradient(uu);
        [-self.conductivity * grad[0], -self.conductivity * grad[1]]
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::ElementDiffusion;
    use crate::base::Config;
    use crate::fem::FemState;
    use crate::mesh::{Cell, Mesh, Samples};
    use russell_lab::{approx_eq, mat_approx_eq, Matrix, Vector};

    fn one_triangle() -> Mesh {
        //  2
        //  |\
        //  | \
        //  |  \
        //  0---1
        Mesh::new(vec![[0.0, 0.0], [2.0, 0.0], [0.0, 2.0]], vec![(1, [0, 1, 2])]).unwrap()
    }

    #[test]
    fn new_captures_errors() {
        let mut mesh = one_triangle();
        mesh.points[2].coords = [4.0, 0.0]; // << collinear (never do this)
        let config = Config::new();
        assert_eq!(
            ElementDiffusion::new(&mesh, &config, &mesh.cells[0]).err(),
            Some("the area of the triangle must be positive")
        );
    }

    #[test]
    fn local_matrices_are_correct() {
        let mesh = one_triangle();
        let mut config = Config::new();
        config.set_heat_source(1, 6.0).unwrap();
        let elem = ElementDiffusion::new(&mesh, &config, &mesh.cells[0]).unwrap();
        assert_eq!(elem.area, 2.0);
        assert_eq!(elem.conductivity, 1.0);
        assert_eq!(elem.source, 6.0);

        // B = [[-1/2, -1/2], [1/2, 0], [0, 1/2]] and K = k A B Bᵀ
        let kk_correct = Matrix::from(&[
            [1.0, -0.5, -0.5], //
            [-0.5, 0.5, 0.0],  //
            [-0.5, 0.0, 0.5],  //
        ]);
        mat_approx_eq(&elem.kk, &kk_correct, 1e-15);

        // consistent mass
        let a = 2.0 / 12.0;
        let mm_correct = Matrix::from(&[
            [2.0 * a, a, a], //
            [a, 2.0 * a, a], //
            [a, a, 2.0 * a], //
        ]);
        mat_approx_eq(&elem.mm, &mm_correct, 1e-15);

        // lumped mass
        config.set_lumped_mass(true).unwrap();
        let elem = ElementDiffusion::new(&mesh, &config, &mesh.cells[0]).unwrap();
        let b = 2.0 / 3.0;
        let mm_correct = Matrix::from(&[
            [b, 0.0, 0.0], //
            [0.0, b, 0.0], //
            [0.0, 0.0, b], //
        ]);
        mat_approx_eq(&elem.mm, &mm_correct, 1e-15);
    }

    #[test]
    fn residual_vanishes_for_uniform_steady_field() {
        let mesh = one_triangle();
        let config = Config::new();
        let elem = ElementDiffusion::new(&mesh, &config, &mesh.cells[0]).unwrap();
        let state = FemState::new(&mesh, &config).unwrap();
        let mut residual = Vector::new(3);
        elem.calc_residual(&mut residual, &state);
        for m in 0..3 {
            approx_eq(residual[m], 0.0, 1e-12);
        }
    }

    #[test]
    fn jacobian_matches_numerical_derivative() {
        let mesh = Samples::two_squares();
        let mut config = Config::new();
        config.set_theta(0.5).unwrap().set_heat_source(0, 3.0).unwrap();
        let mut state = FemState::new(&mesh, &config).unwrap();
        for i in 0..mesh.points.len() {
            state.uu[i] = 300.0 + 2.0 * mesh.points[i].coords[0] - mesh.points[i].coords[1];
        }
        for cell in &mesh.cells {
            let elem = ElementDiffusion::new(&mesh, &config, cell).unwrap();
            let mut jacobian = Matrix::new(3, 3);
            elem.calc_jacobian(&mut jacobian, &state);
            let mut residual = Vector::new(3);
            for n in 0..3 {
                let g = elem.local_to_global[n];
                let u = state.uu[g];
                let h = 1e-3;
                let mut r_plus = Vector::new(3);
                state.uu[g] = u + h;
                elem.calc_residual(&mut r_plus, &state);
                state.uu[g] = u - h;
                elem.calc_residual(&mut residual, &state);
                state.uu[g] = u;
                for m in 0..3 {
                    // the residual is linear in u; thus, central differences are exact
                    approx_eq(jacobian.get(m, n), (r_plus[m] - residual[m]) / (2.0 * h), 1e-8);
                }
            }
        }
    }

    #[test]
    fn gradient_and_flux_work() {
        let mesh = Samples::two_squares();
        let config = Config::new();
        let mut state = FemState::new(&mesh, &config).unwrap();
        for i in 0..mesh.points.len() {
            let [x, y] = mesh.points[i].coords;
            state.uu[i] = 1.0 + 2.0 * x + 3.0 * y;
        }
        let cell = Cell {
            id: 0,
            marker: 0,
            points: mesh.cells[2].points,
        };
        for c in [&mesh.cells[0], &cell] {
            let elem = ElementDiffusion::new(&mesh, &config, c).unwrap();
            let grad = elem.gradient(&state.uu);
            approx_eq(grad[0], 2.0, 1e-14);
            approx_eq(grad[1], 3.0, 1e-14);
            let k = config.conductivity.value(c.marker);
            let q = elem.flux(&state.uu);
            approx_eq(q[0], -2.0 * k, 1e-13);
            approx_eq(q[1], -3.0 * k, 1e-13);
        }
    }
}
