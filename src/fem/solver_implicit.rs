use super::{max_magnitude, ControlConvergence, ControlTime, Elements, FemOutput, FemState, LinearSystem, PostProc, PrescribedValues};
use crate::base::{Config, Essential};
use crate::mesh::Mesh;
use crate::StrError;
use russell_lab::vec_copy;
use serde::{Deserialize, Serialize};

/// Indicates the phase of the time stepping
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum Phase {
    /// The solver has been allocated and the state holds the initial values
    Initialized,

    /// A timestep is being solved
    Stepping,

    /// The current timestep has converged
    Converged,

    /// All timesteps have been solved and the post-processing is complete
    Finished,
}

/// Solves the transient heat conduction in the battery pack with the implicit θ-method
///
/// Since the problem is linear and Δt is constant, the global Jacobian matrix is
/// assembled and factorized only once.
pub struct FemSolverImplicit<'a> {
    /// Holds the mesh
    pub mesh: &'a Mesh,

    /// Holds configuration parameters
    pub config: &'a Config,

    /// Holds the current phase
    pub phase: Phase,

    /// Holds a collection of prescribed (primary) values
    pub prescribed_values: PrescribedValues<'a>,

    /// Holds a collection of elements
    pub elements: Elements<'a>,

    /// Holds variables to solve the global linear system
    pub linear_system: LinearSystem<'a>,
}

impl<'a> FemSolverImplicit<'a> {
    /// Allocates a new instance
    pub fn new(mesh: &'a Mesh, config: &'a Config, essential: &Essential) -> Result<Self, StrError> {
        if let Some(_) = config.validate() {
            return Err("cannot allocate simulation because config.validate() failed");
        }
        let prescribed_values = PrescribedValues::new(mesh, essential)?;
        if prescribed_values.equations.len() == 0 {
            return Err("cannot allocate simulation without essential boundary conditions");
        }
        let elements = Elements::new(mesh, config)?;
        let linear_system = LinearSystem::new(&prescribed_values, &elements)?;
        Ok(FemSolverImplicit {
            mesh,
            config,
            phase: Phase::Initialized,
            prescribed_values,
            elements,
            linear_system,
        })
    }

    /// Solves the associated system of partial differential equations
    ///
    /// Returns the maximum magnitude of the (projected) heat flux at the final time.
    pub fn solve(&mut self, state: &mut FemState, output: &mut FemOutput) -> Result<f64, StrError> {
        // writes the current state and summary if an error occurs
        macro_rules! run {
            ($e:expr) => {
                match $e {
                    Ok(val) => val,
                    Err(err) => {
                        match output.write_state(self.mesh, state) {
                            Ok(_) => (),
                            Err(e) => println!("ERROR-ON-ERROR: cannot write state due to: {}", e),
                        }
                        match output.write_summary() {
                            Ok(_) => (),
                            Err(e) => println!("ERROR-ON-ERROR: cannot write summary due to: {}", e),
                        }
                        return Err(err);
                    }
                }
            };
        }

        // check
        if self.phase != Phase::Initialized {
            return Err("the solver can only be run once");
        }
        if state.uu.dim() != self.linear_system.n_equation {
            return Err("the state is incompatible with the mesh");
        }

        // accessors
        let config = self.config;
        let prescribed = &self.prescribed_values.flags;
        let neq = self.linear_system.n_equation;

        // control structures
        let control = ControlTime::new(config)?;
        let mut convergence = ControlConvergence::new(config);
        control.initialize(state);

        // message
        convergence.print_header();

        // time loop
        let mut factorized = false;
        for step in 0..control.n_steps() {
            self.phase = Phase::Stepping;

            // update clocks and old state
            control.update(state, step);
            vec_copy(&mut state.uu_old, &state.uu)?;

            // set prescribed U at the new time (boundary condition clock)
            self.prescribed_values.apply(&mut state.uu, state.t_bc);

            // message
            convergence.print_timestep(step, state.t, state.dt, state.t_bc);
            convergence.reset();

            // iterations
            for iteration in 0..config.n_max_iterations {
                // compute and assemble residuals
                self.elements.calc_residuals(state);
                self.elements.assemble_residuals(&mut self.linear_system.rr, prescribed);

                // check convergence on residual
                run!(convergence.analyze_rr(iteration, &self.linear_system.rr));
                convergence.print_iteration();
                if convergence.converged() {
                    break;
                }

                // compute and factorize the Jacobian matrix (only once because Δt is constant)
                if !factorized {
                    let kk = &mut self.linear_system.kk;
                    self.elements.calc_jacobians(state);
                    self.elements.assemble_jacobians(kk.get_coo_mut()?, prescribed)?;
                    let coo = kk.get_coo_mut()?;
                    for eq in &self.prescribed_values.equations {
                        coo.put(*eq, *eq, 1.0)?;
                    }
                    run!(self.linear_system.solver.actual.factorize(kk, None));
                    factorized = true;
                }

                // solve linear system
                run!(self.linear_system.solver.actual.solve(
                    &mut self.linear_system.mdu,
                    &self.linear_system.kk,
                    &self.linear_system.rr,
                    config.verbose_lin_sys,
                ));

                // update U vector
                for i in 0..neq {
                    state.uu[i] -= self.linear_system.mdu[i];
                }

                // exit if linear problem
                if config.linear_problem {
                    convergence.set_converged_linear_problem();
                    break;
                }

                // check convergence
                if iteration == config.n_max_iterations - 1 {
                    run!(Err("Newton-Raphson did not converge"));
                }
            }
            convergence.add_converged();
            self.phase = Phase::Converged;

            // perform output
            if control.out(step) {
                output.write_state(self.mesh, state)?;
            }
        }

        // message
        convergence.print_footer();

        // heat flux
        let post = PostProc::new(self.mesh, &self.elements)?;
        let fluxes = run!(post.nodal_flux_vectors(state));
        let max_flux = max_magnitude(&fluxes);
        output.write_flux(self.mesh, &fluxes, max_flux)?;
        if config.verbose_timesteps {
            println!("maximum heat flux magnitude = {:?}", max_flux);
        }

        // write the summary file
        output.write_summary()?;
        self.phase = Phase::Finished;
        Ok(max_flux)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{FemSolverImplicit, Phase};
    use crate::base::{Config, Ebc, Essential};
    use crate::fem::{FemOutput, FemState};
    use crate::mesh::{Mesh, Samples};
    use russell_lab::approx_eq;

    fn heated_boundary(mesh: &Mesh, ebc: Ebc) -> Essential {
        let mut essential = Essential::new();
        essential.on(&mesh.heated_facets(&[]).unwrap(), ebc);
        essential
    }

    #[test]
    fn new_captures_errors() {
        let mesh = Samples::two_squares();
        let essential = Essential::new();
        let mut config = Config::new();
        config.theta = 0.0; // << never do this
        assert_eq!(
            FemSolverImplicit::new(&mesh, &config, &essential).err(),
            Some("cannot allocate simulation because config.validate() failed")
        );
        let config = Config::new();
        let mut essential = Essential::new();
        essential.at(&[100], Ebc::Constant(1.0));
        assert_eq!(
            FemSolverImplicit::new(&mesh, &config, &essential).err(),
            Some("cannot initialize prescribed value because PointId is out-of-bounds")
        );
        let essential = Essential::new();
        assert_eq!(
            FemSolverImplicit::new(&mesh, &config, &essential).err(),
            Some("cannot allocate simulation without essential boundary conditions")
        );
    }

    #[test]
    fn solve_captures_errors() {
        let mesh = Samples::two_squares();
        let mut config = Config::new();
        config.set_verbose(false, false, false).unwrap();
        let essential = heated_boundary(&mesh, Ebc::Constant(325.0));
        let mut solver = FemSolverImplicit::new(&mesh, &config, &essential).unwrap();
        let mut output = FemOutput::new();
        let mut state = FemState::new(&mesh, &config).unwrap();
        state.uu = russell_lab::Vector::new(2); // << never do this
        assert_eq!(
            solver.solve(&mut state, &mut output).err(),
            Some("the state is incompatible with the mesh")
        );
        solver.phase = Phase::Finished; // << never do this
        assert_eq!(
            solver.solve(&mut state, &mut output).err(),
            Some("the solver can only be run once")
        );
    }

    #[test]
    fn newton_raphson_failure_is_captured() {
        let mesh = Samples::two_squares();
        let mut config = Config::new();
        config
            .set_verbose(false, false, false)
            .unwrap()
            .set_linear_problem(false)
            .unwrap()
            .set_n_max_iterations(1)
            .unwrap()
            .set_tol_rr_abs(1e-15)
            .unwrap();
        let essential = heated_boundary(&mesh, Ebc::Constant(325.0));
        let mut solver = FemSolverImplicit::new(&mesh, &config, &essential).unwrap();
        let mut output = FemOutput::new();
        let mut state = FemState::new(&mesh, &config).unwrap();
        assert_eq!(
            solver.solve(&mut state, &mut output).err(),
            Some("Newton-Raphson did not converge")
        );
    }

    #[test]
    fn long_timestep_reaches_the_steady_state() {
        // without heat sources and with insulated outer boundaries, the steady
        // state is the uniform temperature prescribed on the battery boundary
        let (_, mesh) = Samples::coarse_single_battery().unwrap();
        let mut config = Config::new();
        config
            .set_verbose(false, false, false)
            .unwrap()
            .set_t_fin(1e8)
            .unwrap()
            .set_dt(1e8)
            .unwrap();
        let essential = heated_boundary(&mesh, Ebc::Constant(325.0));
        let mut solver = FemSolverImplicit::new(&mesh, &config, &essential).unwrap();
        let mut output = FemOutput::new();
        let mut state = FemState::new(&mesh, &config).unwrap();
        let max_flux = solver.solve(&mut state, &mut output).unwrap();
        assert_eq!(solver.phase, Phase::Finished);
        assert_eq!(state.step, 0);
        approx_eq(state.t, 1e8, 1e-6);
        for i in 0..mesh.points.len() {
            approx_eq(state.uu[i], 325.0, 1e-5);
        }
        assert!(max_flux < 1e-3);
    }

    #[test]
    fn transient_heating_is_bounded() {
        let (_, mesh) = Samples::coarse_single_battery().unwrap();
        let mut config = Config::new();
        config
            .set_verbose(false, false, false)
            .unwrap()
            .set_t_fin(0.5)
            .unwrap()
            .set_lumped_mass(true)
            .unwrap();
        let essential = heated_boundary(&mesh, Ebc::Constant(325.0));
        let mut solver = FemSolverImplicit::new(&mesh, &config, &essential).unwrap();
        let mut output = FemOutput::new();
        let mut state = FemState::new(&mesh, &config).unwrap();
        let max_flux = solver.solve(&mut state, &mut output).unwrap();
        assert_eq!(state.step, 9);
        approx_eq(state.t, 0.5, 1e-14);
        approx_eq(state.t_bc, 0.45, 1e-14);
        let (tmin, tmax) = state.range();
        assert!(tmin > 297.5);
        assert!(tmax < 325.5);
        for id in essential.points() {
            approx_eq(state.uu[id], 325.0, 1e-12);
        }
        assert!(max_flux > 0.0);
    }

    #[test]
    fn ramp_follows_the_boundary_clock() {
        let (_, mesh) = Samples::coarse_single_battery().unwrap();
        let ebc = Ebc::Ramp {
            initial: 298.0,
            rate: 4.0,
        };
        let essential = heated_boundary(&mesh, ebc);
        let mut config = Config::new();
        config
            .set_verbose(false, false, false)
            .unwrap()
            .set_dt(0.25)
            .unwrap()
            .set_t_fin(0.25)
            .unwrap()
            .set_ebc(ebc)
            .unwrap();

        // first timestep: t_bc = t_ini + Δt/10
        let mut solver = FemSolverImplicit::new(&mesh, &config, &essential).unwrap();
        let mut output = FemOutput::new();
        let mut state = FemState::new(&mesh, &config).unwrap();
        solver.solve(&mut state, &mut output).unwrap();
        assert_eq!(state.step, 0);
        approx_eq(state.t_bc, 0.025, 1e-15);
        for id in essential.points() {
            approx_eq(state.uu[id], 298.0 + 4.0 * 0.025, 1e-12);
        }

        // timestep k > 0: t_bc = t_ini + k Δt
        config.set_t_fin(1.0).unwrap();
        let mut solver = FemSolverImplicit::new(&mesh, &config, &essential).unwrap();
        let mut state = FemState::new(&mesh, &config).unwrap();
        solver.solve(&mut state, &mut output).unwrap();
        assert_eq!(state.step, 3);
        approx_eq(state.t_bc, 0.75, 1e-15);
        for id in essential.points() {
            approx_eq(state.uu[id], 298.0 + 4.0 * 3.0 * 0.25, 1e-12);
        }
        let (tmin, tmax) = state.range();
        assert!(tmin > 297.5);
        assert!(tmax < 301.5);
    }

    #[test]
    fn nonlinear_iterations_converge_in_one_update() {
        let (_, mesh) = Samples::coarse_single_battery().unwrap();
        let mut config = Config::new();
        config
            .set_verbose(false, false, false)
            .unwrap()
            .set_t_fin(0.1)
            .unwrap()
            .set_linear_problem(false)
            .unwrap()
            .set_n_max_iterations(2)
            .unwrap()
            .set_tol_rr_abs(1e-6)
            .unwrap();
        let essential = heated_boundary(&mesh, Ebc::Constant(325.0));
        let mut solver = FemSolverImplicit::new(&mesh, &config, &essential).unwrap();
        let mut output = FemOutput::new();
        let mut state_nonlinear = FemState::new(&mesh, &config).unwrap();
        solver.solve(&mut state_nonlinear, &mut output).unwrap();

        config.set_linear_problem(true).unwrap();
        let mut solver = FemSolverImplicit::new(&mesh, &config, &essential).unwrap();
        let mut state_linear = FemState::new(&mesh, &config).unwrap();
        solver.solve(&mut state_linear, &mut output).unwrap();
        for i in 0..mesh.points.len() {
            approx_eq(state_nonlinear.uu[i], state_linear.uu[i], 1e-10);
        }
    }
}
