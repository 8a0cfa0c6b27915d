use crate::base::Config;
use crate::StrError;
use russell_lab::{vec_norm, Norm, Vector};

/// Controls the convergence of the iterations within a timestep
///
/// Convergence is reached when the max norm of the residual vector is smaller than
/// `tol_rr_abs`, or when a linear problem has been updated once.
pub struct ControlConvergence<'a> {
    config: &'a Config,
    iteration: usize,
    norm_rr_prev: f64,
    norm_rr: f64,
    converged_on_norm_rr: bool,
    diverging_on_norm_rr: bool,
    converged_linear_problem: bool,
    n_converged_total: usize,
}

impl<'a> ControlConvergence<'a> {
    /// Creates a new convergence controller
    pub fn new(config: &'a Config) -> Self {
        ControlConvergence {
            config,
            iteration: 0,
            norm_rr_prev: 0.0,
            norm_rr: 0.0,
            converged_on_norm_rr: false,
            diverging_on_norm_rr: false,
            converged_linear_problem: false,
            n_converged_total: 0,
        }
    }

    /// Resets convergence flags for a new timestep
    pub fn reset(&mut self) {
        self.iteration = 0;
        self.converged_on_norm_rr = false;
        self.diverging_on_norm_rr = false;
        self.converged_linear_problem = false;
    }

    /// Marks the timestep as converged for linear problems
    pub fn set_converged_linear_problem(&mut self) {
        self.converged_linear_problem = true;
    }

    /// Increments the total number of converged timesteps
    pub fn add_converged(&mut self) {
        self.n_converged_total += 1;
    }

    /// Returns the total number of converged timesteps
    pub fn n_converged_total(&self) -> usize {
        self.n_converged_total
    }

    /// Returns the max norm of the residual vector at the last iteration
    pub fn norm_rr(&self) -> f64 {
        self.norm_rr
    }

    /// Checks if the timestep has converged
    pub fn converged(&self) -> bool {
        self.converged_on_norm_rr || self.converged_linear_problem
    }

    /// Analyzes the residual vector
    ///
    /// Returns an error if NaN or Inf values are found.
    pub fn analyze_rr(&mut self, iteration: usize, rr: &Vector) -> Result<(), StrError> {
        self.iteration = iteration;
        self.norm_rr = vec_norm(rr, Norm::Max);
        let found_nan_or_inf = !self.norm_rr.is_finite();
        self.converged_on_norm_rr = if found_nan_or_inf {
            false
        } else {
            self.norm_rr < self.config.tol_rr_abs
        };
        self.diverging_on_norm_rr = if found_nan_or_inf || iteration == 0 {
            false
        } else {
            self.norm_rr > self.norm_rr_prev
        };
        self.norm_rr_prev = self.norm_rr;
        if found_nan_or_inf {
            Err("found NaN or Inf in the residual vector")
        } else {
            Ok(())
        }
    }

    /// Prints the header of the table with timesteps and iterations
    pub fn print_header(&self) {
        if self.config.verbose_timesteps || self.config.verbose_iterations {
            println!("\nBORING === TIME STEPPING AND CONVERGENCE STATISTICS ===========================");
            println!("\nLegend:");
            println!("✅ : converged");
            println!("🔹 : converging");
            println!("🎈 : diverging");
            println!("\"iter\" means iteration\n");
            println!("{}", "─".repeat(79));
            println!(
                "{:>8} {:>11} {:>11} {:>5} {:>11} {:>11}",
                "timestep", "t", "Δt", "iter", "‖R‖∞", "T(bc)"
            );
            println!("{}", "─".repeat(79));
        }
    }

    /// Prints timestep information
    pub fn print_timestep(&self, step: usize, t: f64, dt: f64, t_bc: f64) {
        if self.config.verbose_timesteps {
            println!(
                "{:>8} {:>11.6e} {:>11.6e} {:>5} {:>11} {:>11.4}",
                step + 1,
                t,
                dt,
                "",
                "",
                self.config.ebc.value(t_bc)
            );
        }
    }

    /// Prints iteration information
    pub fn print_iteration(&self) {
        if self.config.verbose_iterations {
            let icon = if self.converged_on_norm_rr {
                "✅"
            } else if self.diverging_on_norm_rr {
                "🎈"
            } else {
                "🔹"
            };
            println!(
                "{:>8} {:>11} {:>11} {:>5} {:>11.2e} {}",
                "·", "·", "·", self.iteration, self.norm_rr, icon
            );
        }
    }

    /// Prints the horizontal line at the end of the analysis
    pub fn print_footer(&self) {
        if self.config.verbose_timesteps || self.config.verbose_iterations {
            println!("{}", "─".repeat(79));
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
