use super::FemState;
use crate::base::{Config, CONFIG_MIN_THETA};
use crate::StrError;

/// Assists in the time loop control
///
/// The time increment Δt is constant; thus, the number of timesteps is
///
/// ```text
/// n_steps = ⌈(t_fin - t_ini) / Δt⌉
/// ```
///
/// and the time at the end of a timestep is `t = t_ini + (step + 1) Δt`.
///
/// The essential boundary conditions are evaluated at `t_ini + Δt/10` during the first
/// timestep; afterwards, they are evaluated at the time corresponding to the beginning
/// of the timestep.
pub struct ControlTime<'a> {
    /// Holds configuration parameters
    config: &'a Config,

    /// Number of timesteps
    n_steps: usize,
}

impl<'a> ControlTime<'a> {
    /// Allocates a new instance
    pub fn new(config: &'a Config) -> Result<Self, StrError> {
        if config.theta < CONFIG_MIN_THETA || config.theta > 1.0 {
            return Err("θ-method requires 1e-5 ≤ θ ≤ 1.0");
        }
        if config.dt < config.dt_min {
            return Err("Δt is smaller than the allowed minimum");
        }
        if config.t_fin < config.t_ini {
            return Err("t_fin must be ≥ t_ini");
        }
        // the ratio may be slightly above an integer due to round-off (e.g., 5.0/0.05)
        let ratio = (config.t_fin - config.t_ini) / config.dt;
        let n_steps = f64::ceil(ratio - 1e-10 * f64::max(1.0, ratio)) as usize;
        Ok(ControlTime { config, n_steps })
    }

    /// Returns the number of timesteps
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Initializes the time and Δt at t_ini
    pub fn initialize(&self, state: &mut FemState) {
        state.t = self.config.t_ini;
        state.dt = self.config.dt;
        state.t_bc = self.config.t_ini;
        state.step = 0;
    }

    /// Updates the clocks at the beginning of a timestep
    pub fn update(&self, state: &mut FemState, step: usize) {
        state.step = step;
        state.dt = self.config.dt;
        state.t_bc = self.bc_time(step);
        state.t = self.time_at(step + 1);
    }

    /// Returns the time after a number of timesteps
    pub fn time_at(&self, n: usize) -> f64 {
        self.config.t_ini + (n as f64) * self.config.dt
    }

    /// Returns the time to evaluate the essential boundary conditions during a timestep
    pub fn bc_time(&self, step: usize) -> f64 {
        if step == 0 {
            self.config.t_ini + self.config.dt / 10.0
        } else {
            self.time_at(step)
        }
    }

    /// Returns true if the results of a timestep must be written out
    pub fn out(&self, step: usize) -> bool {
        step % self.config.out_every == 0
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
