//! Implements the finite element method for the transient heat conduction

mod control_convergence;
mod control_time;
mod element_diffusion;
mod elements;
mod fem_output;
mod fem_output_vtu;
mod fem_state;
mod linear_system;
mod post_processing;
mod prescribed_values;
mod solver_implicit;
pub use crate::fem::control_convergence::*;
pub use crate::fem::control_time::*;
pub use crate::fem::element_diffusion::*;
pub use crate::fem::elements::*;
pub use crate::fem::fem_output::*;
pub use crate::fem::fem_state::*;
pub use crate::fem::linear_system::*;
pub use crate::fem::post_processing::*;
pub use crate::fem::prescribed_values::*;
pub use crate::fem::solver_implicit::*;
