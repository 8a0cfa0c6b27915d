//! Implements the heat-pipe sizing components with analytic partial derivatives

mod component;
mod core_geometries;
mod partials_check;
pub use crate::sizing::component::*;
pub use crate::sizing::core_geometries::*;
pub use crate::sizing::partials_check::*;
