//! Implements the base structures for a battery pack simulation

mod config;
mod constants;
mod enums;
mod essential;
mod param_conductivity;
mod param_pack;
pub use crate::base::config::*;
pub use crate::base::constants::*;
pub use crate::base::enums::*;
pub use crate::base::essential::*;
pub use crate::base::param_conductivity::*;
pub use crate::base::param_pack::*;
