//! Makes available common structures needed to run a simulation
//!
//! You may write `use boring_battery::prelude::*` in your code and obtain
//! access to commonly used functionality.

pub use crate::base::{Config, Ebc, Essential, ParamConductivity, ParamPack, DEFAULT_OUT_DIR, DEFAULT_TEST_DIR};
pub use crate::fem::{FemOutput, FemSolverImplicit, FemState, Phase, PostProc};
pub use crate::mesh::{Generator, Mesh, PackGeometry};
pub use crate::sizing::{check_partials, ComponentMeta, CoreGeometries, ExplicitComponent, Jacobian, Variables};
