//! Battery pack thermal simulation and heat-pipe sizing
//!
//! The `fem` module solves the transient heat equation over the cross-section of a
//! battery pack (a copper plate with circular cutouts holding a grid of battery cells).
//! The `sizing` module implements the heat-pipe core geometry component with analytic
//! partial derivatives for gradient-based design optimization.

/// Defines a type alias for the error type as a static string
pub type StrError = &'static str;

pub mod base;
pub mod fem;
pub mod mesh;
pub mod prelude;
pub mod sizing;
