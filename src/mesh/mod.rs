//! Implements the battery pack geometry and its triangular mesh

mod draw;
mod generator;
mod geometry;
mod mesh;
mod point_merger;
mod samples;
pub use crate::mesh::draw::*;
pub use crate::mesh::generator::*;
pub use crate::mesh::geometry::*;
pub use crate::mesh::mesh::*;
pub use crate::mesh::point_merger::*;
pub use crate::mesh::samples::*;
