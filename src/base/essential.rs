use super::Ebc;
use crate::mesh::{Facet, PointId};
use std::collections::HashMap;
use std::fmt;

/// Holds essential boundary conditions
pub struct Essential {
    pub all: HashMap<PointId, Ebc>,
}

impl Essential {
    /// Allocates a new instance
    pub fn new() -> Self {
        Essential { all: HashMap::new() }
    }

    /// Sets essential boundary condition at points
    pub fn at(&mut self, points: &[PointId], ebc: Ebc) -> &mut Self {
        for point_id in points {
            self.all.insert(*point_id, ebc);
        }
        self
    }

    /// Sets essential boundary condition on facets
    pub fn on(&mut self, facets: &[&Facet], ebc: Ebc) -> &mut Self {
        for facet in facets {
            for point_id in &facet.points {
                self.all.insert(*point_id, ebc);
            }
        }
        self
    }

    /// Returns the sorted list of points with prescribed values
    pub fn points(&self) -> Vec<PointId> {
        let mut keys: Vec<_> = self.all.keys().copied().collect();
        keys.sort();
        keys
    }
}

impl fmt::Display for Essential {
    /// Prints a formatted summary of Boundary Conditions
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Essential boundary conditions\n")?;
        write!(f, "=============================\n")?;
        for key in self.points() {
            if let Some(ebc) = self.all.get(&key) {
                write!(f, "{:?} : {}\n", key, ebc)?;
            }
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
