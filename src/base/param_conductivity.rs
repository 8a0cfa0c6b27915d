use super::BACKGROUND_MARKER;
use crate::StrError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Holds the (isotropic) thermal conductivity of the pack materials
///
/// The conductivity is piecewise constant and is looked up by the cell marker:
/// marker 0 is the copper background; any other marker is a battery sub-domain.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ParamConductivity {
    /// Conductivity of the background plate (copper)
    pub background: f64,

    /// Conductivity of all battery sub-domains (aluminum)
    pub battery: f64,

    /// Conductivity of specific battery sub-domains (overrides `battery`)
    pub subdomains: BTreeMap<usize, f64>,
}

impl ParamConductivity {
    /// Allocates a new instance with the copper/aluminum values
    pub fn new() -> Self {
        ParamConductivity {
            background: 11.4,
            battery: 1.0,
            subdomains: BTreeMap::new(),
        }
    }

    /// Sets the conductivity of a single battery sub-domain
    pub fn set_subdomain(&mut self, marker: usize, value: f64) -> Result<&mut Self, StrError> {
        if marker == BACKGROUND_MARKER {
            return Err("marker 0 is reserved for the background");
        }
        if value <= 0.0 {
            return Err("conductivity must be > 0.0");
        }
        self.subdomains.insert(marker, value);
        Ok(self)
    }

    /// Returns the conductivity corresponding to a cell marker
    pub fn value(&self, marker: usize) -> f64 {
        if marker == BACKGROUND_MARKER {
            self.background
        } else {
            match self.subdomains.get(&marker) {
                Some(k) => *k,
                None => self.battery,
            }
        }
    }

    /// Returns an error message if some value is invalid
    pub fn validate(&self) -> Option<String> {
        if self.background <= 0.0 {
            return Some(format!("background conductivity = {:?} is incorrect; it must be > 0.0", self.background));
        }
        if self.battery <= 0.0 {
            return Some(format!("battery conductivity = {:?} is incorrect; it must be > 0.0", self.battery));
        }
        for (marker, k) in &self.subdomains {
            if *marker == BACKGROUND_MARKER || *k <= 0.0 {
                return Some(format!("conductivity of sub-domain {} = {:?} is incorrect", marker, k));
            }
        }
        None
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
