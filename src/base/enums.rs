use serde::{Deserialize, Serialize};
use std::fmt;

/// Defines essential boundary conditions (EBC) for the temperature
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub enum Ebc {
    /// Constant temperature
    Constant(f64),

    /// Temperature varying linearly with time: `T(t) = initial + rate · t`
    Ramp { initial: f64, rate: f64 },
}

impl Ebc {
    /// Returns the prescribed temperature at time t
    pub fn value(&self, t: f64) -> f64 {
        match self {
            Ebc::Constant(value) => *value,
            Ebc::Ramp { initial, rate } => initial + rate * t,
        }
    }
}

impl fmt::Display for Ebc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T(0) = {:?}, T(1) = {:?}", self.value(0.0), self.value(1.0))
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::Ebc;

    #[test]
    fn ebc_value_works() {
        let ebc = Ebc::Constant(325.0);
        assert_eq!(ebc.value(0.0), 325.0);
        assert_eq!(ebc.value(4.5), 325.0);

        let ebc = Ebc::Ramp {
            initial: 298.0,
            rate: 2.0,
        };
        assert_eq!(ebc.value(0.0), 298.0);
        assert_eq!(ebc.value(0.5), 299.0);
    }

    #[test]
    fn derive_and_display_work() {
        let ebc = Ebc::Ramp {
            initial: 300.0,
            rate: 10.0,
        };
        assert_eq!(format!("{}", ebc), "T(0) = 300.0, T(1) = 310.0");
        let json = serde_json::to_string(&ebc).unwrap();
        let read: Ebc = serde_json::from_str(&json).unwrap();
        assert_eq!(read, ebc);
        assert_eq!(format!("{}", Ebc::Constant(325.0)), "T(0) = 325.0, T(1) = 325.0");
    }
}
