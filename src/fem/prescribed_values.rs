use crate::base::{Ebc, Essential};
use crate::mesh::{Mesh, Point, PointId};
use crate::StrError;
use russell_lab::Vector;

/// Assists in calculating prescribed values
pub struct PrescribedValue<'a> {
    /// Point corresponding to the prescribed value
    pub point: &'a Point,

    /// Essential boundary condition
    pub ebc: Ebc,

    /// Equation corresponding to the prescribed value
    pub eq: usize,
}

/// Holds a collection of prescribed (primary) values
pub struct PrescribedValues<'a> {
    /// All values (sorted by equation number)
    pub all: Vec<PrescribedValue<'a>>,

    /// An array indicating which equations are prescribed
    ///
    /// The length of `flags` is equal to the total number of equations (npoint).
    pub flags: Vec<bool>,

    /// Array with only the numbers of the prescribed equations
    pub equations: Vec<usize>,
}

impl<'a> PrescribedValue<'a> {
    /// Allocates new instance
    pub fn new(mesh: &'a Mesh, point_id: PointId, ebc: Ebc) -> Result<Self, StrError> {
        if point_id >= mesh.points.len() {
            return Err("cannot initialize prescribed value because PointId is out-of-bounds");
        }
        Ok(PrescribedValue {
            point: &mesh.points[point_id],
            ebc,
            eq: point_id,
        })
    }

    /// Sets prescribed value in the solution vector
    pub fn set_value(&self, uu: &mut Vector, time: f64) {
        uu[self.eq] = self.ebc.value(time);
    }
}

impl<'a> PrescribedValues<'a> {
    /// Allocates new instance
    pub fn new(mesh: &'a Mesh, essential: &Essential) -> Result<Self, StrError> {
        let mut all = Vec::new();
        let mut flags = vec![false; mesh.points.len()];
        let mut equations = Vec::new();
        for point_id in essential.points() {
            let ebc = essential.all[&point_id];
            let value = PrescribedValue::new(mesh, point_id, ebc)?;
            flags[value.eq] = true;
            equations.push(value.eq);
            all.push(value);
        }
        Ok(PrescribedValues { all, flags, equations })
    }

    /// Sets all prescribed values in the solution vector
    pub fn apply(&self, uu: &mut Vector, time: f64) {
        for p in &self.all {
            p.set_value(uu, time);
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{PrescribedValue, PrescribedValues};
    use crate::base::{Ebc, Essential};
    use crate::mesh::Samples;
    use russell_lab::Vector;

    #[test]
    fn new_captures_errors() {
        let mesh = Samples::two_squares();
        assert_eq!(
            PrescribedValue::new(&mesh, 100, Ebc::Constant(1.0)).err(),
            Some("cannot initialize prescribed value because PointId is out-of-bounds")
        );
        let mut essential = Essential::new();
        essential.at(&[0, 100], Ebc::Constant(1.0));
        assert_eq!(
            PrescribedValues::new(&mesh, &essential).err(),
            Some("cannot initialize prescribed value because PointId is out-of-bounds")
        );
    }

    #[test]
    fn new_works() {
        let mesh = Samples::two_squares();
        let mut essential = Essential::new();
        let facets = mesh.heated_facets(&[]).unwrap();
        essential.on(&facets, Ebc::Constant(325.0));
        let values = PrescribedValues::new(&mesh, &essential).unwrap();
        assert_eq!(values.flags, &[false, true, true, false, false, false]);
        assert_eq!(values.equations, &[1, 2]);
        assert_eq!(values.all.len(), 2);
        assert_eq!(values.all[0].point.id, 1);
        assert_eq!(values.all[1].point.coords, [1.0, 1.0]);
    }

    #[test]
    fn apply_works() {
        let mesh = Samples::two_squares();
        let mut essential = Essential::new();
        essential
            .at(&[0], Ebc::Constant(325.0))
            .at(&[4, 5], Ebc::Ramp { initial: 298.0, rate: 10.0 });
        let values = PrescribedValues::new(&mesh, &essential).unwrap();
        let mut uu = Vector::filled(6, -1.0);
        values.apply(&mut uu, 0.5);
        assert_eq!(uu.as_data(), &[325.0, -1.0, -1.0, -1.0, 303.0, 303.0]);
    }
}
