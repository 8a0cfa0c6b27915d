use super::{ComponentMeta, ExplicitComponent, Jacobian, Variables};
use crate::StrError;
use std::f64::consts::PI;

/// Computes the cross-sectional and interfacial areas of the heat-pipe core
///
/// ```text
/// A_w      = π ((D_od/2)² - (D_od/2 - t_w)²)    wall cross-section
/// A_wk     = π ((D_od/2 - t_w)² - (D_v/2)²)     wick cross-section
/// A_interc = π D_v L_cond                       vapor/wick interface at the condenser
/// A_intere = π D_v L_evap                       vapor/wick interface at the evaporator
/// ```
///
/// Inputs are lengths in `m` and outputs are areas in `m**2`. Each node is independent.
#[derive(Clone, Debug)]
pub struct CoreGeometries {
    num_nodes: usize,
}

impl CoreGeometries {
    /// Allocates a new instance
    pub fn new(num_nodes: usize) -> Result<Self, StrError> {
        if num_nodes < 1 {
            return Err("num_nodes must be ≥ 1");
        }
        Ok(CoreGeometries { num_nodes })
    }

    /// Returns the number of nodes
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Validates the inputs of one node
    pub fn validate(d_od: f64, t_w: f64, d_v: f64, l_cond: f64, l_evap: f64) -> Result<(), StrError> {
        if !(d_od > 0.0) {
            return Err("D_od must be > 0");
        }
        if !(t_w > 0.0) {
            return Err("t_w must be > 0");
        }
        if !(d_v > 0.0) {
            return Err("D_v must be > 0");
        }
        if !(l_cond > 0.0) {
            return Err("L_cond must be > 0");
        }
        if !(l_evap > 0.0) {
            return Err("L_evap must be > 0");
        }
        if t_w >= d_od / 2.0 {
            return Err("t_w must be < D_od/2");
        }
        if d_v >= d_od - 2.0 * t_w {
            return Err("D_v must be < D_od - 2 t_w");
        }
        Ok(())
    }
}

impl ExplicitComponent for CoreGeometries {
    fn setup(&self) -> Result<ComponentMeta, StrError> {
        let nn = self.num_nodes;
        let mut meta = ComponentMeta::new();
        meta.add_input("D_od", nn, "m", "outer diameter of the pipe")?
            .add_input("t_w", nn, "m", "wall thickness")?
            .add_input("D_v", nn, "m", "diameter of the vapor core")?
            .add_input("L_cond", nn, "m", "length of the condenser")?
            .add_input("L_evap", nn, "m", "length of the evaporator")?
            .add_output("A_w", nn, "m**2", "cross-sectional area of the wall")?
            .add_output("A_wk", nn, "m**2", "cross-sectional area of the wick")?
            .add_output("A_interc", nn, "m**2", "interfacial area at the condenser")?
            .add_output("A_intere", nn, "m**2", "interfacial area at the evaporator")?
            .declare_partials("A_w", &["D_od", "t_w"])?
            .declare_partials("A_wk", &["D_od", "t_w", "D_v"])?
            .declare_partials("A_interc", &["D_v", "L_cond"])?
            .declare_partials("A_intere", &["D_v", "L_evap"])?;
        Ok(meta)
    }

    fn compute(&self, inputs: &Variables, outputs: &mut Variables) -> Result<(), StrError> {
        let (d_od, t_w, d_v, l_cond, l_evap) = extract(inputs, self.num_nodes)?;
        let mut a_w = vec![0.0; self.num_nodes];
        let mut a_wk = vec![0.0; self.num_nodes];
        let mut a_interc = vec![0.0; self.num_nodes];
        let mut a_intere = vec![0.0; self.num_nodes];
        for i in 0..self.num_nodes {
            CoreGeometries::validate(d_od[i], t_w[i], d_v[i], l_cond[i], l_evap[i])?;
            let r_o = d_od[i] / 2.0;
            let r_i = r_o - t_w[i];
            let r_v = d_v[i] / 2.0;
            a_w[i] = PI * (r_o * r_o - r_i * r_i);
            a_wk[i] = PI * (r_i * r_i - r_v * r_v);
            a_interc[i] = PI * d_v[i] * l_cond[i];
            a_intere[i] = PI * d_v[i] * l_evap[i];
        }
        outputs.set("A_w", &a_w);
        outputs.set("A_wk", &a_wk);
        outputs.set("A_interc", &a_interc);
        outputs.set("A_intere", &a_intere);
        Ok(())
    }

    fn compute_partials(&self, inputs: &Variables, jacobian: &mut Jacobian) -> Result<(), StrError> {
        let (d_od, t_w, d_v, l_cond, l_evap) = extract(inputs, self.num_nodes)?;
        for i in 0..self.num_nodes {
            CoreGeometries::validate(d_od[i], t_w[i], d_v[i], l_cond[i], l_evap[i])?;
        }
        let nn = self.num_nodes;
        jacobian.set("A_w", "D_od", &nodal(nn, |i| PI * t_w[i]))?;
        jacobian.set("A_w", "t_w", &nodal(nn, |i| PI * (d_od[i] - 2.0 * t_w[i])))?;
        jacobian.set("A_wk", "D_od", &nodal(nn, |i| PI * (d_od[i] / 2.0 - t_w[i])))?;
        jacobian.set("A_wk", "t_w", &nodal(nn, |i| -PI * (d_od[i] - 2.0 * t_w[i])))?;
        jacobian.set("A_wk", "D_v", &nodal(nn, |i| -PI * d_v[i] / 2.0))?;
        jacobian.set("A_interc", "D_v", &nodal(nn, |i| PI * l_cond[i]))?;
        jacobian.set("A_interc", "L_cond", &nodal(nn, |i| PI * d_v[i]))?;
        jacobian.set("A_intere", "D_v", &nodal(nn, |i| PI * l_evap[i]))?;
        jacobian.set("A_intere", "L_evap", &nodal(nn, |i| PI * d_v[i]))?;
        Ok(())
    }
}

/// Evaluates a function at each node
fn nodal<F>(nn: usize, f: F) -> Vec<f64>
where
    F: Fn(usize) -> f64,
{
    (0..nn).map(f).collect()
}

/// Returns the inputs (D_od, t_w, D_v, L_cond, L_evap) after checking their sizes
fn extract(inputs: &Variables, nn: usize) -> Result<(&[f64], &[f64], &[f64], &[f64], &[f64]), StrError> {
    let d_od = inputs.get("D_od")?;
    let t_w = inputs.get("t_w")?;
    let d_v = inputs.get("D_v")?;
    let l_cond = inputs.get("L_cond")?;
    let l_evap = inputs.get("L_evap")?;
    if [d_od.len(), t_w.len(), d_v.len(), l_cond.len(), l_evap.len()]
        .iter()
        .any(|n| *n != nn)
    {
        return Err("the number of values of an input must be equal to num_nodes");
    }
    Ok((d_od, t_w, d_v, l_cond, l_evap))
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
