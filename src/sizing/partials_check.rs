use super::{ExplicitComponent, Jacobian, Variables};
use crate::StrError;
use russell_lab::deriv1_central5;
use std::fmt;

/// Holds the comparison of an analytic partial derivative with a numerical one
#[derive(Clone, Debug)]
pub struct PartialCheck {
    /// Name of the output
    pub of: String,

    /// Name of the input
    pub wrt: String,

    /// Index of the node
    pub node: usize,

    /// True if the (of, wrt) pair has been declared
    pub declared: bool,

    /// Analytic value (zero if not declared)
    pub analytic: f64,

    /// Numerical value (central differences)
    pub numerical: f64,

    /// Absolute error
    pub abs_error: f64,

    /// Relative error (equal to the absolute error if the numerical value is zero)
    pub rel_error: f64,
}

/// Holds the results of check_partials
#[derive(Clone, Debug)]
pub struct PartialsReport {
    /// Holds all comparisons
    pub entries: Vec<PartialCheck>,
}

impl PartialsReport {
    /// Returns the maximum absolute error
    pub fn max_abs_error(&self) -> f64 {
        self.entries.iter().fold(0.0, |acc, e| f64::max(acc, e.abs_error))
    }

    /// Returns the maximum relative error
    pub fn max_rel_error(&self) -> f64 {
        self.entries.iter().fold(0.0, |acc, e| f64::max(acc, e.rel_error))
    }
}

impl fmt::Display for PartialsReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "{:>10} {:>8} {:>5} {:>14} {:>14} {:>10} {:>10}",
            "of", "wrt", "node", "analytic", "numerical", "abs err", "rel err"
        )?;
        for e in &self.entries {
            let mark = if e.declared { "" } else { " (undeclared)" };
            writeln!(
                f,
                "{:>10} {:>8} {:>5} {:>14.6e} {:>14.6e} {:>10.2e} {:>10.2e}{}",
                e.of, e.wrt, e.node, e.analytic, e.numerical, e.abs_error, e.rel_error, mark
            )?;
        }
        Ok(())
    }
}

/// Holds the arguments of the function used to compute the numerical derivatives
struct ArgsForCheck {
    inputs: Variables,
    outputs: Variables,
}

impl ArgsForCheck {
    /// Computes an output value with one input value replaced by x
    ///
    /// The input value is restored even if the computation fails.
    fn perturbed_output<C>(&mut self, component: &C, wrt: &str, of: &str, node: usize, x: f64) -> Result<f64, StrError>
    where
        C: ExplicitComponent,
    {
        let x0 = {
            let values = self.inputs.get_mut(wrt)?;
            let x0 = values[node];
            values[node] = x;
            x0
        };
        let res = component.compute(&self.inputs, &mut self.outputs);
        self.inputs.get_mut(wrt)?[node] = x0;
        res?;
        Ok(self.outputs.get(of)?[node])
    }
}

/// Compares the analytic partial derivatives with the ones computed by central differences
///
/// All (output, input) pairs are compared at every node, including the undeclared pairs
/// whose analytic value is zero. The step is relative to the input value; i.e., the
/// derivative is computed with respect to `s` with `x = x₀ (1 + s)` and divided by `x₀`
/// (or with `x = s` if `x₀ = 0`).
pub fn check_partials<C>(component: &C, inputs: &Variables) -> Result<PartialsReport, StrError>
where
    C: ExplicitComponent,
{
    let meta = component.setup()?;
    meta.check_inputs(inputs)?;

    // analytic partial derivatives
    let mut jacobian = Jacobian::new(&meta);
    component.compute_partials(inputs, &mut jacobian)?;
    jacobian.check_complete()?;

    // numerical partial derivatives
    let mut args = ArgsForCheck {
        inputs: inputs.clone(),
        outputs: meta.alloc_outputs(),
    };
    let mut entries = Vec::new();
    for out in &meta.outputs {
        for inp in &meta.inputs {
            let declared = meta.is_declared(&out.name, &inp.name);
            for node in 0..usize::min(out.size, inp.size) {
                let x0 = inputs.get(&inp.name)?[node];
                let scale = if x0 != 0.0 { x0 } else { 1.0 };
                let res = deriv1_central5(0.0, &mut args, |s, a| {
                    a.perturbed_output(component, &inp.name, &out.name, node, x0 + scale * s)
                })?;
                let numerical = res / scale;
                let analytic = if declared {
                    match jacobian.get(&out.name, &inp.name) {
                        Some(values) => values[node],
                        None => 0.0,
                    }
                } else {
                    0.0
                };
                let abs_error = f64::abs(analytic - numerical);
                let rel_error = if numerical != 0.0 {
                    abs_error / f64::abs(numerical)
                } else {
                    abs_error
                };
                entries.push(PartialCheck {
                    of: out.name.clone(),
                    wrt: inp.name.clone(),
                    node,
                    declared,
                    analytic,
                    numerical,
                    abs_error,
                    rel_error,
                });
            }
        }
    }
    Ok(PartialsReport { entries })
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
