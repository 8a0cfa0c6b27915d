use crate::StrError;
use std::collections::BTreeMap;

/// Holds the description of an input or output variable
#[derive(Clone, Debug, PartialEq)]
pub struct Variable {
    /// Name of the variable
    pub name: String,

    /// Number of values (e.g., the number of nodes)
    pub size: usize,

    /// Units, e.g., "m" or "m**2"
    pub units: String,

    /// Description
    pub desc: String,
}

/// Holds the meta data of an explicit component (variables and declared partial derivatives)
#[derive(Clone, Debug)]
pub struct ComponentMeta {
    /// Holds the input variables
    pub inputs: Vec<Variable>,

    /// Holds the output variables
    pub outputs: Vec<Variable>,

    /// Holds the declared (of, wrt) pairs of partial derivatives
    pub partials: Vec<(String, String)>,
}

impl ComponentMeta {
    /// Allocates a new instance without variables
    pub fn new() -> Self {
        ComponentMeta {
            inputs: Vec::new(),
            outputs: Vec::new(),
            partials: Vec::new(),
        }
    }

    /// Adds an input variable
    pub fn add_input(&mut self, name: &str, size: usize, units: &str, desc: &str) -> Result<&mut Self, StrError> {
        if self.has_variable(name) {
            return Err("variable has already been added");
        }
        if size < 1 {
            return Err("the size of a variable must be ≥ 1");
        }
        self.inputs.push(Variable {
            name: name.to_string(),
            size,
            units: units.to_string(),
            desc: desc.to_string(),
        });
        Ok(self)
    }

    /// Adds an output variable
    pub fn add_output(&mut self, name: &str, size: usize, units: &str, desc: &str) -> Result<&mut Self, StrError> {
        if self.has_variable(name) {
            return Err("variable has already been added");
        }
        if size < 1 {
            return Err("the size of a variable must be ≥ 1");
        }
        self.outputs.push(Variable {
            name: name.to_string(),
            size,
            units: units.to_string(),
            desc: desc.to_string(),
        });
        Ok(self)
    }

    /// Declares the partial derivatives of an output with respect to some inputs
    pub fn declare_partials(&mut self, of: &str, wrt: &[&str]) -> Result<&mut Self, StrError> {
        if self.output(of).is_none() {
            return Err("partial derivatives must be declared for an existing output");
        }
        for w in wrt {
            if self.input(w).is_none() {
                return Err("partial derivatives must be declared with respect to an existing input");
            }
            if !self.is_declared(of, w) {
                self.partials.push((of.to_string(), w.to_string()));
            }
        }
        Ok(self)
    }

    /// Returns the input variable with a given name
    pub fn input(&self, name: &str) -> Option<&Variable> {
        self.inputs.iter().find(|v| v.name == name)
    }

    /// Returns the output variable with a given name
    pub fn output(&self, name: &str) -> Option<&Variable> {
        self.outputs.iter().find(|v| v.name == name)
    }

    /// Returns true if the (of, wrt) pair has been declared
    pub fn is_declared(&self, of: &str, wrt: &str) -> bool {
        self.partials.iter().any(|(o, w)| o == of && w == wrt)
    }

    /// Allocates the outputs with zero values
    pub fn alloc_outputs(&self) -> Variables {
        let mut outputs = Variables::new();
        for v in &self.outputs {
            outputs.values.insert(v.name.clone(), vec![0.0; v.size]);
        }
        outputs
    }

    /// Checks that the inputs are consistent with the declared input variables
    pub fn check_inputs(&self, inputs: &Variables) -> Result<(), StrError> {
        for v in &self.inputs {
            let values = inputs.get(&v.name)?;
            if values.len() != v.size {
                return Err("the number of values of an input is incorrect");
            }
        }
        Ok(())
    }
}

/// Holds the values of a set of named variables
#[derive(Clone, Debug, PartialEq)]
pub struct Variables {
    /// Maps names to values
    pub values: BTreeMap<String, Vec<f64>>,
}

impl Variables {
    /// Allocates an empty set
    pub fn new() -> Self {
        Variables { values: BTreeMap::new() }
    }

    /// Sets the values of a variable
    pub fn set(&mut self, name: &str, values: &[f64]) -> &mut Self {
        self.values.insert(name.to_string(), values.to_vec());
        self
    }

    /// Returns the values of a variable
    pub fn get(&self, name: &str) -> Result<&[f64], StrError> {
        match self.values.get(name) {
            Some(v) => Ok(v.as_slice()),
            None => Err("cannot find variable"),
        }
    }

    /// Returns the mutable values of a variable
    pub fn get_mut(&mut self, name: &str) -> Result<&mut Vec<f64>, StrError> {
        match self.values.get_mut(name) {
            Some(v) => Ok(v),
            None => Err("cannot find variable"),
        }
    }
}

/// Holds the (diagonal) sub-Jacobians of the declared (of, wrt) pairs
///
/// Each node is independent; thus, only the diagonal of each sub-Jacobian is stored.
#[derive(Clone, Debug)]
pub struct Jacobian {
    sizes: BTreeMap<String, usize>,
    values: BTreeMap<(String, String), Option<Vec<f64>>>,
}

impl Jacobian {
    /// Allocates a new instance with the declared pairs (not yet computed)
    pub fn new(meta: &ComponentMeta) -> Self {
        let mut sizes = BTreeMap::new();
        for v in &meta.outputs {
            sizes.insert(v.name.clone(), v.size);
        }
        let values = meta
            .partials
            .iter()
            .map(|(of, wrt)| ((of.clone(), wrt.clone()), None))
            .collect();
        Jacobian { sizes, values }
    }

    /// Sets the diagonal of the sub-Jacobian ∂of/∂wrt
    pub fn set(&mut self, of: &str, wrt: &str, values: &[f64]) -> Result<(), StrError> {
        let size = match self.sizes.get(of) {
            Some(n) => *n,
            None => return Err("cannot set partial derivative of an undeclared pair"),
        };
        match self.values.get_mut(&(of.to_string(), wrt.to_string())) {
            Some(entry) => {
                if values.len() != size {
                    return Err("the number of partial derivative values is incorrect");
                }
                *entry = Some(values.to_vec());
                Ok(())
            }
            None => Err("cannot set partial derivative of an undeclared pair"),
        }
    }

    /// Returns the diagonal of the sub-Jacobian ∂of/∂wrt, if computed
    pub fn get(&self, of: &str, wrt: &str) -> Option<&[f64]> {
        match self.values.get(&(of.to_string(), wrt.to_string())) {
            Some(Some(v)) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// Checks that all declared partial derivatives have been computed
    pub fn check_complete(&self) -> Result<(), StrError> {
        if self.values.values().any(|v| v.is_none()) {
            return Err("a declared partial derivative has not been computed");
        }
        Ok(())
    }
}

/// Defines a component with closed-form outputs and analytic partial derivatives
pub trait ExplicitComponent {
    /// Returns the variables and the declared partial derivatives
    fn setup(&self) -> Result<ComponentMeta, StrError>;

    /// Computes the outputs
    fn compute(&self, inputs: &Variables, outputs: &mut Variables) -> Result<(), StrError>;

    /// Computes the partial derivatives of the outputs with respect to the inputs
    fn compute_partials(&self, inputs: &Variables, jacobian: &mut Jacobian) -> Result<(), StrError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{ComponentMeta, Jacobian, Variables};

    fn sample_meta() -> ComponentMeta {
        let mut meta = ComponentMeta::new();
        meta.add_input("x", 2, "m", "length")
            .unwrap()
            .add_input("y", 2, "m", "")
            .unwrap()
            .add_output("z", 2, "m**2", "area")
            .unwrap()
            .declare_partials("z", &["x"])
            .unwrap();
        meta
    }

    #[test]
    fn meta_captures_errors() {
        let mut meta = sample_meta();
        assert_eq!(
            meta.add_input("x", 1, "", "").err(),
            Some("variable has already been added")
        );
        assert_eq!(meta.add_output("w", 0, "", "").err(), Some("the size of a variable must be ≥ 1"));
        assert_eq!(
            meta.declare_partials("w", &["x"]).err(),
            Some("partial derivatives must be declared for an existing output")
        );
        assert_eq!(
            meta.declare_partials("z", &["w"]).err(),
            Some("partial derivatives must be declared with respect to an existing input")
        );
        let mut inputs = Variables::new();
        inputs.set("x", &[1.0, 2.0]);
        assert_eq!(meta.check_inputs(&inputs).err(), Some("cannot find variable"));
        inputs.set("y", &[1.0]);
        assert_eq!(
            meta.check_inputs(&inputs).err(),
            Some("the number of values of an input is incorrect")
        );
    }

    #[test]
    fn meta_works() {
        let mut meta = sample_meta();
        meta.declare_partials("z", &["x", "y"]).unwrap();
        assert_eq!(meta.partials.len(), 2);
        assert!(meta.is_declared("z", "y"));
        assert!(!meta.is_declared("y", "z"));
        assert_eq!(meta.input("x").unwrap().units, "m");
        assert_eq!(meta.output("z").unwrap().desc, "area");
        let outputs = meta.alloc_outputs();
        assert_eq!(outputs.get("z").unwrap(), &[0.0, 0.0]);
    }

    #[test]
    fn variables_work() {
        let mut vars = Variables::new();
        vars.set("a", &[1.0]).set("b", &[2.0, 3.0]);
        assert_eq!(vars.get("b").unwrap(), &[2.0, 3.0]);
        vars.get_mut("a").unwrap()[0] = 5.0;
        assert_eq!(vars.get("a").unwrap(), &[5.0]);
        assert_eq!(vars.get("c").err(), Some("cannot find variable"));
        assert_eq!(vars.get_mut("c").err(), Some("cannot find variable"));
    }

    #[test]
    fn jacobian_captures_errors() {
        let meta = sample_meta();
        let mut jac = Jacobian::new(&meta);
        assert_eq!(
            jac.check_complete().err(),
            Some("a declared partial derivative has not been computed")
        );
        assert_eq!(
            jac.set("z", "y", &[1.0, 1.0]).err(),
            Some("cannot set partial derivative of an undeclared pair")
        );
        assert_eq!(
            jac.set("w", "x", &[1.0, 1.0]).err(),
            Some("cannot set partial derivative of an undeclared pair")
        );
        assert_eq!(
            jac.set("z", "x", &[1.0]).err(),
            Some("the number of partial derivative values is incorrect")
        );
    }

    #[test]
    fn jacobian_works() {
        let meta = sample_meta();
        let mut jac = Jacobian::new(&meta);
        assert_eq!(jac.get("z", "x"), None);
        jac.set("z", "x", &[3.0, 4.0]).unwrap();
        assert_eq!(jac.get("z", "x"), Some(&[3.0, 4.0][..]));
        jac.check_complete().unwrap();
    }
}
