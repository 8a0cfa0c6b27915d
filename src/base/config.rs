use super::{Ebc, ParamConductivity, BACKGROUND_MARKER};
use crate::StrError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fmt;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// Defines the smallest allowed dt_min
pub const CONFIG_MIN_DT_MIN: f64 = 1e-10;

/// Defines the smallest allowed tolerance
pub const CONFIG_MIN_TOL: f64 = 1e-15;

/// Defines the smallest allowed θ
pub const CONFIG_MIN_THETA: f64 = 1e-5;

/// Holds configuration data for the transient heat simulation of the battery pack
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Initial time
    pub t_ini: f64,

    /// Final time
    pub t_fin: f64,

    /// Time increment Δt
    pub dt: f64,

    /// Minimum allowed time increment min(Δt)
    pub dt_min: f64,

    /// Coefficient θ for the θ-method; 1e-5 ≤ θ ≤ 1.0 (1.0 means implicit Euler)
    pub theta: f64,

    /// Initial (uniform) temperature
    pub initial_temperature: f64,

    /// Temperature prescribed on the battery boundaries
    pub ebc: Ebc,

    /// Battery sub-domains with prescribed boundary temperature (empty means all batteries)
    pub heated: Vec<usize>,

    /// Transient coefficient (e.g., MassDensity times SpecificHeatCapacity)
    pub rho_cp: f64,

    /// Use the lumped (diagonal) mass matrix instead of the consistent one
    pub lumped_mass: bool,

    /// Volumetric heat source (W/m³) for each sub-domain marker
    pub heat_source: BTreeMap<usize, f64>,

    /// Thermal conductivity of the materials
    pub conductivity: ParamConductivity,

    /// Maximum number of iterations
    pub n_max_iterations: usize,

    /// Absolute tolerance for the residual vector
    pub tol_rr_abs: f64,

    /// Linear problem (a single update per timestep)
    pub linear_problem: bool,

    /// Number of timesteps between outputs (figures and states)
    pub out_every: usize,

    /// Verbose mode during timesteps
    pub verbose_timesteps: bool,

    /// Verbose mode during iterations
    pub verbose_iterations: bool,

    /// Verbose mode for the linear system solver
    pub verbose_lin_sys: bool,
}

impl Config {
    /// Allocates a new instance with default values
    pub fn new() -> Self {
        Config {
            t_ini: 0.0,
            t_fin: 5.0,
            dt: 0.05,
            dt_min: CONFIG_MIN_DT_MIN,
            theta: 1.0,
            initial_temperature: 298.0,
            ebc: Ebc::Constant(325.0),
            heated: Vec::new(),
            rho_cp: 1.0,
            lumped_mass: false,
            heat_source: BTreeMap::new(),
            conductivity: ParamConductivity::new(),
            n_max_iterations: 10,
            tol_rr_abs: 1e-8,
            linear_problem: true,
            out_every: 5,
            verbose_timesteps: true,
            verbose_iterations: true,
            verbose_lin_sys: false,
        }
    }

    /// Sets the initial time
    pub fn set_t_ini(&mut self, value: f64) -> Result<&mut Self, StrError> {
        if value < 0.0 {
            return Err("t_ini must be ≥ 0.0");
        }
        self.t_ini = value;
        Ok(self)
    }

    /// Sets the final time
    pub fn set_t_fin(&mut self, value: f64) -> Result<&mut Self, StrError> {
        if value < 0.0 {
            return Err("t_fin must be ≥ 0.0");
        }
        self.t_fin = value;
        Ok(self)
    }

    /// Sets the time increment
    pub fn set_dt(&mut self, value: f64) -> Result<&mut Self, StrError> {
        if value < self.dt_min {
            return Err("Δt must be ≥ dt_min");
        }
        self.dt = value;
        Ok(self)
    }

    /// Sets the minimum allowed time increment
    pub fn set_dt_min(&mut self, value: f64) -> Result<&mut Self, StrError> {
        if value < CONFIG_MIN_DT_MIN {
            return Err("dt_min must be ≥ 1e-10");
        }
        self.dt_min = value;
        Ok(self)
    }

    /// Sets the coefficient θ of the θ-method
    pub fn set_theta(&mut self, value: f64) -> Result<&mut Self, StrError> {
        if value < CONFIG_MIN_THETA || value > 1.0 {
            return Err("θ-method requires 1e-5 ≤ θ ≤ 1.0");
        }
        self.theta = value;
        Ok(self)
    }

    /// Sets the initial (uniform) temperature
    pub fn set_initial_temperature(&mut self, value: f64) -> Result<&mut Self, StrError> {
        if !value.is_finite() {
            return Err("initial temperature must be finite");
        }
        self.initial_temperature = value;
        Ok(self)
    }

    /// Sets the temperature prescribed on the battery boundaries
    pub fn set_ebc(&mut self, ebc: Ebc) -> Result<&mut Self, StrError> {
        self.ebc = ebc;
        Ok(self)
    }

    /// Sets the battery sub-domains with prescribed boundary temperature
    ///
    /// **Note:** An empty list means that all batteries are heated.
    pub fn set_heated(&mut self, markers: &[usize]) -> Result<&mut Self, StrError> {
        if markers.iter().any(|m| *m == BACKGROUND_MARKER) {
            return Err("marker 0 (background) cannot be heated");
        }
        self.heated = markers.to_vec();
        Ok(self)
    }

    /// Sets the transient coefficient ρ·c
    pub fn set_rho_cp(&mut self, value: f64) -> Result<&mut Self, StrError> {
        if value <= 0.0 {
            return Err("rho_cp must be > 0.0");
        }
        self.rho_cp = value;
        Ok(self)
    }

    /// Sets the lumped mass option
    pub fn set_lumped_mass(&mut self, flag: bool) -> Result<&mut Self, StrError> {
        self.lumped_mass = flag;
        Ok(self)
    }

    /// Sets the volumetric heat source of a sub-domain
    pub fn set_heat_source(&mut self, marker: usize, value: f64) -> Result<&mut Self, StrError> {
        if !value.is_finite() {
            return Err("heat source must be finite");
        }
        self.heat_source.insert(marker, value);
        Ok(self)
    }

    /// Sets the thermal conductivity of the materials
    pub fn set_conductivity(&mut self, conductivity: ParamConductivity) -> Result<&mut Self, StrError> {
        if conductivity.validate().is_some() {
            return Err("conductivity parameters are invalid");
        }
        self.conductivity = conductivity;
        Ok(self)
    }

    /// Sets the maximum number of iterations
    pub fn set_n_max_iterations(&mut self, value: usize) -> Result<&mut Self, StrError> {
        if value < 1 {
            return Err("n_max_iterations must be ≥ 1");
        }
        self.n_max_iterations = value;
        Ok(self)
    }

    /// Sets the absolute tolerance for the residual vector
    pub fn set_tol_rr_abs(&mut self, value: f64) -> Result<&mut Self, StrError> {
        if value < CONFIG_MIN_TOL {
            return Err("tol_rr_abs must be ≥ 1e-15");
        }
        self.tol_rr_abs = value;
        Ok(self)
    }

    /// Sets the linear problem flag
    pub fn set_linear_problem(&mut self, flag: bool) -> Result<&mut Self, StrError> {
        self.linear_problem = flag;
        Ok(self)
    }

    /// Sets the number of timesteps between outputs
    pub fn set_out_every(&mut self, value: usize) -> Result<&mut Self, StrError> {
        if value < 1 {
            return Err("out_every must be ≥ 1");
        }
        self.out_every = value;
        Ok(self)
    }

    /// Sets the verbose flags
    pub fn set_verbose(&mut self, timesteps: bool, iterations: bool, lin_sys: bool) -> Result<&mut Self, StrError> {
        self.verbose_timesteps = timesteps;
        self.verbose_iterations = iterations;
        self.verbose_lin_sys = lin_sys;
        Ok(self)
    }

    /// Validates all data
    ///
    /// Returns a message with the inconsistent data, or returns None if everything is all right.
    pub fn validate(&self) -> Option<String> {
        if self.t_ini < 0.0 {
            return Some(format!("t_ini = {:?} is incorrect; it must be ≥ 0.0", self.t_ini));
        }
        if self.t_fin < self.t_ini {
            return Some(format!(
                "t_fin = {:?} is incorrect; it must be ≥ t_ini = {:?}",
                self.t_fin, self.t_ini
            ));
        }
        if self.dt_min < CONFIG_MIN_DT_MIN {
            return Some(format!(
                "dt_min = {:?} is incorrect; it must be ≥ {:e}",
                self.dt_min, CONFIG_MIN_DT_MIN
            ));
        }
        if self.dt < self.dt_min {
            return Some(format!(
                "dt = {:?} is incorrect; it must be ≥ dt_min = {:?}",
                self.dt, self.dt_min
            ));
        }
        if self.theta < CONFIG_MIN_THETA || self.theta > 1.0 {
            return Some(format!(
                "theta = {:?} is incorrect; it must be {:e} ≤ θ ≤ 1.0",
                self.theta, CONFIG_MIN_THETA
            ));
        }
        if self.rho_cp <= 0.0 {
            return Some(format!("rho_cp = {:?} is incorrect; it must be > 0.0", self.rho_cp));
        }
        if self.heated.iter().any(|m| *m == BACKGROUND_MARKER) {
            return Some("heated = [..] is incorrect; marker 0 (background) cannot be heated".to_string());
        }
        if let Some(msg) = self.conductivity.validate() {
            return Some(msg);
        }
        if self.n_max_iterations < 1 {
            return Some(format!(
                "n_max_iterations = {} is incorrect; it must be ≥ 1",
                self.n_max_iterations
            ));
        }
        if self.tol_rr_abs < CONFIG_MIN_TOL {
            return Some(format!(
                "tol_rr_abs = {:?} is incorrect; it must be ≥ {:e}",
                self.tol_rr_abs, CONFIG_MIN_TOL
            ));
        }
        if self.out_every < 1 {
            return Some(format!("out_every = {} is incorrect; it must be ≥ 1", self.out_every));
        }
        None // all good
    }

    /// Reads a JSON file containing the configuration
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn read_json<P>(full_path: &P) -> Result<Self, StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        let input = File::open(path).map_err(|_| "cannot open file")?;
        let buffered = BufReader::new(input);
        let config = serde_json::from_reader(buffered).map_err(|_| "cannot parse JSON file")?;
        Ok(config)
    }

    /// Writes a JSON file with the configuration
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn write_json<P>(&self, full_path: &P) -> Result<(), StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        if let Some(p) = path.parent() {
            fs::create_dir_all(p).map_err(|_| "cannot create directory")?;
        }
        let mut file = File::create(&path).map_err(|_| "cannot create file")?;
        serde_json::to_writer_pretty(&mut file, &self).map_err(|_| "cannot write file")?;
        Ok(())
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Configuration data\n")?;
        write!(f, "==================\n")?;
        write!(f, "t_ini = {:?}\n", self.t_ini)?;
        write!(f, "t_fin = {:?}\n", self.t_fin)?;
        write!(f, "dt = {:?}\n", self.dt)?;
        write!(f, "dt_min = {:?}\n", self.dt_min)?;
        write!(f, "theta = {:?}\n", self.theta)?;
        write!(f, "initial_temperature = {:?}\n", self.initial_temperature)?;
        write!(f, "ebc = {}\n", self.ebc)?;
        write!(f, "heated = {:?}\n", self.heated)?;
        write!(f, "rho_cp = {:?}\n", self.rho_cp)?;
        write!(f, "lumped_mass = {:?}\n", self.lumped_mass)?;
        write!(f, "n_max_iterations = {:?}\n", self.n_max_iterations)?;
        write!(f, "tol_rr_abs = {:?}\n", self.tol_rr_abs)?;
        write!(f, "linear_problem = {:?}\n", self.linear_problem)?;
        write!(f, "out_every = {:?}\n", self.out_every)?;

        write!(f, "\nConductivity\n")?;
        write!(f, "============\n")?;
        write!(f, "background = {:?}\n", self.conductivity.background)?;
        write!(f, "battery = {:?}\n", self.conductivity.battery)?;
        for (marker, k) in &self.conductivity.subdomains {
            write!(f, "{:?} → {:?}\n", marker, k)?;
        }

        write!(f, "\nHeat source\n")?;
        write!(f, "===========\n")?;
        for (marker, s) in &self.heat_source {
            write!(f, "{:?} → {:?}\n", marker, s)?;
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{Config, CONFIG_MIN_DT_MIN};
    use crate::base::{Ebc, ParamConductivity, DEFAULT_TEST_DIR};
    use crate::StrError;

    #[test]
    fn new_works() {
        let config = Config::new();
        assert_eq!(config.t_ini, 0.0);
        assert_eq!(config.t_fin, 5.0);
        assert_eq!(config.dt, 0.05);
        assert_eq!(config.dt_min, CONFIG_MIN_DT_MIN);
        assert_eq!(config.theta, 1.0);
        assert_eq!(config.initial_temperature, 298.0);
        assert_eq!(config.ebc, Ebc::Constant(325.0));
        assert_eq!(config.heated.len(), 0);
        assert_eq!(config.rho_cp, 1.0);
        assert_eq!(config.lumped_mass, false);
        assert_eq!(config.heat_source.len(), 0);
        assert_eq!(config.conductivity.value(0), 11.4);
        assert_eq!(config.conductivity.value(1), 1.0);
        assert_eq!(config.n_max_iterations, 10);
        assert_eq!(config.tol_rr_abs, 1e-8);
        assert_eq!(config.linear_problem, true);
        assert_eq!(config.out_every, 5);
        assert_eq!(config.validate(), None);
    }

    #[test]
    fn setters_work() -> Result<(), StrError> {
        let mut config = Config::new();
        let mut conductivity = ParamConductivity::new();
        conductivity.set_subdomain(5, 3.0)?;
        config
            .set_t_ini(1.0)?
            .set_t_fin(2.0)?
            .set_dt_min(1e-8)?
            .set_dt(0.1)?
            .set_theta(0.5)?
            .set_initial_temperature(300.0)?
            .set_ebc(Ebc::Ramp {
                initial: 300.0,
                rate: 5.0,
            })?
            .set_heated(&[1, 9])?
            .set_rho_cp(2.0)?
            .set_lumped_mass(true)?
            .set_heat_source(2, 71000.0)?
            .set_conductivity(conductivity)?
            .set_n_max_iterations(3)?
            .set_tol_rr_abs(1e-10)?
            .set_linear_problem(false)?
            .set_out_every(2)?
            .set_verbose(false, false, false)?;
        assert_eq!(config.t_ini, 1.0);
        assert_eq!(config.t_fin, 2.0);
        assert_eq!(config.dt, 0.1);
        assert_eq!(config.dt_min, 1e-8);
        assert_eq!(config.theta, 0.5);
        assert_eq!(config.ebc.value(1.0), 305.0);
        assert_eq!(config.heated, &[1, 9]);
        assert_eq!(config.heat_source.get(&2), Some(&71000.0));
        assert_eq!(config.conductivity.value(5), 3.0);
        assert_eq!(config.n_max_iterations, 3);
        assert_eq!(config.linear_problem, false);
        assert_eq!(config.out_every, 2);
        assert_eq!(config.verbose_timesteps, false);
        assert_eq!(config.validate(), None);
        Ok(())
    }

    #[test]
    fn setters_capture_errors() {
        let mut config = Config::new();
        assert_eq!(config.set_t_ini(-1.0).err(), Some("t_ini must be ≥ 0.0"));
        assert_eq!(config.set_t_fin(-1.0).err(), Some("t_fin must be ≥ 0.0"));
        assert_eq!(config.set_dt(0.0).err(), Some("Δt must be ≥ dt_min"));
        assert_eq!(config.set_dt_min(0.0).err(), Some("dt_min must be ≥ 1e-10"));
        assert_eq!(config.set_theta(0.0).err(), Some("θ-method requires 1e-5 ≤ θ ≤ 1.0"));
        assert_eq!(config.set_theta(1.1).err(), Some("θ-method requires 1e-5 ≤ θ ≤ 1.0"));
        assert_eq!(
            config.set_initial_temperature(f64::NAN).err(),
            Some("initial temperature must be finite")
        );
        assert_eq!(
            config.set_heated(&[1, 0]).err(),
            Some("marker 0 (background) cannot be heated")
        );
        assert_eq!(config.set_rho_cp(0.0).err(), Some("rho_cp must be > 0.0"));
        assert_eq!(
            config.set_heat_source(1, f64::INFINITY).err(),
            Some("heat source must be finite")
        );
        let mut conductivity = ParamConductivity::new();
        conductivity.background = 0.0;
        assert_eq!(
            config.set_conductivity(conductivity).err(),
            Some("conductivity parameters are invalid")
        );
        assert_eq!(config.set_n_max_iterations(0).err(), Some("n_max_iterations must be ≥ 1"));
        assert_eq!(config.set_tol_rr_abs(0.0).err(), Some("tol_rr_abs must be ≥ 1e-15"));
        assert_eq!(config.set_out_every(0).err(), Some("out_every must be ≥ 1"));
    }

    #[test]
    fn validate_works() {
        let mut config = Config::new();

        config.t_ini = -0.1;
        assert_eq!(
            config.validate(),
            Some("t_ini = -0.1 is incorrect; it must be ≥ 0.0".to_string())
        );
        config.t_ini = 1.0;

        config.t_fin = 0.5;
        assert_eq!(
            config.validate(),
            Some("t_fin = 0.5 is incorrect; it must be ≥ t_ini = 1.0".to_string())
        );
        config.t_fin = 2.0;

        config.dt_min = 0.0;
        assert_eq!(
            config.validate(),
            Some("dt_min = 0.0 is incorrect; it must be ≥ 1e-10".to_string())
        );
        config.dt_min = 1e-3;

        config.dt = 1e-4;
        assert_eq!(
            config.validate(),
            Some("dt = 0.0001 is incorrect; it must be ≥ dt_min = 0.001".to_string())
        );
        config.dt = 0.1;

        config.theta = 0.0;
        assert_eq!(
            config.validate(),
            Some("theta = 0.0 is incorrect; it must be 1e-5 ≤ θ ≤ 1.0".to_string())
        );
        config.theta = 1.0;

        config.rho_cp = 0.0;
        assert_eq!(
            config.validate(),
            Some("rho_cp = 0.0 is incorrect; it must be > 0.0".to_string())
        );
        config.rho_cp = 1.0;

        config.heated = vec![0];
        assert_eq!(
            config.validate(),
            Some("heated = [..] is incorrect; marker 0 (background) cannot be heated".to_string())
        );
        config.heated = vec![];

        config.conductivity.battery = 0.0;
        assert_eq!(
            config.validate(),
            Some("battery conductivity = 0.0 is incorrect; it must be > 0.0".to_string())
        );
        config.conductivity.battery = 1.0;

        config.n_max_iterations = 0;
        assert_eq!(
            config.validate(),
            Some("n_max_iterations = 0 is incorrect; it must be ≥ 1".to_string())
        );
        config.n_max_iterations = 10;

        config.tol_rr_abs = 0.0;
        assert_eq!(
            config.validate(),
            Some("tol_rr_abs = 0.0 is incorrect; it must be ≥ 1e-15".to_string())
        );
        config.tol_rr_abs = 1e-8;

        config.out_every = 0;
        assert_eq!(
            config.validate(),
            Some("out_every = 0 is incorrect; it must be ≥ 1".to_string())
        );
        config.out_every = 5;

        assert_eq!(config.validate(), None);
    }

    #[test]
    fn read_write_json_work() {
        let mut config = Config::new();
        config.set_heat_source(1, 123.0).unwrap().set_heated(&[2]).unwrap();
        let path = format!("{}/config_read_write_json_works.json", DEFAULT_TEST_DIR);
        config.write_json(&path).unwrap();
        let read = Config::read_json(&path).unwrap();
        assert_eq!(read, config);
        assert_eq!(Config::read_json("/tmp/not_found/boring.json").err(), Some("cannot open file"));
    }

    #[test]
    fn display_works() {
        let mut config = Config::new();
        config.set_heat_source(1, 10.0).unwrap();
        let res = format!("{}", config);
        assert!(res.starts_with("Configuration data\n==================\nt_ini = 0.0\nt_fin = 5.0\ndt = 0.05\n"));
        assert!(res.contains("ebc = T(0) = 325.0, T(1) = 325.0\n"));
        assert!(res.ends_with("\nHeat source\n===========\n1 → 10.0\n"));
    }
}
