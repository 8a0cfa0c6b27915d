use crate::base::Config;
use crate::mesh::Mesh;
use crate::StrError;
use russell_lab::Vector;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// Holds the state of a simulation
///
/// There is one equation (temperature DOF) per point; thus, the equation number equals the point id.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FemState {
    /// Time at the end of the current timestep
    pub t: f64,

    /// Delta time
    pub dt: f64,

    /// Time used to evaluate the essential boundary conditions
    pub t_bc: f64,

    /// Index of the current timestep
    pub step: usize,

    /// Temperatures {U}
    ///
    /// (npoint)
    pub uu: Vector,

    /// Temperatures at the previous timestep
    ///
    /// (npoint)
    pub uu_old: Vector,
}

impl FemState {
    /// Allocates a new instance with the initial (uniform) temperature
    pub fn new(mesh: &Mesh, config: &Config) -> Result<FemState, StrError> {
        let npoint = mesh.points.len();
        if npoint == 0 {
            return Err("there are no points in the mesh");
        }
        Ok(FemState {
            t: config.t_ini,
            dt: config.dt,
            t_bc: config.t_ini,
            step: 0,
            uu: Vector::filled(npoint, config.initial_temperature),
            uu_old: Vector::filled(npoint, config.initial_temperature),
        })
    }

    /// Returns the minimum and maximum temperatures
    pub fn range(&self) -> (f64, f64) {
        self.uu
            .as_data()
            .iter()
            .fold((f64::MAX, f64::MIN), |(a, b), u| (f64::min(a, *u), f64::max(b, *u)))
    }

    /// Reads a JSON file containing the state data
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
        let state = serde_json::from_reader(buffered).map_err(|_| "cannot parse JSON file")?;
        Ok(state)
    }

    /// Writes a JSON file with the state data
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
        serde_json::to_writer(&mut file, &self).map_err(|_| "cannot write file")?;
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
