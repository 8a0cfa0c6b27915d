use super::FemState;
use crate::base::DEFAULT_OUT_DIR;
use crate::mesh::{Figure, Mesh, PackGeometry};
use crate::StrError;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// Assists in generating output files
///
/// When enabled, the following files are written into the output directory:
///
/// * `{stem}-mesh.json` -- the mesh
/// * `{stem}-subdomains.svg` -- the figure with the battery sub-domains (if figures are enabled)
/// * `{stem}-{index}.json` and `{stem}-{index}.vtu` -- the state at each output timestep
/// * `{stem}-temperature-{index}.svg` -- the temperature field and the mesh (if figures are enabled)
/// * `{stem}-flux.svg` -- the heat flux at the end of the simulation (if figures are enabled)
/// * `{stem}.pvd` -- the collection of VTU files for ParaView
/// * `{stem}-summary.json` -- this struct
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FemOutput {
    /// Holds a flag to enable/disable the file generation
    enabled: bool,

    /// Holds a flag to enable/disable the generation of figures (requires Python and Matplotlib)
    figures: bool,

    /// Defines the output directory
    pub(crate) output_dir: String,

    /// Defines the filename stem
    filename_stem: String,

    /// Holds the count of files written
    output_count: usize,

    /// Holds the indices of the output files
    pub indices: Vec<usize>,

    /// Holds the simulation times corresponding to each output file
    pub times: Vec<f64>,

    /// Holds the timesteps corresponding to each output file
    pub steps: Vec<usize>,

    /// Holds the maximum magnitude of the heat flux at the end of the simulation
    pub max_flux: Option<f64>,
}

impl FemOutput {
    /// Allocates a new instance with deactivated generation of files
    pub fn new() -> Self {
        FemOutput {
            enabled: false,
            figures: false,
            output_dir: String::new(),
            filename_stem: String::new(),
            output_count: 0,
            indices: Vec::new(),
            times: Vec::new(),
            steps: Vec::new(),
            max_flux: None,
        }
    }

    /// Allocates a new instance with activated generation of files
    ///
    /// # Input
    ///
    /// * `mesh` -- the mesh
    /// * `geometry` -- the pack geometry used to label the batteries in the sub-domains figure (optional)
    /// * `filename_stem` -- the last part of the filename without extension, e.g., "my_simulation"
    /// * `output_directory` -- the directory to save the output files.
    ///   None means that the default directory will be used; see [DEFAULT_OUT_DIR]
    /// * `figures` -- generates SVG figures with Matplotlib
    pub fn new_enabled(
        mesh: &Mesh,
        geometry: Option<&PackGeometry>,
        filename_stem: &str,
        output_directory: Option<&str>,
        figures: bool,
    ) -> Result<Self, StrError> {
        if filename_stem.len() == 0 {
            return Err("the filename stem must not be empty");
        }

        // output directory
        let out_dir = match output_directory {
            Some(d) => d,
            None => DEFAULT_OUT_DIR,
        };
        fs::create_dir_all(out_dir).map_err(|_| "cannot create output directory")?;

        // new structure
        let output = FemOutput {
            enabled: true,
            figures,
            output_dir: out_dir.to_string(),
            filename_stem: filename_stem.to_string(),
            output_count: 0,
            indices: Vec::new(),
            times: Vec::new(),
            steps: Vec::new(),
            max_flux: None,
        };

        // write the mesh
        mesh.write_json(&output.path_mesh())?;
        if figures {
            let path = output.path_figure("subdomains");
            mesh.draw(Some(Figure::new_subdomains()), geometry, &path, |_, _| {})?;
        }
        Ok(output)
    }

    /// Returns true if the generation of files is enabled
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Generates the filename path for the mesh file
    pub fn path_mesh(&self) -> String {
        if self.enabled {
            format!("{}/{}-mesh.json", self.output_dir, self.filename_stem)
        } else {
            "".to_string()
        }
    }

    /// Generates the filename path for the summary file
    pub fn path_summary(&self) -> String {
        if self.enabled {
            format!("{}/{}-summary.json", self.output_dir, self.filename_stem)
        } else {
            "".to_string()
        }
    }

    /// Generates the filename path for the state files
    pub fn path_state(&self, index: usize) -> String {
        if self.enabled {
            format!("{}/{}-{:0>20}.json", self.output_dir, self.filename_stem, index)
        } else {
            "".to_string()
        }
    }

    /// Generates the filename path for the VTU files
    pub fn path_vtu(&self, index: usize) -> String {
        if self.enabled {
            format!("{}/{}-{:0>20}.vtu", self.output_dir, self.filename_stem, index)
        } else {
            "".to_string()
        }
    }

    /// Generates the filename path for the PVD file
    pub fn path_pvd(&self) -> String {
        if self.enabled {
            format!("{}/{}.pvd", self.output_dir, self.filename_stem)
        } else {
            "".to_string()
        }
    }

    /// Generates the filename path for a figure
    pub fn path_figure(&self, label: &str) -> String {
        if self.enabled {
            format!("{}/{}-{}.svg", self.output_dir, self.filename_stem, label)
        } else {
            "".to_string()
        }
    }

    /// Reads a JSON file containing this struct
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
        let summary = serde_json::from_reader(buffered).map_err(|_| "cannot parse JSON file")?;
        Ok(summary)
    }

    /// Writes a JSON file with this struct
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

    /// Writes the current FEM state (JSON and VTU files) and the temperature figure
    ///
    /// **Note:** No output is generated if the output is disabled.
    pub(crate) fn write_state(&mut self, mesh: &Mesh, state: &FemState) -> Result<(), StrError> {
        if self.enabled {
            let index = self.output_count;
            state.write_json(&self.path_state(index))?;
            self.write_vtu(mesh, state, index)?;
            if self.figures {
                let title = format!("temperature at t = {:.3}", state.t);
                let path = self.path_figure(&format!("temperature-{:0>20}", index));
                mesh.draw_field(state.uu.as_data(), &title, &path, true)?;
            }
            self.indices.push(index);
            self.times.push(state.t);
            self.steps.push(state.step);
            self.output_count += 1;
        }
        Ok(())
    }

    /// Writes the figure with the (projected) nodal heat flux and records its maximum magnitude
    pub(crate) fn write_flux(&mut self, mesh: &Mesh, nodal_fluxes: &[[f64; 2]], max_flux: f64) -> Result<(), StrError> {
        if self.enabled {
            self.max_flux = Some(max_flux);
            if self.figures {
                let path = self.path_figure("flux");
                mesh.draw_vectors(nodal_fluxes, "flux field", &path)?;
            }
        }
        Ok(())
    }

    /// Writes the PVD file and this struct (summary)
    pub(crate) fn write_summary(&self) -> Result<(), StrError> {
        if self.enabled {
            self.write_pvd()?;
            self.write_json(&self.path_summary())?;
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
