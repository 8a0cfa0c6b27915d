use boring_battery::prelude::*;
use boring_battery::StrError;
use structopt::StructOpt;

/// Command line options
#[derive(StructOpt, Debug)]
#[structopt(
    name = "battery_pack",
    about = "Simulates the transient heating of a battery pack cross-section"
)]
struct Options {
    /// JSON file with the configuration data (default values are used if omitted)
    #[structopt(long)]
    config: Option<String>,

    /// Number of battery cells along each side of the pack
    #[structopt(long, default_value = "3")]
    n_cells: usize,

    /// Mesh resolution (number of triangle edges along one side of the plate)
    #[structopt(long, default_value = "30")]
    resolution: usize,

    /// Output directory (default is /tmp/boring/results)
    #[structopt(long)]
    out_dir: Option<String>,

    /// Filename stem of the output files
    #[structopt(long, default_value = "battery_pack")]
    fn_stem: String,

    /// Generate SVG figures (requires Python and Matplotlib)
    #[structopt(long)]
    figures: bool,

    /// Do not print the timesteps and iterations
    #[structopt(long)]
    quiet: bool,
}

fn main() -> Result<(), StrError> {
    // parse options
    let options = Options::from_args();

    // geometry and mesh
    let mut param = ParamPack::new();
    param.n_cells = options.n_cells;
    param.resolution = options.resolution;
    let (geometry, mesh) = Generator::pack(&param)?;

    // configuration
    let mut config = match &options.config {
        Some(path) => Config::read_json(path)?,
        None => Config::new(),
    };
    if options.quiet {
        config.set_verbose(false, false, false)?;
    }
    if let Some(msg) = config.validate() {
        println!("ERROR: {}", msg);
        return Err("the configuration is invalid");
    }
    if !options.quiet {
        println!("{}", config);
    }

    // essential boundary conditions
    let mut essential = Essential::new();
    essential.on(&mesh.heated_facets(&config.heated)?, config.ebc);

    // run the simulation
    let mut state = FemState::new(&mesh, &config)?;
    let mut output = FemOutput::new_enabled(
        &mesh,
        Some(&geometry),
        &options.fn_stem,
        options.out_dir.as_deref(),
        options.figures,
    )?;
    let mut solver = FemSolverImplicit::new(&mesh, &config, &essential)?;
    let max_flux = solver.solve(&mut state, &mut output)?;

    // message
    let path_pvd = output.path_pvd();
    let (t_min, t_max) = state.range();
    let thin_line = format!("{:─^1$}", "", path_pvd.len());
    println!("\n\n{}", thin_line);
    println!("number of points    = {}", mesh.points.len());
    println!("number of cells     = {}", mesh.cells.len());
    println!("final time          = {:?}", state.t);
    println!("temperature range   = [{:.4}, {:.4}]", t_min, t_max);
    println!("maximum heat flux   = {:?}", max_flux);
    println!("results written; the PVD file is:");
    println!("{}", path_pvd);
    println!("{}\n\n", thin_line);
    Ok(())
}
