use boring_battery::prelude::*;
use boring_battery::StrError;
use structopt::StructOpt;

/// Command line options
#[derive(StructOpt, Debug)]
#[structopt(
    name = "heatpipe_core",
    about = "Evaluates the heat-pipe core geometries and checks their partial derivatives"
)]
struct Options {
    /// Outer diameter of the pipe (m)
    #[structopt(long, default_value = "0.02")]
    d_od: f64,

    /// Wall thickness (m)
    #[structopt(long, default_value = "0.0005")]
    t_w: f64,

    /// Diameter of the vapor core (m)
    #[structopt(long, default_value = "0.0156")]
    d_v: f64,

    /// Length of the condenser (m)
    #[structopt(long, default_value = "0.1")]
    l_cond: f64,

    /// Length of the evaporator (m)
    #[structopt(long, default_value = "0.05")]
    l_evap: f64,

    /// Number of nodes (all nodes share the same inputs)
    #[structopt(long, default_value = "1")]
    num_nodes: usize,

    /// Compare the analytic partial derivatives with central differences
    #[structopt(long)]
    check: bool,
}

fn main() -> Result<(), StrError> {
    // parse options
    let options = Options::from_args();
    let nn = options.num_nodes;

    // component and inputs
    let component = CoreGeometries::new(nn)?;
    let meta = component.setup()?;
    let mut inputs = Variables::new();
    inputs
        .set("D_od", &vec![options.d_od; nn])
        .set("t_w", &vec![options.t_w; nn])
        .set("D_v", &vec![options.d_v; nn])
        .set("L_cond", &vec![options.l_cond; nn])
        .set("L_evap", &vec![options.l_evap; nn]);

    // compute
    let mut outputs = meta.alloc_outputs();
    component.compute(&inputs, &mut outputs)?;

    // message
    let thin_line = format!("{:─^1$}", "", 60);
    println!("\n{}", thin_line);
    for v in &meta.outputs {
        let values = outputs.get(&v.name)?;
        println!("{:>8} = {:.6e} {} ({})", v.name, values[0], v.units, v.desc);
    }
    println!("{}", thin_line);

    // check partial derivatives
    if options.check {
        let report = check_partials(&component, &inputs)?;
        println!("{}", report);
        println!("max(abs err) = {:.2e}", report.max_abs_error());
        println!("max(rel err) = {:.2e}", report.max_rel_error());
        println!("{}\n", thin_line);
    }
    Ok(())
}
