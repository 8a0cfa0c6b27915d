use boring_battery::base::DEFAULT_TEST_DIR;
use boring_battery::prelude::*;
use boring_battery::StrError;
use russell_lab::approx_eq;

#[test]
fn test_pack_transient() -> Result<(), StrError> {
    // reference 3 × 3 pack
    let (geometry, mesh) = Generator::pack(&ParamPack::new())?;

    // configuration: T(0) = 298 and T = 325 on all battery boundaries
    let mut config = Config::new();
    config.set_verbose(false, false, false)?;
    assert_eq!(config.t_fin, 5.0);
    assert_eq!(config.dt, 0.05);

    // essential boundary conditions
    let mut essential = Essential::new();
    essential.on(&mesh.heated_facets(&config.heated)?, config.ebc);
    let prescribed = essential.points();

    // run
    let stem = "test_pack_transient";
    let mut state = FemState::new(&mesh, &config)?;
    let mut output = FemOutput::new_enabled(&mesh, Some(&geometry), stem, Some(DEFAULT_TEST_DIR), false)?;
    let mut solver = FemSolverImplicit::new(&mesh, &config, &essential)?;
    let max_flux = solver.solve(&mut state, &mut output)?;

    // clock
    assert_eq!(solver.phase, Phase::Finished);
    assert_eq!(state.step, 99);
    approx_eq(state.t, 5.0, 1e-12);

    // temperatures
    let (t_min, t_max) = state.range();
    assert!(t_min > 297.5);
    assert!(t_max < 325.5);
    for id in &prescribed {
        approx_eq(state.uu[*id], 325.0, 1e-12);
    }
    assert!(max_flux > 0.0);

    // background point nearest to a battery boundary
    let mut near = 0;
    let mut min_gap = f64::MAX;
    for point in &mesh.points {
        if prescribed.contains(&point.id) {
            continue;
        }
        for battery in geometry.batteries.values() {
            let dx = point.coords[0] - battery.center[0];
            let dy = point.coords[1] - battery.center[1];
            let gap = f64::sqrt(dx * dx + dy * dy) - battery.radius;
            if gap > 0.0 && gap < min_gap {
                min_gap = gap;
                near = point.id;
            }
        }
    }

    // the near-boundary temperature rises monotonically
    let (summary, _) = PostProc::read_summary(DEFAULT_TEST_DIR, stem)?;
    assert_eq!(summary.indices.len(), 20);
    assert_eq!(summary.steps[1], 5);
    approx_eq(summary.times[0], 0.05, 1e-15);
    approx_eq(summary.max_flux.unwrap_or(0.0), max_flux, 1e-10);
    let mut previous = config.initial_temperature;
    for index in &summary.indices {
        let snapshot = PostProc::read_state(&summary, *index)?;
        let temperature = snapshot.uu[near];
        assert!(temperature >= previous - 1e-10);
        assert!(temperature < 325.5);
        previous = temperature;
    }
    assert!(previous > 310.0);
    Ok(())
}

#[test]
fn test_pack_transient_selected_batteries() -> Result<(), StrError> {
    // 2 × 2 pack with a single heated battery
    let mut param = ParamPack::new();
    param.n_cells = 2;
    param.resolution = 16;
    let (_, mesh) = Generator::pack(&param)?;
    let mut config = Config::new();
    config
        .set_verbose(false, false, false)?
        .set_heated(&[1])?
        .set_t_fin(0.5)?
        .set_lumped_mass(true)?;
    let mut essential = Essential::new();
    essential.on(&mesh.heated_facets(&config.heated)?, config.ebc);

    // run
    let mut state = FemState::new(&mesh, &config)?;
    let mut output = FemOutput::new();
    let mut solver = FemSolverImplicit::new(&mesh, &config, &essential)?;
    solver.solve(&mut state, &mut output)?;

    // the heated battery is hotter than the opposite one
    let elements = &solver.elements;
    let post = PostProc::new(&mesh, elements)?;
    let hot = post.battery_boundary_temperatures(&state, &[1])?;
    let cold = post.battery_boundary_temperatures(&state, &[4])?;
    let mean = |v: &[f64]| v.iter().sum::<f64>() / (v.len() as f64);
    approx_eq(mean(&hot), 325.0, 1e-12);
    assert!(mean(&cold) < mean(&hot));
    assert!(mean(&cold) > 297.5);
    Ok(())
}
