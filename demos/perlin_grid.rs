use std::error::Error;
use std::path::Path;

use runpso::prelude::*;
use runpso::runner::simulate;

fn main() -> Result<(), Box<dyn Error>> {
    // A 7x7 Moore grid on the Perlin landscape, three runs with seeds 3, 4 and 5
    let config = Configuration::default()
        .with_problem(Problem::PerlinLandscape)
        .with_topology(TopologyKind::StaticGrid2D {
            xdim: 7,
            ydim: 7,
            neighborhood: Neighborhood::Moore,
        })
        .with_watershed(WatershedStrategy::WorstLastIteration)
        .with_function_points(129)
        .with_max_iterations(500)
        .with_n_runs(3)
        .with_seed(3);

    // Stop cleanly on Ctrl-C
    let pso = PSO::new(config)?.with_abort_signal(CtrlCAbortSignal::new());

    // Sample the landscape and perform the runs
    let output = simulate(&pso)?;
    for run in &output.runs {
        println!("{}\n", run.summary);
    }

    // Export the results to a Python .pkl file to visualize via matplotlib
    output.write_pickle(Path::new("data.pkl"))?;
    Ok(())
}
