use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use runpso::{
    algorithms::particles::PSO,
    config::Configuration,
    core::CtrlCAbortSignal,
    runner::{simulate, OutputPaths},
};

/// Run a particle swarm over a 2D landscape and write the files the renderer replays.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The `[pso]`/`[topology]` configuration file
    config: PathBuf,
    /// Override the seed of the configuration file
    #[arg(long)]
    seed: Option<u64>,
    /// Write the outputs here instead of next to the configuration file
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Also export everything as `<config>.pkl`
    #[arg(long)]
    pickle: bool,
}

fn run(args: &Args) -> runpso::Result<()> {
    let mut config = Configuration::from_path(&args.config)?;
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    let pso = PSO::new(config)?.with_abort_signal(CtrlCAbortSignal::new());
    let output = simulate(&pso)?;
    for run in &output.runs {
        info!("run with seed {} finished\n{}", run.summary.seed, run.summary);
    }
    let paths = OutputPaths::new(&args.config, args.output_dir.as_deref());
    output.write_files(&paths)?;
    if args.pickle {
        output.write_pickle(&paths.pickle())?;
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
