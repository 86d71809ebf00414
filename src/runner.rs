use std::{
    path::{Path, PathBuf},
    sync::Arc,
    thread::JoinHandle,
};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    algorithms::particles::{RunOutput, PSO},
    config::Configuration,
    core::AtomicAbortSignal,
    recorder::{write_best_so_far, write_file, write_pickle, LandscapeSample},
    traits::AbortSignal,
    PsoError, Result,
};

/// The landscape sample and the output of every run of a simulation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationOutput {
    /// The landscape sampled on the domain at `function_points` resolution
    pub landscape: LandscapeSample,
    /// One output per run, in run order
    pub runs: Vec<RunOutput>,
}

/// The files a simulation writes for the configuration file `current.ini`:
/// `current.ini_function.txt`, and for run `k` `current.ini_run{k}.txt`,
/// `current.ini_run{k}_topology.txt` and `current.ini_run{k}_bsf.txt`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputPaths {
    prefix: PathBuf,
}

impl OutputPaths {
    /// Name outputs after `config_path`, placing them in `output_dir` if given and next to the
    /// configuration file otherwise.
    pub fn new(config_path: &Path, output_dir: Option<&Path>) -> Self {
        let prefix = match (output_dir, config_path.file_name()) {
            (Some(dir), Some(name)) => dir.join(name),
            _ => config_path.to_path_buf(),
        };
        Self { prefix }
    }

    fn with_suffix(&self, suffix: &str) -> PathBuf {
        let mut name = self.prefix.clone().into_os_string();
        name.push(suffix);
        PathBuf::from(name)
    }

    /// The landscape sample.
    pub fn function(&self) -> PathBuf {
        self.with_suffix("_function.txt")
    }

    /// The trace of run `k`.
    pub fn run(&self, k: usize) -> PathBuf {
        self.with_suffix(&format!("_run{k}.txt"))
    }

    /// The neighbour lists of run `k`.
    pub fn topology(&self, k: usize) -> PathBuf {
        self.with_suffix(&format!("_run{k}_topology.txt"))
    }

    /// The best-so-far history of run `k`.
    pub fn best_so_far(&self, k: usize) -> PathBuf {
        self.with_suffix(&format!("_run{k}_bsf.txt"))
    }

    /// The pickle of the whole simulation.
    pub fn pickle(&self) -> PathBuf {
        self.with_suffix(".pkl")
    }
}

impl SimulationOutput {
    /// Write every text output.
    ///
    /// # Errors
    ///
    /// Returns a [`PsoError::Io`](crate::PsoError::Io) naming the first file which could not be
    /// written.
    pub fn write_files(&self, paths: &OutputPaths) -> Result<()> {
        self.landscape.write_file(&paths.function())?;
        for (k, run) in self.runs.iter().enumerate() {
            run.trace.write_file(&paths.run(k))?;
            run.topology.write_file(&paths.topology(k))?;
            write_file(&paths.best_so_far(k), |w| {
                write_best_so_far(&run.best_so_far, w)
            })?;
        }
        info!(
            "wrote {} run(s) to {}*",
            self.runs.len(),
            paths.prefix.display()
        );
        Ok(())
    }

    /// Export the whole simulation as a Python pickle.
    ///
    /// # Errors
    ///
    /// Returns a [`PsoError::Io`](crate::PsoError::Io) or
    /// [`PsoError::Pickle`](crate::PsoError::Pickle) if the export fails.
    pub fn write_pickle(&self, path: &Path) -> Result<()> {
        write_pickle(self, path)
    }
}

/// Sample the landscape and perform every run of `pso`.
///
/// The landscape is built once from the configured seed, so all runs (which use seeds
/// `seed`, `seed + 1`, ...) optimize the same surface.
///
/// # Errors
///
/// Returns a [`PsoError::Configuration`] if the landscape is NaN or infinite anywhere on the
/// sampling grid (the output files only hold finite numbers), and otherwise stops at the first
/// failing run, see [`PSO::run_with_seed`].
pub fn simulate(pso: &PSO) -> Result<SimulationOutput> {
    let config = pso.config();
    let landscape = config.build_landscape();
    let (lower, upper) = config.domain();
    let sample = LandscapeSample::sample(
        landscape.as_ref(),
        lower,
        upper,
        config.function_points,
        config.seed,
    );
    if let Some([x, z, y]) = sample.points.iter().find(|p| !p[2].is_finite()) {
        return Err(PsoError::config(format!(
            "[pso] Xmax: the {} landscape is not finite at ({x}, {z}) (value {y})",
            config.problem
        )));
    }
    let runs = pso.run_all(landscape.as_ref())?;
    Ok(SimulationOutput {
        landscape: sample,
        runs,
    })
}

/// A simulation running on a worker thread.
///
/// Dropping the handle without [`RunHandle::join`] raises its abort signal, so the worker stops
/// at its next iteration boundary instead of running to completion unobserved.
///
/// ```rust
/// use runpso::prelude::*;
///
/// let config = Configuration::default()
///     .with_problem(Problem::Sphere)
///     .with_function_points(5)
///     .with_max_iterations(20);
/// let handle = RunHandle::start(config).unwrap();
/// let output = handle.join().unwrap();
/// assert_eq!(output.runs.len(), 1);
/// ```
pub struct RunHandle {
    abort_signal: Arc<AtomicAbortSignal>,
    thread: Option<JoinHandle<Result<SimulationOutput>>>,
}

impl RunHandle {
    /// Validate `config`, build its topology and start the simulation in the background.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`PSO::new`] immediately; run errors are returned by
    /// [`RunHandle::join`].
    pub fn start(config: Configuration) -> Result<Self> {
        let abort_signal = Arc::new(AtomicAbortSignal::new());
        let pso = PSO::new(config)?.with_abort_signal(abort_signal.clone());
        let thread = std::thread::spawn(move || simulate(&pso));
        Ok(Self {
            abort_signal,
            thread: Some(thread),
        })
    }

    /// Returns `true` once the simulation has finished (successfully or not).
    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Ask the simulation to stop at the next iteration boundary. [`RunHandle::join`] then
    /// returns [`PsoError::Aborted`](crate::PsoError::Aborted).
    pub fn abort(&self) {
        self.abort_signal.abort();
    }

    /// Wait for the simulation and return its output.
    ///
    /// # Errors
    ///
    /// Returns the error which ended the simulation.
    ///
    /// # Panics
    ///
    /// Resumes the panic of the worker thread if it panicked.
    pub fn join(mut self) -> Result<SimulationOutput> {
        let Some(thread) = self.thread.take() else {
            return Err(PsoError::Aborted { iteration: 0 });
        };
        match thread.join() {
            Ok(result) => result,
            Err(payload) => std::panic::resume_unwind(payload),
        }
    }
}

impl Drop for RunHandle {
    fn drop(&mut self) {
        if self.thread.is_some() {
            self.abort_signal.abort();
        }
    }
}
