use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::{
    core::Point,
    recorder::{BestSoFar, RunTrace, TopologyTrace},
    Float, PsoError, Result,
};

/// Implementation of the Particle Swarm Optimization (PSO) driver
pub mod pso;
pub use pso::PSO;

/// Inertia weight and acceleration coefficient schedules.
pub mod schedule;
pub use schedule::{AccelerationStrategy, InertiaWeightStrategy};

/// [`Particle`] type and helpers.
pub mod swarm;
pub use swarm::Particle;

/// [`SwarmStatus`] type for swarm-based optimizers.
pub mod swarm_status;
pub use swarm_status::SwarmStatus;

/// Diversity injection policies.
pub mod watershed;
pub use watershed::WatershedStrategy;

/// The velocity update rule (`algorithm` in the configuration).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Variant {
    /// Standard PSO: cognitive pull towards the personal best, social pull towards the
    /// neighbourhood best
    #[default]
    Standard = 1,
    /// Stochastic-social PSO: the social pull is shared between the neighbourhood best and the
    /// personal best of a randomly drawn informant
    Sspso = 2,
}

impl Variant {
    /// The configuration id of the variant.
    pub const fn id(self) -> u32 {
        self as u32
    }

    /// Look a variant up by its configuration id.
    ///
    /// # Errors
    ///
    /// Returns a [`PsoError::Configuration`] for an id other than `1` or `2`.
    pub fn from_id(id: u32) -> Result<Self> {
        match id {
            1 => Ok(Self::Standard),
            2 => Ok(Self::Sspso),
            other => Err(PsoError::config(format!(
                "[pso] algorithm: unknown algorithm {other} (expected 1 or 2)"
            ))),
        }
    }
}

/// Why a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// `max_t` iterations were performed
    MaxIterations,
    /// Another iteration would have exceeded `max_evaluations`
    MaxEvaluations,
    /// The global best stagnated and `crit_keep_going` was off
    StopCriterion,
    /// An [`Observer`](crate::traits::Observer) asked to stop
    Observer,
}

impl Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::MaxIterations => "maximum number of iterations reached",
            Self::MaxEvaluations => "maximum number of evaluations reached",
            Self::StopCriterion => "stop criterion met",
            Self::Observer => "stopped by observer",
        };
        f.write_str(s)
    }
}

/// A short description of a finished run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    /// The seed the run was started with
    pub seed: u64,
    /// The name of the landscape
    pub landscape: String,
    /// The best point found
    pub best: Point,
    /// The particle which found it
    pub best_particle: usize,
    /// The last iteration performed (`0` is the initialization)
    pub iterations: usize,
    /// Landscape evaluations performed
    pub evaluations: usize,
    /// Why the run ended
    pub stop_reason: StopReason,
    /// The first iteration at which the stop criterion held, if it ever did
    pub stop_criterion_met_at: Option<usize>,
}

impl Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "MSG:        {}", self.stop_reason)?;
        writeln!(f, "LANDSCAPE:  {}", self.landscape)?;
        writeln!(f, "SEED:       {}", self.seed)?;
        writeln!(f, "X:          {:+.5}", self.best.x.x)?;
        writeln!(f, "Z:          {:+.5}", self.best.x.y)?;
        writeln!(f, "F(X):       {:+.5}", self.best.fx_checked())?;
        writeln!(f, "PARTICLE:   {}", self.best_particle)?;
        writeln!(f, "ITERATIONS: {}", self.iterations)?;
        writeln!(f, "N_F_EVALS:  {}", self.evaluations)?;
        match self.stop_criterion_met_at {
            Some(t) => write!(f, "CRIT MET:   iteration {t}"),
            None => write!(f, "CRIT MET:   no"),
        }
    }
}

/// Everything one run produces for the renderer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunOutput {
    /// Every particle position at every iteration
    pub trace: RunTrace,
    /// The neighbour lists used by the run (including extra random neighbours)
    pub topology: TopologyTrace,
    /// The best-so-far history sampled every `bsf_save_period` iterations
    pub best_so_far: Vec<BestSoFar>,
    /// How the run went
    pub summary: RunSummary,
}

impl RunOutput {
    /// The best value found.
    pub fn best_value(&self) -> Float {
        self.summary.best.fx_checked()
    }

    /// Export the whole output as a Python pickle.
    ///
    /// # Errors
    ///
    /// Returns a [`PsoError::Io`] if the file cannot be created and a [`PsoError::Pickle`] if
    /// serialization fails.
    pub fn write_pickle(&self, path: &std::path::Path) -> Result<()> {
        crate::recorder::write_pickle(self, path)
    }
}
