use std::path::PathBuf;

use thiserror::Error;

use crate::Float;

/// The errors which can end a configuration load or a swarm run.
///
/// None of these are recovered from inside the optimizer. Each variant carries enough context
/// (section and key, file and line, iteration and particle) to reproduce the failure.
#[derive(Debug, Error)]
pub enum PsoError {
    /// A parameter is missing, malformed, out of range, or names an unsupported variant.
    #[error("invalid configuration: {0}")]
    Configuration(String),
    /// A trivial-graph-format topology file could not be used.
    #[error("failed to load topology from {path}: {reason}")]
    TopologyLoad {
        /// The file that was being read
        path: PathBuf,
        /// What was wrong with it
        reason: String,
    },
    /// A particle's position, velocity or value stopped being a number.
    #[error(
        "numerical divergence at iteration {iteration}, particle {particle}: position = ({x}, {z}), velocity = ({vx}, {vz}), value = {value}"
    )]
    NumericalDivergence {
        /// The iteration in which the update was made
        iteration: usize,
        /// The id of the offending particle
        particle: usize,
        /// First coordinate of the position
        x: Float,
        /// Second coordinate of the position
        z: Float,
        /// First component of the velocity
        vx: Float,
        /// Second component of the velocity
        vz: Float,
        /// The landscape value at the position
        value: Float,
    },
    /// An [`AbortSignal`](crate::traits::AbortSignal) was raised before the run finished.
    #[error("run aborted at iteration {iteration}")]
    Aborted {
        /// The last iteration which was completed
        iteration: usize,
    },
    /// Reading a configuration/graph file or writing an output file failed.
    #[error("i/o error on {path}: {source}")]
    Io {
        /// The file being accessed
        path: PathBuf,
        /// The underlying error
        #[source]
        source: std::io::Error,
    },
    /// The pickle export failed.
    #[error("pickle serialization failed: {0}")]
    Pickle(#[from] serde_pickle::Error),
}

impl PsoError {
    /// Shorthand for a [`PsoError::Configuration`] with a formatted message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Shorthand for a [`PsoError::TopologyLoad`].
    pub fn topology(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::TopologyLoad {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Attach a path to an [`std::io::Error`].
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// A [`Result`](std::result::Result) whose error defaults to [`PsoError`].
pub type Result<T, E = PsoError> = std::result::Result<T, E>;
