use std::{ops::ControlFlow, sync::Arc};

use parking_lot::RwLock;
use tracing::debug;

use crate::algorithms::particles::SwarmStatus;

/// A trait which holds an [`observe`](`Observer::observe`) function that can be used to watch a
/// swarm as it evolves.
///
/// Observers are called once after initialization (iteration `0`) and once at the end of every
/// iteration, after the watershed step. Returning [`ControlFlow::Break`] ends the run normally
/// with [`StopReason::Observer`](crate::algorithms::particles::StopReason::Observer).
pub trait Observer: Send + Sync {
    /// A function that is called at every iteration of a run.
    fn observe(&mut self, iteration: usize, status: &SwarmStatus) -> ControlFlow<()>;
}

/// A debugging observer which logs the global best of the swarm at every iteration.
///
/// # Usage:
///
/// ```rust
/// use runpso::prelude::*;
/// use runpso::traits::observer::DebugObserver;
///
/// let config = Configuration::default()
///     .with_problem(Problem::Sphere)
///     .with_max_iterations(10);
/// let landscape = config.build_landscape();
/// let output = PSO::new(config)
///     .unwrap()
///     .with_observer(DebugObserver::build())
///     .run(landscape.as_ref())
///     .unwrap();
/// // ^ This will emit a debug event for each iteration
/// assert_eq!(output.summary.iterations, 9);
/// ```
pub struct DebugObserver;
impl DebugObserver {
    /// Finalize the [`Observer`] by wrapping it in an [`Arc`] and [`RwLock`]
    pub fn build() -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(Self))
    }
}
impl Observer for DebugObserver {
    fn observe(&mut self, iteration: usize, status: &SwarmStatus) -> ControlFlow<()> {
        debug!(
            iteration,
            evaluations = status.n_f_evals,
            particle = status.gbest_id,
            "gbest {}",
            status.gbest
        );
        ControlFlow::Continue(())
    }
}
