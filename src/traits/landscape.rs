use fastrand::Rng;

use crate::{Float, Vector};

/// A trait which describes an objective function $`f(\mathbb{R}^2) \to \mathbb{R}`$ to be
/// minimized.
///
/// Implementations must be defined on the whole plane: particles are free to leave the sampled
/// domain, so an evaluation far outside of it must still return a value instead of panicking.
///
/// The `rng` argument is the evaluating particle's own random stream. Deterministic landscapes
/// ignore it; stochastic ones (see
/// [`ShiftedQuadricWithNoise`](crate::landscapes::ShiftedQuadricWithNoise)) draw their noise from
/// it, which keeps whole runs reproducible under a fixed seed while repeated evaluations of the
/// same point still differ.
pub trait Landscape: Send + Sync {
    /// The value of the function at `x`.
    fn evaluate(&self, x: &Vector, rng: &mut Rng) -> Float;

    /// A short human-readable name, used in logs and summaries.
    fn name(&self) -> &'static str;

    /// Returns `true` if [`Landscape::evaluate`] consults its random stream.
    fn is_stochastic(&self) -> bool {
        false
    }
}
