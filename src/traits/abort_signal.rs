/// A request to stop a run early.
///
/// [`PSO`](crate::algorithms::particles::PSO) polls the signal at every iteration boundary and
/// ends the run with [`PsoError::Aborted`](crate::PsoError::Aborted) once it fires. Signals are
/// one-shot: nothing in the crate ever lowers a raised signal.
pub trait AbortSignal: Send + Sync {
    /// Returns `true` once the signal has been raised.
    fn is_aborted(&self) -> bool;
    /// Raise the signal.
    fn abort(&self);
}
