/// Module containing the [`AbortSignal`] trait.
pub mod abort_signal;
/// Module containing the [`Landscape`] trait.
pub mod landscape;
/// Module containing the [`Observer`] trait and its implementations.
pub mod observer;

pub use abort_signal::AbortSignal;
pub use landscape::Landscape;
pub use observer::Observer;
