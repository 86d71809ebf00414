//! `runpso` is a particle swarm optimizer for two-dimensional landscapes. It reads the same
//! `[pso]`/`[topology]` configuration surface as the renderer that launches it, runs one or more
//! swarms over a chosen objective function, and produces everything the renderer needs to replay
//! the run: the movement trace of every particle, the (static) neighbour lists, and a sampled
//! copy of the landscape.
//!
//! # Table of Contents
//! - [Key Features](#key-features)
//! - [Quick Start](#quick-start)
//! - [The Update Rule](#the-update-rule)
//! - [Output Formats](#output-formats)
//!
//! # Key Features
//! * Ring, toroidal grid (Moore, von Neumann, row ring) and arbitrary graph topologies, with
//!   optional extra random neighbours.
//! * A library of classic benchmark landscapes plus a seeded Perlin-noise landscape.
//! * Fixed or time-varying inertia weight and acceleration coefficients, constriction, velocity
//!   clamping and optional "watershed" diversity injection.
//! * Reproducible runs: every random draw comes from a stream keyed by the seed, the iteration
//!   and the particle, so the parallel update gives byte-identical traces for a fixed seed.
//! * Pressing `Ctrl-C` (with [`CtrlCAbortSignal`](core::CtrlCAbortSignal)) stops a run at the
//!   next iteration boundary.
//!
//! # Quick Start
//!
//! ```rust
//! use runpso::prelude::*;
//!
//! fn main() -> runpso::Result<()> {
//!     let config = Configuration::default()
//!         .with_problem(Problem::Sphere)
//!         .with_topology(TopologyKind::StaticRing1D { n_particles: 10, radius: 1 })
//!         .with_max_iterations(100);
//!     let landscape = config.build_landscape();
//!     let output = PSO::new(config)?.run(landscape.as_ref())?;
//!     println!("{}", output.summary);
//!     Ok(())
//! }
//! ```
//!
//! # The Update Rule
//! Each iteration every particle $`i`$ moves according to
//! ```math
//! v_i^{t+1} = \chi\left(\omega v_i^t + c_1 r_1 (p_i - x_i^t) + c_2 r_2 (n_i - x_i^t)\right),\quad
//! x_i^{t+1} = x_i^t + v_i^{t+1}
//! ```
//! where $`p_i`$ is the particle's personal best, $`n_i`$ the best personal best among its
//! neighbours (or the whole swarm in `gbest` mode), and the velocity is clamped to
//! $`[-v_\text{max}, v_\text{max}]`$ per dimension.
//!
//! # Output Formats
//! All files are semicolon separated. The run trace starts with the header
//! `action;iteration;particleId;x;z;y`, the topology file holds `particleId;neighbour;...` lines
//! and the function sample holds `x;z;y` lines. See [`recorder`].
#![warn(
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::doc_markdown,
    clippy::doc_link_with_quotes,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::perf,
    clippy::style,
    missing_docs
)]

/// Particle swarm algorithms
pub mod algorithms;
/// Run configuration and its INI representation
pub mod config;
/// Core types shared by the algorithms
pub mod core;
/// The error type of the crate
pub mod error;
/// Objective functions over the plane
pub mod landscapes;
/// Trace collection and the text/pickle writers
pub mod recorder;
/// Running swarms in the background
pub mod runner;
/// Neighbourhood structures
pub mod topology;
/// Traits used at the seams of the crate
pub mod traits;

pub use error::{PsoError, Result};

/// Prelude module containing everything someone should need to use this crate for non-development
/// purposes
pub mod prelude {
    pub use crate::{
        algorithms::particles::{
            AccelerationStrategy, InertiaWeightStrategy, RunOutput, StopReason, Variant,
            WatershedStrategy, PSO,
        },
        config::Configuration,
        core::{AtomicAbortSignal, CtrlCAbortSignal},
        landscapes::Problem,
        recorder::{LandscapeSample, RunRecorder, RunTrace, TopologyTrace},
        runner::RunHandle,
        topology::{Neighborhood, Topology, TopologyKind},
        traits::{AbortSignal, Landscape, Observer},
        PsoError,
    };
}

/// The floating-point type used throughout the crate (`f64` unless the `f32` feature is on).
#[cfg(not(feature = "f32"))]
pub type Float = f64;
/// The floating-point type used throughout the crate (`f64` unless the `f32` feature is on).
#[cfg(feature = "f32")]
pub type Float = f32;

#[cfg(not(feature = "f32"))]
pub use std::f64::consts::{E, PI};
#[cfg(feature = "f32")]
pub use std::f32::consts::{E, PI};

/// A position or velocity in the search plane. The first component is `x`, the second `z`
/// (the renderer uses `y` for height).
pub type Vector = nalgebra::Vector2<Float>;
