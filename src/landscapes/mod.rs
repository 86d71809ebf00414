use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::{
    core::utils::{stream_seed, Stream},
    traits::Landscape,
    Float, PsoError,
};

/// Module containing the Ackley landscape.
pub mod ackley;
/// Module containing the Griewank and rotated Griewank landscapes.
pub mod griewank;
/// Module containing the seeded Perlin-noise landscape.
pub mod perlin;
/// Module containing the quadric landscapes.
pub mod quadric;
/// Module containing the Rastrigin landscape.
pub mod rastrigin;
/// Module containing Schaffer's F6 landscape.
pub mod schaffer;
/// Module containing the sphere and hyper-ellipsoid landscapes.
pub mod sphere;
/// Module containing the Weierstrass landscape.
pub mod weierstrass;

pub use ackley::Ackley;
pub use griewank::{Griewank, RotatedGriewank};
pub use perlin::PerlinLandscape;
pub use quadric::{Quadric, ShiftedQuadricWithNoise};
pub use rastrigin::Rastrigin;
pub use schaffer::Schaffer;
pub use sphere::{HyperEllipsoid, Sphere};
pub use weierstrass::Weierstrass;

/// The objective functions selectable through the `problem` configuration key. The discriminants
/// are the ids used in the configuration file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Problem {
    /// See [`Sphere`]
    Sphere = 1,
    /// See [`Quadric`]
    Quadric = 2,
    /// See [`HyperEllipsoid`]
    Hyper = 3,
    /// See [`Rastrigin`]
    Rastrigin = 4,
    /// See [`Griewank`]
    Griewank = 5,
    /// See [`Schaffer`]
    Schaffer = 6,
    /// See [`Weierstrass`]
    Weierstrass = 7,
    /// See [`Ackley`]
    Ackley = 8,
    /// See [`ShiftedQuadricWithNoise`]
    ShiftedQuadricWithNoise = 9,
    /// See [`RotatedGriewank`]
    RotatedGriewank = 10,
    /// See [`PerlinLandscape`]
    #[default]
    PerlinLandscape = 56,
}

impl Problem {
    /// Every selectable problem, in id order.
    pub const ALL: [Self; 11] = [
        Self::Sphere,
        Self::Quadric,
        Self::Hyper,
        Self::Rastrigin,
        Self::Griewank,
        Self::Schaffer,
        Self::Weierstrass,
        Self::Ackley,
        Self::ShiftedQuadricWithNoise,
        Self::RotatedGriewank,
        Self::PerlinLandscape,
    ];

    /// The configuration id of the problem.
    pub const fn id(self) -> u32 {
        self as u32
    }

    /// Look a problem up by its configuration id.
    ///
    /// # Errors
    ///
    /// Returns a [`PsoError::Configuration`] for an unknown id.
    pub fn from_id(id: u32) -> Result<Self, PsoError> {
        Self::ALL
            .into_iter()
            .find(|p| p.id() == id)
            .ok_or_else(|| PsoError::config(format!("[pso] problem: unknown problem id {id}")))
    }

    /// Construct the landscape once, ready to be shared by every particle.
    ///
    /// Only [`Problem::PerlinLandscape`] uses the `seed` and the domain `[lower, upper]`; the
    /// benchmark functions are fixed.
    pub fn build(self, seed: u64, lower: Float, upper: Float) -> Box<dyn Landscape> {
        match self {
            Self::Sphere => Box::new(Sphere),
            Self::Quadric => Box::new(Quadric),
            Self::Hyper => Box::new(HyperEllipsoid),
            Self::Rastrigin => Box::new(Rastrigin),
            Self::Griewank => Box::new(Griewank),
            Self::Schaffer => Box::new(Schaffer),
            Self::Weierstrass => Box::new(Weierstrass::default()),
            Self::Ackley => Box::new(Ackley),
            Self::ShiftedQuadricWithNoise => Box::new(ShiftedQuadricWithNoise::default()),
            Self::RotatedGriewank => Box::new(RotatedGriewank::default()),
            Self::PerlinLandscape => Box::new(PerlinLandscape::new(
                stream_seed(seed, Stream::Landscape, 0, 0),
                lower,
                upper,
            )),
        }
    }
}

impl Display for Problem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} ({})", self, self.id())
    }
}
