use fastrand::Rng;

use crate::{traits::Landscape, Float, Vector};

/// The sphere function, a convex bowl with a single minimum.
///
/// ```math
/// f(x, z) = x^2 + z^2
/// ```
/// The global minimum is $`f(0, 0) = 0`$.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sphere;
impl Landscape for Sphere {
    fn evaluate(&self, x: &Vector, _rng: &mut Rng) -> Float {
        x.norm_squared()
    }
    fn name(&self) -> &'static str {
        "Sphere"
    }
}

/// The axis-parallel hyper-ellipsoid, a sphere stretched by the dimension index.
///
/// ```math
/// f(\vec{x}) = \sum_{i=1}^{n} i\,x_i^2
/// ```
/// The global minimum is $`f(\vec{0}) = 0`$.
#[derive(Clone, Copy, Debug, Default)]
pub struct HyperEllipsoid;
impl Landscape for HyperEllipsoid {
    fn evaluate(&self, x: &Vector, _rng: &mut Rng) -> Float {
        x.iter()
            .enumerate()
            .map(|(i, xi)| (i + 1) as Float * xi.powi(2))
            .sum()
    }
    fn name(&self) -> &'static str {
        "Hyper-ellipsoid"
    }
}
