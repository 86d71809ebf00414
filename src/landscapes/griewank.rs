use fastrand::Rng;
use nalgebra::Rotation2;

use crate::{traits::Landscape, Float, Vector, PI};

fn griewank(x: &Vector) -> Float {
    let sum: Float = x.iter().map(|xi| xi.powi(2)).sum::<Float>() / 4000.0;
    let product: Float = x
        .iter()
        .enumerate()
        .map(|(i, xi)| Float::cos(xi / ((i + 1) as Float).sqrt()))
        .product();
    1.0 + sum - product
}

/// The Griewank function, a wide bowl covered by regularly spaced local minima.
///
/// ```math
/// f(\vec{x}) = 1 + \frac{1}{4000}\sum_{i=1}^n x_i^2 - \prod_{i=1}^n \cos\left(\frac{x_i}{\sqrt{i}}\right)
/// ```
/// The global minimum is $`f(\vec{0}) = 0`$.
#[derive(Clone, Copy, Debug, Default)]
pub struct Griewank;
impl Landscape for Griewank {
    fn evaluate(&self, x: &Vector, _rng: &mut Rng) -> Float {
        griewank(x)
    }
    fn name(&self) -> &'static str {
        "Griewank"
    }
}

/// The Griewank function evaluated in a rotated coordinate frame, which couples the two
/// coordinates so the local minima no longer line up with the axes.
#[derive(Clone, Copy, Debug)]
pub struct RotatedGriewank {
    /// The rotation applied to the input before evaluation
    pub rotation: Rotation2<Float>,
}
impl Default for RotatedGriewank {
    fn default() -> Self {
        Self {
            rotation: Rotation2::new(PI / 6.0),
        }
    }
}
impl Landscape for RotatedGriewank {
    fn evaluate(&self, x: &Vector, _rng: &mut Rng) -> Float {
        griewank(&(self.rotation * x))
    }
    fn name(&self) -> &'static str {
        "Rotated Griewank"
    }
}
