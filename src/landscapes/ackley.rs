use fastrand::Rng;

use crate::{traits::Landscape, Float, Vector, E, PI};

/// The Ackley function, a nearly flat outer region with a deep central hole.
///
/// ```math
/// f(\vec{x}) = -20\exp\left(-0.2\sqrt{\frac{1}{n}\sum_{i=1}^n x_i^2}\right) - \exp\left(\frac{1}{n}\sum_{i=1}^n\cos(2\pi x_i)\right) + 20 + e
/// ```
/// The global minimum is $`f(\vec{0}) = 0`$.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ackley;
impl Landscape for Ackley {
    fn evaluate(&self, x: &Vector, _rng: &mut Rng) -> Float {
        let n = x.len() as Float;
        let mean_square = x.norm_squared() / n;
        let mean_cos = x.iter().map(|xi| Float::cos(2.0 * PI * xi)).sum::<Float>() / n;
        -20.0 * Float::exp(-0.2 * mean_square.sqrt()) - Float::exp(mean_cos) + 20.0 + E
    }
    fn name(&self) -> &'static str {
        "Ackley"
    }
}
