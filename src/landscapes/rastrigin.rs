use fastrand::Rng;

use crate::{traits::Landscape, Float, Vector, PI};

/// The Rastrigin function, a non-convex function with a single minimum but many local minima.
///
/// ```math
/// f(\vec{x}) = 10n + \sum_{i=1}^n (x_i^2 - 10cos(2\pi x_i))
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Rastrigin;
impl Landscape for Rastrigin {
    fn evaluate(&self, x: &Vector, _rng: &mut Rng) -> Float {
        #[allow(clippy::suboptimal_flops)]
        x.iter()
            .map(|xi| xi.powi(2) - 10.0 * Float::cos(2.0 * PI * xi) + 10.0)
            .sum()
    }
    fn name(&self) -> &'static str {
        "Rastrigin"
    }
}
