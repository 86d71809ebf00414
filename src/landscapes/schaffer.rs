use fastrand::Rng;

use crate::{traits::Landscape, Float, Vector};

/// Schaffer's F6 function, concentric ridges around a single minimum.
///
/// ```math
/// f(x, z) = \frac{1}{2} + \frac{\sin^2\sqrt{x^2 + z^2} - \frac{1}{2}}{\left(1 + 0.001(x^2 + z^2)\right)^2}
/// ```
/// The global minimum is $`f(0, 0) = 0`$.
#[derive(Clone, Copy, Debug, Default)]
pub struct Schaffer;
impl Landscape for Schaffer {
    fn evaluate(&self, x: &Vector, _rng: &mut Rng) -> Float {
        let r2 = x.norm_squared();
        0.5 + (r2.sqrt().sin().powi(2) - 0.5) / (1.0 + 0.001 * r2).powi(2)
    }
    fn name(&self) -> &'static str {
        "Schaffer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_schaffer() {
        let mut rng = Rng::with_seed(0);
        assert_abs_diff_eq!(Schaffer.evaluate(&Vector::zeros(), &mut rng), 0.0);
        let far = Schaffer.evaluate(&Vector::new(1.0e6, -1.0e6), &mut rng);
        assert!(far.is_finite());
        assert_abs_diff_eq!(far, 0.5, epsilon = 1e-3);
    }
}
