use fastrand::Rng;

use crate::{traits::Landscape, Float, Vector, PI};

/// The Weierstrass function, continuous but nowhere differentiable in the limit.
///
/// ```math
/// f(\vec{x}) = \sum_{i=1}^{n}\sum_{k=0}^{k_\text{max}} a^k\cos\left(2\pi b^k (x_i + 0.5)\right) - n\sum_{k=0}^{k_\text{max}} a^k\cos\left(\pi b^k\right)
/// ```
/// with $`a = 0.5`$, $`b = 3`$, $`k_\text{max} = 20`$. The global minimum is $`f(\vec{0}) = 0`$.
#[derive(Clone, Copy, Debug)]
pub struct Weierstrass {
    /// Amplitude ratio between successive terms
    pub a: Float,
    /// Frequency ratio between successive terms
    pub b: Float,
    /// Index of the last term
    pub k_max: i32,
}
impl Default for Weierstrass {
    fn default() -> Self {
        Self {
            a: 0.5,
            b: 3.0,
            k_max: 20,
        }
    }
}
impl Weierstrass {
    fn series(&self, t: Float) -> Float {
        (0..=self.k_max)
            .map(|k| self.a.powi(k) * Float::cos(2.0 * PI * self.b.powi(k) * t))
            .sum()
    }
}
impl Landscape for Weierstrass {
    fn evaluate(&self, x: &Vector, _rng: &mut Rng) -> Float {
        let offset = x.len() as Float * self.series(0.5);
        x.iter().map(|xi| self.series(xi + 0.5)).sum::<Float>() - offset
    }
    fn name(&self) -> &'static str {
        "Weierstrass"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_weierstrass() {
        let mut rng = Rng::with_seed(0);
        let f = Weierstrass::default();
        assert_abs_diff_eq!(f.evaluate(&Vector::zeros(), &mut rng), 0.0, epsilon = 1e-9);
        assert!(f.evaluate(&Vector::new(0.25, -0.1), &mut rng) > 0.0);
    }
}
