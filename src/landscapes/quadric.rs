use fastrand::Rng;

use crate::{core::utils::SampleFloat, traits::Landscape, Float, Vector};

fn quadric(x: &Vector) -> Float {
    let mut partial = 0.0;
    let mut total = 0.0;
    for xi in x.iter() {
        partial += xi;
        total += partial * partial;
    }
    total
}

/// The quadric function (Schwefel's problem 1.2), a rotated, ill-conditioned bowl.
///
/// ```math
/// f(\vec{x}) = \sum_{i=1}^{n} \left(\sum_{j=1}^{i} x_j\right)^2
/// ```
/// The global minimum is $`f(\vec{0}) = 0`$.
#[derive(Clone, Copy, Debug, Default)]
pub struct Quadric;
impl Landscape for Quadric {
    fn evaluate(&self, x: &Vector, _rng: &mut Rng) -> Float {
        quadric(x)
    }
    fn name(&self) -> &'static str {
        "Quadric"
    }
}

/// The quadric function shifted away from the origin and multiplied by noise.
///
/// ```math
/// f(\vec{x}) = \left[\sum_{i=1}^{n} \left(\sum_{j=1}^{i} z_j\right)^2\right]\left(1 + 0.4\,|N(0,1)|\right),\quad \vec{z} = \vec{x} - \vec{o}
/// ```
/// The noiseless minimum is $`f(\vec{o}) = 0`$. This is the only stochastic landscape: each
/// evaluation draws its noise from the caller's random stream.
#[derive(Clone, Copy, Debug)]
pub struct ShiftedQuadricWithNoise {
    /// The location of the minimum
    pub shift: Vector,
}
impl Default for ShiftedQuadricWithNoise {
    fn default() -> Self {
        Self {
            shift: Vector::new(-39.3119, 58.8999),
        }
    }
}
impl Landscape for ShiftedQuadricWithNoise {
    fn evaluate(&self, x: &Vector, rng: &mut Rng) -> Float {
        quadric(&(x - self.shift)) * (1.0 + 0.4 * rng.normal(0.0, 1.0).abs())
    }
    fn name(&self) -> &'static str {
        "Shifted quadric with noise"
    }
    fn is_stochastic(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_quadric() {
        let mut rng = Rng::with_seed(0);
        assert_eq!(Quadric.evaluate(&Vector::zeros(), &mut rng), 0.0);
        // 1^2 + (1 + 2)^2
        assert_relative_eq!(Quadric.evaluate(&Vector::new(1.0, 2.0), &mut rng), 10.0);
    }

    #[test]
    fn test_shifted_quadric_minimum_is_noise_free() {
        let f = ShiftedQuadricWithNoise::default();
        let mut rng = Rng::with_seed(1);
        assert_eq!(f.evaluate(&f.shift, &mut rng), 0.0);
    }

    #[test]
    fn test_shifted_quadric_noise_only_inflates() {
        let f = ShiftedQuadricWithNoise::default();
        let x = f.shift + Vector::new(1.0, 2.0);
        let mut rng = Rng::with_seed(2);
        let values: Vec<Float> = (0..50).map(|_| f.evaluate(&x, &mut rng)).collect();
        assert!(values.iter().all(|&v| v >= 10.0 - 1e-9));
        assert!(values.windows(2).any(|w| w[0] != w[1]));
    }
}
