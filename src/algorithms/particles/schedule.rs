use serde::{Deserialize, Serialize};

use crate::Float;

/// Fraction of the run completed at `iteration`, in `[0, 1]`.
fn progress(iteration: usize, max_iterations: usize) -> Float {
    if max_iterations == 0 {
        return 1.0;
    }
    (iteration as Float / max_iterations as Float).min(1.0)
}

fn interpolate(start: Float, end: Float, t: Float) -> Float {
    (end - start).mul_add(t, start)
}

/// How the inertia weight $`\omega`$ evolves over a run (`iWeightStrategy`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum InertiaWeightStrategy {
    /// The configured `omega` at every iteration
    #[default]
    Fixed,
    /// Time-varying inertia weight: linear from `start` at iteration `0` to `end` at
    /// `max_iterations`
    TimeVarying {
        /// Weight at the first iteration
        start: Float,
        /// Weight at the last iteration
        end: Float,
    },
}

impl InertiaWeightStrategy {
    /// The classic decreasing schedule, `0.9 → 0.4`.
    pub const fn time_varying() -> Self {
        Self::TimeVarying {
            start: 0.9,
            end: 0.4,
        }
    }

    /// The configuration id (`0` fixed, `1` time-varying).
    pub const fn id(&self) -> u8 {
        match self {
            Self::Fixed => 0,
            Self::TimeVarying { .. } => 1,
        }
    }

    /// The inertia weight to use at `iteration`.
    pub fn weight(&self, omega: Float, iteration: usize, max_iterations: usize) -> Float {
        match *self {
            Self::Fixed => omega,
            Self::TimeVarying { start, end } => {
                interpolate(start, end, progress(iteration, max_iterations))
            }
        }
    }
}

/// How the acceleration coefficients $`c_1`$ (cognitive) and $`c_2`$ (social) evolve over a run
/// (`cStrategy`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum AccelerationStrategy {
    /// $`c_1 = c_2 = c`$ at every iteration
    #[default]
    Fixed,
    /// Time-varying acceleration coefficients: both move linearly from their start to their end
    /// value over the run
    TimeVarying {
        /// $`c_1`$ at the first iteration
        c1_start: Float,
        /// $`c_1`$ at the last iteration
        c1_end: Float,
        /// $`c_2`$ at the first iteration
        c2_start: Float,
        /// $`c_2`$ at the last iteration
        c2_end: Float,
    },
}

impl AccelerationStrategy {
    /// The usual TVAC schedule: $`c_1: 2.5 \to 0.5`$, $`c_2: 0.5 \to 2.5`$, shifting the swarm
    /// from exploration to exploitation.
    pub const fn time_varying() -> Self {
        Self::TimeVarying {
            c1_start: 2.5,
            c1_end: 0.5,
            c2_start: 0.5,
            c2_end: 2.5,
        }
    }

    /// The configuration id (`0` fixed, `1` time-varying).
    pub const fn id(&self) -> u8 {
        match self {
            Self::Fixed => 0,
            Self::TimeVarying { .. } => 1,
        }
    }

    /// The `(c1, c2)` pair to use at `iteration`.
    pub fn coefficients(&self, c: Float, iteration: usize, max_iterations: usize) -> (Float, Float) {
        match *self {
            Self::Fixed => (c, c),
            Self::TimeVarying {
                c1_start,
                c1_end,
                c2_start,
                c2_end,
            } => {
                let t = progress(iteration, max_iterations);
                (
                    interpolate(c1_start, c1_end, t),
                    interpolate(c2_start, c2_end, t),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fixed_schedules_are_constant() {
        for t in [0, 10, 100] {
            assert_eq!(InertiaWeightStrategy::Fixed.weight(0.7, t, 100), 0.7);
            assert_eq!(AccelerationStrategy::Fixed.coefficients(1.5, t, 100), (1.5, 1.5));
        }
    }

    #[test]
    fn test_tviw_interpolates() {
        let s = InertiaWeightStrategy::time_varying();
        assert_relative_eq!(s.weight(0.0, 0, 100), 0.9);
        assert_relative_eq!(s.weight(0.0, 50, 100), 0.65);
        assert_relative_eq!(s.weight(0.0, 100, 100), 0.4);
        assert_relative_eq!(s.weight(0.0, 500, 100), 0.4);
    }

    #[test]
    fn test_tvac_interpolates() {
        let s = AccelerationStrategy::time_varying();
        let (c1, c2) = s.coefficients(0.0, 0, 10);
        assert_relative_eq!(c1, 2.5);
        assert_relative_eq!(c2, 0.5);
        let (c1, c2) = s.coefficients(0.0, 5, 10);
        assert_relative_eq!(c1, 1.5);
        assert_relative_eq!(c2, 1.5);
        let (c1, c2) = s.coefficients(0.0, 10, 10);
        assert_relative_eq!(c1, 0.5);
        assert_relative_eq!(c2, 2.5);
    }
}
