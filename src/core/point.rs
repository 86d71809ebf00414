use fastrand::Rng;
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt::Display};

use crate::{traits::Landscape, Float, Vector};

/// Describes a point in the search plane together with the landscape value there.
#[derive(Clone, Copy, Default, Debug, Serialize, Deserialize)]
pub struct Point {
    /// the point's position
    pub x: Vector,
    /// the point's evaluation (`None` if the point has not yet been evaluated)
    pub fx: Option<Float>,
}
impl Point {
    /// Convert the [`Point`] into a position-value tuple.
    pub fn destructure(self) -> (Vector, Float) {
        let fx = self.fx_checked();
        (self.x, fx)
    }
    /// Compare two points by their `fx` value. Unevaluated points sort after evaluated ones.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (&self.fx, &other.fx) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(s), Some(o)) => s.total_cmp(o),
        }
    }
    /// Returns `true` if this point is strictly better (lower) than `other`.
    pub fn improves_on(&self, other: &Self) -> bool {
        self.total_cmp(other) == Ordering::Less
    }
    /// Move the point to a new position, resetting the evaluation of the point
    pub fn set_position(&mut self, x: Vector) {
        self.x = x;
        self.fx = None;
    }
    /// Get the current evaluation of the point, or `+inf` if it has not been evaluated.
    pub fn fx_checked(&self) -> Float {
        self.fx.unwrap_or(Float::INFINITY)
    }
    /// Evaluate the landscape at the point's position if that has not happened yet. Returns
    /// `true` if an evaluation was performed.
    pub fn evaluate(&mut self, landscape: &dyn Landscape, rng: &mut Rng) -> bool {
        if self.fx.is_none() {
            self.fx = Some(landscape.evaluate(&self.x, rng));
            return true;
        }
        false
    }
    /// Returns `true` if the position and (if present) the value are not NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.x.iter().all(|v| v.is_finite()) && self.fx.map_or(true, Float::is_finite)
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x: ({}, {}), f(x): {:?}", self.x.x, self.x.y, self.fx)
    }
}

impl From<Vector> for Point {
    fn from(value: Vector) -> Self {
        Self { x: value, fx: None }
    }
}
impl From<[Float; 2]> for Point {
    fn from(value: [Float; 2]) -> Self {
        Self {
            x: Vector::new(value[0], value[1]),
            fx: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landscapes::Sphere;

    #[test]
    fn test_evaluate_sets_fx_once() {
        let mut rng = Rng::with_seed(0);
        let mut p = Point::from([3.0, 4.0]);
        assert!(p.fx.is_none());
        assert!(p.evaluate(&Sphere, &mut rng));
        assert_eq!(p.fx, Some(25.0));
        assert!(!p.evaluate(&Sphere, &mut rng));
        assert_eq!(p.fx, Some(25.0));
    }

    #[test]
    fn test_total_cmp_and_improves_on() {
        let p1 = Point {
            x: Vector::new(1.0, 0.0),
            fx: Some(1.0),
        };
        let p2 = Point {
            x: Vector::new(2.0, 0.0),
            fx: Some(2.0),
        };
        let unevaluated = Point::from([0.0, 0.0]);
        assert_eq!(p1.total_cmp(&p2), Ordering::Less);
        assert!(p1.improves_on(&p2));
        assert!(!p1.improves_on(&p1));
        assert!(p2.improves_on(&unevaluated));
        assert!(!unevaluated.improves_on(&p2));
    }

    #[test]
    fn test_set_position_resets_fx() {
        let mut p = Point {
            x: Vector::new(1.0, 1.0),
            fx: Some(5.0),
        };
        p.set_position(Vector::new(2.0, 2.0));
        assert_eq!(p.x, Vector::new(2.0, 2.0));
        assert!(p.fx.is_none());
        assert_eq!(p.fx_checked(), Float::INFINITY);
    }

    #[test]
    fn test_is_finite() {
        let mut p = Point::from([1.0, Float::NAN]);
        assert!(!p.is_finite());
        p.set_position(Vector::new(1.0, 2.0));
        assert!(p.is_finite());
        p.fx = Some(Float::NAN);
        assert!(!p.is_finite());
        p.fx = Some(Float::INFINITY);
        assert!(!p.is_finite());
        p.fx = Some(1e300);
        assert!(p.is_finite());
    }
}
