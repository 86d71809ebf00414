use fastrand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::{
    core::{utils::random_vector_in, Point},
    traits::Landscape,
    Float, Vector,
};

/// A particle with a position, velocity, and best known position
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Default)]
pub struct Particle {
    /// The particle's id, also its index in the swarm and the topology
    pub id: usize,
    /// The position of the particle and the landscape value there
    pub position: Point,
    /// The velocity of the particle
    pub velocity: Vector,
    /// The best position of the particle (as measured by the minimum value of `fx`)
    pub best: Point,
}

impl Particle {
    /// Create a particle at a random position in `[lower, upper)^2` with a random velocity in
    /// `[-v_max, v_max)^2`, and evaluate it.
    ///
    /// Positions are drawn before velocities, and the landscape sees the same stream afterwards.
    pub fn random(
        id: usize,
        (lower, upper): (Float, Float),
        v_max: Float,
        landscape: &dyn Landscape,
        rng: &mut Rng,
    ) -> Self {
        let mut position: Point = random_vector_in(lower, upper, rng).into();
        let velocity = if v_max.is_finite() {
            random_vector_in(-v_max, v_max, rng)
        } else {
            Vector::zeros()
        };
        position.evaluate(landscape, rng);
        Self {
            id,
            position,
            velocity,
            best: position,
        }
    }

    /// Compare the best position to another particle, ties broken by the lower id.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.best
            .total_cmp(&other.best)
            .then_with(|| self.id.cmp(&other.id))
    }

    /// Move the particle by its velocity and evaluate the new position. The personal best is
    /// replaced only by a strictly lower value.
    pub fn update_position(&mut self, landscape: &dyn Landscape, rng: &mut Rng) {
        self.relocate(self.position.x + self.velocity, landscape, rng);
    }

    /// Put the particle at `x` (keeping its velocity), evaluate it and update its personal best.
    pub fn relocate(&mut self, x: Vector, landscape: &dyn Landscape, rng: &mut Rng) {
        self.position.set_position(x);
        self.position.evaluate(landscape, rng);
        if self.position.improves_on(&self.best) {
            self.best = self.position;
        }
    }

    /// Returns `true` if position, velocity and value are all usable numbers.
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.iter().all(|v| v.is_finite())
    }
}

/// The index of the particle with the lowest personal best among `candidates`, ties broken by the
/// lowest id. Returns `None` for an empty candidate list.
pub fn best_of<I: IntoIterator<Item = usize>>(particles: &[Particle], candidates: I) -> Option<usize> {
    candidates
        .into_iter()
        .min_by(|&a, &b| particles[a].total_cmp(&particles[b]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landscapes::Sphere;

    fn particle(id: usize, best: Float) -> Particle {
        Particle {
            id,
            best: Point {
                x: Vector::zeros(),
                fx: Some(best),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_random_particle_within_limits() {
        let mut rng = Rng::with_seed(5);
        for id in 0..100 {
            let p = Particle::random(id, (10.0, 20.0), 2.0, &Sphere, &mut rng);
            assert!(p.position.x.iter().all(|v| (10.0..20.0).contains(v)));
            assert!(p.velocity.iter().all(|v| v.abs() <= 2.0));
            assert_eq!(p.best.fx, p.position.fx);
            assert!(p.position.fx.is_some());
        }
    }

    #[test]
    fn test_update_position_keeps_best_on_worse_move() {
        let mut rng = Rng::with_seed(0);
        let mut p = Particle {
            id: 0,
            position: Point {
                x: Vector::new(1.0, 0.0),
                fx: Some(1.0),
            },
            velocity: Vector::new(1.0, 0.0),
            best: Point {
                x: Vector::new(1.0, 0.0),
                fx: Some(1.0),
            },
        };
        p.update_position(&Sphere, &mut rng);
        assert_eq!(p.position.fx, Some(4.0));
        assert_eq!(p.best.fx, Some(1.0));
        p.velocity = Vector::new(-2.0, 0.0);
        p.update_position(&Sphere, &mut rng);
        assert_eq!(p.position.fx, Some(0.0));
        assert_eq!(p.best.x, Vector::zeros());
    }

    #[test]
    fn test_best_of_breaks_ties_by_id() {
        let particles = vec![particle(0, 3.0), particle(1, 1.0), particle(2, 1.0)];
        assert_eq!(best_of(&particles, [2, 1, 0]), Some(1));
        assert_eq!(best_of(&particles, [0, 2]), Some(2));
        assert_eq!(best_of(&particles, []), None);
    }
}
