use serde::{Deserialize, Serialize};

use super::{swarm::best_of, Particle};
use crate::{core::Point, Float};

/// The state of a running swarm, handed to every [`Observer`](crate::traits::Observer).
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct SwarmStatus {
    /// The iteration the swarm has just completed (`0` after initialization)
    pub iteration: usize,
    /// The particles, indexed by id
    pub particles: Vec<Particle>,
    /// The best personal best of all particles
    pub gbest: Point,
    /// The id of the particle holding [`SwarmStatus::gbest`]
    pub gbest_id: usize,
    /// The number of landscape evaluations performed so far
    pub n_f_evals: usize,
    /// The global best value at the end of every iteration so far
    pub gbest_history: Vec<Float>,
    /// The first iteration at which the stop criterion held, if it ever did
    pub stop_criterion_met_at: Option<usize>,
    /// A message describing how the run ended
    pub message: String,
}

impl SwarmStatus {
    /// Recompute [`SwarmStatus::gbest`] from the particles' personal bests.
    pub fn update_gbest(&mut self) {
        if let Some(id) = best_of(&self.particles, 0..self.particles.len()) {
            self.gbest_id = id;
            self.gbest = self.particles[id].best;
        }
    }

    /// Sets the message describing the run.
    pub fn update_message(&mut self, message: &str) {
        self.message = message.to_string();
    }

    /// Returns `true` if the global best improved by less than `threshold` over the last
    /// `window` iterations. Always `false` before `window` iterations have been completed.
    pub fn stagnated(&self, window: usize, threshold: Float) -> bool {
        let n = self.gbest_history.len();
        if window == 0 || n <= window {
            return false;
        }
        let current = self.gbest_history[n - 1];
        let past = self.gbest_history[n - 1 - window];
        past - current < threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vector;

    #[test]
    fn test_stagnated_window() {
        let mut status = SwarmStatus {
            gbest_history: vec![10.0, 5.0, 4.0],
            ..Default::default()
        };
        assert!(!status.stagnated(3, 0.5));
        assert!(!status.stagnated(2, 0.5));
        status.gbest_history.extend([3.9, 3.8]);
        // 4.0 -> 3.8 over two iterations
        assert!(status.stagnated(2, 0.5));
        assert!(!status.stagnated(4, 0.5));
    }

    #[test]
    fn test_update_gbest() {
        let mut status = SwarmStatus::default();
        for (id, fx) in [3.0, 2.0, 2.0, 7.0].into_iter().enumerate() {
            status.particles.push(Particle {
                id,
                best: Point {
                    x: Vector::new(id as Float, 0.0),
                    fx: Some(fx),
                },
                ..Default::default()
            });
        }
        status.update_gbest();
        assert_eq!(status.gbest_id, 1);
        assert_eq!(status.gbest.fx, Some(2.0));
    }
}
