use serde::{Deserialize, Serialize};

use super::Particle;
use crate::{core::Point, PsoError, Result};

/// Diversity injection applied once per iteration after all particles have moved. The selected
/// particles are relocated to a uniformly random point of the domain with zero velocity; their
/// personal bests are kept.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WatershedStrategy {
    /// Never relocate
    #[default]
    None,
    /// Relocate the particle with the worst personal best
    WorstSoFar,
    /// Relocate the particle with the worst value at its current position
    WorstLastIteration,
    /// Relocate the particles with the best and the worst value at their current positions
    BestWorst,
}

fn arg_by<F>(particles: &[Particle], key: F, worst: bool) -> Option<usize>
where
    F: Fn(&Particle) -> &Point,
{
    // lowest id wins ties in both directions
    particles
        .iter()
        .min_by(|a, b| {
            let ord = key(a).total_cmp(key(b));
            let ord = if worst { ord.reverse() } else { ord };
            ord.then_with(|| a.id.cmp(&b.id))
        })
        .map(|p| p.id)
}

impl WatershedStrategy {
    /// The name used in configuration files.
    pub const fn config_name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::WorstSoFar => "worst_so_far",
            Self::WorstLastIteration => "worst_last_iter",
            Self::BestWorst => "best_worst",
        }
    }

    /// Parse a configuration name.
    ///
    /// # Errors
    ///
    /// Returns a [`PsoError::Configuration`] for an unknown name.
    pub fn from_config_name(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "worst_so_far" => Ok(Self::WorstSoFar),
            "worst_last_iter" => Ok(Self::WorstLastIteration),
            "best_worst" => Ok(Self::BestWorst),
            other => Err(PsoError::config(format!(
                "[pso] watershed_strategy: unknown strategy `{other}`"
            ))),
        }
    }

    /// The ids of the particles to relocate, in ascending order and without repeats.
    pub fn select(&self, particles: &[Particle]) -> Vec<usize> {
        let mut ids: Vec<usize> = match self {
            Self::None => vec![],
            Self::WorstSoFar => arg_by(particles, |p| &p.best, true).into_iter().collect(),
            Self::WorstLastIteration => arg_by(particles, |p| &p.position, true)
                .into_iter()
                .collect(),
            Self::BestWorst => arg_by(particles, |p| &p.position, false)
                .into_iter()
                .chain(arg_by(particles, |p| &p.position, true))
                .collect(),
        };
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}
