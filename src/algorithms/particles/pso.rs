use std::{iter::once, sync::Arc};

use fastrand::Rng;
use parking_lot::RwLock;
use rayon::prelude::*;
use tracing::{debug, info, trace};

use crate::{
    algorithms::particles::{
        swarm::best_of, Particle, RunOutput, RunSummary, StopReason, SwarmStatus, Variant,
    },
    config::Configuration,
    core::{
        utils::{random_vector_in, stream_rng, SampleFloat, Stream},
        NopAbortSignal,
    },
    recorder::{RunRecorder, TopologyTrace},
    topology::Topology,
    traits::{AbortSignal, Landscape, Observer},
    Float, PsoError, Result, Vector,
};

/// Particle Swarm Optimizer
///
/// The PSO algorithm involves an ensemble of particles which are aware of the personal bests of
/// their neighbours in a fixed [`Topology`]. Each iteration, every particle's velocity is updated
/// as follows:
///
/// ```math
/// v_i^{t+1} = \chi\left(\omega v_i^t + c_1 r_{1,i}^{t+1}(p^t_i - x^t_i) + c_2 r_{2,i}^{t+1}(n^t_i - x^t_i)\right)
/// ```
/// where $`r_1`$ and $`r_2`$ are uniformly distributed random vectors in $`[0,1)`$, $`\omega`$ is
/// the inertia weight, $`c_1`$ and $`c_2`$ are the cognitive and social weights, $`\chi`$ is the
/// constriction factor, $`p_i^t`$ is the particle's personal best position, and $`n_i^t`$ is the
/// best personal best among the particle and its neighbours (or the whole swarm in `gbest` mode).
/// Each component of the velocity is clamped to $`[-v_\text{max}, v_\text{max}]`$ and the
/// position is not clamped at all. With [`Variant::Sspso`] the social term becomes
/// $`\tfrac{c_2}{2}\left(r_2(n_i - x_i) + r_3(p_k - x_i)\right)`$ for a uniformly drawn informant
/// $`k`$.
///
/// The update is synchronous: all particles read the personal bests of the previous iteration and
/// the new states only replace the old ones once every particle has moved. Each particle draws
/// from its own random stream keyed by `(seed, iteration, id)`, so the parallel update is
/// reproducible.
///
/// See [^1] for more information.
///
/// [^1]: [Houssein, E. H., Gad, A. G., Hussain, K., & Suganthan, P. N. (2021). Major Advances in Particle Swarm Optimization: Theory, Analysis, and Application. In Swarm and Evolutionary Computation (Vol. 63, p. 100868). Elsevier BV.](https://doi.org/10.1016/j.swevo.2021.100868)
pub struct PSO {
    config: Configuration,
    topology: Topology,
    observers: Vec<Arc<RwLock<dyn Observer>>>,
    abort_signal: Box<dyn AbortSignal>,
}

/// The per-iteration coefficients shared by every particle.
#[derive(Clone, Copy)]
struct Coefficients {
    omega: Float,
    c1: Float,
    c2: Float,
    chi: Float,
    v_max: Float,
}

fn next_velocity(
    particle: &Particle,
    nbest: &Vector,
    informant: Option<&Vector>,
    k: Coefficients,
    rng: &mut Rng,
) -> Vector {
    let x = &particle.position.x;
    let p = &particle.best.x;
    let mut v = Vector::zeros();
    for d in 0..2 {
        let r1 = rng.float();
        let r2 = rng.float();
        let cognitive = k.c1 * r1 * (p[d] - x[d]);
        let social = match informant {
            None => k.c2 * r2 * (nbest[d] - x[d]),
            Some(pk) => {
                let r3 = rng.float();
                0.5 * k.c2 * (r2 * (nbest[d] - x[d]) + r3 * (pk[d] - x[d]))
            }
        };
        v[d] = (k.chi * (k.omega * particle.velocity[d] + cognitive + social))
            .clamp(-k.v_max, k.v_max);
    }
    v
}

/// The particle whose personal best pulls `id` socially (the swarm's best in `gbest` mode, else
/// the best of `id` and its neighbours) and, for SSPSO, the informant whose personal best is
/// blended in.
fn guides(
    config: &Configuration,
    snapshot: &[Particle],
    neighbors: &[usize],
    gbest_id: usize,
    id: usize,
    rng: &mut Rng,
) -> (usize, Option<usize>) {
    let n = snapshot.len();
    let nbest = if config.gbest {
        gbest_id
    } else {
        best_of(snapshot, once(id).chain(neighbors.iter().copied())).unwrap_or(id)
    };
    let informant = match config.variant {
        Variant::Standard => None,
        Variant::Sspso if config.gbest && n > 1 => {
            // any particle but this one
            let k = rng.usize(..n - 1);
            Some(if k >= id { k + 1 } else { k })
        }
        Variant::Sspso if !neighbors.is_empty() => Some(neighbors[rng.usize(..neighbors.len())]),
        Variant::Sspso => Some(nbest),
    };
    (nbest, informant)
}

fn divergence(iteration: usize, particle: &Particle) -> PsoError {
    PsoError::NumericalDivergence {
        iteration,
        particle: particle.id,
        x: particle.position.x.x,
        z: particle.position.x.y,
        vx: particle.velocity.x,
        vz: particle.velocity.y,
        value: particle.position.fx_checked(),
    }
}

fn check_finite(particles: &[Particle], iteration: usize) -> Result<()> {
    match particles.iter().find(|p| !p.is_finite()) {
        Some(p) => Err(divergence(iteration, p)),
        None => Ok(()),
    }
}

impl PSO {
    /// Validate `config` and build its (base) topology.
    ///
    /// # Errors
    ///
    /// Returns a [`PsoError::Configuration`] if the configuration is invalid or the swarm is larger
    /// than the evaluation budget, and a [`PsoError::TopologyLoad`] or [`PsoError::Io`] if a graph
    /// topology cannot be read.
    pub fn new(config: Configuration) -> Result<Self> {
        config.validate()?;
        let topology = Topology::build(&config.topology)?;
        if topology.is_empty() {
            return Err(PsoError::config("[topology] the swarm has no particles"));
        }
        if topology.len() > config.max_evaluations {
            return Err(PsoError::config(format!(
                "[pso] max_evaluations: {} evaluations cannot initialize {} particles",
                config.max_evaluations,
                topology.len()
            )));
        }
        Ok(Self {
            config,
            topology,
            observers: Vec::default(),
            abort_signal: Box::new(NopAbortSignal),
        })
    }

    /// Adds a single [`Observer`] to the optimizer.
    pub fn with_observer(mut self, observer: Arc<RwLock<dyn Observer>>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Set the [`AbortSignal`] checked before every iteration. The signal is not reset by the
    /// optimizer, so a signal raised before the run starts aborts it immediately.
    pub fn with_abort_signal<A: AbortSignal + 'static>(mut self, abort_signal: A) -> Self {
        self.abort_signal = Box::new(abort_signal);
        self
    }

    /// The configuration of the optimizer.
    pub const fn config(&self) -> &Configuration {
        &self.config
    }

    /// The topology before extra random neighbours are added.
    pub const fn topology(&self) -> &Topology {
        &self.topology
    }

    /// The topology a run with the given seed uses, including its extra random neighbours.
    pub fn topology_for_seed(&self, seed: u64) -> Topology {
        let mut rng = stream_rng(seed, Stream::Topology, 0, 0);
        self.topology
            .clone()
            .with_extra_random_neighbours(self.config.extra_random_neighbours, &mut rng)
    }

    /// Run with the configured seed.
    ///
    /// # Errors
    ///
    /// See [`PSO::run_with_seed`].
    pub fn run(&self, landscape: &dyn Landscape) -> Result<RunOutput> {
        self.run_with_seed(landscape, self.config.seed)
    }

    /// Perform all `n_runs` runs; run `k` uses seed `seed + k`.
    ///
    /// # Errors
    ///
    /// Stops at the first failing run. See [`PSO::run_with_seed`].
    pub fn run_all(&self, landscape: &dyn Landscape) -> Result<Vec<RunOutput>> {
        (0..self.config.n_runs)
            .map(|k| self.run_with_seed(landscape, self.config.seed.wrapping_add(k as u64)))
            .collect()
    }

    /// Run the swarm to completion.
    ///
    /// The run stops when `max_t` iterations have been performed (initialization counts as
    /// iteration `0`), when another iteration would exceed `max_evaluations`, when the stop
    /// criterion holds (unless `crit_keep_going` is set), or when an [`Observer`] asks it to.
    ///
    /// # Errors
    ///
    /// Returns a [`PsoError::NumericalDivergence`] if a particle's state stops being finite and a
    /// [`PsoError::Aborted`] if the abort signal is raised. No partial output is returned.
    pub fn run_with_seed(&self, landscape: &dyn Landscape, seed: u64) -> Result<RunOutput> {
        let cfg = &self.config;
        let topology = self.topology_for_seed(seed);
        let n = topology.len();
        info!(
            seed,
            particles = n,
            landscape = landscape.name(),
            topology = %cfg.topology,
            "starting run"
        );

        let init_range = cfg.initialization_range();
        let particles: Vec<Particle> = (0..n)
            .into_par_iter()
            .map(|id| {
                let mut rng = stream_rng(seed, Stream::Initialization, 0, id);
                Particle::random(id, init_range, cfg.v_max, landscape, &mut rng)
            })
            .collect();
        check_finite(&particles, 0)?;
        let mut status = SwarmStatus {
            particles,
            n_f_evals: n,
            ..Default::default()
        };
        status.update_gbest();
        status.gbest_history.push(status.gbest.fx_checked());

        let mut recorder = RunRecorder::new(cfg.instrument, cfg.bsf_save_period);
        let mut observer_stop = self.notify(&mut recorder, &status);
        let stop_reason = loop {
            if observer_stop {
                break StopReason::Observer;
            }
            if self.abort_signal.is_aborted() {
                info!(iteration = status.iteration, "abort signal received");
                return Err(PsoError::Aborted {
                    iteration: status.iteration,
                });
            }
            if status.stop_criterion_met_at.is_some() && !cfg.continue_after_stop {
                break StopReason::StopCriterion;
            }
            if status.iteration + 1 >= cfg.max_iterations {
                break StopReason::MaxIterations;
            }
            if status.n_f_evals + n > cfg.max_evaluations {
                break StopReason::MaxEvaluations;
            }
            let iteration = status.iteration + 1;
            self.step(&mut status, &topology, landscape, seed, iteration)?;
            self.watershed(&mut status, landscape, seed, iteration)?;
            status.iteration = iteration;
            status.gbest_history.push(status.gbest.fx_checked());
            if status.stop_criterion_met_at.is_none()
                && status.stagnated(cfg.stop_window, cfg.stop_criterion)
            {
                debug!(
                    iteration,
                    gbest = status.gbest.fx_checked(),
                    "stop criterion met"
                );
                status.stop_criterion_met_at = Some(iteration);
            }
            trace!(
                iteration,
                evaluations = status.n_f_evals,
                gbest = status.gbest.fx_checked()
            );
            observer_stop = self.notify(&mut recorder, &status);
        };
        status.update_message(&stop_reason.to_string());

        let (trace, best_so_far) = recorder.finish(&status);
        let summary = RunSummary {
            seed,
            landscape: landscape.name().to_string(),
            best: status.gbest,
            best_particle: status.gbest_id,
            iterations: status.iteration,
            evaluations: status.n_f_evals,
            stop_reason,
            stop_criterion_met_at: status.stop_criterion_met_at,
        };
        info!(
            seed,
            iterations = summary.iterations,
            evaluations = summary.evaluations,
            best = summary.best.fx_checked(),
            "run finished: {}",
            status.message
        );
        Ok(RunOutput {
            trace,
            topology: TopologyTrace::from(&topology),
            best_so_far,
            summary,
        })
    }

    fn notify(&self, recorder: &mut RunRecorder, status: &SwarmStatus) -> bool {
        let mut stop = recorder.observe(status.iteration, status).is_break();
        for observer in &self.observers {
            stop |= observer.write().observe(status.iteration, status).is_break();
        }
        stop
    }

    fn step(
        &self,
        status: &mut SwarmStatus,
        topology: &Topology,
        landscape: &dyn Landscape,
        seed: u64,
        iteration: usize,
    ) -> Result<()> {
        let cfg = &self.config;
        let (c1, c2) = cfg
            .acceleration
            .coefficients(cfg.c, iteration, cfg.max_iterations);
        let coefficients = Coefficients {
            omega: cfg.inertia.weight(cfg.omega, iteration, cfg.max_iterations),
            c1,
            c2,
            chi: cfg.chi,
            v_max: cfg.v_max,
        };
        let snapshot = &status.particles;
        let n = snapshot.len();
        let gbest_id = status.gbest_id;
        let moved: Vec<Particle> = (0..n)
            .into_par_iter()
            .map(|id| {
                let mut rng = stream_rng(seed, Stream::Update, iteration, id);
                let (nbest, informant) =
                    guides(cfg, snapshot, topology.neighbors(id), gbest_id, id, &mut rng);
                let mut particle = snapshot[id];
                particle.velocity = next_velocity(
                    &particle,
                    &snapshot[nbest].best.x,
                    informant.map(|k| &snapshot[k].best.x),
                    coefficients,
                    &mut rng,
                );
                particle.update_position(landscape, &mut rng);
                particle
            })
            .collect();
        check_finite(&moved, iteration)?;
        status.particles = moved;
        status.n_f_evals += n;
        status.update_gbest();
        Ok(())
    }

    fn watershed(
        &self,
        status: &mut SwarmStatus,
        landscape: &dyn Landscape,
        seed: u64,
        iteration: usize,
    ) -> Result<()> {
        let selected = self.config.watershed.select(&status.particles);
        if selected.is_empty() {
            return Ok(());
        }
        let (lower, upper) = self.config.domain();
        for id in selected {
            if status.n_f_evals >= self.config.max_evaluations {
                debug!(iteration, "evaluation budget exhausted, skipping watershed");
                break;
            }
            let mut rng = stream_rng(seed, Stream::Watershed, iteration, id);
            let particle = &mut status.particles[id];
            particle.velocity = Vector::zeros();
            particle.relocate(random_vector_in(lower, upper, &mut rng), landscape, &mut rng);
            status.n_f_evals += 1;
            if !particle.is_finite() {
                return Err(divergence(iteration, particle));
            }
            trace!(iteration, particle = id, "watershed relocation");
        }
        status.update_gbest();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::BTreeSet, ops::ControlFlow};

    use super::*;
    use crate::{
        core::{AtomicAbortSignal, Point},
        landscapes::{Problem, Sphere},
        topology::{Neighborhood, TopologyKind},
    };

    fn sphere_ring() -> Configuration {
        Configuration::default()
            .with_problem(Problem::Sphere)
            .with_topology(TopologyKind::StaticRing1D {
                n_particles: 10,
                radius: 1,
            })
            .with_max_iterations(50)
            .with_max_evaluations(100_000)
            .with_stop_criterion(0.0)
    }

    /// A slope which stops being defined past `x = -150`.
    struct Cliff;
    impl Landscape for Cliff {
        fn evaluate(&self, x: &Vector, _rng: &mut Rng) -> Float {
            if x.x < -150.0 {
                Float::NAN
            } else {
                x.x
            }
        }
        fn name(&self) -> &'static str {
            "Cliff"
        }
    }

    struct StopAfter(usize);
    impl Observer for StopAfter {
        fn observe(&mut self, iteration: usize, _status: &SwarmStatus) -> ControlFlow<()> {
            if iteration >= self.0 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        }
    }

    #[test]
    fn test_velocity_is_clamped() {
        let particle = Particle {
            id: 0,
            position: Point::from([0.0, 0.0]),
            velocity: Vector::new(50.0, -50.0),
            best: Point::from([0.0, 0.0]),
        };
        let k = Coefficients {
            omega: 1.0,
            c1: 0.0,
            c2: 0.0,
            chi: 1.0,
            v_max: 2.0,
        };
        let mut rng = Rng::with_seed(0);
        let v = next_velocity(&particle, &Vector::zeros(), None, k, &mut rng);
        assert_eq!(v, Vector::new(2.0, -2.0));
    }

    #[test]
    fn test_chi_scales_whole_update() {
        let particle = Particle {
            id: 0,
            position: Point::from([0.0, 0.0]),
            velocity: Vector::new(1.0, -1.0),
            best: Point::from([0.0, 0.0]),
        };
        let k = Coefficients {
            omega: 0.8,
            c1: 1.0,
            c2: 1.0,
            chi: 0.5,
            v_max: 10.0,
        };
        let mut rng = Rng::with_seed(0);
        let v = next_velocity(&particle, &Vector::zeros(), None, k, &mut rng);
        approx::assert_relative_eq!(v, Vector::new(0.4, -0.4));
    }

    #[test]
    fn test_sspso_blends_informant_into_social_term() {
        let particle = Particle {
            id: 0,
            position: Point::from([0.0, 0.0]),
            velocity: Vector::zeros(),
            best: Point::from([0.0, 0.0]),
        };
        let k = Coefficients {
            omega: 0.0,
            c1: 0.0,
            c2: 2.0,
            chi: 1.0,
            v_max: 100.0,
        };
        let nbest = Vector::new(2.0, 4.0);
        let informant = Vector::new(-6.0, 8.0);
        let mut rng = Rng::with_seed(3);
        let mut draws = rng.clone();
        let v = next_velocity(&particle, &nbest, Some(&informant), k, &mut rng);
        for d in 0..2 {
            let _r1 = draws.float();
            let r2 = draws.float();
            let r3 = draws.float();
            approx::assert_relative_eq!(
                v[d],
                0.5 * 2.0 * (r2 * nbest[d] + r3 * informant[d]),
                epsilon = 1e-12
            );
        }
        let mut rng = Rng::with_seed(3);
        let standard = next_velocity(&particle, &nbest, None, k, &mut rng);
        assert_ne!(v, standard);
    }

    /// Particles at `(id, 0)` whose personal bests have the given values.
    fn snapshot(values: &[Float]) -> Vec<Particle> {
        values
            .iter()
            .enumerate()
            .map(|(id, &value)| {
                let point = Point {
                    x: Vector::new(id as Float, 0.0),
                    fx: Some(value),
                };
                Particle {
                    id,
                    position: point,
                    velocity: Vector::zeros(),
                    best: point,
                }
            })
            .collect()
    }

    #[test]
    fn test_gbest_overrides_neighbourhood_best() {
        let topology = Topology::ring(10, 1).unwrap();
        let particles = snapshot(&[3.0, 4.0, 9.0, 9.0, 9.0, 0.5, 9.0, 9.0, 9.0, 5.0]);
        let gbest_id = best_of(&particles, 0..10).unwrap();
        assert_eq!(gbest_id, 5);
        let mut rng = Rng::with_seed(0);
        let local = sphere_ring();
        let (nbest, informant) =
            guides(&local, &particles, topology.neighbors(0), gbest_id, 0, &mut rng);
        assert_eq!((nbest, informant), (0, None));
        let (nbest, _) = guides(&local, &particles, topology.neighbors(1), gbest_id, 1, &mut rng);
        assert_eq!(nbest, 0);
        let global = sphere_ring().with_gbest(true);
        for id in 0..10 {
            let (nbest, _) =
                guides(&global, &particles, topology.neighbors(id), gbest_id, id, &mut rng);
            assert_eq!(nbest, 5);
        }
    }

    #[test]
    fn test_gbest_reaches_isolated_particles() {
        // without neighbours only the personal best attracts a particle
        let isolated = sphere_ring()
            .with_topology(TopologyKind::StaticRing1D {
                n_particles: 2,
                radius: 0,
            })
            .with_max_iterations(2);
        let pso = PSO::new(isolated.clone()).unwrap();
        assert_eq!(pso.topology().neighbors(0), &[] as &[usize]);
        let particles = snapshot(&[1.0, 0.0]);
        let mut rng = Rng::with_seed(0);
        let (nbest, _) = guides(&isolated, &particles, &[], 1, 0, &mut rng);
        assert_eq!(nbest, 0);
        let (nbest, _) = guides(&isolated.with_gbest(true), &particles, &[], 1, 0, &mut rng);
        assert_eq!(nbest, 1);
    }

    #[test]
    fn test_sspso_informant_choice() {
        let topology = Topology::ring(10, 1).unwrap();
        let particles = snapshot(&[1.0; 10]);
        let local = sphere_ring().with_variant(Variant::Sspso);
        let global = local.clone().with_gbest(true);
        let mut seen_local = BTreeSet::new();
        let mut seen_global = BTreeSet::new();
        for seed in 0..500 {
            let mut rng = Rng::with_seed(seed);
            let (_, informant) =
                guides(&local, &particles, topology.neighbors(4), 0, 4, &mut rng);
            seen_local.extend(informant);
            let (_, informant) =
                guides(&global, &particles, topology.neighbors(4), 0, 4, &mut rng);
            seen_global.extend(informant);
        }
        assert_eq!(seen_local, BTreeSet::from([3, 5]));
        assert_eq!(seen_global, (0..10).filter(|&k| k != 4).collect());
        let mut rng = Rng::with_seed(0);
        let (nbest, informant) = guides(&local, &particles, &[], 0, 4, &mut rng);
        assert_eq!(informant, Some(nbest));
    }

    #[test]
    fn test_infinite_values_are_divergence() {
        let config = sphere_ring().with_x_max(Float::MAX / 4.0);
        assert!(matches!(
            PSO::new(config).unwrap().run(&Sphere),
            Err(PsoError::NumericalDivergence { iteration: 0, .. })
        ));
    }

    #[test]
    fn test_run_respects_iteration_limit() {
        let config = sphere_ring();
        let pso = PSO::new(config).unwrap();
        let out = pso.run(&Sphere).unwrap();
        assert_eq!(out.summary.stop_reason, StopReason::MaxIterations);
        assert_eq!(out.summary.iterations, 49);
        assert_eq!(out.summary.evaluations, 50 * 10);
        assert_eq!(out.trace.events.len(), 50 * 10);
    }

    #[test]
    fn test_run_respects_evaluation_limit() {
        let config = sphere_ring().with_max_evaluations(95);
        let out = PSO::new(config).unwrap().run(&Sphere).unwrap();
        assert_eq!(out.summary.stop_reason, StopReason::MaxEvaluations);
        assert_eq!(out.summary.evaluations, 90);
        assert_eq!(out.summary.iterations, 8);
    }

    #[test]
    fn test_budget_smaller_than_swarm_is_rejected() {
        let config = sphere_ring().with_max_evaluations(5);
        assert!(matches!(PSO::new(config), Err(PsoError::Configuration(_))));
    }

    #[test]
    fn test_watershed_counts_evaluations() {
        let config = sphere_ring()
            .with_watershed(crate::algorithms::particles::WatershedStrategy::BestWorst)
            .with_max_iterations(5);
        let out = PSO::new(config).unwrap().run(&Sphere).unwrap();
        // 10 per iteration plus two relocations after each of the 4 updates
        assert_eq!(out.summary.evaluations, 50 + 4 * 2);
    }

    #[test]
    fn test_divergence_is_reported() {
        let config = sphere_ring().with_v_max(10.0).with_max_iterations(200);
        let err = PSO::new(config).unwrap().run(&Cliff).unwrap_err();
        match err {
            PsoError::NumericalDivergence { iteration, .. } => assert!(iteration >= 1),
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_abort_before_first_iteration() {
        let signal = Arc::new(AtomicAbortSignal::new());
        signal.abort();
        let pso = PSO::new(sphere_ring())
            .unwrap()
            .with_abort_signal(signal);
        assert!(matches!(
            pso.run(&Sphere),
            Err(PsoError::Aborted { iteration: 0 })
        ));
    }

    #[test]
    fn test_observer_can_stop_run() {
        let pso = PSO::new(sphere_ring())
            .unwrap()
            .with_observer(Arc::new(RwLock::new(StopAfter(7))));
        let out = pso.run(&Sphere).unwrap();
        assert_eq!(out.summary.stop_reason, StopReason::Observer);
        assert_eq!(out.summary.iterations, 7);
    }

    #[test]
    fn test_stop_criterion_ends_run_unless_keep_going() {
        let config = sphere_ring()
            .with_max_iterations(2000)
            .with_stop_criterion(1e-3)
            .with_stop_window(20);
        let out = PSO::new(config.clone()).unwrap().run(&Sphere).unwrap();
        assert_eq!(out.summary.stop_reason, StopReason::StopCriterion);
        let met = out.summary.stop_criterion_met_at.unwrap();
        assert_eq!(out.summary.iterations, met);
        assert!(met >= 20);

        let out = PSO::new(config.with_continue_after_stop(true))
            .unwrap()
            .run(&Sphere)
            .unwrap();
        assert_eq!(out.summary.stop_reason, StopReason::MaxIterations);
        assert_eq!(out.summary.stop_criterion_met_at, Some(met));
    }

    #[test]
    fn test_sspso_and_gbest_runs() {
        for gbest in [false, true] {
            let config = sphere_ring()
                .with_variant(Variant::Sspso)
                .with_gbest(gbest)
                .with_topology(TopologyKind::StaticGrid2D {
                    xdim: 3,
                    ydim: 3,
                    neighborhood: Neighborhood::Moore,
                });
            let out = PSO::new(config).unwrap().run(&Sphere).unwrap();
            assert_eq!(out.trace.events.len(), 50 * 9);
            assert!(out.best_value() < out.best_so_far[0].value);
        }
    }
}
