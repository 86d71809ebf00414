use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    algorithms::particles::{AccelerationStrategy, InertiaWeightStrategy, Variant, WatershedStrategy},
    landscapes::Problem,
    topology::{Neighborhood, TopologyKind},
    traits::Landscape,
    Float, PsoError, Result,
};

/// A minimal reader and writer for the `[section]` / `key = value` file format.
pub mod ini;
use ini::Ini;

const PSO: &str = "pso";
const TOPOLOGY: &str = "topology";

/// The keys of the `[pso]` section this crate understands.
const PSO_KEYS: &[&str] = &[
    "instrument",
    "function_points",
    "n_runs",
    "max_t",
    "max_evaluations",
    "algorithm",
    "gbest",
    "problem",
    "xmax",
    "vmax",
    "chi",
    "omega",
    "c",
    "numbervariables",
    "iweightstrategy",
    "cstrategy",
    "assyinitialization",
    "initialxmin",
    "initialxmax",
    "numextrarndneighs",
    "crit",
    "crit_keep_going",
    "bsf_save_period",
    "watershed_strategy",
    "seed",
    "stop_window",
    "omega_start",
    "omega_end",
    "c1_start",
    "c1_end",
    "c2_start",
    "c2_end",
];

/// The parameters of a simulation.
///
/// A [`Configuration`] is built once, either from the `[pso]`/`[topology]` INI surface with
/// [`Configuration::from_path`] or in code with the `with_*` setters, and is not changed while
/// swarms run. The defaults are those of the renderer's configuration panel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// Samples per axis of the landscape sample (`function_points`)
    pub function_points: usize,
    /// Number of independent runs (`n_runs`)
    pub n_runs: usize,
    /// Upper bound on the number of iterations, initialization included (`max_t`)
    pub max_iterations: usize,
    /// Upper bound on the number of landscape evaluations (`max_evaluations`)
    pub max_evaluations: usize,
    /// The velocity update rule (`algorithm`)
    pub variant: Variant,
    /// Use the global best instead of the neighbourhood best (`gbest`)
    pub gbest: bool,
    /// The objective function (`problem`)
    pub problem: Problem,
    /// Half-width of the domain `[-Xmax, Xmax]^2` (`Xmax`)
    pub x_max: Float,
    /// Velocity clamp per dimension (`Vmax`)
    pub v_max: Float,
    /// Constriction factor applied to the whole velocity update (`chi`)
    pub chi: Float,
    /// Inertia weight (`omega`), used by [`InertiaWeightStrategy::Fixed`]
    pub omega: Float,
    /// Acceleration coefficient (`c`), used by [`AccelerationStrategy::Fixed`]
    pub c: Float,
    /// The inertia weight schedule (`iWeightStrategy`)
    pub inertia: InertiaWeightStrategy,
    /// The acceleration coefficient schedule (`cStrategy`)
    pub acceleration: AccelerationStrategy,
    /// Asymmetric initialization range (`assyInitialization`, `initialXmin`, `initialXmax`)
    pub initial_range: Option<(Float, Float)>,
    /// Extra random links per particle (`numExtraRndNeighs`)
    pub extra_random_neighbours: usize,
    /// Minimum improvement of the global best over the stop window (`crit`)
    pub stop_criterion: Float,
    /// Length of the stop window in iterations (`stop_window`)
    pub stop_window: usize,
    /// Keep iterating after the stop criterion is met (`crit_keep_going`)
    pub continue_after_stop: bool,
    /// Diversity injection policy (`watershed_strategy`)
    pub watershed: WatershedStrategy,
    /// The neighbour structure (`[topology]` section)
    pub topology: TopologyKind,
    /// Base seed; run `k` uses `seed + k` (`seed`)
    pub seed: u64,
    /// Record per-particle trace events (`instrument`)
    pub instrument: bool,
    /// Sample the best-so-far history every this many iterations (`bsf_save_period`)
    pub bsf_save_period: usize,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            function_points: 257,
            n_runs: 1,
            max_iterations: 10000,
            max_evaluations: 980_000,
            variant: Variant::Standard,
            gbest: false,
            problem: Problem::PerlinLandscape,
            x_max: 100.0,
            v_max: 1.0,
            chi: 1.0,
            omega: 0.729844,
            c: 1.494,
            inertia: InertiaWeightStrategy::Fixed,
            acceleration: AccelerationStrategy::Fixed,
            initial_range: None,
            extra_random_neighbours: 0,
            stop_criterion: 0.01,
            stop_window: 20,
            continue_after_stop: false,
            watershed: WatershedStrategy::None,
            topology: TopologyKind::default(),
            seed: 0,
            instrument: true,
            bsf_save_period: 1000,
        }
    }
}

impl Configuration {
    /// Set the number of landscape samples per axis (default = `257`).
    pub fn with_function_points(mut self, value: usize) -> Self {
        self.function_points = value;
        self
    }
    /// Set the number of independent runs (default = `1`).
    pub fn with_n_runs(mut self, value: usize) -> Self {
        self.n_runs = value;
        self
    }
    /// Set the iteration limit, initialization included (default = `10000`).
    pub fn with_max_iterations(mut self, value: usize) -> Self {
        self.max_iterations = value;
        self
    }
    /// Set the evaluation limit (default = `980000`).
    pub fn with_max_evaluations(mut self, value: usize) -> Self {
        self.max_evaluations = value;
        self
    }
    /// Set the velocity update rule (default = [`Variant::Standard`]).
    pub fn with_variant(mut self, value: Variant) -> Self {
        self.variant = value;
        self
    }
    /// Use the global best instead of the neighbourhood best (default = `false`).
    pub fn with_gbest(mut self, value: bool) -> Self {
        self.gbest = value;
        self
    }
    /// Set the objective function (default = [`Problem::PerlinLandscape`]).
    pub fn with_problem(mut self, value: Problem) -> Self {
        self.problem = value;
        self
    }
    /// Set the half-width of the domain (default = `100`).
    pub fn with_x_max(mut self, value: Float) -> Self {
        self.x_max = value;
        self
    }
    /// Set the velocity clamp (default = `1`).
    pub fn with_v_max(mut self, value: Float) -> Self {
        self.v_max = value;
        self
    }
    /// Set the constriction factor $`\chi`$ (default = `1`).
    pub fn with_chi(mut self, value: Float) -> Self {
        self.chi = value;
        self
    }
    /// Set the inertia weight $`\omega`$ (default = `0.729844`).
    pub fn with_omega(mut self, value: Float) -> Self {
        self.omega = value;
        self
    }
    /// Set the acceleration coefficient $`c = c_1 = c_2`$ (default = `1.494`).
    pub fn with_c(mut self, value: Float) -> Self {
        self.c = value;
        self
    }
    /// Set the inertia weight schedule (default = [`InertiaWeightStrategy::Fixed`]).
    pub fn with_inertia(mut self, value: InertiaWeightStrategy) -> Self {
        self.inertia = value;
        self
    }
    /// Set the acceleration schedule (default = [`AccelerationStrategy::Fixed`]).
    pub fn with_acceleration(mut self, value: AccelerationStrategy) -> Self {
        self.acceleration = value;
        self
    }
    /// Initialize particles in `[lower, upper]^2` instead of the domain (default = `None`).
    pub fn with_initial_range(mut self, value: Option<(Float, Float)>) -> Self {
        self.initial_range = value;
        self
    }
    /// Set the number of extra random links per particle (default = `0`).
    pub fn with_extra_random_neighbours(mut self, value: usize) -> Self {
        self.extra_random_neighbours = value;
        self
    }
    /// Set the stop criterion threshold (default = `0.01`).
    pub fn with_stop_criterion(mut self, value: Float) -> Self {
        self.stop_criterion = value;
        self
    }
    /// Set the stop window (default = `20`).
    pub fn with_stop_window(mut self, value: usize) -> Self {
        self.stop_window = value;
        self
    }
    /// Keep iterating once the stop criterion is met (default = `false`).
    pub fn with_continue_after_stop(mut self, value: bool) -> Self {
        self.continue_after_stop = value;
        self
    }
    /// Set the watershed strategy (default = [`WatershedStrategy::None`]).
    pub fn with_watershed(mut self, value: WatershedStrategy) -> Self {
        self.watershed = value;
        self
    }
    /// Set the topology (default = a 7×7 von Neumann grid).
    pub fn with_topology(mut self, value: TopologyKind) -> Self {
        self.topology = value;
        self
    }
    /// Set the base seed (default = `0`).
    pub fn with_seed(mut self, value: u64) -> Self {
        self.seed = value;
        self
    }
    /// Record per-particle trace events (default = `true`).
    pub fn with_instrument(mut self, value: bool) -> Self {
        self.instrument = value;
        self
    }
    /// Set the best-so-far sampling period (default = `1000`).
    pub fn with_bsf_save_period(mut self, value: usize) -> Self {
        self.bsf_save_period = value;
        self
    }

    /// The search domain `[-Xmax, Xmax]` (per dimension).
    pub fn domain(&self) -> (Float, Float) {
        (-self.x_max, self.x_max)
    }

    /// The range initial positions are drawn from (per dimension).
    pub fn initialization_range(&self) -> (Float, Float) {
        self.initial_range.unwrap_or_else(|| self.domain())
    }

    /// Build the configured landscape over the domain, seeded with [`Configuration::seed`].
    pub fn build_landscape(&self) -> Box<dyn Landscape> {
        let (lower, upper) = self.domain();
        self.problem.build(self.seed, lower, upper)
    }

    /// Check every parameter.
    ///
    /// # Errors
    ///
    /// Returns a [`PsoError::Configuration`] naming the first offending parameter.
    pub fn validate(&self) -> Result<()> {
        fn positive(key: &str, v: Float) -> Result<()> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(PsoError::config(format!("[pso] {key}: must be a positive number, got {v}")))
            }
        }
        fn non_negative(key: &str, v: Float) -> Result<()> {
            if v.is_finite() && v >= 0.0 {
                Ok(())
            } else {
                Err(PsoError::config(format!(
                    "[pso] {key}: must be a non-negative number, got {v}"
                )))
            }
        }
        fn at_least_one(key: &str, v: usize) -> Result<()> {
            if v >= 1 {
                Ok(())
            } else {
                Err(PsoError::config(format!("[pso] {key}: must be at least 1")))
            }
        }
        at_least_one("max_t", self.max_iterations)?;
        at_least_one("max_evaluations", self.max_evaluations)?;
        at_least_one("n_runs", self.n_runs)?;
        at_least_one("function_points", self.function_points)?;
        at_least_one("bsf_save_period", self.bsf_save_period)?;
        positive("Xmax", self.x_max)?;
        positive("Vmax", self.v_max)?;
        positive("chi", self.chi)?;
        non_negative("omega", self.omega)?;
        non_negative("c", self.c)?;
        non_negative("crit", self.stop_criterion)?;
        if let InertiaWeightStrategy::TimeVarying { start, end } = self.inertia {
            non_negative("omega_start", start)?;
            non_negative("omega_end", end)?;
        }
        if let AccelerationStrategy::TimeVarying {
            c1_start,
            c1_end,
            c2_start,
            c2_end,
        } = self.acceleration
        {
            non_negative("c1_start", c1_start)?;
            non_negative("c1_end", c1_end)?;
            non_negative("c2_start", c2_start)?;
            non_negative("c2_end", c2_end)?;
        }
        if let Some((lower, upper)) = self.initial_range {
            if !(lower.is_finite() && upper.is_finite() && lower < upper) {
                return Err(PsoError::config(format!(
                    "[pso] initialXmin/initialXmax: need a finite range with initialXmin < initialXmax, got [{lower}, {upper}]"
                )));
            }
        }
        match &self.topology {
            TopologyKind::StaticRing1D { n_particles, .. } if *n_particles == 0 => Err(
                PsoError::config("[topology] nparticles: must be at least 1"),
            ),
            TopologyKind::StaticGrid2D { xdim, ydim, .. } if *xdim == 0 || *ydim == 0 => {
                Err(PsoError::config(format!(
                    "[topology] xdim/ydim: grid dimensions must be positive, got {xdim}x{ydim}"
                )))
            }
            _ => Ok(()),
        }
    }

    /// Read a configuration file. A relative `tgf_file` is looked up next to the configuration
    /// file first, then relative to the working directory.
    ///
    /// # Errors
    ///
    /// Returns a [`PsoError::Io`] if the file cannot be read and a [`PsoError::Configuration`] if
    /// its contents are invalid.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| PsoError::io(path, e))?;
        let mut config = Self::from_ini_str(&text)?;
        if let TopologyKind::StaticGraph { path: tgf } = &mut config.topology {
            if tgf.is_relative() {
                if let Some(candidate) = path.parent().map(|dir| dir.join(&*tgf)) {
                    if candidate.exists() {
                        *tgf = candidate;
                    }
                }
            }
        }
        info!(
            "loaded {}: {} on {}, {} run(s)",
            path.display(),
            config.problem,
            config.topology,
            config.n_runs
        );
        Ok(config)
    }

    /// Parse the `[pso]`/`[topology]` INI surface.
    ///
    /// # Errors
    ///
    /// Returns a [`PsoError::Configuration`] naming the section and key of the first missing or
    /// malformed parameter.
    pub fn from_ini_str(text: &str) -> Result<Self> {
        let ini = Ini::parse(text)?;
        for section in [PSO, TOPOLOGY] {
            if !ini.has_section(section) {
                return Err(PsoError::config(format!("[{section}]: missing section")));
            }
        }
        for key in ini.keys(PSO) {
            if !PSO_KEYS.contains(&key) {
                debug!("[pso] {key}: unknown key ignored");
            }
        }
        let defaults = Self::default();

        let number_variables: usize = ini.parse_or(PSO, "numberVariables", 2)?;
        if number_variables != 2 {
            return Err(PsoError::config(format!(
                "[pso] numberVariables: only 2 variables are supported, got {number_variables}"
            )));
        }

        let inertia = match ini.parse_or::<u32>(PSO, "iWeightStrategy", 0)? {
            0 => InertiaWeightStrategy::Fixed,
            1 => match InertiaWeightStrategy::time_varying() {
                InertiaWeightStrategy::TimeVarying { start, end } => {
                    InertiaWeightStrategy::TimeVarying {
                        start: ini.parse_or(PSO, "omega_start", start)?,
                        end: ini.parse_or(PSO, "omega_end", end)?,
                    }
                }
                fixed => fixed,
            },
            other => {
                return Err(PsoError::config(format!(
                    "[pso] iWeightStrategy: unknown strategy {other} (expected 0 or 1)"
                )))
            }
        };
        let acceleration = match ini.parse_or::<u32>(PSO, "cStrategy", 0)? {
            0 => AccelerationStrategy::Fixed,
            1 => match AccelerationStrategy::time_varying() {
                AccelerationStrategy::TimeVarying {
                    c1_start,
                    c1_end,
                    c2_start,
                    c2_end,
                } => AccelerationStrategy::TimeVarying {
                    c1_start: ini.parse_or(PSO, "c1_start", c1_start)?,
                    c1_end: ini.parse_or(PSO, "c1_end", c1_end)?,
                    c2_start: ini.parse_or(PSO, "c2_start", c2_start)?,
                    c2_end: ini.parse_or(PSO, "c2_end", c2_end)?,
                },
                fixed => fixed,
            },
            other => {
                return Err(PsoError::config(format!(
                    "[pso] cStrategy: unknown strategy {other} (expected 0 or 1)"
                )))
            }
        };
        let initial_range = if ini.parse_or(PSO, "assyInitialization", false)? {
            Some((
                ini.parse_req(PSO, "initialXmin")?,
                ini.parse_req(PSO, "initialXmax")?,
            ))
        } else {
            None
        };
        let watershed = match ini.get(PSO, "watershed_strategy") {
            Some(name) => WatershedStrategy::from_config_name(name)?,
            None => WatershedStrategy::None,
        };

        let config = Self {
            function_points: ini.parse_or(PSO, "function_points", defaults.function_points)?,
            n_runs: ini.parse_or(PSO, "n_runs", defaults.n_runs)?,
            max_iterations: ini.parse_req(PSO, "max_t")?,
            max_evaluations: ini.parse_req(PSO, "max_evaluations")?,
            variant: Variant::from_id(ini.parse_req(PSO, "algorithm")?)?,
            gbest: ini.parse_or(PSO, "gbest", defaults.gbest)?,
            problem: Problem::from_id(ini.parse_req(PSO, "problem")?)?,
            x_max: ini.parse_req(PSO, "Xmax")?,
            v_max: ini.parse_req(PSO, "Vmax")?,
            chi: ini.parse_req(PSO, "chi")?,
            omega: ini.parse_req(PSO, "omega")?,
            c: ini.parse_req(PSO, "c")?,
            inertia,
            acceleration,
            initial_range,
            extra_random_neighbours: ini.parse_or(PSO, "numExtraRndNeighs", 0)?,
            stop_criterion: ini.parse_or(PSO, "crit", defaults.stop_criterion)?,
            stop_window: ini.parse_or(PSO, "stop_window", defaults.stop_window)?,
            continue_after_stop: ini.parse_or(PSO, "crit_keep_going", false)?,
            watershed,
            topology: Self::topology_from_ini(&ini)?,
            seed: ini.parse_or(PSO, "seed", defaults.seed)?,
            instrument: ini.parse_or(PSO, "instrument", defaults.instrument)?,
            bsf_save_period: ini.parse_or(PSO, "bsf_save_period", defaults.bsf_save_period)?,
        };
        config.validate()?;
        Ok(config)
    }

    fn topology_from_ini(ini: &Ini) -> Result<TopologyKind> {
        let kind = ini.require(TOPOLOGY, "type")?;
        match kind.to_ascii_lowercase().as_str() {
            "staticring1d" => Ok(TopologyKind::StaticRing1D {
                n_particles: ini.parse_req(TOPOLOGY, "nparticles")?,
                radius: ini.parse_req(TOPOLOGY, "radius")?,
            }),
            "staticgrid2d" => {
                // the renderer writes the misspelt key
                let neighborhood = ini
                    .get(TOPOLOGY, "neighbordhood")
                    .or_else(|| ini.get(TOPOLOGY, "neighborhood"))
                    .ok_or_else(|| {
                        PsoError::config("[topology] neighbordhood: missing required key")
                    })?;
                Ok(TopologyKind::StaticGrid2D {
                    xdim: ini.parse_req(TOPOLOGY, "xdim")?,
                    ydim: ini.parse_req(TOPOLOGY, "ydim")?,
                    neighborhood: Neighborhood::from_config_name(neighborhood)?,
                })
            }
            "staticgraph" => Ok(TopologyKind::StaticGraph {
                path: PathBuf::from(ini.require(TOPOLOGY, "tgf_file")?),
            }),
            other => Err(PsoError::config(format!(
                "[topology] type: unknown topology `{other}` (expected staticring1d, staticgrid2d or staticgraph)"
            ))),
        }
    }

    /// Write the configuration in the INI layout the renderer produces, followed by the
    /// supplementary keys.
    pub fn to_ini(&self) -> String {
        let flag = |b: bool| if b { "1" } else { "0" }.to_string();
        let (initial_min, initial_max) = self.initialization_range();
        let mut pso = vec![
            ("instrument", flag(self.instrument)),
            ("function_points", self.function_points.to_string()),
            ("n_runs", self.n_runs.to_string()),
            ("max_t", self.max_iterations.to_string()),
            ("max_evaluations", self.max_evaluations.to_string()),
            ("algorithm", self.variant.id().to_string()),
            ("gbest", flag(self.gbest)),
            ("problem", self.problem.id().to_string()),
            ("Xmax", self.x_max.to_string()),
            ("Vmax", self.v_max.to_string()),
            ("chi", self.chi.to_string()),
            ("omega", self.omega.to_string()),
            ("c", self.c.to_string()),
            ("numberVariables", "2".to_string()),
            ("iWeightStrategy", self.inertia.id().to_string()),
            ("cStrategy", self.acceleration.id().to_string()),
            ("assyInitialization", flag(self.initial_range.is_some())),
            ("initialXmin", initial_min.to_string()),
            ("initialXmax", initial_max.to_string()),
            ("numExtraRndNeighs", self.extra_random_neighbours.to_string()),
            ("crit", self.stop_criterion.to_string()),
            ("crit_keep_going", flag(self.continue_after_stop)),
            ("bsf_save_period", self.bsf_save_period.to_string()),
            ("watershed_strategy", self.watershed.config_name().to_string()),
            ("seed", self.seed.to_string()),
            ("stop_window", self.stop_window.to_string()),
        ];
        if let InertiaWeightStrategy::TimeVarying { start, end } = self.inertia {
            pso.push(("omega_start", start.to_string()));
            pso.push(("omega_end", end.to_string()));
        }
        if let AccelerationStrategy::TimeVarying {
            c1_start,
            c1_end,
            c2_start,
            c2_end,
        } = self.acceleration
        {
            pso.push(("c1_start", c1_start.to_string()));
            pso.push(("c1_end", c1_end.to_string()));
            pso.push(("c2_start", c2_start.to_string()));
            pso.push(("c2_end", c2_end.to_string()));
        }
        let topology = match &self.topology {
            TopologyKind::StaticRing1D {
                n_particles,
                radius,
            } => vec![
                ("type", "staticring1d".to_string()),
                ("nparticles", n_particles.to_string()),
                ("radius", radius.to_string()),
            ],
            TopologyKind::StaticGrid2D {
                xdim,
                ydim,
                neighborhood,
            } => vec![
                ("type", "staticgrid2d".to_string()),
                ("xdim", xdim.to_string()),
                ("ydim", ydim.to_string()),
                ("neighbordhood", neighborhood.config_name().to_string()),
            ],
            TopologyKind::StaticGraph { path } => vec![
                ("type", "staticgraph".to_string()),
                ("tgf_file", path.display().to_string()),
            ],
        };
        Ini::render(&[(PSO, pso), (TOPOLOGY, topology)])
    }
}
