use std::{
    collections::BTreeSet,
    fmt::Display,
    path::{Path, PathBuf},
};

use fastrand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{PsoError, Result};

/// Reader for trivial-graph-format files.
pub mod tgf;

/// Which cells of a [`TopologyKind::StaticGrid2D`] count as neighbours.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Neighborhood {
    /// The eight surrounding cells
    Moore,
    /// The four orthogonally adjacent cells (von Neumann)
    #[default]
    VonNeumann,
    /// The previous and next particle in row-major order, wrapping around the whole grid
    Ring,
}

impl Neighborhood {
    /// The name used in configuration files.
    pub const fn config_name(self) -> &'static str {
        match self {
            Self::Moore => "MOORE",
            Self::VonNeumann => "VN",
            Self::Ring => "RING",
        }
    }

    /// Parse a configuration name (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns a [`PsoError::Configuration`] for an unknown name.
    pub fn from_config_name(name: &str) -> Result<Self> {
        match name.to_ascii_uppercase().as_str() {
            "MOORE" => Ok(Self::Moore),
            "VN" | "VONNEUMANN" | "VON_NEUMANN" => Ok(Self::VonNeumann),
            "RING" => Ok(Self::Ring),
            other => Err(PsoError::config(format!(
                "[topology] neighbordhood: unknown neighbourhood `{other}` (expected MOORE, VN or RING)"
            ))),
        }
    }
}

/// The description of a topology, as given in the `[topology]` section of a configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TopologyKind {
    /// Particles on a circle, each linked to those within `radius` steps on either side.
    StaticRing1D {
        /// Number of particles
        n_particles: usize,
        /// Number of neighbours on each side
        radius: usize,
    },
    /// Particles on an `xdim × ydim` torus.
    StaticGrid2D {
        /// Number of columns
        xdim: usize,
        /// Number of rows
        ydim: usize,
        /// Which cells count as neighbours
        neighborhood: Neighborhood,
    },
    /// An arbitrary undirected graph read from a trivial-graph-format file.
    StaticGraph {
        /// The file to read
        path: PathBuf,
    },
}

impl Default for TopologyKind {
    fn default() -> Self {
        Self::StaticGrid2D {
            xdim: 7,
            ydim: 7,
            neighborhood: Neighborhood::VonNeumann,
        }
    }
}

impl Display for TopologyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StaticRing1D {
                n_particles,
                radius,
            } => write!(f, "ring({n_particles} particles, radius {radius})"),
            Self::StaticGrid2D {
                xdim,
                ydim,
                neighborhood,
            } => write!(f, "grid({xdim}x{ydim}, {})", neighborhood.config_name()),
            Self::StaticGraph { path } => write!(f, "graph({})", path.display()),
        }
    }
}

/// The static neighbour structure of a swarm.
///
/// Particle ids are dense (`0..len()`), neighbour lists are sorted, never contain the particle
/// itself, and are symmetric: `j` is a neighbour of `i` exactly when `i` is a neighbour of `j`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    neighbors: Vec<Vec<usize>>,
}

impl Topology {
    /// Build the topology described by `kind`.
    ///
    /// # Errors
    ///
    /// Returns a [`PsoError::Configuration`] for a zero-sized ring or grid and a
    /// [`PsoError::TopologyLoad`] (or [`PsoError::Io`]) if a graph file cannot be used.
    pub fn build(kind: &TopologyKind) -> Result<Self> {
        let topology = match kind {
            TopologyKind::StaticRing1D {
                n_particles,
                radius,
            } => Self::ring(*n_particles, *radius)?,
            TopologyKind::StaticGrid2D {
                xdim,
                ydim,
                neighborhood,
            } => Self::grid(*xdim, *ydim, *neighborhood)?,
            TopologyKind::StaticGraph { path } => Self::from_tgf_path(path)?,
        };
        debug!(
            "built {kind}: {} particles, {} edges",
            topology.len(),
            topology.n_edges()
        );
        Ok(topology)
    }

    /// A ring of `n_particles` where particle `i` is linked to `i ± 1, ..., i ± radius` (mod N).
    ///
    /// # Errors
    ///
    /// Returns a [`PsoError::Configuration`] if `n_particles` is zero.
    pub fn ring(n_particles: usize, radius: usize) -> Result<Self> {
        if n_particles == 0 {
            return Err(PsoError::config(
                "[topology] nparticles: a ring needs at least one particle",
            ));
        }
        let n = n_particles;
        let adjacency: Vec<BTreeSet<usize>> = (0..n)
            .map(|i| -> BTreeSet<usize> {
                (1..=radius.min(n))
                    .flat_map(|r| [(i + r) % n, (i + n - r % n) % n])
                    .filter(|&j| j != i)
                    .collect()
            })
            .collect();
        Ok(Self::from_adjacency(adjacency))
    }

    /// An `xdim × ydim` toroidal grid. Particle `(x, y)` has id `y * xdim + x`.
    ///
    /// # Errors
    ///
    /// Returns a [`PsoError::Configuration`] if either dimension is zero.
    pub fn grid(xdim: usize, ydim: usize, neighborhood: Neighborhood) -> Result<Self> {
        if xdim == 0 || ydim == 0 {
            return Err(PsoError::config(format!(
                "[topology] xdim/ydim: grid dimensions must be positive, got {xdim}x{ydim}"
            )));
        }
        let n = xdim * ydim;
        let offsets: &[(isize, isize)] = match neighborhood {
            Neighborhood::Moore => &[
                (-1, -1),
                (0, -1),
                (1, -1),
                (-1, 0),
                (1, 0),
                (-1, 1),
                (0, 1),
                (1, 1),
            ],
            Neighborhood::VonNeumann => &[(0, -1), (-1, 0), (1, 0), (0, 1)],
            Neighborhood::Ring => &[],
        };
        let wrap = |v: usize, d: isize, m: usize| (v as isize + d).rem_euclid(m as isize) as usize;
        let adjacency: Vec<BTreeSet<usize>> = (0..n)
            .map(|id| -> BTreeSet<usize> {
                if matches!(neighborhood, Neighborhood::Ring) {
                    return [(id + 1) % n, (id + n - 1) % n]
                        .into_iter()
                        .filter(|&j| j != id)
                        .collect();
                }
                let (x, y) = (id % xdim, id / xdim);
                offsets
                    .iter()
                    .map(|&(dx, dy)| Self::grid_id(wrap(x, dx, xdim), wrap(y, dy, ydim), xdim))
                    .filter(|&j| j != id)
                    .collect()
            })
            .collect();
        Ok(Self::from_adjacency(adjacency))
    }

    /// The particle id of grid cell `(x, y)` in a grid with `xdim` columns.
    pub const fn grid_id(x: usize, y: usize, xdim: usize) -> usize {
        y * xdim + x
    }

    /// Read a trivial-graph-format file. See [`tgf`] for the accepted syntax.
    ///
    /// # Errors
    ///
    /// Returns a [`PsoError::Io`] if the file cannot be read and a [`PsoError::TopologyLoad`] if
    /// its contents are malformed.
    pub fn from_tgf_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| PsoError::io(path, e))?;
        Self::from_tgf_str(&text, path)
    }

    /// Parse trivial-graph-format text. `path` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Returns a [`PsoError::TopologyLoad`] if the text is malformed.
    pub fn from_tgf_str(text: &str, path: &Path) -> Result<Self> {
        Ok(Self::from_adjacency(tgf::parse_tgf(text, path)?))
    }

    /// Build a topology from (possibly one-sided) neighbour sets. Every link is made symmetric and
    /// self links are dropped. Links to ids outside `0..adjacency.len()` are ignored.
    pub fn from_adjacency(adjacency: Vec<BTreeSet<usize>>) -> Self {
        let n = adjacency.len();
        let mut symmetric = vec![BTreeSet::new(); n];
        for (i, set) in adjacency.into_iter().enumerate() {
            for j in set.into_iter().filter(|&j| j < n && j != i) {
                symmetric[i].insert(j);
                symmetric[j].insert(i);
            }
        }
        Self {
            neighbors: symmetric
                .into_iter()
                .map(|s| s.into_iter().collect())
                .collect(),
        }
    }

    /// Add `count` extra links per particle to uniformly chosen particles that are not yet
    /// neighbours. Particles are visited in id order; a particle with fewer than `count`
    /// non-neighbours left is linked to all of them.
    pub fn with_extra_random_neighbours(self, count: usize, rng: &mut Rng) -> Self {
        if count == 0 {
            return self;
        }
        let n = self.len();
        let mut adjacency: Vec<BTreeSet<usize>> = self
            .neighbors
            .into_iter()
            .map(|v| v.into_iter().collect())
            .collect();
        for i in 0..n {
            let mut candidates: Vec<usize> = (0..n)
                .filter(|&j| j != i && !adjacency[i].contains(&j))
                .collect();
            if candidates.len() < count {
                warn!(
                    "particle {i} has only {} non-neighbours, {count} extra neighbours requested",
                    candidates.len()
                );
            }
            rng.shuffle(&mut candidates);
            for j in candidates.into_iter().take(count) {
                adjacency[i].insert(j);
                adjacency[j].insert(i);
            }
        }
        Self::from_adjacency(adjacency)
    }

    /// The number of particles.
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    /// Returns `true` if the topology has no particles.
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// The sorted neighbour ids of particle `id` (not including `id` itself).
    ///
    /// # Panics
    ///
    /// Panics if `id >= self.len()`.
    pub fn neighbors(&self, id: usize) -> &[usize] {
        &self.neighbors[id]
    }

    /// The number of undirected links.
    pub fn n_edges(&self) -> usize {
        self.neighbors.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Returns `true` if every link appears in both directions.
    pub fn is_symmetric(&self) -> bool {
        self.neighbors.iter().enumerate().all(|(i, ns)| {
            ns.iter()
                .all(|&j| self.neighbors[j].binary_search(&i).is_ok())
        })
    }

    /// Iterate over `(id, neighbours)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[usize])> {
        self.neighbors
            .iter()
            .enumerate()
            .map(|(i, ns)| (i, ns.as_slice()))
    }
}
