//! Everything a run leaves behind for the renderer.
//!
//! The text writers produce semicolon separated files with one record per line:
//!
//! | file                      | header                          | record                          |
//! |---------------------------|---------------------------------|---------------------------------|
//! | run trace                 | `action;iteration;particleId;x;z;y` | `0;t;id;x;z;f(x,z)`         |
//! | topology                  | none                            | `id;neighbour;neighbour;...`    |
//! | function sample           | none                            | `x;z;f(x,z)`                    |
//! | best-so-far history       | `iteration;evaluations;value;x;z` | `t;evals;f;x;z`               |
use std::{
    collections::BTreeSet,
    fs::File,
    io::{BufWriter, Write},
    ops::ControlFlow,
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::{
    algorithms::particles::SwarmStatus,
    core::utils::{stream_rng, Stream},
    topology::Topology,
    traits::{Landscape, Observer},
    Float, PsoError, Result, Vector,
};

/// The header line of a run trace file.
pub const TRACE_HEADER: &str = "action;iteration;particleId;x;z;y";
/// The header line of a best-so-far history file.
pub const BEST_SO_FAR_HEADER: &str = "iteration;evaluations;value;x;z";

/// Create `path` and hand a buffered writer to `write`, attaching the path to any I/O error.
///
/// # Errors
///
/// Returns a [`PsoError::Io`] if the file cannot be created or written.
pub fn write_file<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
    let file = File::create(path).map_err(|e| PsoError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    write(&mut writer)
        .and_then(|()| writer.flush())
        .map_err(|e| PsoError::io(path, e))
}

/// Export any serializable value as a Python pickle.
///
/// # Errors
///
/// Returns a [`PsoError::Io`] if the file cannot be created and a [`PsoError::Pickle`] if
/// serialization fails.
pub fn write_pickle<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| PsoError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_pickle::to_writer(&mut writer, value, Default::default())?;
    writer.flush().map_err(|e| PsoError::io(path, e))
}

/// One particle position in the run trace.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraceEvent {
    /// The action code (always `0`, "move")
    pub action: u8,
    /// The iteration (`0` is the initialization)
    pub iteration: usize,
    /// The particle
    pub particle: usize,
    /// First coordinate of the position
    pub x: Float,
    /// Second coordinate of the position
    pub z: Float,
    /// The landscape value at the position
    pub y: Float,
}

/// The ordered record of every particle position of a run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunTrace {
    /// The events in the order they happened (by iteration, then by particle id)
    pub events: Vec<TraceEvent>,
}

impl RunTrace {
    /// The number of distinct iterations in the trace.
    pub fn iterations(&self) -> usize {
        self.events
            .iter()
            .map(|e| e.iteration)
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Write the trace, header first.
    ///
    /// # Errors
    ///
    /// Forwards any error of the writer.
    pub fn write_to<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        writeln!(w, "{TRACE_HEADER}")?;
        for e in &self.events {
            writeln!(
                w,
                "{};{};{};{};{};{}",
                e.action, e.iteration, e.particle, e.x, e.z, e.y
            )?;
        }
        Ok(())
    }

    /// Write the trace to a file.
    ///
    /// # Errors
    ///
    /// Returns a [`PsoError::Io`] if the file cannot be written.
    pub fn write_file(&self, path: &Path) -> Result<()> {
        write_file(path, |w| self.write_to(w))
    }
}

/// The neighbour lists of a run, as drawn by the renderer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyTrace {
    /// The sorted neighbours of every particle, indexed by id
    pub neighbors: Vec<Vec<usize>>,
}

impl From<&Topology> for TopologyTrace {
    fn from(topology: &Topology) -> Self {
        Self {
            neighbors: topology.iter().map(|(_, n)| n.to_vec()).collect(),
        }
    }
}

impl TopologyTrace {
    /// Write one `id;neighbour;...` line per particle.
    ///
    /// # Errors
    ///
    /// Forwards any error of the writer.
    pub fn write_to<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        for (id, neighbors) in self.neighbors.iter().enumerate() {
            write!(w, "{id}")?;
            for n in neighbors {
                write!(w, ";{n}")?;
            }
            writeln!(w)?;
        }
        Ok(())
    }

    /// Write the neighbour lists to a file.
    ///
    /// # Errors
    ///
    /// Returns a [`PsoError::Io`] if the file cannot be written.
    pub fn write_file(&self, path: &Path) -> Result<()> {
        write_file(path, |w| self.write_to(w))
    }
}

/// A square grid of landscape values covering the domain.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LandscapeSample {
    /// Samples per axis
    pub resolution: usize,
    /// `(x, z, y)` triples, `x` varying slowest
    pub points: Vec<[Float; 3]>,
}

impl LandscapeSample {
    /// Sample `landscape` on `[lower, upper]^2` with `resolution` points per axis (both ends
    /// included). A stochastic landscape draws from a dedicated stream of `seed`.
    pub fn sample(
        landscape: &dyn Landscape,
        lower: Float,
        upper: Float,
        resolution: usize,
        seed: u64,
    ) -> Self {
        let mut rng = stream_rng(seed, Stream::Landscape, 1, 0);
        let step = if resolution > 1 {
            (upper - lower) / (resolution - 1) as Float
        } else {
            0.0
        };
        let axis: Vec<Float> = (0..resolution)
            .map(|i| {
                if i + 1 == resolution && resolution > 1 {
                    upper
                } else {
                    (i as Float).mul_add(step, lower)
                }
            })
            .collect();
        let mut points = Vec::with_capacity(resolution * resolution);
        for &x in &axis {
            for &z in &axis {
                let y = landscape.evaluate(&Vector::new(x, z), &mut rng);
                points.push([x, z, y]);
            }
        }
        Self { resolution, points }
    }

    /// Write one `x;z;y` line per sample.
    ///
    /// # Errors
    ///
    /// Forwards any error of the writer.
    pub fn write_to<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        for [x, z, y] in &self.points {
            writeln!(w, "{x};{z};{y}")?;
        }
        Ok(())
    }

    /// Write the sample to a file.
    ///
    /// # Errors
    ///
    /// Returns a [`PsoError::Io`] if the file cannot be written.
    pub fn write_file(&self, path: &Path) -> Result<()> {
        write_file(path, |w| self.write_to(w))
    }
}

/// The global best at one point of a run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BestSoFar {
    /// The iteration
    pub iteration: usize,
    /// Evaluations performed up to and including the iteration
    pub evaluations: usize,
    /// The global best value
    pub value: Float,
    /// First coordinate of the global best
    pub x: Float,
    /// Second coordinate of the global best
    pub z: Float,
}

impl BestSoFar {
    fn from_status(status: &SwarmStatus) -> Self {
        let (x, value) = status.gbest.destructure();
        Self {
            iteration: status.iteration,
            evaluations: status.n_f_evals,
            value,
            x: x.x,
            z: x.y,
        }
    }
}

/// Write a best-so-far history, header first.
///
/// # Errors
///
/// Forwards any error of the writer.
pub fn write_best_so_far<W: Write>(history: &[BestSoFar], w: &mut W) -> std::io::Result<()> {
    writeln!(w, "{BEST_SO_FAR_HEADER}")?;
    for b in history {
        writeln!(
            w,
            "{};{};{};{};{}",
            b.iteration, b.evaluations, b.value, b.x, b.z
        )?;
    }
    Ok(())
}

/// An [`Observer`] which records the particle positions of every iteration and samples the
/// best-so-far history.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RunRecorder {
    instrument: bool,
    bsf_save_period: usize,
    trace: RunTrace,
    best_so_far: Vec<BestSoFar>,
}

impl RunRecorder {
    /// Create a recorder. With `instrument` off only the best-so-far history is kept.
    /// A `bsf_save_period` of zero is treated as one.
    pub fn new(instrument: bool, bsf_save_period: usize) -> Self {
        Self {
            instrument,
            bsf_save_period: bsf_save_period.max(1),
            ..Default::default()
        }
    }

    /// Add the final best-so-far entry (unless the last iteration was already sampled) and hand
    /// back what was recorded.
    pub fn finish(mut self, status: &SwarmStatus) -> (RunTrace, Vec<BestSoFar>) {
        if self
            .best_so_far
            .last()
            .map_or(true, |b| b.iteration != status.iteration)
        {
            self.best_so_far.push(BestSoFar::from_status(status));
        }
        (self.trace, self.best_so_far)
    }
}

impl Observer for RunRecorder {
    fn observe(&mut self, iteration: usize, status: &SwarmStatus) -> ControlFlow<()> {
        if self.instrument {
            self.trace
                .events
                .extend(status.particles.iter().map(|p| TraceEvent {
                    action: 0,
                    iteration,
                    particle: p.id,
                    x: p.position.x.x,
                    z: p.position.x.y,
                    y: p.position.fx_checked(),
                }));
        }
        if iteration % self.bsf_save_period == 0 {
            self.best_so_far.push(BestSoFar::from_status(status));
        }
        ControlFlow::Continue(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        algorithms::particles::Particle,
        core::Point,
        landscapes::{ShiftedQuadricWithNoise, Sphere},
    };

    fn status(iteration: usize) -> SwarmStatus {
        let particles: Vec<Particle> = (0..3)
            .map(|id| {
                let p = Point {
                    x: Vector::new(id as Float, 1.0 - id as Float),
                    fx: Some(2.0 * (id * id) as Float),
                };
                Particle {
                    id,
                    position: p,
                    velocity: Vector::zeros(),
                    best: p,
                }
            })
            .collect();
        let mut status = SwarmStatus {
            iteration,
            particles,
            n_f_evals: 3 * (iteration + 1),
            ..Default::default()
        };
        status.update_gbest();
        status
    }

    #[test]
    fn test_trace_format() {
        let mut recorder = RunRecorder::new(true, 1000);
        let _ = recorder.observe(0, &status(0));
        let _ = recorder.observe(1, &status(1));
        let (trace, _) = recorder.finish(&status(1));
        assert_eq!(trace.events.len(), 6);
        assert_eq!(trace.iterations(), 2);
        let mut buf = Vec::new();
        trace.write_to(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], TRACE_HEADER);
        assert_eq!(lines[1], "0;0;0;0;1;0");
        assert_eq!(lines[3], "0;0;2;2;-1;8");
        assert_eq!(lines[6], "0;1;2;2;-1;8");
    }

    #[test]
    fn test_uninstrumented_recorder_keeps_bsf() {
        let mut recorder = RunRecorder::new(false, 2);
        for t in 0..5 {
            let _ = recorder.observe(t, &status(t));
        }
        let (trace, bsf) = recorder.finish(&status(4));
        assert!(trace.events.is_empty());
        let iterations: Vec<usize> = bsf.iter().map(|b| b.iteration).collect();
        assert_eq!(iterations, vec![0, 2, 4]);
        assert_eq!(bsf[2].evaluations, 15);

        let mut recorder = RunRecorder::new(false, 2);
        for t in 0..4 {
            let _ = recorder.observe(t, &status(t));
        }
        let (_, bsf) = recorder.finish(&status(3));
        let iterations: Vec<usize> = bsf.iter().map(|b| b.iteration).collect();
        assert_eq!(iterations, vec![0, 2, 3]);
        let mut buf = Vec::new();
        write_best_so_far(&bsf, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().next(), Some(BEST_SO_FAR_HEADER));
        assert_eq!(text.lines().nth(3), Some("3;12;0;0;1"));
    }

    #[test]
    fn test_topology_trace_lines() {
        let topology = Topology::ring(4, 1).unwrap();
        let trace = TopologyTrace::from(&topology);
        let mut buf = Vec::new();
        trace.write_to(&mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "0;1;3\n1;0;2\n2;1;3\n3;0;2\n"
        );
    }

    #[test]
    fn test_landscape_sample_grid() {
        let sample = LandscapeSample::sample(&Sphere, -1.0, 1.0, 3, 0);
        assert_eq!(sample.points.len(), 9);
        assert_eq!(sample.points[0], [-1.0, -1.0, 2.0]);
        assert_eq!(sample.points[1], [-1.0, 0.0, 1.0]);
        assert_eq!(sample.points[4], [0.0, 0.0, 0.0]);
        assert_eq!(sample.points[8], [1.0, 1.0, 2.0]);
        let mut buf = Vec::new();
        sample.write_to(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap().lines().nth(1), Some("-1;0;1"));
    }

    #[test]
    fn test_stochastic_sample_is_reproducible() {
        let landscape = ShiftedQuadricWithNoise::default();
        let a = LandscapeSample::sample(&landscape, -5.0, 5.0, 4, 17);
        let b = LandscapeSample::sample(&landscape, -5.0, 5.0, 4, 17);
        assert_eq!(a, b);
    }
}
