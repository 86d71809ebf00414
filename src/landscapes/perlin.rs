use fastrand::Rng;

use crate::{traits::Landscape, Float, Vector};

const GRADIENTS: [(Float, Float); 8] = [
    (1.0, 1.0),
    (-1.0, 1.0),
    (1.0, -1.0),
    (-1.0, -1.0),
    (1.0, 0.0),
    (-1.0, 0.0),
    (0.0, 1.0),
    (0.0, -1.0),
];

fn fade(t: Float) -> Float {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(t: Float, a: Float, b: Float) -> Float {
    a + t * (b - a)
}

/// A seeded fractal Perlin-noise surface, standing in for an unknown real-world landscape.
///
/// The surface is the sum of `octaves` layers of gradient noise, each at `lacunarity` times the
/// frequency and `persistence` times the amplitude of the previous one. The base frequency is
/// chosen so that `cells` noise cells span the sampled domain. The permutation table is shuffled
/// once from the seed, so the surface is deterministic and continuous; it repeats every 256 cells.
#[derive(Clone, Debug)]
pub struct PerlinLandscape {
    permutation: Vec<u8>,
    /// Lower corner of the domain the noise is laid over
    pub origin: Float,
    /// Frequency of the first octave, in cells per unit length
    pub frequency: Float,
    /// Number of noise layers
    pub octaves: u32,
    /// Amplitude ratio between successive layers
    pub persistence: Float,
    /// Frequency ratio between successive layers
    pub lacunarity: Float,
    /// Overall height scale
    pub amplitude: Float,
}

impl PerlinLandscape {
    /// Build a landscape over `[lower, upper]^2` from the given seed.
    pub fn new(seed: u64, lower: Float, upper: Float) -> Self {
        let mut rng = Rng::with_seed(seed);
        let mut table: Vec<u8> = (0..=255).collect();
        rng.shuffle(&mut table);
        let mut permutation = table.clone();
        permutation.extend_from_slice(&table);
        let width = if upper > lower { upper - lower } else { 1.0 };
        let cells = 4.0;
        Self {
            permutation,
            origin: lower,
            frequency: cells / width,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            amplitude: width / 2.0,
        }
    }

    fn hash(&self, i: usize, j: usize) -> usize {
        self.permutation[self.permutation[i] as usize + j] as usize
    }

    /// Single-octave gradient noise, roughly in `[-1, 1]`.
    pub fn noise(&self, x: Float, z: Float) -> Float {
        let (xf, zf) = (x.floor(), z.floor());
        // cast saturates on huge inputs, so this never indexes out of range
        let xi = (xf as i64 & 255) as usize;
        let zi = (zf as i64 & 255) as usize;
        let (dx, dz) = (x - xf, z - zf);
        let grad = |h: usize, px: Float, pz: Float| {
            let (gx, gz) = GRADIENTS[h & 7];
            gx * px + gz * pz
        };
        let n00 = grad(self.hash(xi, zi), dx, dz);
        let n10 = grad(self.hash(xi + 1, zi), dx - 1.0, dz);
        let n01 = grad(self.hash(xi, zi + 1), dx, dz - 1.0);
        let n11 = grad(self.hash(xi + 1, zi + 1), dx - 1.0, dz - 1.0);
        let (u, v) = (fade(dx), fade(dz));
        lerp(v, lerp(u, n00, n10), lerp(u, n01, n11))
    }
}

impl Landscape for PerlinLandscape {
    fn evaluate(&self, x: &Vector, _rng: &mut Rng) -> Float {
        if !x.x.is_finite() || !x.y.is_finite() {
            return Float::NAN;
        }
        let mut frequency = self.frequency;
        let mut amplitude = 1.0;
        let mut total = 0.0;
        for _ in 0..self.octaves {
            total += amplitude
                * self.noise(
                    (x.x - self.origin) * frequency,
                    (x.y - self.origin) * frequency,
                );
            frequency *= self.lacunarity;
            amplitude *= self.persistence;
        }
        total * self.amplitude
    }
    fn name(&self) -> &'static str {
        "Perlin landscape"
    }
}
