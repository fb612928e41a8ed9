//! Seeded gradient noise over a 2D lattice.
//!
//! A shuffled permutation table hashes integer lattice corners into a small
//! fixed set of gradient directions; samples interpolate the four corner
//! gradients with a quintic fade. Layered octaves (fbm) add fine detail
//! over the coarse shape.

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

/// Fixed gradient directions, selected from the low three bits of the
/// corner hash. Diagonals and axis vectors cover both axes evenly.
const GRADIENTS: [(f32, f32); 8] = [
    (1.0, 1.0),
    (-1.0, 1.0),
    (1.0, -1.0),
    (-1.0, -1.0),
    (1.0, 0.0),
    (-1.0, 0.0),
    (0.0, 1.0),
    (0.0, -1.0),
];

/// A seeded, spatially coherent scalar field.
pub struct NoiseField {
    /// 256-entry permutation, duplicated so corner hashes (`p[x] + y + 1`
    /// at most 511) never wrap mid-lookup.
    perm: [usize; 512],
}

impl NoiseField {
    /// Build a field from an already-seeded generator. The table is a
    /// Fisher-Yates shuffle of `0..256`; the generator fully determines it.
    pub fn from_rng(rng: &mut ChaCha8Rng) -> Self {
        let mut table: Vec<usize> = (0..256).collect();
        table.shuffle(rng);

        let mut perm = [0usize; 512];
        for (i, &v) in table.iter().enumerate() {
            perm[i] = v;
            perm[i + 256] = v;
        }
        NoiseField { perm }
    }

    /// Quintic smoothing curve, zero first and second derivative at 0 and 1.
    fn fade(t: f32) -> f32 {
        t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
    }

    fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + t * (b - a)
    }

    fn grad(hash: usize, x: f32, y: f32) -> f32 {
        let (gx, gy) = GRADIENTS[hash & 7];
        gx * x + gy * y
    }

    /// Single-octave noise at `(x, y)`.
    ///
    /// Output is roughly `[-1, 1]` but not exactly bounded; callers that
    /// need a hard range clamp after summation. Zero at integer lattice
    /// points.
    pub fn noise(&self, x: f32, y: f32) -> f32 {
        let xi = (x.floor() as i32 & 255) as usize;
        let yi = (y.floor() as i32 & 255) as usize;

        let fx = x - x.floor();
        let fy = y - y.floor();

        let u = Self::fade(fx);
        let v = Self::fade(fy);

        let a = self.perm[xi] + yi;
        let b = self.perm[xi + 1] + yi;

        Self::lerp(
            Self::lerp(
                Self::grad(self.perm[a], fx, fy),
                Self::grad(self.perm[b], fx - 1.0, fy),
                u,
            ),
            Self::lerp(
                Self::grad(self.perm[a + 1], fx, fy - 1.0),
                Self::grad(self.perm[b + 1], fx - 1.0, fy - 1.0),
                u,
            ),
            v,
        )
    }

    /// Fractal (multi-octave) sum. Each octave doubles the frequency and
    /// scales the amplitude by `persistence`; the result is renormalized by
    /// the total amplitude mass.
    pub fn fbm(&self, x: f32, y: f32, octaves: u32, persistence: f32) -> f32 {
        let mut total = 0.0;
        let mut frequency = 1.0;
        let mut amplitude = 1.0;
        let mut max_value = 0.0;

        for _ in 0..octaves {
            total += self.noise(x * frequency, y * frequency) * amplitude;
            max_value += amplitude;
            amplitude *= persistence;
            frequency *= 2.0;
        }

        total / max_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn field(seed: u64) -> NoiseField {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        NoiseField::from_rng(&mut rng)
    }

    #[test]
    fn test_permutation_table_is_a_doubled_permutation() {
        let f = field(7);

        let mut seen = [false; 256];
        for &v in &f.perm[..256] {
            assert!(v < 256);
            assert!(!seen[v], "value {} appears twice", v);
            seen[v] = true;
        }
        assert_eq!(&f.perm[..256], &f.perm[256..]);
    }

    #[test]
    fn test_same_seed_same_field() {
        let a = field(42);
        let b = field(42);

        for i in 0..50 {
            let x = i as f32 * 0.173;
            let y = i as f32 * 0.311;
            assert_eq!(a.noise(x, y), b.noise(x, y));
            assert_eq!(a.fbm(x, y, 6, 0.5), b.fbm(x, y, 6, 0.5));
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = field(1);
        let b = field(2);

        let differs = (0..100).any(|i| {
            let x = i as f32 * 0.37 + 0.5;
            a.noise(x, x * 0.7) != b.noise(x, x * 0.7)
        });
        assert!(differs);
    }

    #[test]
    fn test_zero_at_lattice_points() {
        let f = field(3);

        for x in 0..8 {
            for y in 0..8 {
                assert_eq!(f.noise(x as f32, y as f32), 0.0);
            }
        }
    }

    #[test]
    fn test_output_is_roughly_bounded() {
        let f = field(11);

        for i in 0..2000 {
            let x = i as f32 * 0.0173;
            let y = i as f32 * 0.0311;
            let n = f.noise(x, y);
            assert!(n.abs() <= 2.0, "noise({}, {}) = {} out of range", x, y, n);
            let o = f.fbm(x, y, 6, 0.5);
            assert!(o.abs() <= 2.0, "fbm({}, {}) = {} out of range", x, y, o);
        }
    }

    #[test]
    fn test_single_octave_fbm_matches_noise() {
        let f = field(5);

        for i in 0..20 {
            let x = i as f32 * 0.41;
            let y = i as f32 * 0.13;
            assert_eq!(f.fbm(x, y, 1, 0.5), f.noise(x, y));
        }
    }

    #[test]
    fn test_field_is_spatially_coherent() {
        // Nearby samples must differ by little; this is what separates
        // gradient noise from white noise.
        let f = field(9);
        let step = 0.01;

        let mut max_delta = 0.0f32;
        for i in 0..1000 {
            let x = i as f32 * 0.0137;
            let y = i as f32 * 0.0071;
            let delta = (f.noise(x + step, y) - f.noise(x, y)).abs();
            max_delta = max_delta.max(delta);
        }
        assert!(max_delta < 0.1, "max step delta {} too large", max_delta);
    }
}
