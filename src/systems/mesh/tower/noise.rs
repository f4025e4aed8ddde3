// deterministic 2d value noise over a seeded permutation lattice
// adjacent tiers sample nearby coordinates, so their perturbation stays correlated

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

#[inline]
fn smootherstep(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Seeded coherent-noise sampler. The permutation lattice is fixed at
/// construction, so `sample` is a pure function of (x, z) afterwards.
pub struct NoiseField {
    perm: [u8; 256],
}

impl NoiseField {
    pub fn new(seed: u64) -> Self {
        let mut perm = [0u8; 256];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = i as u8;
        }
        let mut rng = StdRng::seed_from_u64(seed);
        perm.shuffle(&mut rng);
        Self { perm }
    }

    #[inline]
    fn lattice(&self, ix: i32, iz: i32) -> f32 {
        // double indirection through the permutation decorrelates the axes
        let a = self.perm[(ix & 255) as usize];
        let b = self.perm[(a as usize + (iz & 255) as usize) & 255];
        b as f32 / 255.0
    }

    /// Sample the field at (x, z). Returns a value in [0, 1], continuous
    /// across neighboring samples.
    pub fn sample(&self, x: f32, z: f32) -> f32 {
        let ix = x.floor() as i32;
        let iz = z.floor() as i32;
        let fx = x - ix as f32;
        let fz = z - iz as f32;
        let sx = smootherstep(fx);
        let sz = smootherstep(fz);

        let v00 = self.lattice(ix, iz);
        let v10 = self.lattice(ix + 1, iz);
        let v01 = self.lattice(ix, iz + 1);
        let v11 = self.lattice(ix + 1, iz + 1);

        let a = lerp(v00, v10, sx);
        let b = lerp(v01, v11, sx);
        lerp(a, b, sz).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_for_fixed_seed() {
        let a = NoiseField::new(42);
        let b = NoiseField::new(42);
        for i in 0..50 {
            let x = i as f32 * 0.3;
            assert_eq!(a.sample(x, 0.17), b.sample(x, 0.17));
        }
    }

    #[test]
    fn different_seeds_differ() {
        let a = NoiseField::new(1);
        let b = NoiseField::new(2);
        let same = (0..100).all(|i| {
            let x = i as f32 * 0.3;
            a.sample(x, 0.0) == b.sample(x, 0.0)
        });
        assert!(!same);
    }

    #[test]
    fn samples_stay_in_unit_range() {
        let field = NoiseField::new(977);
        for i in -200..200 {
            for j in -20..20 {
                let v = field.sample(i as f32 * 0.173, j as f32 * 0.31);
                assert!((0.0..=1.0).contains(&v), "out of range: {v}");
            }
        }
    }

    #[test]
    fn neighboring_samples_are_continuous() {
        let field = NoiseField::new(5);
        let mut prev = field.sample(0.0, 0.0);
        for i in 1..1000 {
            let v = field.sample(i as f32 * 0.01, 0.0);
            assert!((v - prev).abs() < 0.05, "jump at step {i}");
            prev = v;
        }
    }
}
