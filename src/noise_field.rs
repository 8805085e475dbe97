//! Coherent-noise sampling
//!
//! Narrow wrapper over the Perlin generator: a seed, a base frequency, and a
//! `sample` in [-1, 1]. Everything the terrain pipeline knows about noise
//! goes through this interface.

use noise::{NoiseFn, Perlin};

/// A seeded coherent-noise field sampled at a fixed base frequency.
#[derive(Debug, Clone)]
pub struct NoiseField {
    perlin: Perlin,
    seed: u32,
    frequency: f64,
}

impl NoiseField {
    pub fn new(seed: u32, frequency: f64) -> Self {
        Self {
            perlin: Perlin::new(seed),
            seed,
            frequency,
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn set_seed(&mut self, seed: u32) {
        self.seed = seed;
        self.perlin = Perlin::new(seed);
    }

    pub fn set_frequency(&mut self, frequency: f64) {
        self.frequency = frequency;
    }

    /// Sample the field at a point. Output is in [-1, 1].
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        self.perlin.get([x * self.frequency, y * self.frequency])
    }

    /// Sample normalized to [0, 1].
    pub fn sample01(&self, x: f64, y: f64) -> f64 {
        (self.sample(x, y) + 1.0) * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_range() {
        let field = NoiseField::new(1337, 0.05);
        for y in 0..50 {
            for x in 0..50 {
                let v = field.sample(x as f64, y as f64);
                assert!((-1.0..=1.0).contains(&v), "sample out of range: {v}");
                let n = field.sample01(x as f64, y as f64);
                assert!((0.0..=1.0).contains(&n), "sample01 out of range: {n}");
            }
        }
    }

    #[test]
    fn test_same_seed_same_samples() {
        let a = NoiseField::new(42, 0.1);
        let b = NoiseField::new(42, 0.1);
        for i in 0..20 {
            let (x, y) = (i as f64 * 1.7, i as f64 * 0.9);
            assert_eq!(a.sample(x, y), b.sample(x, y));
        }
    }

    #[test]
    fn test_reseeding_matches_a_fresh_field() {
        let mut field = NoiseField::new(1, 0.1);
        field.set_seed(2);
        assert_eq!(field.seed(), 2);
        assert_eq!(
            field.sample(3.5, 7.25),
            NoiseField::new(2, 0.1).sample(3.5, 7.25)
        );
        field.set_frequency(0.2);
        assert_eq!(field.frequency(), 0.2);
        assert_eq!(
            field.sample(3.5, 7.25),
            NoiseField::new(2, 0.2).sample(3.5, 7.25)
        );
    }

    #[test]
    fn test_different_seed_differs_somewhere() {
        let a = NoiseField::new(1, 0.1);
        let b = NoiseField::new(2, 0.1);
        let differs = (0..50).any(|i| {
            let (x, y) = (i as f64 * 1.3, i as f64 * 2.1);
            a.sample(x, y) != b.sample(x, y)
        });
        assert!(differs);
    }
}
