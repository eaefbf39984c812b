//! Utilities shared by simulators and models.
use crate::error::SimError;
use anyhow::Result;
use rand::{distributions::WeightedIndex, prelude::*};

/// Draws an item of a categorical distribution given as `(item, probability)` pairs.
///
/// Probabilities need not be normalized. An empty distribution, or one without
/// positive mass, is reported as [`SimError::Domain`].
pub fn sample_categorical<T, R>(dist: &[(T, f64)], rng: &mut R) -> Result<T>
where
    T: Clone,
    R: Rng + ?Sized,
{
    let ix = WeightedIndex::new(dist.iter().map(|(_, p)| *p))
        .map_err(|e| SimError::Domain(format!("invalid distribution: {}", e)))?;
    Ok(dist[ix.sample(rng)].0.clone())
}

/// Discounted sum `Σ r_t γ^t` of a reward sequence.
///
/// The discount is accumulated as a running product, in the same way as the
/// simulators do, so the result is bit-identical to their returns.
pub fn discounted_sum<'a>(rewards: impl IntoIterator<Item = &'a f64>, discount: f64) -> f64 {
    let mut disc = 1.0;
    let mut r_total = 0.0;
    for r in rewards {
        r_total += disc * r;
        disc *= discount;
    }
    r_total
}

/// Returns a random number generator for a run with the given seed.
pub fn rng_from_seed(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_categorical_frequency() -> Result<()> {
        let dist = [(0usize, 0.2), (1, 0.8)];
        let mut rng = rng_from_seed(42);
        let n = 10_000;
        let mut counts = [0usize; 2];
        for _ in 0..n {
            counts[sample_categorical(&dist, &mut rng)?] += 1;
        }
        assert!((counts[0] as f64 / n as f64 - 0.2).abs() < 2e-2);
        assert!((counts[1] as f64 / n as f64 - 0.8).abs() < 2e-2);
        Ok(())
    }

    #[test]
    fn test_sample_categorical_rejects_empty() {
        let dist: [(u8, f64); 0] = [];
        let err = sample_categorical(&dist, &mut rng_from_seed(0)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SimError>(),
            Some(SimError::Domain(_))
        ));
    }

    #[test]
    fn test_discounted_sum() {
        let rs = [1.0, 2.0, 4.0];
        assert_eq!(discounted_sum(&rs, 1.0), 7.0);
        assert_eq!(discounted_sum(&rs, 0.5), 1.0 + 1.0 + 1.0);
        assert_eq!(discounted_sum(&[], 0.9), 0.0);
    }
}
