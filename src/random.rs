//! Random sources used by the generator and the search engine.
//!
//! Every consumer receives an explicit `&mut R: Rng`; nothing in the crate
//! touches a global generator, so a fixed seed reproduces a whole run.

use crate::error::{BeesError, BeesResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Binomial, Distribution};

/// Creates a seeded generator.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Draws one seed per task from `rng`, in task order.
///
/// Child generators built from these seeds are independent of the order in
/// which the tasks are later executed.
pub fn split_seeds<R: Rng>(rng: &mut R, count: usize) -> Vec<u64> {
    (0..count).map(|_| rng.random()).collect()
}

/// Splits `total` units over `bins` equally likely bins.
///
/// Uses sequential conditional binomial draws: bin `i` receives
/// `Binomial(remaining, 1 / (bins - i))`, the last bin takes the rest. The
/// result always sums to `total`.
pub fn multinomial_uniform<R: Rng>(total: u32, bins: usize, rng: &mut R) -> BeesResult<Vec<u32>> {
    if bins == 0 {
        return Err(BeesError::invariant("multinomial draw over zero bins"));
    }

    let mut counts = vec![0u32; bins];
    let mut remaining = total;
    for (i, slot) in counts.iter_mut().enumerate().take(bins - 1) {
        if remaining == 0 {
            break;
        }
        let p = 1.0 / (bins - i) as f64;
        let binomial = Binomial::new(u64::from(remaining), p)
            .map_err(|e| BeesError::invariant(format!("binomial draw failed: {e}")))?;
        // A binomial sample never exceeds its trial count.
        let drawn = binomial.sample(rng).min(u64::from(remaining)) as u32;
        *slot = drawn;
        remaining -= drawn;
    }
    counts[bins - 1] += remaining;

    Ok(counts)
}
