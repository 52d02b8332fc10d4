//! Batch distribution for parallel trial execution.
//!
//! Trials are split into contiguous batches; each batch runs on one worker
//! with its own dice stream and the partial counts are summed afterwards.

use crate::combat::Force;
use crate::parallel::pool::WorkerPool;
use crate::simulation::{run_monte_carlo_parallel, TrialConfig, TrialSummary};

/// Split `total` items into up to `num_batches` ranges `[start, end)`.
/// Batches are as equal in size as possible; earlier batches take the remainder.
///
/// # Example
/// ```
/// # use fleetsim::parallel::batch_ranges;
/// let ranges = batch_ranges(100, 4);
/// assert_eq!(ranges, vec![(0, 25), (25, 50), (50, 75), (75, 100)]);
/// ```
pub fn batch_ranges(total: usize, num_batches: usize) -> Vec<(usize, usize)> {
    if total == 0 || num_batches == 0 {
        return Vec::new();
    }
    let num_batches = num_batches.min(total);
    let base = total / num_batches;
    let remainder = total % num_batches;
    let mut ranges = Vec::with_capacity(num_batches);
    let mut start = 0;
    for i in 0..num_batches {
        let size = base + if i < remainder { 1 } else { 0 };
        let end = start + size;
        ranges.push((start, end));
        start = end;
    }
    ranges
}

/// Run a seeded Monte Carlo estimate on `pool`.
/// Calls [crate::simulation::run_monte_carlo_parallel] inside [WorkerPool::install].
pub fn run_trial_batches(
    attacker: &Force,
    defender: &Force,
    config: &TrialConfig,
    pool: &WorkerPool,
) -> TrialSummary {
    pool.install(|| run_monte_carlo_parallel(attacker, defender, config))
}
