pub mod monte_carlo;

pub use monte_carlo::{
    run_monte_carlo, run_monte_carlo_parallel, run_trials, run_trials_with, TrialConfig,
    TrialSummary, DEFAULT_TRIALS, MONTE_CARLO_BATCHES,
};
