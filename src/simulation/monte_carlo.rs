use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::combat::{resolve_combat, DiceSource, EngineConfig, Force, Rng, Verdict};
use crate::parallel::batch_ranges;

pub const DEFAULT_TRIALS: usize = 100_000;

/// Fixed batch count for seeded runs. Each batch owns one dice stream, so the
/// result depends on the seed alone and not on how many threads execute it.
pub const MONTE_CARLO_BATCHES: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialConfig {
    pub trials: usize,
    pub seed: u64,
    pub engine: EngineConfig,
    /// Keep every trial's verdict in [TrialSummary::verdicts].
    pub record_verdicts: bool,
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            seed: 0,
            engine: EngineConfig::default(),
            record_verdicts: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialSummary {
    pub trials: usize,
    pub wins: usize,
    pub win_rate: f64,
    pub standard_error: f64,
    pub win_rate_95_ci: [f64; 2],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub verdicts: Vec<Verdict>,
}

impl TrialSummary {
    pub fn from_counts(trials: usize, wins: usize) -> Self {
        let (win_rate, standard_error) = if trials == 0 {
            (0.0, 0.0)
        } else {
            let p = wins as f64 / trials as f64;
            (p, (p * (1.0 - p) / trials as f64).sqrt())
        };
        let z = 1.96;
        Self {
            trials,
            wins,
            win_rate,
            standard_error,
            win_rate_95_ci: [
                (win_rate - z * standard_error).max(0.0),
                (win_rate + z * standard_error).min(1.0),
            ],
            verdicts: Vec::new(),
        }
    }

    /// Combine two disjoint sets of trials. Verdicts keep `self` first.
    pub fn merge(self, other: Self) -> Self {
        let mut verdicts = self.verdicts;
        verdicts.extend(other.verdicts);
        Self {
            verdicts,
            ..Self::from_counts(self.trials + other.trials, self.wins + other.wins)
        }
    }

    pub fn win_percent(&self) -> f64 {
        self.win_rate * 100.0
    }
}

/// Run `trials` engagements between the two forces and return the attacker's win fraction.
/// Both forces are restored to full hull after every trial.
pub fn run_trials<D: DiceSource + ?Sized>(
    attacker: &mut Force,
    defender: &mut Force,
    trials: usize,
    dice: &mut D,
) -> f64 {
    let config = TrialConfig {
        trials,
        ..TrialConfig::default()
    };
    run_trials_with(attacker, defender, dice, &config).win_rate
}

/// Like [run_trials] with the full [TrialConfig]. `config.seed` is ignored; `dice` is used as given.
pub fn run_trials_with<D: DiceSource + ?Sized>(
    attacker: &mut Force,
    defender: &mut Force,
    dice: &mut D,
    config: &TrialConfig,
) -> TrialSummary {
    let mut wins = 0usize;
    let mut verdicts = if config.record_verdicts {
        Vec::with_capacity(config.trials)
    } else {
        Vec::new()
    };

    for _ in 0..config.trials {
        let report = resolve_combat(attacker, defender, dice, config.engine);
        if report.attacker_won() {
            wins += 1;
        }
        if config.record_verdicts {
            verdicts.push(report.verdict);
        }
        attacker.restore();
        defender.restore();
    }

    TrialSummary {
        verdicts,
        ..TrialSummary::from_counts(config.trials, wins)
    }
}

/// Seeded run on the calling thread. Produces the same summary as
/// [run_monte_carlo_parallel] for the same inputs.
pub fn run_monte_carlo(attacker: &Force, defender: &Force, config: &TrialConfig) -> TrialSummary {
    run_monte_carlo_with_parallelism(attacker, defender, config, false)
}

/// Seeded run with batches distributed across the current Rayon pool.
pub fn run_monte_carlo_parallel(
    attacker: &Force,
    defender: &Force,
    config: &TrialConfig,
) -> TrialSummary {
    run_monte_carlo_with_parallelism(attacker, defender, config, true)
}

fn run_monte_carlo_with_parallelism(
    attacker: &Force,
    defender: &Force,
    config: &TrialConfig,
    parallel: bool,
) -> TrialSummary {
    let ranges = batch_ranges(config.trials, MONTE_CARLO_BATCHES);

    let run_batch = |(batch, &(start, end)): (usize, &(usize, usize))| {
        let mut attacker = attacker.clone();
        let mut defender = defender.clone();
        let mut dice = Rng::for_stream(config.seed, batch as u64);
        let batch_config = TrialConfig {
            trials: end - start,
            ..*config
        };
        run_trials_with(&mut attacker, &mut defender, &mut dice, &batch_config)
    };

    let partials: Vec<TrialSummary> = if parallel {
        ranges.par_iter().enumerate().map(run_batch).collect()
    } else {
        ranges.iter().enumerate().map(run_batch).collect()
    };
    let summary = partials
        .into_iter()
        .fold(TrialSummary::from_counts(0, 0), TrialSummary::merge);

    info!(
        trials = summary.trials,
        wins = summary.wins,
        win_rate = summary.win_rate,
        seed = config.seed,
        parallel,
        "monte carlo run complete"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{Blueprint, ScriptedDice, Unit, UnitClass};

    fn ship(class: UnitClass, initiative: u32, ion_cannons: u32, hull: u32) -> Unit {
        Unit::new(
            class,
            Blueprint {
                initiative,
                ion_cannons,
                plasma_cannons: 0,
                antimatter_cannons: 0,
                ion_missiles: 0,
                plasma_missiles: 0,
                hull,
                computer: 0,
                shield: 0,
            },
        )
    }

    fn skirmish() -> (Force, Force) {
        let attacker = Force::new(vec![
            ship(UnitClass::Interceptor, 3, 1, 1),
            ship(UnitClass::Interceptor, 3, 1, 1),
            ship(UnitClass::Cruiser, 2, 1, 2),
        ]);
        let defender = Force::new(vec![ship(UnitClass::Generic, 2, 2, 3)]);
        (attacker, defender)
    }

    #[test]
    fn zero_trials_report_zero_rate() {
        let (mut attacker, mut defender) = skirmish();
        let mut dice = Rng::new(1);
        assert_eq!(run_trials(&mut attacker, &mut defender, 0, &mut dice), 0.0);
        assert_eq!(TrialSummary::from_counts(0, 0).win_rate_95_ci, [0.0, 0.0]);
    }

    #[test]
    fn forces_are_back_at_full_hull_after_a_run() {
        let (mut attacker, mut defender) = skirmish();
        let mut dice = Rng::new(5);
        run_trials(&mut attacker, &mut defender, 200, &mut dice);

        for unit in attacker.units().iter().chain(defender.units()) {
            assert_eq!(unit.durability(), unit.blueprint.hull);
        }
    }

    #[test]
    fn always_six_dice_give_a_certain_win() {
        let (mut attacker, mut defender) = skirmish();
        let mut dice = ScriptedDice::fixed(6);
        assert_eq!(run_trials(&mut attacker, &mut defender, 10, &mut dice), 1.0);
    }

    #[test]
    fn recorded_verdicts_match_the_win_count() {
        let (mut attacker, mut defender) = skirmish();
        let mut dice = Rng::new(11);
        let config = TrialConfig {
            trials: 300,
            record_verdicts: true,
            ..TrialConfig::default()
        };
        let summary = run_trials_with(&mut attacker, &mut defender, &mut dice, &config);

        assert_eq!(summary.verdicts.len(), 300);
        let wins = summary
            .verdicts
            .iter()
            .filter(|verdict| **verdict == Verdict::AttackerWins)
            .count();
        assert_eq!(wins, summary.wins);
    }

    #[test]
    fn sequential_and_parallel_runs_agree_for_a_seed() {
        let (attacker, defender) = skirmish();
        let config = TrialConfig {
            trials: 5_000,
            seed: 42,
            record_verdicts: true,
            ..TrialConfig::default()
        };
        let sequential = run_monte_carlo(&attacker, &defender, &config);
        let parallel = run_monte_carlo_parallel(&attacker, &defender, &config);

        assert_eq!(sequential, parallel);
        assert_eq!(sequential.trials, 5_000);
    }

    #[test]
    fn merge_sums_counts_and_recomputes_rate() {
        let merged = TrialSummary::from_counts(10, 3).merge(TrialSummary::from_counts(30, 17));
        assert_eq!(merged.trials, 40);
        assert_eq!(merged.wins, 20);
        assert!((merged.win_rate - 0.5).abs() < 1e-12);
        assert!(merged.win_rate_95_ci[0] < 0.5 && merged.win_rate_95_ci[1] > 0.5);
    }
}
