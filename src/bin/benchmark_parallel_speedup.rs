//! Run Monte Carlo once in sequential and once in parallel, then print timings and speedup.
//!
//! Usage: cargo run --release --bin benchmark_parallel_speedup [scenario] [trials]
//!
//! Without a scenario file a built-in fleet battle is used.

use std::process;
use std::time::Instant;

use fleetsim::combat::{Blueprint, Force, Unit, UnitClass};
use fleetsim::config::load_scenario;
use fleetsim::simulation::{run_monte_carlo, run_monte_carlo_parallel, TrialConfig};

fn builtin_forces() -> (Force, Force) {
    let blueprint = |initiative, ion_cannons, hull, computer| Blueprint {
        initiative,
        ion_cannons,
        plasma_cannons: 0,
        antimatter_cannons: 0,
        ion_missiles: 0,
        plasma_missiles: 0,
        hull,
        computer,
        shield: 0,
    };
    let attacker = Force::new(vec![
        Unit::new(UnitClass::Interceptor, blueprint(3, 1, 1, 0)),
        Unit::new(UnitClass::Interceptor, blueprint(3, 1, 1, 0)),
        Unit::new(UnitClass::Cruiser, blueprint(2, 2, 2, 1)),
        Unit::new(UnitClass::Dreadnought, blueprint(1, 3, 4, 1)),
    ]);
    let defender = Force::new(vec![Unit::new(UnitClass::Generic, blueprint(2, 3, 8, 1))]);
    (attacker, defender)
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let (attacker, defender) = match args.get(1) {
        Some(path) => match load_scenario(path) {
            Ok(scenario) => scenario.forces(),
            Err(err) => {
                eprintln!("failed to load {path}: {err}");
                process::exit(1);
            }
        },
        None => builtin_forces(),
    };
    let trials = args
        .get(2)
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(200_000);
    let config = TrialConfig {
        trials,
        seed: 12345,
        ..TrialConfig::default()
    };

    println!(
        "Monte Carlo: {} trials ({} attacker units vs {} defender units)",
        trials,
        attacker.len(),
        defender.len()
    );
    println!();

    let t0 = Instant::now();
    let sequential = run_monte_carlo(&attacker, &defender, &config);
    let elapsed_seq = t0.elapsed();
    let seq_ms = elapsed_seq.as_secs_f64() * 1000.0;
    println!(
        "Sequential:  {:.2} ms  ({:.1} trials/s)",
        seq_ms,
        trials as f64 / elapsed_seq.as_secs_f64()
    );

    let t0 = Instant::now();
    let parallel = run_monte_carlo_parallel(&attacker, &defender, &config);
    let elapsed_par = t0.elapsed();
    let par_ms = elapsed_par.as_secs_f64() * 1000.0;
    println!(
        "Parallel:    {:.2} ms  ({:.1} trials/s)",
        par_ms,
        trials as f64 / elapsed_par.as_secs_f64()
    );

    println!();
    println!("Speedup:     {:.2}x faster (parallel vs sequential)", seq_ms / par_ms);

    if sequential != parallel {
        eprintln!(
            "sequential and parallel runs disagree: {} vs {} wins",
            sequential.wins, parallel.wins
        );
        process::exit(1);
    }
    println!("(Results match sequential vs parallel: {:.2}% wins)", sequential.win_percent());
}
