//! Run the engagement benchmark and optionally append one line to a log file for trend tracking.
//!
//! Usage:
//!   cargo run --release --bin benchmark_simulator
//!   cargo run --release --bin benchmark_simulator -- --log
//!
//! --log  Append one row to benchmark_log.csv (date, combats_per_sec, combats_per_min, rounds_per_sec, rounds_per_combat).

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::process;
use std::time::Instant;

use fleetsim::combat::{resolve_combat, Blueprint, EngineConfig, Force, Rng, Unit, UnitClass};

const LOG_PATH: &str = "benchmark_log.csv";

fn main() {
    let log = std::env::args().any(|a| a == "--log");

    let gunship = |class, initiative, ion_cannons, hull, computer| {
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
                computer,
                shield: 0,
            },
        )
    };
    let attacker = Force::new(vec![
        gunship(UnitClass::Interceptor, 3, 1, 1, 0),
        gunship(UnitClass::Interceptor, 3, 1, 1, 0),
        gunship(UnitClass::Cruiser, 2, 2, 2, 1),
        gunship(UnitClass::Dreadnought, 1, 3, 4, 1),
    ]);
    let defender = Force::new(vec![gunship(UnitClass::Generic, 2, 3, 8, 1)]);
    let mut dice = Rng::new(7);

    // Run for at least this long or this many combats
    const MIN_DURATION_MS: u128 = 2000;
    const MIN_COMBATS: u64 = 50_000;

    let start = Instant::now();
    let mut combats: u64 = 0;
    let mut rounds: u64 = 0;
    while start.elapsed().as_millis() < MIN_DURATION_MS || combats < MIN_COMBATS {
        let mut a = attacker.clone();
        let mut d = defender.clone();
        let report = resolve_combat(&mut a, &mut d, &mut dice, EngineConfig::default());
        rounds += u64::from(report.cannon_rounds);
        combats += 1;
    }
    let elapsed_secs = start.elapsed().as_secs_f64();

    let combats_per_sec = combats as f64 / elapsed_secs;
    let combats_per_min = combats_per_sec * 60.0;
    let rounds_per_sec = rounds as f64 / elapsed_secs;
    let rounds_per_combat = rounds as f64 / combats as f64;

    println!("Engagement benchmark:");
    println!("  Combats:       {}", combats);
    println!("  Duration:      {:.2} s", elapsed_secs);
    println!("  Combats/s:     {:.2}", combats_per_sec);
    println!("  Combats/min:   {:.2}", combats_per_min);
    println!("  Rounds/s:      {:.2}", rounds_per_sec);
    println!("  Rounds/combat: {:.2}", rounds_per_combat);

    if log {
        let line = format!(
            "{},{:.4},{:.4},{:.4},{:.4}\n",
            chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
            combats_per_sec,
            combats_per_min,
            rounds_per_sec,
            rounds_per_combat
        );
        if let Err(err) = append_log_line(&line) {
            eprintln!("failed to append {LOG_PATH}: {err}");
            process::exit(1);
        }
        println!("Appended to {}", LOG_PATH);
    }
}

fn append_log_line(line: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(LOG_PATH)?;
    if file.metadata().map(|m| m.len() == 0).unwrap_or(true) {
        file.write_all(b"date,combats_per_sec,combats_per_min,rounds_per_sec,rounds_per_combat\n")?;
    }
    file.write_all(line.as_bytes())?;
    file.flush()
}
