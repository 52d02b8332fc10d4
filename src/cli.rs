use std::fmt::Write as _;

use serde::Serialize;
use tracing::warn;

use crate::combat::{Force, Unit};
use crate::config::{load_scenario, load_scenario_or_empty, DEFAULT_SCENARIO_PATH};
use crate::parallel::{run_trial_batches, WorkerPool};
use crate::simulation::{TrialConfig, TrialSummary, DEFAULT_TRIALS};

const USAGE: &str = "usage: fleetsim <simulate|validate>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Simulate,
    Validate,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("simulate") => Some(Command::Simulate),
        Some("validate") => Some(Command::Validate),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Simulate) => handle_simulate(args),
        Some(Command::Validate) => handle_validate(args),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

/// Options for `simulate [path] [trials] [seed] [--summary] [--workers N]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulateArgs {
    pub path: String,
    pub trials: Option<usize>,
    pub seed: Option<u64>,
    pub summary: bool,
    pub workers: usize,
}

pub fn parse_simulate_args(args: &[String]) -> SimulateArgs {
    let mut positional = Vec::new();
    let mut summary = false;
    let mut workers = 0;

    let mut rest = args.iter().skip(2);
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--summary" => summary = true,
            "--workers" => workers = parse_arg(rest.next(), "workers", 0usize),
            _ => positional.push(arg),
        }
    }

    SimulateArgs {
        path: positional
            .first()
            .map(|path| path.to_string())
            .unwrap_or_else(|| DEFAULT_SCENARIO_PATH.to_string()),
        trials: positional.get(1).and_then(|raw| parse_optional(raw, "trials")),
        seed: positional.get(2).and_then(|raw| parse_optional(raw, "seed")),
        summary,
        workers,
    }
}

#[derive(Debug, Serialize)]
struct SimulateOutput<'a> {
    scenario: &'a str,
    seed: u64,
    attacker_units: usize,
    defender_units: usize,
    #[serde(flatten)]
    summary: TrialSummary,
}

fn handle_simulate(args: &[String]) -> i32 {
    let options = parse_simulate_args(args);
    let scenario = load_scenario_or_empty(&options.path);
    let (attacker, defender) = scenario.forces();

    let config = TrialConfig {
        trials: options.trials.or(scenario.trials).unwrap_or(DEFAULT_TRIALS),
        seed: options.seed.or(scenario.seed).unwrap_or_else(entropy_seed),
        ..TrialConfig::default()
    };
    let summary = run_trial_batches(
        &attacker,
        &defender,
        &config,
        &WorkerPool::with_workers(options.workers),
    );

    if options.summary {
        println!("Winning %: {:.2}", summary.win_percent());
        return 0;
    }

    let output = SimulateOutput {
        scenario: &options.path,
        seed: config.seed,
        attacker_units: attacker.len(),
        defender_units: defender.len(),
        summary,
    };
    match serde_json::to_string_pretty(&output) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize simulation result: {err}");
            1
        }
    }
}

fn handle_validate(args: &[String]) -> i32 {
    let path = args
        .get(2)
        .map(String::as_str)
        .unwrap_or(DEFAULT_SCENARIO_PATH);

    match load_scenario(path) {
        Ok(scenario) => {
            let (attacker, defender) = scenario.forces();
            print!("{}", describe_force("attacker", &attacker));
            print!("{}", describe_force("defender", &defender));
            println!("validation passed: {path}");
            0
        }
        Err(err) => {
            eprintln!("validation failed: {err}");
            1
        }
    }
}

/// One line per unit, in firing order.
pub fn describe_force(side: &str, force: &Force) -> String {
    let mut out = String::new();
    let _ = writeln!(&mut out, "{side}: {} unit(s)", force.len());
    for unit in force.units() {
        let _ = writeln!(&mut out, "  {}", describe_unit(unit));
    }
    out
}

fn describe_unit(unit: &Unit) -> String {
    let bp = &unit.blueprint;
    format!(
        "{} Init: {} IC: {} PC: {} AC: {} IM: {} PM: {} Hull: {} Comp: {} Shield: {}",
        unit.class,
        bp.initiative,
        bp.ion_cannons,
        bp.plasma_cannons,
        bp.antimatter_cannons,
        bp.ion_missiles,
        bp.plasma_missiles,
        bp.hull,
        bp.computer,
        bp.shield
    )
}

fn entropy_seed() -> u64 {
    let mut bytes = [0u8; 8];
    match getrandom::getrandom(&mut bytes) {
        Ok(()) => u64::from_le_bytes(bytes),
        Err(err) => {
            let fallback = chrono::Utc::now()
                .timestamp_nanos_opt()
                .unwrap_or_default() as u64;
            warn!(%err, fallback, "os entropy unavailable, seeding from clock");
            fallback
        }
    }
}

fn parse_optional<T: std::str::FromStr>(raw: &str, name: &str) -> Option<T> {
    let parsed = raw.parse::<T>().ok();
    if parsed.is_none() {
        warn!("invalid {name} '{raw}', using default");
    }
    parsed
}

fn parse_arg<T: std::str::FromStr + std::fmt::Display>(
    raw: Option<&String>,
    name: &str,
    default: T,
) -> T {
    match raw {
        Some(value) => parse_optional(value, name).unwrap_or(default),
        None => {
            warn!("missing {name}, defaulting to {default}");
            default
        }
    }
}
