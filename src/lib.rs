//! Monte Carlo estimate of how often one fleet beats another in dice-resolved
//! combat.

pub mod cli;
pub mod combat;
pub mod config;
pub mod parallel;
pub mod simulation;
