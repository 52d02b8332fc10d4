//! Force composition input. Produces the unit lists the combat core consumes;
//! the core itself never sees a file.

pub mod legacy;
pub mod scenario;

use thiserror::Error;

pub use legacy::{parse_legacy, LegacyReader};
pub use scenario::{
    load_scenario, load_scenario_or_empty, parse_scenario, Scenario, ScenarioFormat, UnitGroup,
    DEFAULT_SCENARIO_PATH,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid yaml scenario: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid json scenario: {0}")]
    Json(#[from] serde_json::Error),

    #[error("group {group} ends after {found} of {expected} values")]
    Truncated {
        group: usize,
        found: usize,
        expected: usize,
    },

    #[error("group {group}: '{token}' is not a valid {field}")]
    InvalidValue {
        group: usize,
        field: &'static str,
        token: String,
    },

    #[error("{side} group {group} has {count} unit(s) with zero hull")]
    ZeroHull {
        side: &'static str,
        group: usize,
        count: u32,
    },
}
