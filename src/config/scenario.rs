//! Scenario files: the unit groups on each side plus optional run settings.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::combat::{Blueprint, Force, Unit, UnitClass};
use crate::config::legacy::parse_legacy;
use crate::config::ConfigError;

pub const DEFAULT_SCENARIO_PATH: &str = "conf.txt";

/// `count` identical units of one design.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitGroup {
    pub class: UnitClass,
    #[serde(default = "default_count")]
    pub count: u32,
    #[serde(flatten)]
    pub blueprint: Blueprint,
}

fn default_count() -> u32 {
    1
}

impl UnitGroup {
    pub fn units(&self) -> impl Iterator<Item = Unit> + '_ {
        (0..self.count).map(move |_| Unit::new(self.class, self.blueprint))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub attacker: Vec<UnitGroup>,
    #[serde(default)]
    pub defender: Vec<UnitGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trials: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Scenario {
    pub fn attacking_force(&self) -> Force {
        self.attacker.iter().flat_map(UnitGroup::units).collect()
    }

    pub fn defending_force(&self) -> Force {
        self.defender.iter().flat_map(UnitGroup::units).collect()
    }

    /// `(attacker, defender)`.
    pub fn forces(&self) -> (Force, Force) {
        (self.attacking_force(), self.defending_force())
    }

    /// A unit must start with hull to take part in a fight. Groups with a
    /// zero count are placeholders and are not checked.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (side, groups) in [("attacker", &self.attacker), ("defender", &self.defender)] {
            let empty_hull = groups
                .iter()
                .position(|group| group.count > 0 && group.blueprint.hull == 0);
            if let Some(index) = empty_hull {
                return Err(ConfigError::ZeroHull {
                    side,
                    group: index + 1,
                    count: groups[index].count,
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioFormat {
    Yaml,
    Json,
    /// Colon-delimited `conf.txt`.
    Legacy,
}

impl ScenarioFormat {
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("yaml") | Some("yml") => Self::Yaml,
            Some("json") => Self::Json,
            _ => Self::Legacy,
        }
    }
}

pub fn parse_scenario(raw: &str, format: ScenarioFormat) -> Result<Scenario, ConfigError> {
    let scenario: Scenario = match format {
        ScenarioFormat::Yaml => serde_yaml::from_str(raw)?,
        ScenarioFormat::Json => serde_json::from_str(raw)?,
        ScenarioFormat::Legacy => parse_legacy(raw)?,
    };
    scenario.validate()?;
    Ok(scenario)
}

/// Load a scenario, picking the format from the file extension.
pub fn load_scenario(path: impl AsRef<Path>) -> Result<Scenario, ConfigError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_scenario(&raw, ScenarioFormat::from_path(path))
}

/// Load a scenario, or report the problem and fall back to two empty forces.
pub fn load_scenario_or_empty(path: impl AsRef<Path>) -> Scenario {
    let path = path.as_ref();
    match load_scenario(path) {
        Ok(scenario) => scenario,
        Err(err) => {
            warn!(path = %path.display(), %err, "scenario rejected, using empty forces");
            Scenario::default()
        }
    }
}
