//! Reader for the colon-delimited `conf.txt` format.
//!
//! The file is whitespace-separated tokens. Every value is the token after a
//! lone `:`; anything else is a label and is skipped. Eleven values make a
//! group. The first three groups are the attacker, the fourth the defender,
//! and anything after that is ignored.
//!
//! ```text
//! Type : Interceptor  Count : 2  Init : 3
//! IC : 1  PC : 0  AC : 0  IM : 0  PM : 0
//! Hull : 1  Comp : 0  Shield : 0
//! ```

use std::str::SplitWhitespace;

use crate::combat::{Blueprint, UnitClass};
use crate::config::scenario::{Scenario, UnitGroup};
use crate::config::ConfigError;

pub const LEGACY_ATTACKER_GROUPS: usize = 3;
pub const LEGACY_DEFENDER_GROUPS: usize = 1;

const GROUP_FIELDS: [&str; 11] = [
    "type",
    "count",
    "initiative",
    "ion_cannons",
    "plasma_cannons",
    "antimatter_cannons",
    "ion_missiles",
    "plasma_missiles",
    "hull",
    "computer",
    "shield",
];

/// Yields unit groups in file order. A group cut short by the end of the file
/// or holding a non-integer value is an error.
pub struct LegacyReader<'a> {
    tokens: SplitWhitespace<'a>,
    group: usize,
}

impl<'a> LegacyReader<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self {
            tokens: raw.split_whitespace(),
            group: 0,
        }
    }

    fn next_value(&mut self) -> Option<&'a str> {
        loop {
            if self.tokens.next()? == ":" {
                return self.tokens.next();
            }
        }
    }

    fn read_group(&mut self, class_name: &str) -> Result<UnitGroup, ConfigError> {
        let mut numbers = [0u32; GROUP_FIELDS.len() - 1];
        for (read, (slot, &field)) in numbers.iter_mut().zip(&GROUP_FIELDS[1..]).enumerate() {
            // The class name counts as the first value of the group.
            let token = self.next_value().ok_or(ConfigError::Truncated {
                group: self.group,
                found: read + 1,
                expected: GROUP_FIELDS.len(),
            })?;
            *slot = token.parse().map_err(|_| ConfigError::InvalidValue {
                group: self.group,
                field,
                token: token.to_string(),
            })?;
        }

        let [count, initiative, ion_cannons, plasma_cannons, antimatter_cannons, ion_missiles, plasma_missiles, hull, computer, shield] =
            numbers;
        Ok(UnitGroup {
            class: UnitClass::from_name(class_name),
            count,
            blueprint: Blueprint {
                initiative,
                ion_cannons,
                plasma_cannons,
                antimatter_cannons,
                ion_missiles,
                plasma_missiles,
                hull,
                computer,
                shield,
            },
        })
    }
}

impl Iterator for LegacyReader<'_> {
    type Item = Result<UnitGroup, ConfigError>;

    fn next(&mut self) -> Option<Self::Item> {
        let class_name = self.next_value()?;
        self.group += 1;
        Some(self.read_group(class_name))
    }
}

/// Parse a legacy file. Fewer than four groups is allowed: the missing ones
/// are simply absent, which can leave the defender empty.
pub fn parse_legacy(raw: &str) -> Result<Scenario, ConfigError> {
    let mut scenario = Scenario::default();
    let groups = LegacyReader::new(raw).take(LEGACY_ATTACKER_GROUPS + LEGACY_DEFENDER_GROUPS);
    for (index, group) in groups.enumerate() {
        let group = group?;
        if index < LEGACY_ATTACKER_GROUPS {
            scenario.attacker.push(group);
        } else {
            scenario.defender.push(group);
        }
    }
    Ok(scenario)
}
