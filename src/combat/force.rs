//! Forces and the damage-assignment policy.
//!
//! A [Force] is the persistent roster: built once, damaged during a trial and
//! restored afterwards. A [BattleLine] is the per-engagement view of the units
//! still fighting; destroyed units are removed from the line, never from the
//! roster.

use std::cmp::Reverse;

use crate::combat::dice::DiceSource;
use crate::combat::unit::{Damage, Phase, Unit, UnitClass, UnitId};

/// Classes checked for a target, most valuable first. Classes sharing a tier
/// are tried in order: a cruiser is preferred over a generic unit.
pub const TARGET_PRIORITY: [&[UnitClass]; 3] = [
    &[UnitClass::Dreadnought],
    &[UnitClass::Cruiser, UnitClass::Generic],
    &[UnitClass::Interceptor],
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Force {
    units: Vec<Unit>,
}

impl Force {
    /// Units keep their insertion order as [UnitId] and are sorted by descending
    /// initiative; equal initiative keeps insertion order.
    pub fn new(units: Vec<Unit>) -> Self {
        let mut units = units;
        for (index, unit) in units.iter_mut().enumerate() {
            unit.set_id(UnitId(index as u32));
        }
        units.sort_by_key(|unit| (Reverse(unit.initiative()), unit.id()));
        Self { units }
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn has_cannons(&self) -> bool {
        self.units.iter().any(|unit| unit.blueprint.has_cannons())
    }

    /// Put every unit back to full hull.
    pub fn restore(&mut self) {
        for unit in &mut self.units {
            unit.restore();
        }
    }

    /// Units still able to fight, in firing order.
    pub fn battle_line(&mut self) -> BattleLine<'_> {
        BattleLine {
            units: self
                .units
                .iter_mut()
                .filter(|unit| !unit.is_destroyed())
                .collect(),
        }
    }
}

impl FromIterator<Unit> for Force {
    fn from_iter<I: IntoIterator<Item = Unit>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[derive(Debug)]
pub struct BattleLine<'a> {
    units: Vec<&'a mut Unit>,
}

impl<'a> BattleLine<'a> {
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn units(&self) -> impl Iterator<Item = &Unit> + '_ {
        self.units.iter().map(|unit| &**unit)
    }

    pub fn max_initiative(&self) -> Option<u32> {
        self.units.first().map(|unit| unit.initiative())
    }

    pub fn has_cannons(&self) -> bool {
        self.units.iter().any(|unit| unit.blueprint.has_cannons())
    }

    /// Hits produced by every unit acting at `initiative` in `phase`.
    pub fn volley<D: DiceSource + ?Sized>(
        &self,
        initiative: u32,
        phase: Phase,
        dice: &mut D,
    ) -> Vec<Damage> {
        let mut hits = Vec::new();
        for unit in self.units.iter().filter(|unit| unit.initiative() == initiative) {
            unit.volley(phase, dice, &mut hits);
        }
        hits
    }

    /// First unit of the given tier, preferring earlier classes in the tier.
    fn representative(&self, tier: &[UnitClass]) -> Option<usize> {
        tier.iter()
            .find_map(|&class| self.units.iter().position(|unit| unit.class == class))
    }

    /// Allocate incoming hits to this line.
    ///
    /// Kills the most valuable unit the hits can destroy, repeatedly. Once no
    /// tier representative can be destroyed, each representative soaks what it
    /// can and the leftovers are lost against shields. Returns true when the
    /// line has been wiped out.
    pub fn assign_damage(&mut self, hits: &mut Vec<Damage>) -> bool {
        while !hits.is_empty() {
            if self.units.is_empty() {
                return true;
            }

            let representatives = TARGET_PRIORITY.map(|tier| self.representative(tier));
            let destructible = representatives
                .iter()
                .flatten()
                .copied()
                .find(|&index| self.units[index].can_be_destroyed(hits.as_slice()));

            if let Some(index) = destructible {
                self.units[index].absorb(hits);
                self.units.remove(index);
                continue;
            }

            for index in representatives.into_iter().flatten() {
                self.units[index].absorb(hits);
            }
            hits.clear();
        }
        self.units.is_empty()
    }
}
