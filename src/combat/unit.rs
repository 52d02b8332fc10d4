//! Units, their blueprints, and the damage values their weapons produce.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::combat::dice::{DiceSource, DIE_FACES};

/// Modified roll a shot needs to hit at all.
pub const HIT_TARGET: u32 = DIE_FACES as u32;

/// Added to the threshold of a natural 6 so no shield rating can stop it.
pub const NATURAL_HIT_BONUS: u32 = 100;

/// Hull class. Only consulted by the damage-assignment priority table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UnitClass {
    Interceptor,
    Cruiser,
    Dreadnought,
    /// Anything that is not one of the player hulls (ancients, guardians, ...).
    Generic,
}

impl UnitClass {
    /// Case-insensitive. Unknown names are [UnitClass::Generic].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "interceptor" => Self::Interceptor,
            "cruiser" => Self::Cruiser,
            "dreadnought" => Self::Dreadnought,
            _ => Self::Generic,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Interceptor => "interceptor",
            Self::Cruiser => "cruiser",
            Self::Dreadnought => "dreadnought",
            Self::Generic => "generic",
        }
    }
}

impl From<String> for UnitClass {
    fn from(value: String) -> Self {
        Self::from_name(&value)
    }
}

impl From<UnitClass> for String {
    fn from(value: UnitClass) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for UnitClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Missiles,
    Cannons,
}

impl Phase {
    /// Weapon tiers fired in this phase, in firing order.
    pub const fn weapons(self) -> &'static [Weapon] {
        match self {
            Self::Missiles => &MISSILES,
            Self::Cannons => &CANNONS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weapon {
    IonCannon,
    PlasmaCannon,
    AntimatterCannon,
    IonMissile,
    PlasmaMissile,
}

pub const CANNONS: [Weapon; 3] = [
    Weapon::IonCannon,
    Weapon::PlasmaCannon,
    Weapon::AntimatterCannon,
];
pub const MISSILES: [Weapon; 2] = [Weapon::IonMissile, Weapon::PlasmaMissile];

impl Weapon {
    pub const fn damage(self) -> u32 {
        match self {
            Self::IonCannon | Self::IonMissile => 1,
            Self::PlasmaCannon | Self::PlasmaMissile => 2,
            Self::AntimatterCannon => 4,
        }
    }
}

/// Fixed stats of a unit design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blueprint {
    #[serde(default)]
    pub initiative: u32,
    #[serde(default)]
    pub ion_cannons: u32,
    #[serde(default)]
    pub plasma_cannons: u32,
    #[serde(default)]
    pub antimatter_cannons: u32,
    #[serde(default)]
    pub ion_missiles: u32,
    #[serde(default)]
    pub plasma_missiles: u32,
    pub hull: u32,
    #[serde(default)]
    pub computer: u32,
    #[serde(default)]
    pub shield: u32,
}

impl Blueprint {
    pub const fn weapon_count(&self, weapon: Weapon) -> u32 {
        match weapon {
            Weapon::IonCannon => self.ion_cannons,
            Weapon::PlasmaCannon => self.plasma_cannons,
            Weapon::AntimatterCannon => self.antimatter_cannons,
            Weapon::IonMissile => self.ion_missiles,
            Weapon::PlasmaMissile => self.plasma_missiles,
        }
    }

    pub const fn has_cannons(&self) -> bool {
        self.ion_cannons > 0 || self.plasma_cannons > 0 || self.antimatter_cannons > 0
    }
}

/// One hit that landed: how much it hurts and which shields it gets through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Damage {
    pub amount: u32,
    /// A unit is hit only when its shield rating is strictly below this value.
    pub threshold: u32,
}

impl Damage {
    pub const fn new(amount: u32, threshold: u32) -> Self {
        Self { amount, threshold }
    }

    #[inline]
    pub const fn penetrates(&self, shield: u32) -> bool {
        shield < self.threshold
    }
}

/// Position of a unit in its force's roster, assigned at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct UnitId(pub u32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    id: UnitId,
    pub class: UnitClass,
    pub blueprint: Blueprint,
    durability: u32,
}

impl Unit {
    pub fn new(class: UnitClass, blueprint: Blueprint) -> Self {
        Self {
            id: UnitId::default(),
            class,
            durability: blueprint.hull,
            blueprint,
        }
    }

    pub fn id(&self) -> UnitId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: UnitId) {
        self.id = id;
    }

    pub fn initiative(&self) -> u32 {
        self.blueprint.initiative
    }

    pub fn durability(&self) -> u32 {
        self.durability
    }

    pub fn is_destroyed(&self) -> bool {
        self.durability == 0
    }

    pub fn restore(&mut self) {
        self.durability = self.blueprint.hull;
    }

    /// Roll one die for one weapon of `damage` strength.
    pub fn shoot<D: DiceSource + ?Sized>(&self, damage: u32, dice: &mut D) -> Option<Damage> {
        let roll = u32::from(dice.roll());
        let modified = roll.saturating_add(self.blueprint.computer);
        if modified < HIT_TARGET {
            return None;
        }
        let mut threshold = modified - (HIT_TARGET - 1);
        if roll == HIT_TARGET {
            threshold = threshold.saturating_add(NATURAL_HIT_BONUS);
        }
        Some(Damage::new(damage, threshold))
    }

    /// Fire every weapon used in `phase`, appending the hits to `out`.
    pub fn volley<D: DiceSource + ?Sized>(&self, phase: Phase, dice: &mut D, out: &mut Vec<Damage>) {
        for &weapon in phase.weapons() {
            for _ in 0..self.blueprint.weapon_count(weapon) {
                if let Some(hit) = self.shoot(weapon.damage(), dice) {
                    out.push(hit);
                }
            }
        }
    }

    /// Whether the hits that get through this unit's shields add up to its remaining durability.
    pub fn can_be_destroyed(&self, hits: &[Damage]) -> bool {
        let total: u64 = hits
            .iter()
            .filter(|hit| hit.penetrates(self.blueprint.shield))
            .map(|hit| u64::from(hit.amount))
            .sum();
        total >= u64::from(self.durability)
    }

    /// Take hits one at a time, in list order, until destroyed or nothing else gets through.
    /// Consumed hits are removed from `hits`.
    pub fn absorb(&mut self, hits: &mut Vec<Damage>) {
        while self.durability > 0 {
            let shield = self.blueprint.shield;
            let Some(index) = hits.iter().position(|hit| hit.penetrates(shield)) else {
                break;
            };
            let hit = hits.remove(index);
            self.durability = self.durability.saturating_sub(hit.amount);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::dice::{CountingDice, ScriptedDice};

    fn blueprint(hull: u32, computer: u32, shield: u32) -> Blueprint {
        Blueprint {
            initiative: 2,
            ion_cannons: 0,
            plasma_cannons: 0,
            antimatter_cannons: 0,
            ion_missiles: 0,
            plasma_missiles: 0,
            hull,
            computer,
            shield,
        }
    }

    #[test]
    fn class_names_parse_case_insensitively_with_generic_fallback() {
        assert_eq!(UnitClass::from_name("Dreadnought"), UnitClass::Dreadnought);
        assert_eq!(UnitClass::from_name(" CRUISER "), UnitClass::Cruiser);
        assert_eq!(UnitClass::from_name("interceptor"), UnitClass::Interceptor);
        assert_eq!(UnitClass::from_name("Alien"), UnitClass::Generic);
    }

    #[test]
    fn low_roll_without_computer_misses() {
        let unit = Unit::new(UnitClass::Cruiser, blueprint(1, 0, 0));
        let mut dice = ScriptedDice::fixed(5);
        assert_eq!(unit.shoot(2, &mut dice), None);
    }

    #[test]
    fn computer_bonus_turns_low_roll_into_weak_hit() {
        let unit = Unit::new(UnitClass::Cruiser, blueprint(1, 2, 0));
        let mut dice = ScriptedDice::fixed(5);
        // 5 + 2 = 7 -> gets through shields below 2.
        assert_eq!(unit.shoot(2, &mut dice), Some(Damage::new(2, 2)));
    }

    #[test]
    fn natural_six_hits_through_any_shield() {
        let unit = Unit::new(UnitClass::Cruiser, blueprint(1, 0, 0));
        let mut dice = ScriptedDice::fixed(6);
        let hit = unit.shoot(4, &mut dice).expect("natural six always hits");
        assert_eq!(hit.amount, 4);
        assert_eq!(hit.threshold, 1 + NATURAL_HIT_BONUS);
        assert!(hit.penetrates(99));
    }

    #[test]
    fn huge_computer_bonus_saturates_instead_of_overflowing() {
        let unit = Unit::new(UnitClass::Cruiser, blueprint(1, u32::MAX, 0));

        let hit = unit.shoot(1, &mut ScriptedDice::fixed(2)).expect("bonus guarantees a hit");
        assert_eq!(hit.threshold, u32::MAX - (HIT_TARGET - 1));
        assert!(hit.penetrates(1_000_000));

        let natural = unit.shoot(1, &mut ScriptedDice::fixed(6)).expect("natural six hits");
        assert_eq!(natural.threshold, u32::MAX);
    }

    #[test]
    fn volley_fires_each_weapon_of_the_phase_in_tier_order() {
        let mut bp = blueprint(1, 0, 0);
        bp.ion_cannons = 2;
        bp.antimatter_cannons = 1;
        bp.plasma_missiles = 3;
        let unit = Unit::new(UnitClass::Dreadnought, bp);

        let mut dice = CountingDice::new(ScriptedDice::fixed(6));
        let mut hits = Vec::new();
        unit.volley(Phase::Cannons, &mut dice, &mut hits);
        assert_eq!(dice.rolls(), 3);
        let amounts: Vec<u32> = hits.iter().map(|hit| hit.amount).collect();
        assert_eq!(amounts, vec![1, 1, 4]);

        hits.clear();
        unit.volley(Phase::Missiles, &mut dice, &mut hits);
        assert_eq!(dice.rolls(), 6);
        assert!(hits.iter().all(|hit| hit.amount == 2));
    }

    #[test]
    fn absorb_consumes_only_penetrating_hits() {
        let mut unit = Unit::new(UnitClass::Cruiser, blueprint(10, 0, 2));
        let mut hits = vec![Damage::new(6, 3), Damage::new(5, 1)];

        assert!(!unit.can_be_destroyed(&hits));
        unit.absorb(&mut hits);

        assert_eq!(unit.durability(), 4);
        assert_eq!(hits, vec![Damage::new(5, 1)]);
    }

    #[test]
    fn absorb_stops_once_destroyed_and_keeps_the_rest() {
        let mut unit = Unit::new(UnitClass::Interceptor, blueprint(2, 0, 0));
        let mut hits = vec![Damage::new(1, 1), Damage::new(4, 1), Damage::new(2, 1)];

        assert!(unit.can_be_destroyed(&hits));
        unit.absorb(&mut hits);

        assert!(unit.is_destroyed());
        assert_eq!(unit.durability(), 0);
        assert_eq!(hits, vec![Damage::new(2, 1)]);
    }

    #[test]
    fn restore_returns_to_full_hull() {
        let mut unit = Unit::new(UnitClass::Interceptor, blueprint(3, 0, 0));
        unit.absorb(&mut vec![Damage::new(2, 1)]);
        assert_eq!(unit.durability(), 1);
        unit.restore();
        assert_eq!(unit.durability(), 3);
    }
}
