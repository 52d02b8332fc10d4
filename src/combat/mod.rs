pub mod dice;
pub mod engine;
pub mod force;
pub mod unit;

pub use dice::{CountingDice, DiceSource, Rng, ScriptedDice, DIE_FACES};
pub use engine::{resolve, resolve_combat, CombatReport, EngineConfig, Termination, Verdict};
pub use force::{BattleLine, Force, TARGET_PRIORITY};
pub use unit::{
    Blueprint, Damage, Phase, Unit, UnitClass, UnitId, Weapon, CANNONS, HIT_TARGET, MISSILES,
    NATURAL_HIT_BONUS,
};
