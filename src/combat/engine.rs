//! Engagement resolution: one missile exchange, then cannon exchanges until a
//! side is wiped out.
//!
//! At each initiative level the defender's units fire first and their hits are
//! allocated before the attacker's units at the same level fire back.

use serde::Serialize;
use tracing::{debug, trace};

use crate::combat::dice::DiceSource;
use crate::combat::force::{BattleLine, Force};
use crate::combat::unit::Phase;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Stop after this many cannon exchanges and score the fight for the
    /// defender. `None` runs until a side is wiped out or disarmed, which real
    /// dice always reach; a cap is only needed for dice that never hit.
    pub max_cannon_rounds: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    AttackerWins,
    DefenderWins,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    DefenderDestroyed,
    AttackerDestroyed,
    /// The attacker has no cannons left and can never finish the defender.
    AttackerDisarmed,
    /// [EngineConfig::max_cannon_rounds] was reached.
    RoundLimit,
}

impl Termination {
    pub const fn verdict(self) -> Verdict {
        match self {
            Self::DefenderDestroyed => Verdict::AttackerWins,
            Self::AttackerDestroyed | Self::AttackerDisarmed | Self::RoundLimit => {
                Verdict::DefenderWins
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CombatReport {
    pub verdict: Verdict,
    pub termination: Termination,
    pub cannon_rounds: u32,
    pub attacker_survivors: usize,
    pub defender_survivors: usize,
}

impl CombatReport {
    pub fn attacker_won(&self) -> bool {
        self.verdict == Verdict::AttackerWins
    }
}

/// Fight one engagement with the default [EngineConfig]. Returns true when the attacker wins.
pub fn resolve<D: DiceSource + ?Sized>(
    attacker: &mut Force,
    defender: &mut Force,
    dice: &mut D,
) -> bool {
    resolve_combat(attacker, defender, dice, EngineConfig::default()).attacker_won()
}

/// Fight one engagement. Damage stays on the forces; call [Force::restore] before reusing them.
pub fn resolve_combat<D: DiceSource + ?Sized>(
    attacker: &mut Force,
    defender: &mut Force,
    dice: &mut D,
    config: EngineConfig,
) -> CombatReport {
    let mut attackers = attacker.battle_line();
    let mut defenders = defender.battle_line();

    if attackers.is_empty() {
        return finish(Termination::AttackerDestroyed, 0, &attackers, &defenders);
    }
    if defenders.is_empty() {
        return finish(Termination::DefenderDestroyed, 0, &attackers, &defenders);
    }

    trace!(
        attackers = attackers.len(),
        defenders = defenders.len(),
        "missile exchange"
    );
    exchange(&mut attackers, &mut defenders, Phase::Missiles, dice);

    let mut cannon_rounds = 0;
    let termination = loop {
        if attackers.is_empty() {
            break Termination::AttackerDestroyed;
        }
        if defenders.is_empty() {
            break Termination::DefenderDestroyed;
        }
        if !attackers.has_cannons() {
            break Termination::AttackerDisarmed;
        }
        if config
            .max_cannon_rounds
            .is_some_and(|limit| cannon_rounds >= limit)
        {
            break Termination::RoundLimit;
        }
        cannon_rounds += 1;
        trace!(
            round = cannon_rounds,
            attackers = attackers.len(),
            defenders = defenders.len(),
            "cannon exchange"
        );
        exchange(&mut attackers, &mut defenders, Phase::Cannons, dice);
    };

    finish(termination, cannon_rounds, &attackers, &defenders)
}

/// One sweep from the highest initiative on the field down to zero.
fn exchange<D: DiceSource + ?Sized>(
    attackers: &mut BattleLine<'_>,
    defenders: &mut BattleLine<'_>,
    phase: Phase,
    dice: &mut D,
) {
    let Some(top) = attackers.max_initiative().max(defenders.max_initiative()) else {
        return;
    };
    for initiative in (0..=top).rev() {
        fire(defenders, attackers, initiative, phase, dice);
        fire(attackers, defenders, initiative, phase, dice);
    }
}

fn fire<D: DiceSource + ?Sized>(
    shooters: &BattleLine<'_>,
    targets: &mut BattleLine<'_>,
    initiative: u32,
    phase: Phase,
    dice: &mut D,
) {
    if shooters.is_empty() || targets.is_empty() {
        return;
    }
    let mut hits = shooters.volley(initiative, phase, dice);
    if !hits.is_empty() {
        targets.assign_damage(&mut hits);
    }
}

fn finish(
    termination: Termination,
    cannon_rounds: u32,
    attackers: &BattleLine<'_>,
    defenders: &BattleLine<'_>,
) -> CombatReport {
    let report = CombatReport {
        verdict: termination.verdict(),
        termination,
        cannon_rounds,
        attacker_survivors: attackers.len(),
        defender_survivors: defenders.len(),
    };
    debug!(
        verdict = ?report.verdict,
        termination = ?report.termination,
        cannon_rounds,
        attacker_survivors = report.attacker_survivors,
        defender_survivors = report.defender_survivors,
        "combat resolved"
    );
    report
}
