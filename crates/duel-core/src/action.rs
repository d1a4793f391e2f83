//! The four player actions.
//!
//! Every action first runs a precondition chain against the acting player
//! (the first argument) only:
//!
//! 1. an invisible player can't play;
//! 2. a player with no power is frozen.
//!
//! `heal` and `super` then require both players to share a team and to be two
//! different players. The first failing check produces a [`Rejection`] and
//! leaves the scenario untouched.
//!
//! Successful actions return the [`Effect`]s they applied, in order. Power cap
//! enforcement is not part of the actions themselves; the dispatcher runs it
//! after every two-player action.
//!
//! # Example
//!
//! ```
//! use duel_core::prelude::*;
//!
//! let mut scenario = Scenario::new();
//! let team = scenario.add_team("Merlin");
//! let healer = scenario.add_player(team, "Nimue", 7, true).unwrap();
//! let patient = scenario.add_player(team, "Gawain", 0, true).unwrap();
//!
//! let engine = ActionEngine::new();
//! engine.heal(&mut scenario, healer, patient).unwrap();
//!
//! assert_eq!(scenario[healer].power(), 4);
//! assert_eq!(scenario[patient].power(), 4);
//! assert_eq!(scenario[team].score(), 8);
//! ```

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::effect::{Effect, ScoreCause, StateWriter};
use crate::entity::{Player, PlayerId};
use crate::scenario::Scenario;

/// Prefix of the names given to players that performed a `super` action.
pub const SUPER_NAME_PREFIX: &str = "S_";

// ---------------------------------------------------------------------------
// Rejection
// ---------------------------------------------------------------------------

/// A failed action precondition.
///
/// Rejections are not errors of the run: the command is skipped and the
/// message becomes one diagnostic line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
pub enum Rejection {
    /// The acting player is invisible.
    #[error("This player can't play")]
    CannotPlay,
    /// The acting player has no power.
    #[error("This player is frozen")]
    Frozen,
    /// `heal` or `super` across teams.
    #[error("Both players should be from the same team")]
    DifferentTeams,
    /// `heal` targeting the healer.
    #[error("The player cannot heal itself")]
    SelfHeal,
    /// `super` targeting the acting player.
    #[error("The player cannot do super action with itself")]
    SelfSuper,
}

/// Result of an action: the applied effects, or why nothing happened.
pub type ActionResult = Result<Vec<Effect>, Rejection>;

fn check_can_act(player: &Player) -> Result<(), Rejection> {
    if !player.is_visible() {
        return Err(Rejection::CannotPlay);
    }
    if player.is_frozen() {
        return Err(Rejection::Frozen);
    }
    Ok(())
}

fn check_teammate(first: &Player, second: &Player, itself: Rejection) -> Result<(), Rejection> {
    if first.team() != second.team() {
        return Err(Rejection::DifferentTeams);
    }
    if first.name() == second.name() {
        return Err(itself);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// ActionEngine
// ---------------------------------------------------------------------------

/// Executes actions against a [`Scenario`].
///
/// The engine owns the `super` counter: every successful `super` names its
/// acting player `S_<n>` and bumps `n`, starting at 0. One engine must be used
/// for a whole match so the generated names stay unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionEngine {
    supers_performed: u64,
}

impl ActionEngine {
    /// Create an engine whose next `super` produces `S_0`.
    pub fn new() -> Self {
        Self {
            supers_performed: 0,
        }
    }

    /// Number of successful `super` actions so far.
    pub fn supers_performed(&self) -> u64 {
        self.supers_performed
    }

    /// The name the next successful `super` will assign.
    pub fn next_super_name(&self) -> String {
        format!("{SUPER_NAME_PREFIX}{}", self.supers_performed)
    }

    /// Toggle the acting player's visibility.
    pub fn flip_visibility(&self, scenario: &mut Scenario, player: PlayerId) -> ActionResult {
        check_can_act(&scenario[player])?;

        let mut writer = StateWriter::new(scenario);
        writer.toggle_visibility(player);
        Ok(writer.finish())
    }

    /// `attacker` attacks `defender`.
    ///
    /// - Invisible defender: the attacker loses all power.
    /// - Stronger attacker: gains the difference, defender loses all power.
    /// - Stronger defender: gains the difference, attacker loses all power.
    /// - Equal power: both lose all power.
    ///
    /// Every power loss is debited from the loser's team; every gain is
    /// credited to the gainer's team.
    pub fn attack(
        &self,
        scenario: &mut Scenario,
        attacker: PlayerId,
        defender: PlayerId,
    ) -> ActionResult {
        check_can_act(&scenario[attacker])?;

        let defender_visible = scenario[defender].is_visible();
        let mut writer = StateWriter::new(scenario);
        let attack_power = writer.power(attacker);
        let defend_power = writer.power(defender);

        if !defender_visible {
            writer.drain(attacker);
            return Ok(writer.finish());
        }

        match attack_power.cmp(&defend_power) {
            Ordering::Greater => {
                let gain = attack_power - defend_power;
                writer.adjust_score(attacker.team(), i64::from(gain), ScoreCause::AttackGain);
                writer.set_power(attacker, attack_power.saturating_add(gain));
                writer.drain(defender);
            }
            Ordering::Less => {
                let gain = defend_power - attack_power;
                writer.adjust_score(defender.team(), i64::from(gain), ScoreCause::AttackGain);
                writer.set_power(defender, defend_power.saturating_add(gain));
                writer.drain(attacker);
            }
            // Drained one after the other: attacking oneself debits only once.
            Ordering::Equal => {
                writer.drain(attacker);
                writer.drain(defender);
            }
        }
        Ok(writer.finish())
    }

    /// `healer` gives half its power (rounded up) to a teammate and keeps the
    /// same amount.
    ///
    /// When the healer's power is odd, the rounding creates one point of
    /// power and the team score is credited by 1.
    pub fn heal(&self, scenario: &mut Scenario, healer: PlayerId, patient: PlayerId) -> ActionResult {
        check_can_act(&scenario[healer])?;
        check_teammate(&scenario[healer], &scenario[patient], Rejection::SelfHeal)?;

        let mut writer = StateWriter::new(scenario);
        let power = writer.power(healer);
        if power % 2 == 1 {
            writer.adjust_score(healer.team(), 1, ScoreCause::HealRounding);
        }
        let shared = power.div_ceil(2);
        writer.set_power(healer, shared);
        let patient_power = writer.power(patient);
        writer.set_power(patient, patient_power.saturating_add(shared));
        Ok(writer.finish())
    }

    /// `leader` absorbs a teammate.
    ///
    /// The leader takes the donor's power on top of its own and is renamed
    /// to the next `S_<n>` token. The donor's name is cleared, which removes
    /// it from play. The team score does not change.
    pub fn super_merge(
        &mut self,
        scenario: &mut Scenario,
        leader: PlayerId,
        donor: PlayerId,
    ) -> ActionResult {
        check_can_act(&scenario[leader])?;
        check_teammate(&scenario[leader], &scenario[donor], Rejection::SelfSuper)?;

        let name = self.next_super_name();
        let mut writer = StateWriter::new(scenario);
        writer.rename(leader, name);
        let combined = writer.power(leader).saturating_add(writer.power(donor));
        writer.set_power(leader, combined);
        writer.absorb(donor);
        self.supers_performed += 1;

        tracing::debug!(
            leader = %leader,
            donor = %donor,
            name = %writer.scenario()[leader].name(),
            "super action merged players"
        );
        Ok(writer.finish())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
