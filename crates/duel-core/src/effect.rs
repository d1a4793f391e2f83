//! State effects produced by actions.
//!
//! Every mutation an action performs on a [`Scenario`] is described by an
//! [`Effect`]. Actions return their effects in the order they were applied so
//! that downstream consumers (the change ledger, debugging tools) can replay
//! the accounting of a match step by step.
//!
//! Inside the crate all mutations go through `StateWriter`, which applies a
//! change and records the matching effect in one step.

use serde::{Deserialize, Serialize};

use crate::entity::{PlayerId, TeamId};
use crate::scenario::Scenario;

// ---------------------------------------------------------------------------
// ScoreCause
// ---------------------------------------------------------------------------

/// Why a team score moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreCause {
    /// The stronger attacker absorbed the power differential.
    AttackGain,
    /// A player lost all power in an attack.
    AttackLoss,
    /// Healing an odd amount of power rounds up and creates one point.
    HealRounding,
    /// Power above the cap was cut off.
    Clamp,
}

// ---------------------------------------------------------------------------
// Effect
// ---------------------------------------------------------------------------

/// A single applied change to player or team state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// A player's power changed.
    PowerChanged {
        player: PlayerId,
        before: u32,
        after: u32,
    },
    /// A team's score changed by `delta`.
    ScoreAdjusted {
        team: TeamId,
        delta: i64,
        cause: ScoreCause,
    },
    /// A player's visibility was toggled to `visible`.
    VisibilityFlipped { player: PlayerId, visible: bool },
    /// A player received a new name.
    Renamed {
        player: PlayerId,
        from: String,
        to: String,
    },
    /// A player's name was cleared; it can no longer be looked up.
    Absorbed { player: PlayerId, name: String },
}

impl Effect {
    /// The player this effect touched, if it is a player-level effect.
    pub fn player(&self) -> Option<PlayerId> {
        match self {
            Effect::PowerChanged { player, .. }
            | Effect::VisibilityFlipped { player, .. }
            | Effect::Renamed { player, .. }
            | Effect::Absorbed { player, .. } => Some(*player),
            Effect::ScoreAdjusted { .. } => None,
        }
    }

    /// The team whose state this effect belongs to.
    pub fn team(&self) -> TeamId {
        match self {
            Effect::ScoreAdjusted { team, .. } => *team,
            Effect::PowerChanged { player, .. }
            | Effect::VisibilityFlipped { player, .. }
            | Effect::Renamed { player, .. }
            | Effect::Absorbed { player, .. } => player.team(),
        }
    }

    /// The score delta carried by this effect (0 for non-score effects).
    pub fn score_delta(&self) -> i64 {
        match self {
            Effect::ScoreAdjusted { delta, .. } => *delta,
            _ => 0,
        }
    }
}

// ---------------------------------------------------------------------------
// StateWriter
// ---------------------------------------------------------------------------

/// Applies mutations to a scenario and records each as an [`Effect`].
pub(crate) struct StateWriter<'a> {
    scenario: &'a mut Scenario,
    effects: Vec<Effect>,
}

impl<'a> StateWriter<'a> {
    pub(crate) fn new(scenario: &'a mut Scenario) -> Self {
        Self {
            scenario,
            effects: Vec::new(),
        }
    }

    pub(crate) fn scenario(&self) -> &Scenario {
        &*self.scenario
    }

    pub(crate) fn power(&self, player: PlayerId) -> u32 {
        self.scenario[player].power()
    }

    pub(crate) fn set_power(&mut self, player: PlayerId, after: u32) {
        let before = self.scenario[player].power();
        self.scenario[player].set_power(after);
        self.effects.push(Effect::PowerChanged {
            player,
            before,
            after,
        });
    }

    pub(crate) fn adjust_score(&mut self, team: TeamId, delta: i64, cause: ScoreCause) {
        self.scenario[team].adjust_score(delta);
        self.effects.push(Effect::ScoreAdjusted { team, delta, cause });
    }

    /// Zero a player's power and debit its team by what it had.
    pub(crate) fn drain(&mut self, player: PlayerId) {
        let power = self.power(player);
        self.adjust_score(player.team(), -i64::from(power), ScoreCause::AttackLoss);
        self.set_power(player, 0);
    }

    pub(crate) fn toggle_visibility(&mut self, player: PlayerId) {
        let visible = self.scenario[player].toggle_visibility();
        self.effects
            .push(Effect::VisibilityFlipped { player, visible });
    }

    pub(crate) fn rename(&mut self, player: PlayerId, to: String) {
        let from = self.scenario[player].rename(to.clone());
        self.effects.push(Effect::Renamed { player, from, to });
    }

    pub(crate) fn absorb(&mut self, player: PlayerId) {
        let name = self.scenario[player].absorb();
        self.effects.push(Effect::Absorbed { player, name });
    }

    pub(crate) fn finish(self) -> Vec<Effect> {
        self.effects
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> (Scenario, PlayerId) {
        let mut s = Scenario::new();
        let t = s.add_team("Prospero");
        let p = s.add_player(t, "Ariel", 120, true).unwrap();
        (s, p)
    }

    #[test]
    fn drain_records_score_then_power() {
        let (mut s, p) = scenario();
        let mut w = StateWriter::new(&mut s);
        w.drain(p);
        let effects = w.finish();

        assert_eq!(
            effects,
            vec![
                Effect::ScoreAdjusted {
                    team: TeamId(0),
                    delta: -120,
                    cause: ScoreCause::AttackLoss,
                },
                Effect::PowerChanged {
                    player: p,
                    before: 120,
                    after: 0,
                },
            ]
        );
        assert_eq!(s[p].power(), 0);
        assert_eq!(s[TeamId(0)].score(), 0);
    }

    #[test]
    fn effect_team_follows_player() {
        let p = PlayerId::new(TeamId(2), 1);
        let e = Effect::VisibilityFlipped {
            player: p,
            visible: false,
        };
        assert_eq!(e.team(), TeamId(2));
        assert_eq!(e.player(), Some(p));
        assert_eq!(e.score_delta(), 0);
    }

    #[test]
    fn absorb_records_old_name() {
        let (mut s, p) = scenario();
        let mut w = StateWriter::new(&mut s);
        w.absorb(p);
        assert_eq!(
            w.finish(),
            vec![Effect::Absorbed {
                player: p,
                name: "Ariel".to_owned()
            }]
        );
    }
}
