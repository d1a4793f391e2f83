//! Change ledger for tracking every effect a match applies.
//!
//! The [`Ledger`] records one [`LedgerEntry`] per [`Effect`], tagged with the
//! index and kind of the command that produced it. It is fed by
//! [`Ledger::record`] with each [`Dispatched`] result, including rejected
//! commands (which carry no effects but are still counted).
//!
//! # Query API
//!
//! - **Command**: [`Ledger::entries_for_command`]
//! - **Player**: [`Ledger::entries_for_player`], [`Ledger::power_history`]
//! - **Team**: [`Ledger::entries_for_team`], [`Ledger::score_delta`]
//! - **Score cause**: [`Ledger::entries_by_cause`]
//!
//! # Audit
//!
//! Team scores are never derived from current member power, so the only way
//! to check them is to replay the deltas: [`Ledger::recompute_scores`] adds
//! every recorded delta to a baseline and [`Ledger::audit`] compares the result
//! with a live scenario.
//!
//! # Example
//!
//! ```
//! use duel_core::prelude::*;
//! use duel_ledger::ledger::Ledger;
//!
//! let mut scenario = Scenario::new();
//! let light = scenario.add_team("Gandalf");
//! scenario.add_player(light, "Frodo", 7, true).unwrap();
//! scenario.add_player(light, "Sam", 1, true).unwrap();
//! let baseline = Ledger::baseline_scores(&scenario);
//!
//! let mut ledger = Ledger::new();
//! let mut dispatcher = Dispatcher::new();
//! let out = dispatcher
//!     .dispatch(&mut scenario, &Command::heal("Frodo", "Sam"))
//!     .unwrap();
//! ledger.record(&out);
//!
//! assert_eq!(ledger.score_delta(light), 1);
//! assert_eq!(ledger.recompute_scores(&baseline).unwrap(), vec![9]);
//! assert!(ledger.audit(&baseline, &scenario).is_ok());
//! ```

use duel_core::command::CommandKind;
use duel_core::dispatch::Dispatched;
use duel_core::effect::{Effect, ScoreCause};
use duel_core::entity::{PlayerId, TeamId};
use duel_core::scenario::Scenario;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::LedgerError;

// ---------------------------------------------------------------------------
// LedgerEntry
// ---------------------------------------------------------------------------

/// A single recorded effect and the command that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Sequential index of the command within the match.
    pub command_index: u64,
    /// The kind of command that produced the effect.
    pub command: CommandKind,
    /// What changed.
    pub effect: Effect,
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// Accumulates [`LedgerEntry`] values over a whole match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    entries: Vec<LedgerEntry>,
    commands_recorded: u64,
    rejected: Vec<u64>,
}

impl Ledger {
    /// Create a new, empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Team scores of `scenario` in team order, for use as an audit baseline.
    pub fn baseline_scores(scenario: &Scenario) -> Vec<i64> {
        scenario.teams().iter().map(|t| t.score()).collect()
    }

    /// Record every effect of one dispatched command. Returns the number of
    /// entries added.
    pub fn record(&mut self, dispatched: &Dispatched) -> usize {
        self.commands_recorded += 1;
        if !dispatched.applied_successfully {
            self.rejected.push(dispatched.command_index);
        }
        for effect in &dispatched.effects {
            self.entries.push(LedgerEntry {
                command_index: dispatched.command_index,
                command: dispatched.kind,
                effect: effect.clone(),
            });
        }
        trace!(
            command_index = dispatched.command_index,
            command = %dispatched.kind,
            effects = dispatched.effects.len(),
            "ledger recorded command"
        );
        dispatched.effects.len()
    }

    /// Record a single entry directly.
    pub fn record_entry(&mut self, entry: LedgerEntry) {
        self.entries.push(entry);
    }

    /// Drop all entries and counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.rejected.clear();
        self.commands_recorded = 0;
    }

    /// Returns the number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no entries have been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of commands passed to [`record`](Self::record).
    pub fn commands_recorded(&self) -> u64 {
        self.commands_recorded
    }

    /// Indices of commands that were rejected by a precondition.
    pub fn rejected_commands(&self) -> &[u64] {
        &self.rejected
    }

    /// Returns a slice of all entries in insertion order.
    pub fn all_entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn entries_for_command(&self, command_index: u64) -> impl Iterator<Item = &LedgerEntry> {
        self.entries
            .iter()
            .filter(move |e| e.command_index == command_index)
    }

    /// Entries that touched the given player directly.
    pub fn entries_for_player(&self, player: PlayerId) -> impl Iterator<Item = &LedgerEntry> {
        self.entries
            .iter()
            .filter(move |e| e.effect.player() == Some(player))
    }

    /// Entries belonging to the team: its score changes and every effect on
    /// one of its players.
    pub fn entries_for_team(&self, team: TeamId) -> impl Iterator<Item = &LedgerEntry> {
        self.entries.iter().filter(move |e| e.effect.team() == team)
    }

    /// Score adjustments with the given cause.
    pub fn entries_by_cause(&self, cause: ScoreCause) -> impl Iterator<Item = &LedgerEntry> {
        self.entries.iter().filter(move |e| {
            matches!(e.effect, Effect::ScoreAdjusted { cause: c, .. } if c == cause)
        })
    }

    /// Net score change recorded for a team.
    pub fn score_delta(&self, team: TeamId) -> i64 {
        self.entries_for_team(team)
            .map(|e| e.effect.score_delta())
            .sum()
    }

    /// The sequence of power values a player went through: the value before
    /// the first recorded change, then the value after each change. Empty if
    /// the player's power never changed.
    pub fn power_history(&self, player: PlayerId) -> Vec<u32> {
        let mut history = Vec::new();
        for entry in self.entries_for_player(player) {
            if let Effect::PowerChanged { before, after, .. } = entry.effect {
                if history.is_empty() {
                    history.push(before);
                }
                history.push(after);
            }
        }
        history
    }

    /// Add every recorded score delta to `baseline`.
    pub fn recompute_scores(&self, baseline: &[i64]) -> Result<Vec<i64>, LedgerError> {
        let mut scores = baseline.to_vec();
        for entry in &self.entries {
            let delta = entry.effect.score_delta();
            if delta == 0 {
                continue;
            }
            let team = entry.effect.team();
            let slot = scores
                .get_mut(team.index())
                .ok_or(LedgerError::TeamOutOfRange {
                    team,
                    teams: baseline.len(),
                })?;
            *slot += delta;
        }
        Ok(scores)
    }

    /// Check that every team score in `scenario` equals `baseline` plus the
    /// recorded deltas.
    pub fn audit(&self, baseline: &[i64], scenario: &Scenario) -> Result<(), LedgerError> {
        let expected = self.recompute_scores(baseline)?;
        for (index, team) in scenario.teams().iter().enumerate() {
            let team_id = TeamId(index as u32);
            let want = expected.get(index).copied().ok_or(LedgerError::TeamOutOfRange {
                team: team_id,
                teams: expected.len(),
            })?;
            if team.score() != want {
                warn!(team = %team_id, expected = want, actual = team.score(), "score audit failed");
                return Err(LedgerError::ScoreMismatch {
                    team: team_id,
                    expected: want,
                    actual: team.score(),
                });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use duel_core::prelude::*;

    // -- helpers ------------------------------------------------------------

    fn scenario() -> Scenario {
        let mut s = Scenario::new();
        let t0 = s.add_team("Merlin");
        let t1 = s.add_team("Morgana");
        s.add_player(t0, "Arthur", 900, true).unwrap();
        s.add_player(t0, "Kay", 301, true).unwrap();
        s.add_player(t1, "Mordred", 100, true).unwrap();
        s.add_player(t1, "Agravain", 50, false).unwrap();
        s
    }

    fn play(s: &mut Scenario, commands: &[Command]) -> Ledger {
        let mut dispatcher = Dispatcher::new();
        let mut ledger = Ledger::new();
        for command in commands {
            ledger.record(&dispatcher.dispatch(s, command).unwrap());
        }
        ledger
    }

    fn player(s: &Scenario, name: &str) -> PlayerId {
        s.find_player(name).unwrap()
    }

    // -- 1. Empty ledger ----------------------------------------------------

    #[test]
    fn empty_ledger() {
        let ledger = Ledger::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.len(), 0);
        assert_eq!(ledger.commands_recorded(), 0);
        assert_eq!(ledger.score_delta(TeamId(0)), 0);
        assert_eq!(ledger.recompute_scores(&[5, 7]).unwrap(), vec![5, 7]);
    }

    // -- 2. Recording -------------------------------------------------------

    #[test]
    fn record_tags_entries_with_their_command() {
        let mut s = scenario();
        let ledger = play(
            &mut s,
            &[
                Command::flip_visibility("Arthur"),
                Command::flip_visibility("Arthur"),
            ],
        );

        assert_eq!(ledger.commands_recorded(), 2);
        assert_eq!(ledger.len(), 2);
        let first: Vec<_> = ledger.entries_for_command(0).collect();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].command, CommandKind::FlipVisibility);
        assert!(matches!(
            first[0].effect,
            Effect::VisibilityFlipped { visible: false, .. }
        ));
    }

    #[test]
    fn rejected_commands_are_counted_without_entries() {
        let mut s = scenario();
        let ledger = play(&mut s, &[Command::heal("Arthur", "Mordred")]);

        assert!(ledger.is_empty());
        assert_eq!(ledger.commands_recorded(), 1);
        assert_eq!(ledger.rejected_commands(), &[0]);
    }

    #[test]
    fn clear_resets_everything() {
        let mut s = scenario();
        let mut ledger = play(
            &mut s,
            &[Command::heal("Kay", "Mordred"), Command::heal("Kay", "Arthur")],
        );
        assert!(!ledger.is_empty());

        ledger.clear();
        assert!(ledger.is_empty());
        assert_eq!(ledger.commands_recorded(), 0);
        assert!(ledger.rejected_commands().is_empty());
    }

    // -- 3. Query by player and team -----------------------------------------

    #[test]
    fn entries_for_player_and_team() {
        let mut s = scenario();
        let ledger = play(&mut s, &[Command::attack("Kay", "Mordred")]);
        let kay = player(&s, "Kay");
        let mordred = player(&s, "Mordred");

        assert_eq!(ledger.entries_for_player(kay).count(), 1);
        assert_eq!(ledger.entries_for_player(mordred).count(), 1);
        // Kay's power change and gain land on team 0, Mordred's on team 1.
        assert_eq!(ledger.entries_for_team(TeamId(0)).count(), 2);
        assert_eq!(ledger.entries_for_team(TeamId(1)).count(), 2);
    }

    #[test]
    fn power_history_follows_every_change() {
        let mut s = scenario();
        let ledger = play(
            &mut s,
            &[Command::heal("Kay", "Arthur"), Command::attack("Arthur", "Mordred")],
        );
        let arthur = player(&s, "Arthur");

        // heal: 301 -> 151 each, Arthur 900 -> 1051; clamp to 1000;
        // attack: 1000 vs 100 -> 1900; clamp to 1000.
        assert_eq!(ledger.power_history(arthur), vec![900, 1051, 1000, 1900, 1000]);
        assert!(ledger.power_history(player(&s, "Agravain")).is_empty());
    }

    // -- 4. Score accounting -------------------------------------------------

    #[test]
    fn score_delta_and_causes() {
        let mut s = scenario();
        let baseline = Ledger::baseline_scores(&s);
        let ledger = play(
            &mut s,
            &[Command::heal("Kay", "Arthur"), Command::attack("Arthur", "Mordred")],
        );

        assert_eq!(ledger.entries_by_cause(ScoreCause::HealRounding).count(), 1);
        assert_eq!(ledger.entries_by_cause(ScoreCause::Clamp).count(), 2);
        assert_eq!(ledger.entries_by_cause(ScoreCause::AttackGain).count(), 1);
        assert_eq!(ledger.entries_by_cause(ScoreCause::AttackLoss).count(), 1);
        assert_eq!(
            baseline[0] + ledger.score_delta(TeamId(0)),
            s[TeamId(0)].score()
        );
        assert_eq!(
            baseline[1] + ledger.score_delta(TeamId(1)),
            s[TeamId(1)].score()
        );
    }

    #[test]
    fn audit_passes_for_a_faithful_ledger() {
        let mut s = scenario();
        let baseline = Ledger::baseline_scores(&s);
        let ledger = play(
            &mut s,
            &[
                Command::flip_visibility("Agravain"),
                Command::super_merge("Mordred", "Agravain"),
                Command::attack("S_0", "Kay"),
                Command::heal("Arthur", "Kay"),
            ],
        );
        assert_eq!(ledger.audit(&baseline, &s), Ok(()));
    }

    #[test]
    fn audit_detects_tampering() {
        let mut s = scenario();
        let baseline = Ledger::baseline_scores(&s);
        let ledger = play(&mut s, &[Command::attack("Kay", "Mordred")]);
        s[TeamId(1)].adjust_score(3);

        assert_eq!(
            ledger.audit(&baseline, &s),
            Err(LedgerError::ScoreMismatch {
                team: TeamId(1),
                expected: 50,
                actual: 53,
            })
        );
    }

    #[test]
    fn recompute_rejects_a_short_baseline() {
        let mut s = scenario();
        let ledger = play(&mut s, &[Command::attack("Kay", "Mordred")]);
        assert!(matches!(
            ledger.recompute_scores(&[0]),
            Err(LedgerError::TeamOutOfRange { teams: 1, .. })
        ));
    }

    // -- 5. Serialization ----------------------------------------------------

    #[test]
    fn ledger_round_trips_through_json() {
        let mut s = scenario();
        let ledger = play(
            &mut s,
            &[Command::super_merge("Arthur", "Kay"), Command::heal("Mordred", "Mordred")],
        );
        let json = serde_json::to_string(&ledger).unwrap();
        let back: Ledger = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ledger);
    }
}
