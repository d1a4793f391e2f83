//! Team and player records.
//!
//! A [`PlayerId`] is a handle into a [`Scenario`](crate::scenario::Scenario):
//! the owning team's index plus the player's slot inside that team's member
//! list. Players are never removed once setup is over (an absorbed player only
//! loses its name), so a handle stays valid for the whole run.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// TeamId
// ---------------------------------------------------------------------------

/// Index of a team in creation order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamId(pub u32);

impl TeamId {
    /// The index as a `usize`, for slicing into the team list.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TeamId({})", self.0)
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "team {}", self.0)
    }
}

// ---------------------------------------------------------------------------
// PlayerId
// ---------------------------------------------------------------------------

/// Handle to a player: owning team plus slot within that team.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId {
    team: TeamId,
    slot: u32,
}

impl PlayerId {
    /// Construct a handle from a team and a member slot.
    #[inline]
    pub fn new(team: TeamId, slot: u32) -> Self {
        Self { team, slot }
    }

    /// The team that owns this player.
    #[inline]
    pub fn team(self) -> TeamId {
        self.team
    }

    /// The player's position in its team's member list.
    #[inline]
    pub fn slot(self) -> usize {
        self.slot as usize
    }
}

impl fmt::Debug for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlayerId({}.{})", self.team.0, self.slot)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.team.0, self.slot)
    }
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// A single player on a team.
///
/// `name` is empty once the player has been absorbed by a `super` action.
/// Absorbed players keep their slot and their power but are unreachable by
/// name lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    name: String,
    team: TeamId,
    power: u32,
    visible: bool,
}

impl Player {
    /// Create a player bound to `team`.
    pub fn new(name: impl Into<String>, team: TeamId, power: u32, visible: bool) -> Self {
        Self {
            name: name.into(),
            team,
            power,
            visible,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn team(&self) -> TeamId {
        self.team
    }

    pub fn power(&self) -> u32 {
        self.power
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// A player with power 0 cannot act.
    pub fn is_frozen(&self) -> bool {
        self.power == 0
    }

    /// Whether this player was consumed by a `super` action.
    pub fn is_absorbed(&self) -> bool {
        self.name.is_empty()
    }

    pub fn set_power(&mut self, power: u32) {
        self.power = power;
    }

    /// Toggle visibility and return the new value.
    pub fn toggle_visibility(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    /// Replace the name, returning the old one.
    pub fn rename(&mut self, name: impl Into<String>) -> String {
        std::mem::replace(&mut self.name, name.into())
    }

    /// Clear the name so the player can never be looked up again.
    ///
    /// Returns the name the player had.
    pub fn absorb(&mut self) -> String {
        std::mem::take(&mut self.name)
    }
}

// ---------------------------------------------------------------------------
// Team
// ---------------------------------------------------------------------------

/// A team led by a wizard.
///
/// The score is not simply the sum of current member power: clamp events
/// debit the score by the excess they cut, and heal rounding can credit it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    wizard: String,
    score: i64,
    members: Vec<Player>,
}

impl Team {
    /// Create an empty team with score 0.
    pub fn new(wizard: impl Into<String>) -> Self {
        Self {
            wizard: wizard.into(),
            score: 0,
            members: Vec::new(),
        }
    }

    /// The wizard's name, used when reporting the winner.
    pub fn wizard(&self) -> &str {
        &self.wizard
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn adjust_score(&mut self, delta: i64) {
        self.score += delta;
    }

    /// Members in the order they were added.
    pub fn members(&self) -> &[Player] {
        &self.members
    }

    pub fn member(&self, slot: usize) -> Option<&Player> {
        self.members.get(slot)
    }

    pub fn member_mut(&mut self, slot: usize) -> Option<&mut Player> {
        self.members.get_mut(slot)
    }

    /// Append a member and return its slot.
    pub(crate) fn push_member(&mut self, player: Player) -> u32 {
        let slot = self.members.len() as u32;
        self.members.push(player);
        slot
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
