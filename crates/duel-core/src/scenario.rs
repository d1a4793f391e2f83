//! The [`Scenario`] is the top-level container for a match. It owns every
//! team, and each team owns its players.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::entity::{Player, PlayerId, Team, TeamId};
use crate::DuelError;

/// All teams of a match, in creation order.
///
/// Creation order matters: the winner query scans teams in this order and
/// lookup resolves names team-by-team.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    teams: Vec<Team>,
}

impl Scenario {
    /// Create an empty scenario.
    pub fn new() -> Self {
        Self { teams: Vec::new() }
    }

    /// Add a team led by `wizard` with score 0 and no members.
    pub fn add_team(&mut self, wizard: impl Into<String>) -> TeamId {
        let id = TeamId(self.teams.len() as u32);
        self.teams.push(Team::new(wizard));
        id
    }

    /// Add a player to `team`. The player's starting power is credited to the
    /// team score.
    ///
    /// Names and ranges are not validated here; the input layer guarantees
    /// them. Returns [`DuelError::UnknownTeam`] if `team` was never created.
    pub fn add_player(
        &mut self,
        team: TeamId,
        name: impl Into<String>,
        power: u32,
        visible: bool,
    ) -> Result<PlayerId, DuelError> {
        let owner = self
            .teams
            .get_mut(team.index())
            .ok_or(DuelError::UnknownTeam { team })?;
        let slot = owner.push_member(Player::new(name, team, power, visible));
        owner.adjust_score(i64::from(power));
        Ok(PlayerId::new(team, slot))
    }

    /// All teams in creation order.
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.get(id.index())
    }

    pub fn team_mut(&mut self, id: TeamId) -> Option<&mut Team> {
        self.teams.get_mut(id.index())
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.team(id.team())?.member(id.slot())
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.team_mut(id.team())?.member_mut(id.slot())
    }

    /// Iterate every player (absorbed ones included) in team-then-member
    /// order.
    pub fn players(&self) -> impl Iterator<Item = (PlayerId, &Player)> {
        self.teams.iter().enumerate().flat_map(|(t, team)| {
            team.members()
                .iter()
                .enumerate()
                .map(move |(s, p)| (PlayerId::new(TeamId(t as u32), s as u32), p))
        })
    }

    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    pub fn player_count(&self) -> usize {
        self.teams.iter().map(|t| t.members().len()).sum()
    }
}

impl Index<TeamId> for Scenario {
    type Output = Team;

    fn index(&self, id: TeamId) -> &Team {
        &self.teams[id.index()]
    }
}

impl IndexMut<TeamId> for Scenario {
    fn index_mut(&mut self, id: TeamId) -> &mut Team {
        &mut self.teams[id.index()]
    }
}

impl Index<PlayerId> for Scenario {
    type Output = Player;

    fn index(&self, id: PlayerId) -> &Player {
        &self.teams[id.team().index()].members()[id.slot()]
    }
}

impl IndexMut<PlayerId> for Scenario {
    fn index_mut(&mut self, id: PlayerId) -> &mut Player {
        let team = &mut self.teams[id.team().index()];
        match team.member_mut(id.slot()) {
            Some(player) => player,
            None => panic!("player handle {id:?} is out of range"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
