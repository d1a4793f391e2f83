//! Final standings.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::TeamId;
use crate::scenario::Scenario;

/// Outcome of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Exactly one team holds the highest score.
    Winner { team: TeamId, wizard: String },
    /// The highest score is shared (or there are no teams at all).
    Tie,
}

impl Verdict {
    /// The winning wizard's name, if there is a winner.
    pub fn wizard(&self) -> Option<&str> {
        match self {
            Verdict::Winner { wizard, .. } => Some(wizard.as_str()),
            Verdict::Tie => None,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Winner { wizard, .. } => write!(f, "The chosen wizard is {wizard}"),
            Verdict::Tie => f.write_str("It's a tie"),
        }
    }
}

impl Scenario {
    /// Compute the verdict from the current team scores.
    ///
    /// Teams are scanned in creation order. A later team only displaces the
    /// leader with a strictly higher score; matching the leader's score marks
    /// a tie until someone beats it.
    pub fn verdict(&self) -> Verdict {
        let mut leader: Option<(TeamId, i64)> = None;
        let mut tied = false;

        for (index, team) in self.teams().iter().enumerate() {
            match leader {
                Some((_, best)) if team.score() < best => {}
                Some((_, best)) if team.score() == best => tied = true,
                _ => {
                    leader = Some((TeamId(index as u32), team.score()));
                    tied = false;
                }
            }
        }

        match leader {
            Some((team, _)) if !tied => Verdict::Winner {
                team,
                wizard: self[team].wizard().to_owned(),
            },
            _ => Verdict::Tie,
        }
    }
}
