//! Duel Ledger - an auditable record of every state change in a match.
//!
//! Each dispatched command produces a list of
//! [`Effect`](duel_core::effect::Effect)s. The ledger keeps them all, tagged
//! with the command that caused them, so a finished match can be audited:
//! which commands touched a player, how a team's score evolved, and whether
//! the final scores are exactly the starting scores plus every recorded delta.
//!
//! # Modules
//!
//! - [`ledger`]: The [`Ledger`](ledger::Ledger) itself and its query API.

#![deny(unsafe_code)]

pub mod ledger;

use duel_core::entity::TeamId;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors raised when auditing scores against the ledger.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// An entry refers to a team the baseline does not cover.
    #[error("ledger entry refers to {team}, but the baseline only has {teams} team(s)")]
    TeamOutOfRange { team: TeamId, teams: usize },

    /// A team's live score disagrees with the recomputed one.
    #[error("{team} has score {actual}, ledger expects {expected}")]
    ScoreMismatch {
        team: TeamId,
        expected: i64,
        actual: i64,
    },
}

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::ledger::{Ledger, LedgerEntry};
    pub use crate::LedgerError;
}
