//! Duel Core -- teams, players and the action rules of a wizard duel.
//!
//! A [`Scenario`](scenario::Scenario) holds teams, each led by a wizard and
//! owning its players. Commands (`flip_visibility`, `attack`, `heal`,
//! `super`) are routed by the [`Dispatcher`](dispatch::Dispatcher) to the
//! [`ActionEngine`](action::ActionEngine), which mutates power, visibility,
//! names and team scores. After every two-player command the power cap is
//! enforced. When all commands are consumed the
//! [`Verdict`](standings::Verdict) names the winning wizard or a tie.
//!
//! Two failure severities exist:
//!
//! - [`DuelError`]: fatal. An unknown player, unknown command or wrong
//!   argument count ends the whole run.
//! - [`Rejection`](action::Rejection): a failed action precondition. It is
//!   reported as one diagnostic line and the run continues.
//!
//! # Quick Start
//!
//! ```
//! use duel_core::prelude::*;
//!
//! let mut scenario = Scenario::new();
//! let light = scenario.add_team("Gandalf");
//! let dark = scenario.add_team("Saruman");
//! scenario.add_player(light, "Frodo", 300, true).unwrap();
//! scenario.add_player(light, "Sam", 100, true).unwrap();
//! scenario.add_player(dark, "Grima", 350, true).unwrap();
//!
//! let mut dispatcher = Dispatcher::new();
//! for command in [
//!     Command::heal("Frodo", "Sam"),
//!     Command::attack("Sam", "Grima"),
//! ] {
//!     dispatcher.dispatch(&mut scenario, &command).unwrap();
//! }
//!
//! assert_eq!(scenario.verdict().wizard(), Some("Saruman"));
//! ```

#![deny(unsafe_code)]

pub mod action;
pub mod clamp;
pub mod command;
pub mod dispatch;
pub mod effect;
pub mod entity;
pub mod lookup;
pub mod scenario;
pub mod standings;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Fatal errors: any of these aborts the run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DuelError {
    /// No player in play has this name (never existed, renamed, or absorbed).
    #[error("no player named '{name}' is in play")]
    UnknownPlayer { name: String },

    /// The command keyword is not one of the four actions.
    #[error("unknown command '{keyword}'")]
    UnknownCommand { keyword: String },

    /// A command was given the wrong number of player names.
    #[error("'{command}' takes {expected} player name(s), got {found}")]
    ArityMismatch {
        command: command::CommandKind,
        expected: usize,
        found: usize,
    },

    /// A player was added to a team that does not exist.
    #[error("{team} does not exist")]
    UnknownTeam { team: entity::TeamId },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::action::{ActionEngine, ActionResult, Rejection, SUPER_NAME_PREFIX};
    pub use crate::clamp::{enforce_power_cap, POWER_CAP};
    pub use crate::command::{Command, CommandKind};
    pub use crate::dispatch::{Diagnostic, Dispatched, Dispatcher};
    pub use crate::effect::{Effect, ScoreCause};
    pub use crate::entity::{Player, PlayerId, Team, TeamId};
    pub use crate::scenario::Scenario;
    pub use crate::standings::Verdict;
    pub use crate::DuelError;
}

// ---------------------------------------------------------------------------
// Integration Tests
// ---------------------------------------------------------------------------
