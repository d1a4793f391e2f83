//! Duel Engine -- reads a scenario, plays it and reports the result.
//!
//! This crate builds on [`duel_core`] and [`duel_ledger`] to provide the match
//! driver: a line-oriented [`input`] reader bounded by a [`RunConfig`], the
//! [`MatchRunner`](runner::MatchRunner) that plays commands in order while
//! auditing scores through the ledger, and [`MatchSnapshot`]s with BLAKE3
//! hashes for determinism checks.
//!
//! # Quick Start
//!
//! ```
//! use duel_engine::prelude::*;
//!
//! let text = "\
//! 2
//! Gandalf
//! Saruman
//! 2
//! Frodo
//! 0
//! 500
//! True
//! Grima
//! 1
//! 500
//! True
//! attack Frodo Grima
//! attack Grima Frodo
//! ";
//!
//! let report = run_match(text, &RunConfig::default()).unwrap();
//! assert_eq!(report.render(), "This player is frozen\nIt's a tie\n");
//! ```
//!
//! [`RunConfig`]: config::RunConfig
//! [`MatchSnapshot`]: snapshot::MatchSnapshot

#![deny(unsafe_code)]

pub mod config;
pub mod input;
pub mod runner;
pub mod snapshot;

/// Re-export the core crate for convenience.
pub use duel_core;

/// Re-export the ledger crate for convenience.
pub use duel_ledger;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Anything that makes a run invalid.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// The scenario text is malformed.
    #[error(transparent)]
    Input(#[from] input::InputError),

    /// A command could not be carried out.
    #[error(transparent)]
    Duel(#[from] duel_core::DuelError),

    /// Team scores drifted from the ledger.
    #[error("score audit failed: {0}")]
    Ledger(#[from] duel_ledger::LedgerError),

    /// A configuration value is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A snapshot's content does not match its recorded hash.
    #[error("snapshot hash mismatch: recorded {recorded} but recomputed {recomputed}")]
    SnapshotHash {
        recorded: String,
        recomputed: String,
    },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common engine usage.
pub mod prelude {
    pub use duel_core::prelude::*;
    pub use duel_ledger::prelude::*;

    pub use crate::config::RunConfig;
    pub use crate::input::{
        parse_command_line, parse_scenario, parse_scenario_bytes, InputError, NameProblem,
        ScenarioInput,
    };
    pub use crate::runner::{
        render_outcome, run_match, MatchReport, MatchRunner, TeamStanding, INVALID_INPUTS,
    };
    pub use crate::snapshot::MatchSnapshot;
    pub use crate::RunError;
}
