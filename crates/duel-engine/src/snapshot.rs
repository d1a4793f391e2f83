//! Match snapshot and restore with BLAKE3 hashing.
//!
//! A [`MatchSnapshot`] is the full state of a match in progress: every team
//! and player, the `super` counter and the number of commands processed. It
//! carries a BLAKE3 hex digest of that state so two runs can be compared for
//! determinism, and so a stored snapshot can be checked before it is resumed.
//!
//! ```
//! use duel_engine::prelude::*;
//!
//! let text = "1\nMerlin\n2\nArthur\n0\n9\nTrue\nKay\n0\n4\nTrue\nheal Arthur Kay\n";
//! let (mut runner, commands) = MatchRunner::from_text(text, &RunConfig::default()).unwrap();
//! runner.run(&commands).unwrap();
//!
//! let snapshot = runner.capture_snapshot().unwrap();
//! assert_eq!(snapshot.hash.len(), 64);
//!
//! let resumed = MatchRunner::from_snapshot(&snapshot).unwrap();
//! assert_eq!(resumed.state_hash().unwrap(), snapshot.hash);
//! ```
//!
//! # What Is NOT Serialized
//!
//! - **Diagnostics**: only the output of the run so far; a resumed runner
//!   starts with none.
//! - **Ledger**: a resumed runner starts a fresh ledger whose baseline is the
//!   restored team scores.

use duel_core::action::ActionEngine;
use duel_core::scenario::Scenario;
use serde::{Deserialize, Serialize};

use crate::RunError;

// ---------------------------------------------------------------------------
// MatchSnapshot
// ---------------------------------------------------------------------------

/// A serializable snapshot of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    /// Teams, players, scores.
    pub scenario: Scenario,
    /// The action engine, including its `super` counter.
    pub engine: ActionEngine,
    /// Commands dispatched so far.
    pub commands_processed: u64,
    /// BLAKE3 hex digest (64 lowercase hex chars) of the fields above.
    pub hash: String,
}

impl MatchSnapshot {
    /// Build a snapshot, computing its hash.
    pub fn new(
        scenario: Scenario,
        engine: ActionEngine,
        commands_processed: u64,
    ) -> Result<Self, RunError> {
        let hash = compute_hash(&scenario, &engine, commands_processed)?;
        Ok(Self {
            scenario,
            engine,
            commands_processed,
            hash,
        })
    }

    /// Recompute the hash and compare it with the recorded one.
    pub fn verify(&self) -> Result<(), RunError> {
        let recomputed = compute_hash(&self.scenario, &self.engine, self.commands_processed)?;
        if recomputed != self.hash {
            return Err(RunError::SnapshotHash {
                recorded: self.hash.clone(),
                recomputed,
            });
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, RunError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and verify a snapshot.
    pub fn from_json(json: &str) -> Result<Self, RunError> {
        let snapshot: Self = serde_json::from_str(json)?;
        snapshot.verify()?;
        Ok(snapshot)
    }
}

// ---------------------------------------------------------------------------
// Hashing helpers
// ---------------------------------------------------------------------------

/// BLAKE3 hex digest of the canonical JSON encoding of the match state.
pub(crate) fn compute_hash(
    scenario: &Scenario,
    engine: &ActionEngine,
    commands_processed: u64,
) -> Result<String, RunError> {
    #[derive(Serialize)]
    struct HashableState<'a> {
        scenario: &'a Scenario,
        engine: &'a ActionEngine,
        commands_processed: u64,
    }

    let bytes = serde_json::to_vec(&HashableState {
        scenario,
        engine,
        commands_processed,
    })?;
    Ok(blake3::hash(&bytes).to_hex().to_string())
}
