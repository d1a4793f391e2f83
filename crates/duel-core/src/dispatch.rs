//! Command dispatch.
//!
//! The [`Dispatcher`] turns one [`Command`] at a time into an action on the
//! [`Scenario`]:
//!
//! 1. Resolve the player names. A missing player is a [`DuelError`] and ends
//!    the run; the command is not skipped.
//! 2. Route to the matching [`ActionEngine`] action.
//! 3. If the action was rejected, record a [`Diagnostic`]. Rejections never
//!    stop the run.
//! 4. For two-player commands, enforce the power cap on the first and then the
//!    second player.
//!
//! Commands are applied strictly in the order they are dispatched, each one
//! completely (including the cap) before the next.
//!
//! # Example
//!
//! ```
//! use duel_core::prelude::*;
//!
//! let mut scenario = Scenario::new();
//! let light = scenario.add_team("Gandalf");
//! let dark = scenario.add_team("Saruman");
//! scenario.add_player(light, "Aragorn", 500, true).unwrap();
//! scenario.add_player(dark, "Lurtz", 500, true).unwrap();
//!
//! let mut dispatcher = Dispatcher::new();
//! dispatcher
//!     .dispatch(&mut scenario, &Command::attack("Aragorn", "Lurtz"))
//!     .unwrap();
//! let frozen = dispatcher
//!     .dispatch(&mut scenario, &Command::attack("Lurtz", "Aragorn"))
//!     .unwrap();
//!
//! assert!(!frozen.applied_successfully);
//! assert_eq!(dispatcher.diagnostics()[0].to_string(), "This player is frozen");
//! assert_eq!(scenario.verdict(), Verdict::Tie);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::action::{ActionEngine, Rejection};
use crate::clamp::enforce_power_cap;
use crate::command::{Command, CommandKind};
use crate::effect::Effect;
use crate::entity::PlayerId;
use crate::scenario::Scenario;
use crate::DuelError;

// ---------------------------------------------------------------------------
// Diagnostic
// ---------------------------------------------------------------------------

/// A rejected command, reported as one output line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Index of the command in dispatch order.
    pub command_index: u64,
    /// What the command tried to do.
    pub command: CommandKind,
    /// Which precondition failed.
    pub rejection: Rejection,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.rejection, f)
    }
}

// ---------------------------------------------------------------------------
// Dispatched
// ---------------------------------------------------------------------------

/// Record of one dispatched command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dispatched {
    /// Sequential index of the command (0-based).
    pub command_index: u64,
    pub kind: CommandKind,
    /// The resolved acting player.
    pub actor: PlayerId,
    /// The resolved second player, for two-player commands.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub target: Option<PlayerId>,
    /// Every effect applied, action first and then any power cap cuts.
    pub effects: Vec<Effect>,
    /// `false` if the action was rejected by a precondition.
    pub applied_successfully: bool,
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Routes commands to the [`ActionEngine`] and collects diagnostics.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    engine: ActionEngine,
    diagnostics: Vec<Diagnostic>,
    next_index: u64,
}

impl Dispatcher {
    /// Create a dispatcher with a fresh engine.
    pub fn new() -> Self {
        Self::with_engine(ActionEngine::new())
    }

    /// Create a dispatcher around an existing engine (e.g. one restored from
    /// a snapshot, to keep its `super` counter).
    pub fn with_engine(engine: ActionEngine) -> Self {
        Self {
            engine,
            diagnostics: Vec::new(),
            next_index: 0,
        }
    }

    /// Continue a match: `engine` keeps its `super` counter and command
    /// indices carry on from `commands_dispatched`.
    pub fn resume(engine: ActionEngine, commands_dispatched: u64) -> Self {
        Self {
            next_index: commands_dispatched,
            ..Self::with_engine(engine)
        }
    }

    /// Apply one command to `scenario`.
    ///
    /// Returns an error only when a player name cannot be resolved; the
    /// scenario is untouched in that case. Rejected actions return `Ok` with
    /// `applied_successfully == false` and add a [`Diagnostic`].
    pub fn dispatch(
        &mut self,
        scenario: &mut Scenario,
        command: &Command,
    ) -> Result<Dispatched, DuelError> {
        let actor = scenario.resolve_player(command.actor()).inspect_err(|e| {
            warn!(command = %command, error = %e, "command refers to an unknown player");
        })?;
        let target = if command.kind().involves_two_players() {
            let name = command.target().ok_or(DuelError::ArityMismatch {
                command: command.kind(),
                expected: 2,
                found: 1,
            })?;
            Some(scenario.resolve_player(name).inspect_err(|e| {
                warn!(command = %command, error = %e, "command refers to an unknown player");
            })?)
        } else {
            None
        };

        let outcome = match (command.kind(), target) {
            (CommandKind::FlipVisibility, _) => self.engine.flip_visibility(scenario, actor),
            (CommandKind::Attack, Some(target)) => self.engine.attack(scenario, actor, target),
            (CommandKind::Heal, Some(target)) => self.engine.heal(scenario, actor, target),
            (CommandKind::Super, Some(target)) => {
                self.engine.super_merge(scenario, actor, target)
            }
            (kind @ (CommandKind::Attack | CommandKind::Heal | CommandKind::Super), None) => {
                return Err(DuelError::ArityMismatch {
                    command: kind,
                    expected: kind.arity(),
                    found: 1,
                });
            }
        };

        let command_index = self.next_index;
        self.next_index += 1;

        let (mut effects, applied_successfully) = match outcome {
            Ok(effects) => (effects, true),
            Err(rejection) => {
                debug!(command = %command, %rejection, "command rejected");
                self.diagnostics.push(Diagnostic {
                    command_index,
                    command: command.kind(),
                    rejection,
                });
                (Vec::new(), false)
            }
        };

        if let Some(target) = target {
            effects.extend(enforce_power_cap(scenario, actor));
            effects.extend(enforce_power_cap(scenario, target));
        }

        debug!(
            command_index,
            command = %command,
            effects = effects.len(),
            applied_successfully,
            "command dispatched"
        );

        Ok(Dispatched {
            command_index,
            kind: command.kind(),
            actor,
            target,
            effects,
            applied_successfully,
        })
    }

    /// Diagnostics recorded so far, in dispatch order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Remove and return the recorded diagnostics.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Number of commands successfully routed (rejected ones included).
    pub fn commands_dispatched(&self) -> u64 {
        self.next_index
    }

    pub fn engine(&self) -> &ActionEngine {
        &self.engine
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
