//! Parsed commands.
//!
//! A [`Command`] is a keyword plus the player names it refers to. Commands
//! carry names rather than [`PlayerId`](crate::entity::PlayerId)s because
//! `super` renames players mid-match: resolution has to happen when the
//! command is dispatched, not when it is read.
//!
//! Arity is checked on construction, so a `Command` that exists is always
//! well-formed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DuelError;

// ---------------------------------------------------------------------------
// CommandKind
// ---------------------------------------------------------------------------

/// The four actions a command can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandKind {
    /// `flip_visibility <player>`
    FlipVisibility,
    /// `attack <attacker> <defender>`
    Attack,
    /// `heal <healer> <patient>`
    Heal,
    /// `super <leader> <donor>`
    Super,
}

impl CommandKind {
    pub const ALL: [CommandKind; 4] = [
        CommandKind::FlipVisibility,
        CommandKind::Attack,
        CommandKind::Heal,
        CommandKind::Super,
    ];

    /// The keyword used in scenario files.
    pub fn keyword(self) -> &'static str {
        match self {
            CommandKind::FlipVisibility => "flip_visibility",
            CommandKind::Attack => "attack",
            CommandKind::Heal => "heal",
            CommandKind::Super => "super",
        }
    }

    /// Number of player names the command takes.
    pub fn arity(self) -> usize {
        match self {
            CommandKind::FlipVisibility => 1,
            CommandKind::Attack | CommandKind::Heal | CommandKind::Super => 2,
        }
    }

    /// Whether the power cap is enforced after this command.
    pub fn involves_two_players(self) -> bool {
        self.arity() == 2
    }
}

impl FromStr for CommandKind {
    type Err = DuelError;

    fn from_str(keyword: &str) -> Result<Self, Self::Err> {
        CommandKind::ALL
            .into_iter()
            .find(|kind| kind.keyword() == keyword)
            .ok_or_else(|| DuelError::UnknownCommand {
                keyword: keyword.to_owned(),
            })
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// A well-formed command: a kind and exactly `kind.arity()` player names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    kind: CommandKind,
    actor: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    target: Option<String>,
}

impl Command {
    /// Build a command, checking the argument count against the kind.
    pub fn new(kind: CommandKind, args: &[&str]) -> Result<Self, DuelError> {
        match (kind.arity(), args) {
            (1, [actor]) => Ok(Self {
                kind,
                actor: (*actor).to_owned(),
                target: None,
            }),
            (2, [actor, target]) => Ok(Self {
                kind,
                actor: (*actor).to_owned(),
                target: Some((*target).to_owned()),
            }),
            (expected, _) => Err(DuelError::ArityMismatch {
                command: kind,
                expected,
                found: args.len(),
            }),
        }
    }

    /// Build a command from a keyword and its arguments.
    pub fn parse(keyword: &str, args: &[&str]) -> Result<Self, DuelError> {
        Self::new(keyword.parse()?, args)
    }

    pub fn flip_visibility(player: impl Into<String>) -> Self {
        Self {
            kind: CommandKind::FlipVisibility,
            actor: player.into(),
            target: None,
        }
    }

    pub fn attack(attacker: impl Into<String>, defender: impl Into<String>) -> Self {
        Self::pair(CommandKind::Attack, attacker.into(), defender.into())
    }

    pub fn heal(healer: impl Into<String>, patient: impl Into<String>) -> Self {
        Self::pair(CommandKind::Heal, healer.into(), patient.into())
    }

    pub fn super_merge(leader: impl Into<String>, donor: impl Into<String>) -> Self {
        Self::pair(CommandKind::Super, leader.into(), donor.into())
    }

    fn pair(kind: CommandKind, actor: String, target: String) -> Self {
        Self {
            kind,
            actor,
            target: Some(target),
        }
    }

    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    /// The acting player's name (first argument).
    pub fn actor(&self) -> &str {
        &self.actor
    }

    /// The second player's name, for two-player commands.
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.actor)?;
        if let Some(target) = &self.target {
            write!(f, " {target}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
