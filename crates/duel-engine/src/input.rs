//! Scenario text reader.
//!
//! A scenario file is line oriented:
//!
//! ```text
//! 2              <- number of teams
//! Gandalf        <- one wizard name per team
//! Saruman
//! 3              <- number of players
//! Frodo          <- name
//! 0              <- team index
//! 300            <- starting power
//! True           <- visibility (True / False)
//! ...            (four lines per player)
//! heal Frodo Sam <- commands, one per line, until end of input
//! ```
//!
//! Every limit comes from [`RunConfig`]. Any violation is an [`InputError`]
//! and makes the whole run invalid. Command lines are split on single spaces:
//! at most three fields, the first two non-empty, and an empty third field
//! counts as absent. `\r\n` line endings are accepted.

use std::collections::HashSet;
use std::iter::Enumerate;
use std::str::Lines;

use duel_core::clamp::POWER_CAP;
use duel_core::command::Command;
use duel_core::entity::TeamId;
use duel_core::scenario::Scenario;
use duel_core::DuelError;
use tracing::debug;

use crate::config::RunConfig;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a name was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NameProblem {
    #[error("length must be between {min} and {max}")]
    Length { min: usize, max: usize },
    #[error("must start with an uppercase English letter")]
    NotCapitalized,
    #[error("must contain only English letters")]
    NonLetter,
    #[error("already used by another wizard or player")]
    Duplicate,
}

/// A malformed scenario. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("line {line}: expected {expected}, found end of input")]
    UnexpectedEnd { line: usize, expected: &'static str },

    #[error("line {line}: {field} '{value}' is not a number in {min}..={max}")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
        min: u64,
        max: u64,
    },

    #[error("line {line}: '{name}' {problem}")]
    InvalidName {
        line: usize,
        name: String,
        problem: NameProblem,
    },

    #[error("line {line}: visibility must be 'True' or 'False', found '{value}'")]
    InvalidVisibility { line: usize, value: String },

    #[error("line {line}: malformed command '{text}': {reason}")]
    MalformedCommand {
        line: usize,
        text: String,
        reason: &'static str,
    },

    #[error("line {line}: input is not valid UTF-8")]
    NotUtf8 { line: usize },

    #[error("more than {limit} commands")]
    TooManyCommands { limit: usize },

    #[error("line {line}: {source}")]
    Command { line: usize, source: DuelError },
}

// ---------------------------------------------------------------------------
// ScenarioInput
// ---------------------------------------------------------------------------

/// A fully read scenario: the starting state and the commands to run on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioInput {
    pub scenario: Scenario,
    pub commands: Vec<Command>,
}

/// Read a scenario from text.
pub fn parse_scenario(text: &str, config: &RunConfig) -> Result<ScenarioInput, InputError> {
    let mut reader = Reader {
        lines: text.lines().enumerate(),
        config,
        names: HashSet::new(),
        last_line: 0,
    };

    let mut scenario = Scenario::new();
    let team_count = reader.number("team count", 1, config.max_teams as u64)?;
    for _ in 0..team_count {
        let wizard = reader.name("wizard name")?;
        scenario.add_team(wizard);
    }

    let player_count = reader.number("player count", team_count, config.max_players as u64)?;
    for _ in 0..player_count {
        let name = reader.name("player name")?;
        let team = reader.number("team index", 0, team_count - 1)?;
        let max_power = config.max_power.min(POWER_CAP);
        let power = reader.number("power", 0, u64::from(max_power))?;
        let visible = reader.visibility()?;
        scenario
            .add_player(TeamId(team as u32), name, power as u32, visible)
            .map_err(|source| InputError::Command {
                line: reader.last_line,
                source,
            })?;
    }

    let mut commands = Vec::new();
    for (index, text) in &mut reader.lines {
        if commands.len() == config.max_commands {
            return Err(InputError::TooManyCommands {
                limit: config.max_commands,
            });
        }
        commands.push(parse_command_line(text, index + 1)?);
    }

    debug!(
        teams = scenario.team_count(),
        players = scenario.player_count(),
        commands = commands.len(),
        "scenario read"
    );
    Ok(ScenarioInput { scenario, commands })
}

/// Read a scenario from raw bytes. Bytes that are not UTF-8 can never form a
/// valid name, number or keyword, so they make the scenario invalid.
pub fn parse_scenario_bytes(bytes: &[u8], config: &RunConfig) -> Result<ScenarioInput, InputError> {
    let text = std::str::from_utf8(bytes).map_err(|e| InputError::NotUtf8 {
        line: bytes[..e.valid_up_to()]
            .iter()
            .filter(|&&b| b == b'\n')
            .count()
            + 1,
    })?;
    parse_scenario(text, config)
}

/// Parse one command line. `line` is only used for error reporting.
pub fn parse_command_line(text: &str, line: usize) -> Result<Command, InputError> {
    let malformed = |reason| InputError::MalformedCommand {
        line,
        text: text.to_owned(),
        reason,
    };

    let fields: Vec<&str> = text.split(' ').collect();
    if fields.len() > 3 {
        return Err(malformed("more than two spaces"));
    }
    let keyword = fields[0];
    let first = fields.get(1).copied().unwrap_or_default();
    let second = fields.get(2).copied().unwrap_or_default();
    if keyword.is_empty() {
        return Err(malformed("missing command"));
    }
    if first.is_empty() {
        return Err(malformed("missing player name"));
    }

    let mut args = vec![first];
    if !second.is_empty() {
        args.push(second);
    }
    Command::parse(keyword, &args).map_err(|source| InputError::Command { line, source })
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

struct Reader<'a> {
    lines: Enumerate<Lines<'a>>,
    config: &'a RunConfig,
    names: HashSet<String>,
    last_line: usize,
}

impl<'a> Reader<'a> {
    fn next(&mut self, expected: &'static str) -> Result<(usize, &'a str), InputError> {
        match self.lines.next() {
            Some((index, text)) => {
                self.last_line = index + 1;
                Ok((index + 1, text))
            }
            None => Err(InputError::UnexpectedEnd {
                line: self.last_line + 1,
                expected,
            }),
        }
    }

    fn number(&mut self, field: &'static str, min: u64, max: u64) -> Result<u64, InputError> {
        let (line, text) = self.next(field)?;
        let value = if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
            text.parse::<u64>().ok()
        } else {
            None
        };
        match value {
            Some(n) if (min..=max).contains(&n) => Ok(n),
            _ => Err(InputError::InvalidNumber {
                line,
                field,
                value: text.to_owned(),
                min,
                max,
            }),
        }
    }

    fn name(&mut self, field: &'static str) -> Result<String, InputError> {
        let (line, text) = self.next(field)?;
        self.check_name(text).map_err(|problem| InputError::InvalidName {
            line,
            name: text.to_owned(),
            problem,
        })?;
        self.names.insert(text.to_owned());
        Ok(text.to_owned())
    }

    fn check_name(&self, name: &str) -> Result<(), NameProblem> {
        let (min, max) = (self.config.min_name_len, self.config.max_name_len);
        if !(min..=max).contains(&name.chars().count()) {
            return Err(NameProblem::Length { min, max });
        }
        let mut chars = name.chars();
        if !chars.next().is_some_and(|c| c.is_ascii_uppercase()) {
            return Err(NameProblem::NotCapitalized);
        }
        if !chars.all(|c| c.is_ascii_alphabetic()) {
            return Err(NameProblem::NonLetter);
        }
        if self.names.contains(name) {
            return Err(NameProblem::Duplicate);
        }
        Ok(())
    }

    fn visibility(&mut self) -> Result<bool, InputError> {
        let (line, text) = self.next("visibility")?;
        match text {
            "True" => Ok(true),
            "False" => Ok(false),
            _ => Err(InputError::InvalidVisibility {
                line,
                value: text.to_owned(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
