//! Match runner and report.
//!
//! [`MatchRunner`] drives a whole match: it owns the [`Scenario`], the
//! [`Dispatcher`] and a [`Ledger`], feeds commands one at a time and produces
//! a [`MatchReport`] once they are consumed. Before the report is built the
//! ledger audits every team score against the starting scores.
//!
//! Any fatal error ends the match without partial output: the rendered result
//! is the single line [`INVALID_INPUTS`].

use std::fmt::Write as _;

use duel_core::action::ActionEngine;
use duel_core::command::Command;
use duel_core::dispatch::{Diagnostic, Dispatched, Dispatcher};
use duel_core::scenario::Scenario;
use duel_core::standings::Verdict;
use duel_ledger::ledger::Ledger;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::RunConfig;
use crate::input::{parse_scenario, parse_scenario_bytes, InputError, ScenarioInput};
use crate::snapshot::{compute_hash, MatchSnapshot};
use crate::RunError;

/// Output of a match that hit a fatal error.
pub const INVALID_INPUTS: &str = "Invalid inputs";

// ---------------------------------------------------------------------------
// MatchReport
// ---------------------------------------------------------------------------

/// Final score of one team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStanding {
    pub wizard: String,
    pub score: i64,
}

/// Everything a finished match reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchReport {
    /// One entry per rejected command, in command order.
    pub diagnostics: Vec<Diagnostic>,
    pub verdict: Verdict,
    pub commands_processed: u64,
    /// Team scores in team order.
    pub standings: Vec<TeamStanding>,
}

impl MatchReport {
    /// The output text: every diagnostic on its own line, then the verdict.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for diagnostic in &self.diagnostics {
            let _ = writeln!(out, "{diagnostic}");
        }
        let _ = writeln!(out, "{}", self.verdict);
        out
    }
}

/// Render the outcome of a match, collapsing any error to [`INVALID_INPUTS`].
pub fn render_outcome(outcome: &Result<MatchReport, RunError>) -> String {
    match outcome {
        Ok(report) => report.render(),
        Err(_) => format!("{INVALID_INPUTS}\n"),
    }
}

/// Read `text` and play it to the end.
pub fn run_match(text: &str, config: &RunConfig) -> Result<MatchReport, RunError> {
    let (mut runner, commands) = MatchRunner::from_text(text, config)?;
    runner.run(&commands)
}

// ---------------------------------------------------------------------------
// MatchRunner
// ---------------------------------------------------------------------------

/// Plays commands against a scenario.
#[derive(Debug, Clone)]
pub struct MatchRunner {
    scenario: Scenario,
    dispatcher: Dispatcher,
    ledger: Ledger,
    baseline: Vec<i64>,
    commands_processed: u64,
}

impl MatchRunner {
    /// Start a match on `scenario`. Its current scores become the audit
    /// baseline.
    pub fn new(scenario: Scenario) -> Self {
        Self::resume(scenario, ActionEngine::new(), 0)
    }

    fn resume(scenario: Scenario, engine: ActionEngine, commands_processed: u64) -> Self {
        Self {
            baseline: Ledger::baseline_scores(&scenario),
            scenario,
            dispatcher: Dispatcher::resume(engine, commands_processed),
            ledger: Ledger::new(),
            commands_processed,
        }
    }

    /// Read a scenario file. Returns the runner and the commands to play.
    pub fn from_text(text: &str, config: &RunConfig) -> Result<(Self, Vec<Command>), RunError> {
        Self::from_input(parse_scenario(text, config))
    }

    /// Like [`from_text`](Self::from_text), for input that may not be UTF-8.
    pub fn from_bytes(bytes: &[u8], config: &RunConfig) -> Result<(Self, Vec<Command>), RunError> {
        Self::from_input(parse_scenario_bytes(bytes, config))
    }

    fn from_input(
        input: Result<ScenarioInput, InputError>,
    ) -> Result<(Self, Vec<Command>), RunError> {
        let input = input.inspect_err(|e| {
            warn!(error = %e, "scenario rejected");
        })?;
        Ok((Self::new(input.scenario), input.commands))
    }

    /// Resume from a verified snapshot.
    pub fn from_snapshot(snapshot: &MatchSnapshot) -> Result<Self, RunError> {
        snapshot.verify()?;
        Ok(Self::resume(
            snapshot.scenario.clone(),
            snapshot.engine.clone(),
            snapshot.commands_processed,
        ))
    }

    /// Dispatch one command and record its effects.
    pub fn step(&mut self, command: &Command) -> Result<Dispatched, RunError> {
        let dispatched = self.dispatcher.dispatch(&mut self.scenario, command)?;
        if !dispatched.applied_successfully {
            if let Some(diagnostic) = self.dispatcher.diagnostics().last() {
                warn!(
                    command_index = dispatched.command_index,
                    command = %command,
                    rejection = %diagnostic,
                    "command rejected"
                );
            }
        }
        self.ledger.record(&dispatched);
        self.commands_processed += 1;
        Ok(dispatched)
    }

    /// Play every command in order and build the report. Stops at the first
    /// fatal error.
    pub fn run(&mut self, commands: &[Command]) -> Result<MatchReport, RunError> {
        for command in commands {
            self.step(command).inspect_err(|e| {
                warn!(command = %command, error = %e, "match aborted");
            })?;
        }
        self.report()
    }

    /// Audit the scores and summarise the match so far.
    pub fn report(&self) -> Result<MatchReport, RunError> {
        self.ledger.audit(&self.baseline, &self.scenario)?;
        let verdict = self.scenario.verdict();
        debug!(
            commands = self.commands_processed,
            rejected = self.dispatcher.diagnostics().len(),
            %verdict,
            "match finished"
        );
        Ok(MatchReport {
            diagnostics: self.dispatcher.diagnostics().to_vec(),
            verdict,
            commands_processed: self.commands_processed,
            standings: self
                .scenario
                .teams()
                .iter()
                .map(|t| TeamStanding {
                    wizard: t.wizard().to_owned(),
                    score: t.score(),
                })
                .collect(),
        })
    }

    pub fn capture_snapshot(&self) -> Result<MatchSnapshot, RunError> {
        MatchSnapshot::new(
            self.scenario.clone(),
            self.dispatcher.engine().clone(),
            self.commands_processed,
        )
    }

    /// BLAKE3 hex digest of the current state, as a snapshot would record it.
    pub fn state_hash(&self) -> Result<String, RunError> {
        compute_hash(
            &self.scenario,
            self.dispatcher.engine(),
            self.commands_processed,
        )
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.dispatcher.diagnostics()
    }

    pub fn commands_processed(&self) -> u64 {
        self.commands_processed
    }

    /// Team scores when this runner started.
    pub fn baseline_scores(&self) -> &[i64] {
        &self.baseline
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
