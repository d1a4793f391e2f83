//! Result rendering for the two output formats.

use clap::ValueEnum;
use duel_engine::config::RunConfig;
use duel_engine::runner::{MatchReport, MatchRunner, INVALID_INPUTS};
use duel_engine::snapshot::MatchSnapshot;
use duel_engine::RunError;
use serde::Serialize;

/// Output format for the result file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Diagnostics and verdict, one per line.
    Text,
    /// Report and final snapshot as JSON.
    Json,
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum JsonOutput<'a> {
    Completed {
        report: &'a MatchReport,
        snapshot: &'a MatchSnapshot,
    },
    Invalid {
        message: &'static str,
        error: String,
    },
}

fn play(input: &[u8], config: &RunConfig) -> Result<(MatchReport, MatchSnapshot), RunError> {
    let (mut runner, commands) = MatchRunner::from_bytes(input, config)?;
    let report = runner.run(&commands)?;
    let snapshot = runner.capture_snapshot()?;
    Ok((report, snapshot))
}

/// Play `input` and render the result. Scenario errors become the
/// invalid-input result; only serialization failures are returned.
pub(crate) fn play_and_render(
    input: &[u8],
    config: &RunConfig,
    format: OutputFormat,
) -> anyhow::Result<String> {
    let outcome = play(input, config);
    let rendered = match (format, &outcome) {
        (OutputFormat::Text, Ok((report, _))) => report.render(),
        (OutputFormat::Text, Err(_)) => format!("{INVALID_INPUTS}\n"),
        (OutputFormat::Json, Ok((report, snapshot))) => {
            serde_json::to_string_pretty(&JsonOutput::Completed { report, snapshot })? + "\n"
        }
        (OutputFormat::Json, Err(e)) => {
            serde_json::to_string_pretty(&JsonOutput::Invalid {
                message: INVALID_INPUTS,
                error: e.to_string(),
            })? + "\n"
        }
    };
    Ok(rendered)
}
