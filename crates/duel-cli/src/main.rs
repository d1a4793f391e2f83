//! wizard-duel - play a wizard duel scenario file and write the result.

// Allow print in the CLI binary
#![allow(clippy::print_stderr)]

mod output;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use duel_engine::config::RunConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::output::OutputFormat;

/// Play a wizard duel: read teams, players and commands, write the
/// rejected-command diagnostics and the chosen wizard.
#[derive(Parser, Debug)]
#[command(name = "wizard-duel")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenario file to read
    #[arg(short, long, default_value = "input.txt")]
    input: PathBuf,

    /// File to write the result to
    #[arg(short, long, default_value = "output.txt")]
    output: PathBuf,

    /// JSON file overriding the default limits
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum number of command lines (overrides the config file)
    #[arg(long)]
    max_commands: Option<usize>,

    /// Output format: text or json
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match execute(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Rule violations in the scenario still succeed: they are part of the
/// written result. Only I/O and configuration problems are errors here.
fn execute(args: &Args) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref(), args.max_commands)?;
    let input = fs::read(&args.input)
        .with_context(|| format!("failed to read scenario {}", args.input.display()))?;

    let rendered = output::play_and_render(&input, &config, args.format)?;

    fs::write(&args.output, rendered)
        .with_context(|| format!("failed to write result to {}", args.output.display()))?;
    info!(output = %args.output.display(), "result written");
    Ok(())
}

fn load_config(path: Option<&Path>, max_commands: Option<usize>) -> anyhow::Result<RunConfig> {
    let mut config = match path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            RunConfig::from_json_str(&json)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => RunConfig::default(),
    };
    if let Some(max_commands) = max_commands {
        config.max_commands = max_commands;
    }
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn args_have_file_defaults() {
        let args = Args::parse_from(["wizard-duel"]);
        assert_eq!(args.input, PathBuf::from("input.txt"));
        assert_eq!(args.output, PathBuf::from("output.txt"));
        assert_eq!(args.format, OutputFormat::Text);
        assert!(args.config.is_none());
    }

    #[test]
    fn args_parse_overrides() {
        let args = Args::parse_from([
            "wizard-duel",
            "--input",
            "duel.txt",
            "--max-commands",
            "5",
            "--format",
            "json",
        ]);
        assert_eq!(args.input, PathBuf::from("duel.txt"));
        assert_eq!(args.max_commands, Some(5));
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn max_commands_flag_overrides_defaults() {
        let config = load_config(None, Some(3)).unwrap();
        assert_eq!(config.max_commands, 3);
        assert_eq!(config.max_teams, 10);
    }

    fn file_args(input: &Path, output: &Path) -> Args {
        Args::parse_from([
            OsStr::new("wizard-duel"),
            OsStr::new("--input"),
            input.as_os_str(),
            OsStr::new("--output"),
            output.as_os_str(),
        ])
    }

    #[test]
    fn scenario_file_is_played_into_the_output_file() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("input.txt");
        let output = dir.path().join("output.txt");
        fs::write(&input, "1\nGandalf\n1\nFrodo\n0\n10\nTrue\n").unwrap();

        execute(&file_args(&input, &output)).unwrap();
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "The chosen wizard is Gandalf\n"
        );
    }

    #[test]
    fn non_utf8_scenario_writes_invalid_inputs() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("input.txt");
        let output = dir.path().join("output.txt");
        fs::write(&input, b"1\nGand\xffalf\n1\nFrodo\n0\n10\nTrue\n").unwrap();

        execute(&file_args(&input, &output)).unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), "Invalid inputs\n");
    }

    #[test]
    fn missing_scenario_file_is_an_error() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("absent.txt");
        let output = dir.path().join("output.txt");

        let err = execute(&file_args(&input, &output)).unwrap_err();
        assert!(err.to_string().contains("failed to read scenario"));
        assert!(!output.exists());
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let err = load_config(Some(Path::new("/nonexistent/duel.json")), None).unwrap_err();
        assert!(err.to_string().contains("failed to read config"));
    }
}
