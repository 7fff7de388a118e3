//! Command-line front end for the league fixture engine.
//!
//! Reads rosters, configurations and recorded results as JSON and writes the
//! generated fixtures, tables and brackets as JSON.

mod commands;
mod config;

use std::path::PathBuf;

use anyhow::Error;
use log::warn;
use pico_args::Arguments;

use commands::Shootout;
use config::{CliConfig, ConfigError};

const HELP: &str = "\
Generate league, group-stage and knockout fixtures

USAGE:
  lf_cli <COMMAND> [OPTIONS]

COMMANDS:
  generate     Schedule a competition          (--config, --roster)
  standings    Tables from recorded results    (--fixtures)
  advance      Knockout bracket after a stage  (--config, --fixtures)
  progress     Fill the next knockout stage    (--bracket, --stage [, --fixtures, --shootout])

OPTIONS:
  --config     FILE        Competition configuration (JSON)
  --roster     FILE        Team list (JSON)
  --fixtures   FILE        Fixtures or plan with recorded results (JSON)
  --bracket    FILE        Bracket, plan or progress output (JSON)
  --stage      STAGE       round_of_32, round_of_16, quarter_final, semi_final
  --shootout   R:M=TEAM    Shoot-out winner of level tie R:M (repeatable)
  --seed       N           Random seed  [default: env LF_SEED or OS entropy]
  --out        FILE        Output file  [default: env LF_OUTPUT or stdout]

FLAGS:
  --pretty                 Pretty-print JSON output  [default: env LF_PRETTY]
  -h, --help               Print help information

ENVIRONMENT:
  RUST_LOG                 Log filter (e.g., info, league_fixtures=debug)
  (A .env file in the working directory is loaded if present)
";

struct Args {
    command: Option<String>,
    config: Option<PathBuf>,
    roster: Option<PathBuf>,
    fixtures: Option<PathBuf>,
    bracket: Option<PathBuf>,
    stage: Option<String>,
    shootouts: Vec<Shootout>,
    seed: Option<u64>,
    out: Option<PathBuf>,
    pretty: bool,
}

fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        command: pargs.subcommand()?,
        config: pargs.opt_value_from_str("--config")?,
        roster: pargs.opt_value_from_str("--roster")?,
        fixtures: pargs.opt_value_from_str("--fixtures")?,
        bracket: pargs.opt_value_from_str("--bracket")?,
        stage: pargs.opt_value_from_str("--stage")?,
        shootouts: pargs.values_from_str("--shootout")?,
        seed: pargs.opt_value_from_str("--seed")?,
        out: pargs.opt_value_from_str("--out")?,
        pretty: pargs.contains("--pretty"),
    };

    env_logger::builder().format_target(false).init();

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        warn!("Ignoring unused arguments: {:?}", remaining);
    }

    let cli = CliConfig::from_env(args.seed, args.pretty, args.out)?;

    match args.command.as_deref() {
        Some("generate") => commands::generate(
            &cli,
            &required(args.config, "--config", "Competition configuration JSON")?,
            &required(args.roster, "--roster", "JSON list of {id, name, group?} teams")?,
        ),
        Some("standings") => commands::standings(
            &cli,
            &required(args.fixtures, "--fixtures", "Fixtures with recorded results")?,
        ),
        Some("advance") => commands::advance(
            &cli,
            &required(args.config, "--config", "Competition configuration JSON")?,
            &required(args.fixtures, "--fixtures", "Completed league or group fixtures")?,
        ),
        Some("progress") => commands::progress(
            &cli,
            &required(args.bracket, "--bracket", "Bracket JSON from advance or progress")?,
            &required(args.stage, "--stage", "Stage whose winners move on")?,
            args.fixtures.as_deref(),
            &args.shootouts,
        ),
        _ => {
            eprint!("{HELP}");
            std::process::exit(2);
        }
    }
}

fn required<T>(value: Option<T>, var: &str, hint: &str) -> Result<T, ConfigError> {
    value.ok_or_else(|| ConfigError::MissingRequired {
        var: var.to_string(),
        hint: hint.to_string(),
    })
}
