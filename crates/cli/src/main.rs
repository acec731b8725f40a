//! contend CLI: seed a record, race N transactional replaces against it,
//! print the outcome counts.
//!
//! Exit status is 0 when no attempt failed fatally, 1 otherwise (including
//! configuration and seeding errors).

mod commands;
mod format;
mod parse;

use std::process;

use anyhow::{Context, Result};
use contend::{Harness, HarnessConfig, RecordKey};

use commands::build_cli;
use format::{format_error, format_report, ScenarioReport};
use parse::{matches_to_config, output_mode, resolve_key};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = build_cli().get_matches();
    let mode = output_mode(&matches);

    let exit_code = match matches_to_config(&matches)
        .map_err(anyhow::Error::msg)
        .and_then(run)
    {
        Ok(report) => {
            println!("{}", format_report(&report, mode));
            if report.summary.fatal_count == 0 {
                0
            } else {
                1
            }
        }
        Err(e) => {
            eprintln!("{}", format_error(&e, mode));
            1
        }
    };
    process::exit(exit_code);
}

fn run(config: HarnessConfig) -> Result<ScenarioReport> {
    let key = RecordKey::new(resolve_key(&config));
    let attempts = config.probe.attempts;
    let initial_value = config.probe.initial_value.clone();

    let harness = Harness::from_config(config).context("failed to open store")?;
    harness
        .seed(&key, &initial_value)
        .with_context(|| format!("failed to seed record '{}'", key))?;

    let run = harness.run_detailed(&key, attempts);

    let final_value = match harness.read(&key) {
        Ok(record) => record.map(|r| r.value),
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "could not read final value");
            None
        }
    };

    Ok(ScenarioReport::from_run(&run, attempts, final_value))
}
