//! ArgMatches → configuration conversion.
//!
//! The config file (or the defaults) is loaded first; every flag given on
//! the command line then overrides the matching field.

use clap::ArgMatches;
use contend::HarnessConfig;
use rand::Rng;

use crate::format::OutputMode;

/// Convert clap ArgMatches into the effective configuration.
pub fn matches_to_config(matches: &ArgMatches) -> Result<HarnessConfig, String> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => HarnessConfig::load(path).map_err(|e| e.to_string())?,
        None => HarnessConfig::default(),
    };
    apply_overrides(&mut config, matches);
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

/// Report format selected on the command line.
pub fn output_mode(matches: &ArgMatches) -> OutputMode {
    if matches.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Human
    }
}

/// Apply command-line overrides on top of `config`.
pub fn apply_overrides(config: &mut HarnessConfig, matches: &ArgMatches) {
    // =====================================================================
    // Store
    // =====================================================================
    if let Some(uri) = matches.get_one::<String>("uri") {
        config.store.uri = uri.clone();
    }
    if let Some(database) = matches.get_one::<String>("database") {
        config.store.database = database.clone();
    }
    if let Some(collection) = matches.get_one::<String>("collection") {
        config.store.collection = collection.clone();
    }
    if let Some(latency) = matches.get_one::<u64>("commit-latency-ms") {
        config.store.commit_latency_ms = *latency;
    }

    // =====================================================================
    // Probe
    // =====================================================================
    if let Some(attempts) = matches.get_one::<u32>("attempts") {
        config.probe.attempts = *attempts;
    }
    if let Some(key) = matches.get_one::<String>("key") {
        config.probe.key = Some(key.clone());
    }
    if let Some(initial) = matches.get_one::<String>("initial-value") {
        config.probe.initial_value = initial.clone();
    }
    if let Some(prefix) = matches.get_one::<String>("value-prefix") {
        config.probe.value_prefix = prefix.clone();
    }
    if let Some(limit) = matches.get_one::<u64>("max-commit-time-ms") {
        config.probe.max_commit_time_ms = Some(*limit);
    }
    if matches.get_flag("no-sync-start") {
        config.probe.synchronized_start = false;
    }
}

/// Configured key, or a random `task<0..1000>`.
pub fn resolve_key(config: &HarnessConfig) -> String {
    match &config.probe.key {
        Some(key) => key.clone(),
        None => format!("task{}", rand::thread_rng().gen_range(0..1000)),
    }
}
