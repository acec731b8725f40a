//! Clap command tree.

use clap::{Arg, ArgAction, Command};

/// Build the `contend` command.
pub fn build_cli() -> Command {
    Command::new("contend")
        .about("Concurrent write-conflict probe for optimistic-transaction document stores")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("FILE")
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("uri")
                .long("uri")
                .value_name("URI")
                .help("Store endpoint (memory://<host>)"),
        )
        .arg(
            Arg::new("database")
                .long("database")
                .value_name("NAME")
                .help("Database name"),
        )
        .arg(
            Arg::new("collection")
                .long("collection")
                .value_name("NAME")
                .help("Collection name"),
        )
        .arg(
            Arg::new("commit-latency-ms")
                .long("commit-latency-ms")
                .value_name("MS")
                .value_parser(clap::value_parser!(u64))
                .help("Simulated latency between staging and commit"),
        )
        .arg(
            Arg::new("attempts")
                .long("attempts")
                .short('n')
                .value_name("N")
                .value_parser(clap::value_parser!(u32))
                .help("Number of concurrent attempts"),
        )
        .arg(
            Arg::new("key")
                .long("key")
                .short('k')
                .value_name("KEY")
                .help("Record key (default: random task<0..1000>)"),
        )
        .arg(
            Arg::new("initial-value")
                .long("initial-value")
                .value_name("VALUE")
                .help("Value the record is seeded with"),
        )
        .arg(
            Arg::new("value-prefix")
                .long("value-prefix")
                .value_name("PREFIX")
                .help("Prefix of each attempt's candidate value"),
        )
        .arg(
            Arg::new("max-commit-time-ms")
                .long("max-commit-time-ms")
                .value_name("MS")
                .value_parser(clap::value_parser!(u64))
                .help("Per-attempt transaction time limit"),
        )
        .arg(
            Arg::new("no-sync-start")
                .long("no-sync-start")
                .action(ArgAction::SetTrue)
                .help("Start each attempt as soon as its thread is spawned"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Print the report as JSON"),
        )
}
