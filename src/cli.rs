use anyhow::Result;
use clap::{Arg, ArgMatches, Command};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Command line shared by both tools: one positional output folder plus a log level
pub fn build_command(
    name: &'static str,
    about: &'static str,
    output_help: &'static str,
) -> Command {
    Command::new(name)
        .version(env!("CARGO_PKG_VERSION"))
        .about(about)
        .arg(
            Arg::new("output")
                .value_name("OUTPUT")
                .help(output_help)
                .required(true)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("Set the log level (trace, debug, info, warn, error)")
                .default_value("info"),
        )
}

/// Parsed command line arguments
#[derive(Debug, Clone)]
pub struct CliArgs {
    pub output: PathBuf,
    pub log_level: String,
}

impl CliArgs {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let output = matches
            .get_one::<PathBuf>("output")
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Missing output path"))?;

        let log_level = matches
            .get_one::<String>("log-level")
            .cloned()
            .unwrap_or_else(|| "info".to_string());

        Ok(Self { output, log_level })
    }
}

fn parse_level(log_level: &str) -> Level {
    match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Initialize structured logging with tracing
pub fn initialize_logging(log_level: &str) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive(parse_level(log_level).into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    Ok(())
}
