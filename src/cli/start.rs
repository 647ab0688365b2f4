use crate::cli::{actions::Action, commands, dispatch, telemetry};
use anyhow::Result;
use clap::ArgMatches;

/// Map verbosity count to tracing level
const fn get_verbosity_level(verbosity: u8) -> tracing::Level {
    match verbosity {
        0 => tracing::Level::ERROR,
        1 => tracing::Level::WARN,
        2 => tracing::Level::INFO,
        3 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    }
}

/// `-v` is global, so it lands on the subcommand matches when given after it.
fn verbosity(matches: &ArgMatches) -> u8 {
    let top = matches
        .get_one::<u8>(commands::logging::ARG_VERBOSITY)
        .copied()
        .unwrap_or(0);
    let sub = matches
        .subcommand()
        .and_then(|(_, sub_m)| sub_m.get_one::<u8>(commands::logging::ARG_VERBOSITY).copied())
        .unwrap_or(0);
    top.max(sub)
}

/// Main entry point for the CLI - builds and returns the Action
///
/// # Errors
///
/// Returns an error if argument parsing, telemetry initialization, or action dispatch fails
pub fn start() -> Result<Action> {
    // 1. Parse command-line arguments
    let matches = commands::new().get_matches();

    // 2. Initialize telemetry
    telemetry::init(get_verbosity_level(verbosity(&matches)))?;

    // 3. Dispatch to appropriate action
    let action = dispatch::handler(&matches)?;

    Ok(action)
}
