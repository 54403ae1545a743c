//! aqs - Agent Quota Status CLI entry point.

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use aqstat::cli::{Cli, Commands, StatusArgs};
use aqstat::core::logging;
use aqstat::providers::ProviderEnv;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = cli
        .log_level
        .as_deref()
        .and_then(logging::LogLevel::from_arg)
        .or_else(logging::level_from_env)
        .unwrap_or_default();
    let log_format = logging::format_from_env().unwrap_or_default();
    logging::init(log_level, log_format, cli.verbose);

    match run(cli).await {
        Ok(had_failures) => {
            if had_failures {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> aqstat::Result<bool> {
    let no_color = !aqstat::util::env::should_use_color(cli.no_color);

    match cli.command {
        // Status is the default command.
        None => {
            aqstat::cli::status::execute(&StatusArgs::default(), cli.json, cli.pretty, no_color)
                .await
        }
        Some(Commands::Status(args)) => {
            aqstat::cli::status::execute(&args, cli.json, cli.pretty, no_color).await
        }
        Some(Commands::Mcp(args)) => {
            let env = ProviderEnv::from_system();
            aqstat::mcp::serve(env, args.timeout.map(Duration::from_secs)).await?;
            Ok(false)
        }
    }
}
