//! Status command implementation.

use chrono::Utc;

use crate::cli::args::StatusArgs;
use crate::core::orchestrator::{FetchOptions, QuotaReport, fetch_all};
use crate::core::rows::build_rows;
use crate::error::Result;
use crate::providers::ProviderEnv;
use crate::render::{json, table};
use crate::storage::{AppPaths, FileConfig, ResolvedConfig};

/// Execute the status command. Returns whether any provider failed hard,
/// which drives the process exit code.
pub async fn execute(args: &StatusArgs, use_json: bool, pretty: bool, no_color: bool) -> Result<bool> {
    let file_config = FileConfig::load(&AppPaths::new().config_file())?;
    let config = ResolvedConfig::resolve(args.providers.as_deref(), args.timeout, &file_config)?;

    let options = FetchOptions {
        providers: config.providers.clone(),
        timeout: config.timeout,
        env: ProviderEnv::from_system(),
    };

    tracing::debug!(providers = ?options.providers, "starting status fetch");

    let report = fetch_all(&options).await;
    render_report(&report, &options, use_json, pretty, no_color)?;

    Ok(report.has_failures())
}

fn render_report(
    report: &QuotaReport,
    options: &FetchOptions,
    use_json: bool,
    pretty: bool,
    no_color: bool,
) -> Result<()> {
    if use_json {
        let output = if pretty {
            json::render_json_pretty(report)?
        } else {
            json::render_json(report)?
        };
        println!("{output}");
    } else {
        let rows = build_rows(&report.results, &options.providers, Utc::now());
        print!("{}", table::render_table(&rows, &report.summary, no_color));
    }
    Ok(())
}
