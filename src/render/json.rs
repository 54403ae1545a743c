//! JSON output envelope.
//!
//! Preserves every field of each provider result (`status`, `reason`,
//! `error`, `data`, `display`) plus the global summary, wrapped in a
//! schema-versioned envelope.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::models::{GlobalSummary, ProviderResult};
use crate::core::orchestrator::QuotaReport;
use crate::error::Result;

/// Current output schema version.
pub const SCHEMA_VERSION: &str = "aqstat.v1";

/// Top-level JSON envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<'a> {
    schema_version: &'static str,
    generated_at: DateTime<Utc>,
    providers: BTreeMap<&'a str, &'a ProviderResult>,
    summary: &'a GlobalSummary,
}

impl<'a> Envelope<'a> {
    fn from_report(report: &'a QuotaReport) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            generated_at: report.generated_at,
            providers: report
                .results
                .iter()
                .map(|(provider, result)| (provider.cli_name(), result))
                .collect(),
            summary: &report.summary,
        }
    }
}

/// Render a report as compact JSON.
pub fn render_json(report: &QuotaReport) -> Result<String> {
    Ok(serde_json::to_string(&Envelope::from_report(report))?)
}

/// Render a report as pretty-printed JSON.
pub fn render_json_pretty(report: &QuotaReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(&Envelope::from_report(report))?)
}
