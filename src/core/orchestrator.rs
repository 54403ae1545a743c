//! Concurrent provider fetch orchestration.
//!
//! Issues all requested providers' fetches at once and waits for every
//! one to settle before building results. Each fetch carries its own
//! timeout; a timeout surfaces as a classified result, never a crash, and
//! one provider's failure never prevents the others from reporting.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::timeout;

use super::models::{GlobalSummary, ProviderResult};
use super::outcome::classify_outcome;
use super::provider::Provider;
use super::summary::summarize;
use crate::error::AqError;
use crate::providers::{self, ProviderEnv};

/// Options for an orchestrated fetch.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Providers to query, in request order.
    pub providers: Vec<Provider>,
    /// Per-provider timeout override; each provider's default otherwise.
    pub timeout: Option<Duration>,
    /// Credential locations and endpoint overrides.
    pub env: ProviderEnv,
}

/// Everything one orchestrated fetch produced.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaReport {
    pub results: BTreeMap<Provider, ProviderResult>,
    pub summary: GlobalSummary,
    pub generated_at: DateTime<Utc>,
}

impl QuotaReport {
    /// Whether any provider failed hard. The CLI derives its exit code
    /// from this without re-scanning the result map.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.results.values().any(ProviderResult::is_error)
    }
}

/// Fetch all requested providers concurrently and classify every outcome.
pub async fn fetch_all(options: &FetchOptions) -> QuotaReport {
    let now = Utc::now();

    let futures: Vec<_> = options
        .providers
        .iter()
        .map(|&provider| fetch_one(provider, options, now))
        .collect();

    let results: BTreeMap<Provider, ProviderResult> =
        futures::future::join_all(futures).await.into_iter().collect();

    let summary = summarize(results.values());

    QuotaReport {
        results,
        summary,
        generated_at: now,
    }
}

async fn fetch_one(
    provider: Provider,
    options: &FetchOptions,
    now: DateTime<Utc>,
) -> (Provider, ProviderResult) {
    let per_fetch_timeout = options.timeout.unwrap_or_else(|| provider.default_timeout());

    tracing::debug!(
        provider = provider.cli_name(),
        timeout_s = per_fetch_timeout.as_secs(),
        "starting fetch"
    );

    let outcome = match timeout(
        per_fetch_timeout,
        providers::fetch(provider, &options.env, per_fetch_timeout),
    )
    .await
    {
        Ok(result) => result,
        Err(_) => Err(AqError::Timeout {
            seconds: per_fetch_timeout.as_secs(),
        }),
    };

    match &outcome {
        Ok(Some(_)) => tracing::info!(provider = provider.cli_name(), "fetch succeeded"),
        Ok(None) => tracing::info!(provider = provider.cli_name(), "fetch returned no data"),
        Err(e) => tracing::warn!(provider = provider.cli_name(), error = %e, "fetch failed"),
    }

    (provider, classify_outcome(outcome, now))
}
