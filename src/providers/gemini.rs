//! Gemini (Google Cloud Code) provider.
//!
//! Reads OAuth credentials from `~/.gemini/oauth_creds.json`, refreshing
//! the access token through Google's token endpoint when expired. The
//! quota endpoint returns per-model buckets, which map onto independent
//! quota tracks rather than time windows.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::http::{build_client, transport_error};
use crate::core::models::{ModelQuota, QuotaData, UsageData};
use crate::error::{AqError, Result};
use crate::providers::ProviderEnv;

const PROVIDER: &str = "gemini";

/// Quota endpoint path under the Cloud Code base.
const QUOTA_PATH: &str = "/v1internal:retrieveUserQuota";

/// OAuth client registered by the Gemini CLI.
const CLIENT_ID: &str = "681255809395-oo8ft2oprdrnp9e3aqf6av3hmdib135j.apps.googleusercontent.com";
const CLIENT_SECRET: &str = "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";

/// Safety margin before actual expiry to trigger a refresh.
const EXPIRY_MARGIN_MS: i64 = 60_000;

// =============================================================================
// Token Cache
// =============================================================================

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at_ms: i64,
}

/// Per-process cache of a refreshed access token.
///
/// Injected through [`ProviderEnv`] instead of living in a process-wide
/// static, so tests start from fresh state.
#[derive(Debug, Clone, Default)]
pub struct TokenCache {
    inner: Arc<Mutex<Option<CachedToken>>>,
}

impl TokenCache {
    fn get_fresh(&self) -> Option<String> {
        let guard = self.inner.lock().ok()?;
        guard.as_ref().and_then(|cached| {
            if cached.expires_at_ms > Utc::now().timestamp_millis() + EXPIRY_MARGIN_MS {
                Some(cached.access_token.clone())
            } else {
                None
            }
        })
    }

    fn store(&self, access_token: String, expires_at_ms: i64) {
        if let Ok(mut guard) = self.inner.lock() {
            *guard = Some(CachedToken {
                access_token,
                expires_at_ms,
            });
        }
    }
}

// =============================================================================
// Credentials
// =============================================================================

/// `~/.gemini/oauth_creds.json` structure.
#[derive(Debug, Deserialize, Serialize)]
struct OauthCreds {
    #[serde(default)]
    access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    /// Expiry as epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expiry_date: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct TokenRefreshResponse {
    access_token: String,
    /// Lifetime in seconds.
    expires_in: i64,
}

fn is_expired(expiry_date: Option<i64>) -> bool {
    expiry_date.is_none_or(|ms| Utc::now().timestamp_millis() + EXPIRY_MARGIN_MS >= ms)
}

fn read_credentials(env: &ProviderEnv) -> Result<OauthCreds> {
    let path = env.credentials_file(crate::core::provider::Provider::Gemini);

    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(AqError::NoCredentials {
                provider: PROVIDER.to_string(),
            });
        }
        Err(err) => return Err(err.into()),
    };

    let creds: OauthCreds =
        serde_json::from_str(&content).map_err(|e| AqError::Parse(e.to_string()))?;

    if creds.access_token.is_empty() && creds.refresh_token.is_none() {
        return Err(AqError::NoCredentials {
            provider: PROVIDER.to_string(),
        });
    }

    Ok(creds)
}

/// Resolve a usable access token, refreshing through Google when needed.
async fn resolve_access_token(env: &ProviderEnv, timeout: Duration) -> Result<String> {
    if let Some(token) = env.gemini_tokens.get_fresh() {
        return Ok(token);
    }

    let mut creds = read_credentials(env)?;
    if !creds.access_token.is_empty() && !is_expired(creds.expiry_date) {
        return Ok(creds.access_token);
    }

    let Some(refresh_token) = creds.refresh_token.clone() else {
        return Err(AqError::TokenExpired {
            provider: PROVIDER.to_string(),
        });
    };

    let client = build_client(timeout)?;
    let response = client
        .post(&env.google_token_url)
        .form(&[
            ("client_id", CLIENT_ID),
            ("client_secret", CLIENT_SECRET),
            ("refresh_token", refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ])
        .send()
        .await
        .map_err(|e| transport_error(&e, timeout))?;

    let status = response.status();
    if !status.is_success() {
        // A rejected refresh grant means the stored login is stale.
        if status.as_u16() == 400 || status.as_u16() == 401 {
            return Err(AqError::TokenExpired {
                provider: PROVIDER.to_string(),
            });
        }
        let body = response.text().await.unwrap_or_default();
        return Err(AqError::from_http_status(PROVIDER, status.as_u16(), &body));
    }

    let refreshed: TokenRefreshResponse = response
        .json()
        .await
        .map_err(|e| AqError::Parse(e.to_string()))?;

    let expires_at_ms = Utc::now().timestamp_millis() + refreshed.expires_in * 1000;
    env.gemini_tokens
        .store(refreshed.access_token.clone(), expires_at_ms);

    // Best-effort write-back so the next process skips the refresh.
    creds.access_token = refreshed.access_token.clone();
    creds.expiry_date = Some(expires_at_ms);
    write_back(env, &creds);

    Ok(refreshed.access_token)
}

fn write_back(env: &ProviderEnv, creds: &OauthCreds) {
    let path = env.credentials_file(crate::core::provider::Provider::Gemini);
    match serde_json::to_string_pretty(creds) {
        Ok(json) => {
            if let Err(err) = std::fs::write(&path, json) {
                tracing::debug!(error = %err, "could not write back refreshed gemini token");
            }
        }
        Err(err) => tracing::debug!(error = %err, "could not serialize refreshed gemini token"),
    }
}

// =============================================================================
// Fetch
// =============================================================================

#[derive(Debug, Deserialize)]
struct QuotaResponse {
    #[serde(default)]
    buckets: Vec<QuotaBucket>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuotaBucket {
    remaining_fraction: Option<f64>,
    reset_time: Option<String>,
    model_id: Option<String>,
}

/// Fetch Gemini per-model quota buckets.
pub async fn fetch(env: &ProviderEnv, timeout: Duration) -> Result<Option<UsageData>> {
    let token = resolve_access_token(env, timeout).await?;
    let client = build_client(timeout)?;

    let url = format!("{}{QUOTA_PATH}", env.gemini_api_base);
    let response = client
        .post(&url)
        .header("Authorization", format!("Bearer {token}"))
        .header("Content-Type", "application/json")
        .body("{}")
        .send()
        .await
        .map_err(|e| transport_error(&e, timeout))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AqError::from_http_status(PROVIDER, status.as_u16(), &body));
    }

    let data: QuotaResponse = response
        .json()
        .await
        .map_err(|e| AqError::Parse(e.to_string()))?;

    Ok(parse_buckets(&data))
}

fn parse_buckets(data: &QuotaResponse) -> Option<UsageData> {
    let models: std::collections::BTreeMap<String, ModelQuota> = data
        .buckets
        .iter()
        .filter_map(|bucket| {
            let model_id = bucket.model_id.clone()?;
            let remaining = bucket.remaining_fraction.unwrap_or(1.0);
            let resets_at = bucket
                .reset_time
                .as_deref()
                .and_then(|s| s.parse::<DateTime<Utc>>().ok());
            Some((
                model_id,
                ModelQuota {
                    used_percent: (1.0 - remaining) * 100.0,
                    resets_at,
                },
            ))
        })
        .collect();

    if models.is_empty() {
        return None;
    }

    Some(UsageData::new(QuotaData::PerModel { models }))
}
