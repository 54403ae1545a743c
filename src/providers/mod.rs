//! Per-provider quota fetchers.
//!
//! Each fetcher is read-only: it loads credentials from the local store,
//! calls the vendor's quota endpoint, and reduces the response to
//! [`UsageData`]. Vendor-level failures are converted to structured errors
//! at this boundary so the classifier never sees a raw exception.

pub mod claude;
pub mod codex;
pub mod copilot;
pub mod gemini;

use std::path::PathBuf;
use std::time::Duration;

use crate::core::models::UsageData;
use crate::core::provider::Provider;
use crate::error::Result;

pub use gemini::TokenCache;

/// Credential locations and endpoint overrides for provider fetchers.
///
/// Passed explicitly into every fetch so tests can point providers at a
/// temp home directory and a mock HTTP server without touching process
/// globals.
#[derive(Debug, Clone)]
pub struct ProviderEnv {
    /// Home directory holding the per-provider credential files.
    pub home: PathBuf,
    /// Anthropic API base URL.
    pub claude_api_base: String,
    /// ChatGPT backend base URL.
    pub codex_api_base: String,
    /// Cloud Code quota API base URL.
    pub gemini_api_base: String,
    /// Google OAuth token endpoint.
    pub google_token_url: String,
    /// GitHub API base URL.
    pub github_api_base: String,
    /// Per-process cache for refreshed Gemini access tokens.
    pub gemini_tokens: TokenCache,
}

impl ProviderEnv {
    /// Environment pointing at the real vendor endpoints and the user's
    /// home directory.
    #[must_use]
    pub fn from_system() -> Self {
        let home = directories::BaseDirs::new()
            .map_or_else(|| PathBuf::from("."), |d| d.home_dir().to_path_buf());
        Self::with_home(home)
    }

    /// Environment with real endpoints but a custom home directory.
    #[must_use]
    pub fn with_home(home: PathBuf) -> Self {
        Self {
            home,
            claude_api_base: "https://api.anthropic.com".to_string(),
            codex_api_base: "https://chatgpt.com".to_string(),
            gemini_api_base: "https://cloudcode-pa.googleapis.com".to_string(),
            google_token_url: "https://oauth2.googleapis.com/token".to_string(),
            github_api_base: "https://api.github.com".to_string(),
            gemini_tokens: TokenCache::default(),
        }
    }

    /// Absolute path of a provider's credential file.
    #[must_use]
    pub fn credentials_file(&self, provider: Provider) -> PathBuf {
        self.home.join(provider.credentials_path())
    }
}

/// Fetch quota data for one provider.
pub async fn fetch(
    provider: Provider,
    env: &ProviderEnv,
    timeout: Duration,
) -> Result<Option<UsageData>> {
    match provider {
        Provider::Claude => claude::fetch(env, timeout).await,
        Provider::Codex => codex::fetch(env, timeout).await,
        Provider::Gemini => gemini::fetch(env, timeout).await,
        Provider::Copilot => copilot::fetch(env, timeout).await,
    }
}
