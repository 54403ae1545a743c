//! Provider identifiers and metadata.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AqError, Result};

/// Supported AI coding-assistant providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Claude,
    Codex,
    Gemini,
    Copilot,
}

impl Provider {
    /// All providers in display order.
    pub const ALL: &'static [Self] = &[Self::Claude, Self::Codex, Self::Gemini, Self::Copilot];

    /// CLI name for this provider.
    #[must_use]
    pub const fn cli_name(self) -> &'static str {
        match self {
            Self::Claude => "claude",
            Self::Codex => "codex",
            Self::Gemini => "gemini",
            Self::Copilot => "copilot",
        }
    }

    /// Display name for human output.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Claude => "Claude",
            Self::Codex => "Codex",
            Self::Gemini => "Gemini",
            Self::Copilot => "Copilot",
        }
    }

    /// Parse from CLI argument.
    pub fn from_cli_name(name: &str) -> Result<Self> {
        let lower = name.trim().to_lowercase();
        Self::ALL
            .iter()
            .find(|p| p.cli_name() == lower)
            .copied()
            .ok_or_else(|| AqError::InvalidProvider(name.to_string()))
    }

    /// Default timeout for this provider's fetch.
    #[must_use]
    pub const fn default_timeout(self) -> Duration {
        match self {
            // Gemini may need an OAuth refresh round-trip first
            Self::Gemini => Duration::from_secs(20),
            _ => Duration::from_secs(15),
        }
    }

    /// Credentials file path for this provider (relative to home).
    #[must_use]
    pub const fn credentials_path(self) -> &'static str {
        match self {
            Self::Claude => ".claude/.credentials.json",
            Self::Codex => ".codex/auth.json",
            Self::Gemini => ".gemini/oauth_creds.json",
            Self::Copilot => ".config/github-copilot/apps.json",
        }
    }
}

/// Parse a comma-separated provider list, or `all`.
///
/// An empty/absent argument also means all providers.
pub fn parse_provider_list(arg: Option<&str>) -> Result<Vec<Provider>> {
    match arg {
        None => Ok(Provider::ALL.to_vec()),
        Some(s) if s.trim().is_empty() || s.trim().eq_ignore_ascii_case("all") => {
            Ok(Provider::ALL.to_vec())
        }
        Some(s) => {
            let mut providers = Vec::new();
            for part in s.split(',') {
                let provider = Provider::from_cli_name(part)?;
                if !providers.contains(&provider) {
                    providers.push(provider);
                }
            }
            Ok(providers)
        }
    }
}
