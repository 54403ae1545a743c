//! Configuration file loading.
//!
//! Loads `config.toml` from the platform config directory
//! (`~/.config/aqstat/config.toml` on Linux/macOS). Settings resolve with
//! the usual precedence: CLI flags, then environment variables, then the
//! config file, then built-in defaults.
//!
//! ## Environment Variables
//!
//! - `AQSTAT_PROVIDERS`: comma-separated provider list (e.g. "claude,codex")
//! - `AQSTAT_TIMEOUT`: default timeout in seconds

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::provider::{Provider, parse_provider_list};
use crate::error::{AqError, Result};

/// Environment variable for comma-separated provider list.
pub const ENV_PROVIDERS: &str = "AQSTAT_PROVIDERS";
/// Environment variable for timeout in seconds.
pub const ENV_TIMEOUT: &str = "AQSTAT_TIMEOUT";

/// On-disk configuration file contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Providers to query by default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub providers: Option<Vec<String>>,

    /// Per-provider timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
}

impl FileConfig {
    /// Load from a TOML file; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                AqError::Config(format!("{}: {e}", path.display()))
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Fully resolved configuration.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Providers to query, in request order.
    pub providers: Vec<Provider>,
    /// Per-provider timeout override, when any layer set one.
    pub timeout: Option<Duration>,
}

impl ResolvedConfig {
    /// Merge CLI values over environment variables over the config file.
    pub fn resolve(
        cli_providers: Option<&str>,
        cli_timeout: Option<u64>,
        file: &FileConfig,
    ) -> Result<Self> {
        let providers = if let Some(arg) = cli_providers {
            parse_provider_list(Some(arg))?
        } else if let Ok(env_arg) = std::env::var(ENV_PROVIDERS) {
            parse_provider_list(Some(&env_arg))?
        } else if let Some(file_list) = &file.providers {
            parse_provider_list(Some(&file_list.join(",")))?
        } else {
            Provider::ALL.to_vec()
        };

        let timeout_secs = cli_timeout
            .or_else(|| {
                std::env::var(ENV_TIMEOUT)
                    .ok()
                    .and_then(|v| v.trim().parse().ok())
            })
            .or(file.timeout_seconds);

        Ok(Self {
            providers,
            timeout: timeout_secs.map(Duration::from_secs),
        })
    }
}
