//! Configuration types for the save-game adapter

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, SaveError};

/// Remote endpoint variable
pub const URL_ENV: &str = "SUPABASE_URL";
/// Remote credential variable
pub const ANON_KEY_ENV: &str = "SUPABASE_ANON_KEY";
/// Directory of the local fallback store
pub const LOCAL_DIR_ENV: &str = "SAVEGAME_LOCAL_DIR";
/// Optional request timeout for the remote client, in seconds
pub const TIMEOUT_ENV: &str = "SUPABASE_TIMEOUT_SECS";

/// Default directory for the local fallback store
pub const DEFAULT_LOCAL_DIR: &str = ".savegame";

/// Credentials for the remote table store
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RemoteConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    pub url: String,

    /// Anonymous (public) API key
    pub anon_key: String,

    /// Request timeout. `None` leaves the HTTP client's default (no timeout).
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl RemoteConfig {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            anon_key: anon_key.into(),
            timeout_secs: None,
        }
    }

    /// Both the URL and the key are non-blank
    pub fn is_complete(&self) -> bool {
        !self.url.trim().is_empty() && !self.anon_key.trim().is_empty()
    }

    /// Builder: set request timeout
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}

// The key is a credential; keep it out of logs.
impl std::fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("url", &self.url)
            .field("anon_key", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Everything needed to build a `SaveAdapter`.
///
/// `remote == None` means offline mode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdapterConfig {
    #[serde(default)]
    pub remote: Option<RemoteConfig>,

    #[serde(default = "default_local_dir")]
    pub local_dir: PathBuf,
}

fn default_local_dir() -> PathBuf {
    PathBuf::from(DEFAULT_LOCAL_DIR)
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            remote: None,
            local_dir: default_local_dir(),
        }
    }
}

impl AdapterConfig {
    /// Offline configuration backed by `local_dir`
    pub fn offline(local_dir: impl Into<PathBuf>) -> Self {
        Self {
            remote: None,
            local_dir: local_dir.into(),
        }
    }

    /// Online configuration with a local fallback in `local_dir`
    pub fn online(remote: RemoteConfig, local_dir: impl Into<PathBuf>) -> Self {
        Self {
            remote: Some(remote),
            local_dir: local_dir.into(),
        }
    }

    /// Read configuration from process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// The remote half is only present when both the URL and the key are
    /// set to non-blank values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let timeout_secs = match get(TIMEOUT_ENV) {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|e| {
                SaveError::Config(format!("{} must be a whole number of seconds: {}", TIMEOUT_ENV, e))
            })?),
            None => None,
        };

        let remote = match (get(URL_ENV), get(ANON_KEY_ENV)) {
            (Some(url), Some(anon_key)) => Some(RemoteConfig {
                url,
                anon_key,
                timeout_secs,
            }),
            _ => None,
        };

        let local_dir = get(LOCAL_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(default_local_dir);

        Ok(Self { remote, local_dir })
    }

    /// Load configuration from a JSON file.
    ///
    /// A remote section with a blank URL or key is dropped, same as unset
    /// environment variables.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = serde_json::from_str(&content)?;
        config.remote = config.remote.filter(RemoteConfig::is_complete);
        Ok(config)
    }

    pub fn is_offline(&self) -> bool {
        self.remote.is_none()
    }
}
