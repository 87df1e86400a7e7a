//! Configuration system
//!
//! Handles TOML config file parsing and CLI argument merging.

pub mod builder;
pub mod file;

pub use builder::ConfigBuilder;
pub use file::ConfigFile;

use crate::domain::IdentifierKind;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default Mist API host
pub const DEFAULT_HOST: &str = "api.mist.com";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Mist API connection settings
    pub mist: MistConfig,
    /// Baseline input settings
    pub input: InputConfig,
    /// Export settings
    pub output: OutputConfig,
}

/// Mist API connection settings
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MistConfig {
    /// API host or full base URL
    pub host: String,
    /// Organization ID
    pub org_id: Option<String>,
    /// API token
    pub token: Option<String>,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for MistConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            org_id: None,
            token: None,
            timeout_seconds: 30,
        }
    }
}

// Keeps the token out of debug logs
impl std::fmt::Debug for MistConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MistConfig")
            .field("host", &self.host)
            .field("org_id", &self.org_id)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl MistConfig {
    /// Organization ID, required for any API access
    pub fn require_org_id(&self) -> Result<&str, ConfigError> {
        self.org_id
            .as_deref()
            .filter(|o| !o.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingField("org_id (--org / MIST_ORG_ID)".to_string()))
    }

    /// API token, required for any API access
    pub fn require_token(&self) -> Result<&str, ConfigError> {
        self.token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingField("token (--token / MIST_API_TOKEN)".to_string()))
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Baseline input settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Baseline CSV path
    pub path: PathBuf,
    /// Identifier used to match switches
    pub key: IdentifierKind,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./switches.csv"),
            key: IdentifierKind::default(),
        }
    }
}

/// Export settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Write results to CSV
    pub export: bool,
    /// Export CSV path
    pub path: PathBuf,
    /// Suppress the console table
    pub hide_table: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            export: false,
            path: PathBuf::from("./checked_switches.csv"),
            hide_table: false,
        }
    }
}
