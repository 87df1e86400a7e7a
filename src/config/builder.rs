//! Configuration builder
//!
//! Merges configuration from files and CLI arguments. Values set on the
//! command line (or through their environment variables) override the file.

use crate::config::{Config, ConfigFile};
use crate::domain::IdentifierKind;
use crate::error::ConfigError;

use std::path::{Path, PathBuf};

/// Builder for merging configuration sources
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Load configuration from a file, or from the default locations
    ///
    /// An explicit path that cannot be read is an error; missing default
    /// files are not.
    pub fn with_file(mut self, path: Option<&Path>) -> Result<Self, ConfigError> {
        let file_config = match path {
            Some(path) => Some(ConfigFile::load(path)?),
            None => ConfigFile::load_default()?,
        };

        if let Some(cfg) = file_config {
            self.config = cfg;
        }

        Ok(self)
    }

    /// Override with CLI API host
    pub fn with_host(mut self, host: Option<String>) -> Self {
        if let Some(h) = host {
            self.config.mist.host = h;
        }
        self
    }

    /// Override with CLI organization ID
    pub fn with_org_id(mut self, org_id: Option<String>) -> Self {
        if let Some(o) = org_id {
            self.config.mist.org_id = Some(o);
        }
        self
    }

    /// Override with CLI API token
    pub fn with_token(mut self, token: Option<String>) -> Self {
        if let Some(t) = token {
            self.config.mist.token = Some(t);
        }
        self
    }

    /// Override with CLI identifier kind
    pub fn with_key(mut self, key: Option<IdentifierKind>) -> Self {
        if let Some(k) = key {
            self.config.input.key = k;
        }
        self
    }

    /// Override with CLI baseline path
    pub fn with_input_path(mut self, path: Option<PathBuf>) -> Self {
        if let Some(p) = path {
            self.config.input.path = p;
        }
        self
    }

    /// Override with CLI export flag
    pub fn with_export(mut self, export: bool) -> Self {
        if export {
            self.config.output.export = true;
        }
        self
    }

    /// Override with CLI export path, which also turns export on
    pub fn with_output_path(mut self, path: Option<PathBuf>) -> Self {
        if let Some(p) = path {
            self.config.output.path = p;
            self.config.output.export = true;
        }
        self
    }

    /// Override with CLI hide flag
    pub fn with_hide_table(mut self, hide: bool) -> Self {
        if hide {
            self.config.output.hide_table = true;
        }
        self
    }

    /// Build the final configuration
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
