//! Configuration for dockv
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{DocError, Result};

/// Main configuration for a dockv instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Directory holding both logs
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── storage   (length-prefixed values)
    ///     └── index     (key records pointing into storage)
    pub data_dir: PathBuf,

    // -------------------------------------------------------------------------
    // Durability Configuration
    // -------------------------------------------------------------------------
    /// Which fence to issue after every log mutation
    pub sync_mode: SyncMode,
}

/// Durability fence issued after each log write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncMode {
    /// `fdatasync`: file contents and the metadata needed to read them back
    #[default]
    Data,

    /// `fsync`: contents plus all file metadata (slower)
    All,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./dockv_data"),
            sync_mode: SyncMode::default(),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reject configurations the engine cannot start with
    pub fn validate(&self) -> Result<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(DocError::Config("data_dir must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (holds both logs)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the durability fence used after each write
    pub fn sync_mode(mut self, mode: SyncMode) -> Self {
        self.config.sync_mode = mode;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
