//! Configuration management for the replication core.
//!
//! Provides hierarchical configuration loading with priority:
//! 1. Default values (hardcoded)
//! 2. Optional config file
//! 3. Environment variables (highest priority)

mod raft;
pub use raft::*;

#[cfg(test)]
mod raft_test;

//---
use config::Config;
use config::Environment;
use config::File;
use serde::Deserialize;

use crate::Result;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Core Raft algorithm parameters
    #[serde(default)]
    pub raft: RaftConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            raft: RaftConfig::default(),
        }
    }
}

impl Settings {
    /// Load configuration from an optional TOML file with an environment
    /// variable overlay (prefix `RAFTLET`, `__` separator, e.g.
    /// `RAFTLET__RAFT__ELECTION__ELECTION_TIMEOUT_MS=500`).
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("RAFTLET")
                .separator("__")
                .ignore_empty(true)
                .try_parsing(true),
        );

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.raft.validate()?;
        Ok(settings)
    }
}
