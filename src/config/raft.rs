use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// Configuration parameters for the replication core.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RaftConfig {
    /// Configuration settings related to log replication
    #[serde(default)]
    pub replication: ReplicationConfig,

    /// Configuration settings for election timing
    #[serde(default)]
    pub election: ElectionConfig,

    /// Configuration settings for the snapshot advisory policy
    #[serde(default)]
    pub snapshot: SnapshotConfig,
}

impl Default for RaftConfig {
    fn default() -> Self {
        Self {
            replication: ReplicationConfig::default(),
            election: ElectionConfig::default(),
            snapshot: SnapshotConfig::default(),
        }
    }
}

impl RaftConfig {
    /// Validates all subsystem configurations
    pub fn validate(&self) -> Result<()> {
        self.replication.validate()?;
        self.election.validate()?;
        self.snapshot.validate()?;
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ReplicationConfig {
    /// Interval (in milliseconds) between leader replication rounds.
    /// Every peer receives an AppendEntries message (possibly empty) once
    /// per interval, which doubles as the heartbeat.
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_ms: u64,

    /// Maximum number of log entries carried by a single AppendEntries
    /// request. Lagging peers catch up over multiple rounds.
    #[serde(default = "default_max_entries_per_append")]
    pub max_entries_per_append: u64,
}

impl Default for ReplicationConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval_ms: default_heartbeat_interval(),
            max_entries_per_append: default_max_entries_per_append(),
        }
    }
}

impl ReplicationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.heartbeat_interval_ms == 0 {
            return Err(Error::Config(ConfigError::Message(
                "heartbeat_interval_ms must be greater than 0".into(),
            )));
        }
        if self.max_entries_per_append == 0 {
            return Err(Error::Config(ConfigError::Message(
                "max_entries_per_append must be greater than 0".into(),
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ElectionConfig {
    /// Base election timeout (in milliseconds). The effective timeout is
    /// randomized within [timeout, 2 * timeout) to avoid split votes.
    #[serde(default = "default_election_timeout")]
    pub election_timeout_ms: u64,
}

impl Default for ElectionConfig {
    fn default() -> Self {
        Self {
            election_timeout_ms: default_election_timeout(),
        }
    }
}

impl ElectionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.election_timeout_ms == 0 {
            return Err(Error::Config(ConfigError::Message(
                "election_timeout_ms must be greater than 0".into(),
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SnapshotConfig {
    /// Advisory threshold: once this many committed entries sit above the
    /// compaction boundary, `snapshot_recommended()` reports true. The
    /// caller still drives the actual begin/poll/end sequence.
    #[serde(default = "default_snapshot_threshold")]
    pub log_entries_threshold: u64,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            log_entries_threshold: default_snapshot_threshold(),
        }
    }
}

impl SnapshotConfig {
    pub fn validate(&self) -> Result<()> {
        if self.log_entries_threshold == 0 {
            return Err(Error::Config(ConfigError::Message(
                "log_entries_threshold must be greater than 0".into(),
            )));
        }
        Ok(())
    }
}

// in ms
fn default_heartbeat_interval() -> u64 {
    200
}
// in ms
fn default_election_timeout() -> u64 {
    1000
}
fn default_max_entries_per_append() -> u64 {
    64
}
fn default_snapshot_threshold() -> u64 {
    5000
}
