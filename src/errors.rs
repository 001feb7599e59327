//! Raft Consensus Core Error Hierarchy
//!
//! Defines error types for the replication core, categorized by protocol
//! layer and operational concerns. Every failure is local and synchronous:
//! the state machine is left unchanged when an operation returns an error.

use config::ConfigError;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Log storage failures (missing or compacted entries, empty log)
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Node configuration validation failures
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Raft consensus protocol violations and failures
    #[error(transparent)]
    Consensus(#[from] ConsensusError),
}

#[derive(Debug, thiserror::Error)]
pub enum ConsensusError {
    /// Log replication failures (Section 5.3 Raft paper)
    #[error(transparent)]
    Replication(#[from] ReplicationError),

    /// Snapshot compaction and installation failures
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    /// Commit application failures
    #[error(transparent)]
    Apply(#[from] ApplyError),
}

#[derive(Debug, thiserror::Error)]
pub enum ReplicationError {
    /// Node not in leader state for replication requests
    #[error("Replication requires leader role")]
    NotLeader,

    /// Missing peer record in the node registry
    #[error("No peer record for node {node_id}")]
    UnknownPeer { node_id: u32 },

    /// Commit index may never exceed the highest log index
    #[error("Commit index {requested} exceeds last log index {last_index}")]
    CommitBeyondLog { requested: u64, last_index: u64 },
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Mode-conflict rejection: client entries are refused while a
    /// compaction is active. Recoverable by retrying after `end_snapshot`.
    #[error("Snapshot in progress, entry submission rejected")]
    InProgress,

    /// Idempotency signal: the requested boundary is already installed.
    /// Callers should treat this as success rather than failure.
    #[error("Snapshot with boundary (index: {index}, term: {term}) already loaded")]
    AlreadyLoaded { index: u64, term: u64 },

    /// `begin_snapshot` with no committed-but-uncaptured entries
    #[error("No committed entries available to compact")]
    NothingToCompact,

    /// Compacting everything eligible would leave the log empty; at least
    /// one entry beyond the commit index must remain as the continuity
    /// anchor for `base_term` derivation.
    #[error("No entry beyond commit index {commit_index} to anchor the new boundary")]
    NoAnchorEntry { commit_index: u64 },

    /// `end_snapshot` / `end_load_snapshot` without a matching begin
    #[error("No snapshot operation in progress")]
    NotInProgress,

    /// A compaction or installation is already mid-flight
    #[error("Another snapshot operation is already in progress")]
    OperationPending,

    /// Zero index or zero term is not a valid snapshot boundary
    #[error("Invalid snapshot boundary (index: {index}, term: {term})")]
    InvalidBoundary { index: u64, term: u64 },

    /// The node has already applied past the proposed boundary
    #[error("Snapshot boundary {index} is stale (last applied: {last_applied})")]
    StaleBoundary { index: u64, last_applied: u64 },

    /// The log already holds entries beyond the proposed boundary;
    /// installing would discard accepted history
    #[error("Log is ahead of snapshot boundary {index} (last log index: {last_index})")]
    LogAheadOfBoundary { index: u64, last_index: u64 },
}

#[derive(Debug, thiserror::Error)]
pub enum ApplyError {
    /// No unapplied committed entry exists, or the apply frontier is frozen
    /// by an active compaction
    #[error("Nothing to apply")]
    NothingToApply,
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Poll attempted on a log with no physically present entries
    #[error("Log holds no physically present entries")]
    EmptyLog,

    /// The requested index sits at or below the compaction boundary
    #[error("Entry {index} was compacted (base index: {base_index})")]
    Compacted { index: u64, base_index: u64 },

    /// The requested index is beyond the highest appended entry
    #[error("Entry {index} not found (last index: {last_index})")]
    OutOfRange { index: u64, last_index: u64 },

    /// Serialization failures for persisted hard state
    #[error(transparent)]
    BincodeError(#[from] bincode::Error),
}

// ============== Conversion Implementations ============== //
impl From<ReplicationError> for Error {
    fn from(e: ReplicationError) -> Self {
        Error::Consensus(ConsensusError::Replication(e))
    }
}

impl From<SnapshotError> for Error {
    fn from(e: SnapshotError) -> Self {
        Error::Consensus(ConsensusError::Snapshot(e))
    }
}

impl From<ApplyError> for Error {
    fn from(e: ApplyError) -> Self {
        Error::Consensus(ConsensusError::Apply(e))
    }
}

impl From<bincode::Error> for Error {
    fn from(e: bincode::Error) -> Self {
        Error::Storage(StorageError::BincodeError(e))
    }
}

impl Error {
    /// True when the error is the distinguished idempotency signal for a
    /// snapshot boundary that is already installed.
    pub fn is_snapshot_already_loaded(&self) -> bool {
        matches!(
            self,
            Error::Consensus(ConsensusError::Snapshot(SnapshotError::AlreadyLoaded { .. }))
        )
    }

    /// True when the error is the retriable mode-conflict rejection raised
    /// while a compaction is active.
    pub fn is_snapshot_in_progress(&self) -> bool {
        matches!(
            self,
            Error::Consensus(ConsensusError::Snapshot(SnapshotError::InProgress))
        )
    }
}
