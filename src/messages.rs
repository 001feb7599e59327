//! Protocol message and log entry definitions.
//!
//! These are plain data types: the core hands them to the send hooks and
//! accepts them from the caller, but performs no (de)serialization itself.
//! All types carry serde derives so a transport layer can encode them with
//! whatever codec it prefers.

use serde::Deserialize;
use serde::Serialize;

/// Identifies a log position: the pair of a 1-based index and the term of
/// the entry stored there. `LogId { index: 0, term: 0 }` denotes the start
/// of an uncompacted log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LogId {
    pub index: u64,
    pub term: u64,
}

impl LogId {
    pub fn new(
        index: u64,
        term: u64,
    ) -> Self {
        Self { index, term }
    }
}

/// Classifies a log entry. Membership entries travel through the same log
/// as normal commands; the membership change protocol itself is applied by
/// the caller through the `apply_log` hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EntryKind {
    #[default]
    Normal,
    AddNode,
    RemoveNode,
}

/// A single replicated log entry. Immutable once appended; the index is
/// positional and derived from the entry's place in the log.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Entry {
    pub term: u64,
    pub id: u64,
    pub kind: EntryKind,
    pub payload: Vec<u8>,
}

/// Client-submitted command, turned into an [`Entry`] at the leader.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClientEntrySubmission {
    pub id: u64,
    pub kind: EntryKind,
    pub payload: Vec<u8>,
}

/// Acknowledgement for an accepted client entry: where it landed and under
/// which term. The entry is not yet committed at this point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryResponse {
    pub id: u64,
    pub index: u64,
    pub term: u64,
}

/// AppendEntries RPC request (Raft paper §5.3). Entries are positioned
/// immediately after `prev_log_index`; a request whose `prev_log_index`
/// equals the sender's compaction boundary carries no log-derived entries
/// for the compacted range.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppendEntriesRequest {
    pub term: u64,
    pub prev_log_index: u64,
    pub prev_log_term: u64,
    pub entries: Vec<Entry>,
    pub leader_commit: u64,
}

/// AppendEntries RPC response. `current_index` reports the receiver's
/// highest log index so the leader can adjust its replication cursor after
/// both acceptance and rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppendEntriesResponse {
    pub term: u64,
    pub success: bool,
    pub current_index: u64,
}

/// RequestVote RPC request (Raft paper §5.2). Vote counting is the
/// caller's concern; the core only emits these on election timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RequestVoteRequest {
    pub term: u64,
    pub candidate_id: u32,
    pub last_log_index: u64,
    pub last_log_term: u64,
}
