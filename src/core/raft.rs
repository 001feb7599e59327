use tracing::debug;
use tracing::info;
use tracing::warn;

use super::ElectionTimer;
use super::ReplicationTimer;
use super::SnapshotMode;
use crate::ClientEntrySubmission;
use crate::Entry;
use crate::EntryResponse;
use crate::NodeRegistry;
use crate::RaftConfig;
use crate::RaftHooks;
use crate::RaftLog;
use crate::ReplicationError;
use crate::Result;
use crate::SnapshotError;

/// Raft node roles. Role transitions driven by vote counting are the
/// caller's concern; the core moves between roles on term discovery,
/// election timeout and explicit [`Raft::set_state`] calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaftRole {
    Follower,
    Candidate,
    Leader,
}

/// The consensus core: a single-node, synchronously driven state machine
/// over a compactable replicated log.
///
/// Everything that leaves the process (persistence, transport, command
/// application) goes through the injected [`RaftHooks`]. All entry points
/// are short, non-blocking, in-memory transitions; the caller serializes
/// them and the core is not reentrant.
pub struct Raft {
    pub(crate) node_id: u32,
    pub(crate) role: RaftRole,
    pub(crate) current_term: u64,
    pub(crate) voted_for: Option<u32>,
    pub(crate) commit_index: u64,
    pub(crate) last_applied_index: u64,
    pub(crate) snapshot_mode: SnapshotMode,

    pub(crate) log: RaftLog,
    pub(crate) registry: NodeRegistry,
    pub(crate) hooks: Box<dyn RaftHooks>,
    pub(crate) config: RaftConfig,

    pub(crate) election_timer: ElectionTimer,
    pub(crate) replication_timer: ReplicationTimer,
}

impl Raft {
    pub fn new(
        node_id: u32,
        config: RaftConfig,
        hooks: Box<dyn RaftHooks>,
    ) -> Self {
        let election_timer = ElectionTimer::new(config.election.election_timeout_ms);
        let replication_timer = ReplicationTimer::new(config.replication.heartbeat_interval_ms);
        Self {
            node_id,
            role: RaftRole::Follower,
            current_term: 0,
            voted_for: None,
            commit_index: 0,
            last_applied_index: 0,
            snapshot_mode: SnapshotMode::Idle,
            log: RaftLog::new(),
            registry: NodeRegistry::new(),
            hooks,
            config,
            election_timer,
            replication_timer,
        }
    }

    // ---------------------------------------------------------------
    // Membership

    /// Registers a cluster member. The node's own id may be registered
    /// too; it is excluded from outbound replication automatically.
    pub fn add_node(
        &mut self,
        id: u32,
        is_voting: bool,
    ) -> Result<()> {
        self.registry.add(id, is_voting);
        Ok(())
    }

    pub fn remove_node(
        &mut self,
        id: u32,
    ) -> Result<()> {
        self.registry
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| ReplicationError::UnknownPeer { node_id: id }.into())
    }

    // ---------------------------------------------------------------
    // Role and term bookkeeping

    /// Forces the node into `role` without touching replication cursors.
    /// Election-driven promotion goes through [`become_leader`](Self::become_leader),
    /// which also resets the cursors.
    pub fn set_state(
        &mut self,
        role: RaftRole,
    ) -> Result<()> {
        debug!("[{}] set_state {:?} -> {:?}", self.node_id, self.role, role);
        self.role = role;
        Ok(())
    }

    /// Advances the current term, persisting it (with a cleared vote)
    /// before the change is observable. Lower terms are ignored.
    pub fn set_current_term(
        &mut self,
        term: u64,
    ) -> Result<()> {
        if term <= self.current_term {
            return Ok(());
        }
        self.hooks.persist_term(term, None)?;
        self.current_term = term;
        self.voted_for = None;
        Ok(())
    }

    /// Moves the commit index forward. The index must not exceed the
    /// highest log index; regressions are ignored.
    pub fn set_commit_index(
        &mut self,
        index: u64,
    ) -> Result<()> {
        if index > self.log.last_index() {
            return Err(ReplicationError::CommitBeyondLog {
                requested: index,
                last_index: self.log.last_index(),
            }
            .into());
        }
        if index > self.commit_index {
            self.commit_index = index;
        }
        Ok(())
    }

    /// Election-path promotion: takes the leader role and resets every
    /// peer's replication cursors for the new term.
    pub fn become_leader(&mut self) -> Result<()> {
        info!("[{}] becoming leader for term {}", self.node_id, self.current_term);
        self.role = RaftRole::Leader;
        self.registry.reset_replication_cursors(self.log.last_index());
        self.replication_timer.reset();
        Ok(())
    }

    // ---------------------------------------------------------------
    // Log ingestion

    /// Appends a fully formed entry to the log, bypassing leader checks.
    /// This is the replication-acceptance path; client commands go
    /// through [`recv_entry`](Self::recv_entry).
    pub fn append_entry(
        &mut self,
        entry: Entry,
    ) -> Result<u64> {
        Ok(self.log.append(entry))
    }

    /// Accepts a client command: turns it into a log entry under the
    /// current term, appends it and replicates to every peer. Rejected
    /// with the mode-conflict signal while a snapshot is mid-flight, and
    /// with `NotLeader` on non-leaders.
    pub fn recv_entry(
        &mut self,
        submission: ClientEntrySubmission,
    ) -> Result<EntryResponse> {
        if !matches!(self.snapshot_mode, SnapshotMode::Idle) {
            return Err(SnapshotError::InProgress.into());
        }
        if self.role != RaftRole::Leader {
            return Err(ReplicationError::NotLeader.into());
        }

        let entry = Entry {
            term: self.current_term,
            id: submission.id,
            kind: submission.kind,
            payload: submission.payload,
        };
        let index = self.log.append(entry);
        debug!("[{}] accepted client entry {} at index {}", self.node_id, submission.id, index);

        self.replicate_to_peers();

        Ok(EntryResponse {
            id: submission.id,
            index,
            term: self.current_term,
        })
    }

    /// Removes and returns the oldest physically present entry. Used by
    /// the compaction loop after the caller has externally captured it.
    pub fn poll_entry(&mut self) -> Result<Entry> {
        let entry = self.log.poll_oldest()?;
        Ok(entry)
    }

    // ---------------------------------------------------------------
    // Timer drive

    /// Periodic tick: `elapsed_ms` of wall time have passed since the
    /// last call. Drains the apply pipeline, re-replicates from leaders
    /// once per heartbeat interval, and starts an election on followers
    /// and candidates whose randomized timeout elapsed. Elections are
    /// suppressed while a snapshot is mid-flight.
    pub fn periodic(
        &mut self,
        elapsed_ms: u64,
    ) -> Result<()> {
        if matches!(self.snapshot_mode, SnapshotMode::Idle) {
            self.apply_all()?;
        }

        match self.role {
            RaftRole::Leader => {
                self.replication_timer.advance(elapsed_ms);
                if self.replication_timer.is_expired() {
                    self.replication_timer.reset();
                    self.replicate_to_peers();
                }
            }
            RaftRole::Follower | RaftRole::Candidate => {
                self.election_timer.advance(elapsed_ms);
                if self.election_timer.is_expired() {
                    self.election_timer.reset();
                    if matches!(self.snapshot_mode, SnapshotMode::Idle) {
                        self.start_election()?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Election timeout fired: bump the term, vote for ourselves and ask
    /// every voting peer for its vote. Counting the responses is the
    /// caller's concern; a cluster with no other voting member promotes
    /// immediately.
    fn start_election(&mut self) -> Result<()> {
        let term = self.current_term + 1;
        info!("[{}] election timeout, starting election for term {}", self.node_id, term);

        self.role = RaftRole::Candidate;
        self.hooks.persist_term(term, Some(self.node_id))?;
        self.current_term = term;
        self.voted_for = Some(self.node_id);
        self.hooks.persist_vote(Some(self.node_id))?;

        let voting_peers = self.registry.voting_peer_ids(self.node_id);
        if voting_peers.is_empty() {
            return self.become_leader();
        }

        let last_log_id = self.log.last_log_id();
        let request = crate::RequestVoteRequest {
            term,
            candidate_id: self.node_id,
            last_log_index: last_log_id.index,
            last_log_term: last_log_id.term,
        };
        for peer_id in voting_peers {
            if let Err(e) = self.hooks.send_requestvote(peer_id, &request) {
                warn!("[{}] send_requestvote to {} failed: {:?}", self.node_id, peer_id, e);
            }
        }
        Ok(())
    }

    // ---------------------------------------------------------------
    // Accessors

    pub fn node_id(&self) -> u32 {
        self.node_id
    }

    pub fn role(&self) -> RaftRole {
        self.role
    }

    pub fn current_term(&self) -> u64 {
        self.current_term
    }

    pub fn voted_for(&self) -> Option<u32> {
        self.voted_for
    }

    pub fn commit_index(&self) -> u64 {
        self.commit_index
    }

    pub fn last_applied_index(&self) -> u64 {
        self.last_applied_index
    }

    /// Highest log index, counting compacted history.
    pub fn current_index(&self) -> u64 {
        self.log.last_index()
    }

    /// Number of physically present entries.
    pub fn log_count(&self) -> u64 {
        self.log.count()
    }

    /// Committed entries not yet captured below the compaction boundary.
    pub fn num_snapshottable_logs(&self) -> u64 {
        self.commit_index - self.log.base().index
    }

    pub fn snapshot_in_progress(&self) -> bool {
        !matches!(self.snapshot_mode, SnapshotMode::Idle)
    }

    pub fn log(&self) -> &RaftLog {
        &self.log
    }

    pub fn node(
        &self,
        id: u32,
    ) -> Option<&crate::RaftNode> {
        self.registry.get(id)
    }

    /// Test/bootstrap hook: positions a peer's replication cursor.
    pub fn set_node_next_index(
        &mut self,
        id: u32,
        next_index: u64,
    ) -> Result<()> {
        let node = self
            .registry
            .get_mut(id)
            .ok_or(ReplicationError::UnknownPeer { node_id: id })?;
        node.next_index = next_index;
        Ok(())
    }

    /// Test/bootstrap hook: forces the applied frontier, e.g. when the
    /// application restored its own checkpoint.
    pub fn set_last_applied_index(
        &mut self,
        index: u64,
    ) {
        self.last_applied_index = index;
    }
}
