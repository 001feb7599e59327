//! Log replication: outbound AppendEntries construction, follower-side
//! acceptance, and leader-side acknowledgement handling.
//!
//! The compaction-aware piece lives in the request builder: a peer whose
//! expected predecessor entry has been compacted away receives a request
//! anchored at the log's base boundary instead of a dangling reference.
//! Delivering the snapshot bytes that bring such a peer current is an
//! out-of-band transfer; this core only guarantees it never references an
//! entry that no longer physically exists.

use tracing::debug;
use tracing::warn;

use crate::AppendEntriesRequest;
use crate::AppendEntriesResponse;
use crate::Raft;
use crate::RaftNode;
use crate::RaftRole;
use crate::ReplicationError;
use crate::Result;

impl Raft {
    /// Builds and emits an AppendEntries request for `node_id` through
    /// the `send_appendentries` hook. Leader only.
    pub fn send_appendentries(
        &mut self,
        node_id: u32,
    ) -> Result<()> {
        if self.role != RaftRole::Leader {
            return Err(ReplicationError::NotLeader.into());
        }
        let node = *self.registry.require(node_id)?;
        let request = self.build_append_request(&node);
        debug!(
            "[{}] -> [{}] append_entries prev=({}, {}) entries={} commit={}",
            self.node_id,
            node_id,
            request.prev_log_index,
            request.prev_log_term,
            request.entries.len(),
            request.leader_commit
        );
        self.hooks.send_appendentries(node_id, &request)
    }

    /// Request construction, accounting for compacted history.
    ///
    /// Normal case: predecessor is `next_index - 1` and entries are the
    /// contiguous run from `next_index`, capped by the replication batch
    /// limit. Compacted case (`next_index - 1 < base.index`): the peer's
    /// expected predecessor no longer physically exists, so the request
    /// is anchored at the base boundary and carries no log-derived
    /// entries for that range.
    pub(crate) fn build_append_request(
        &self,
        node: &RaftNode,
    ) -> AppendEntriesRequest {
        let base = self.log.base();
        let next_index = node.next_index.max(1);

        if next_index <= base.index {
            return AppendEntriesRequest {
                term: self.current_term,
                prev_log_index: base.index,
                prev_log_term: base.term,
                entries: Vec::new(),
                leader_commit: self.commit_index,
            };
        }

        let prev_log_index = next_index - 1;
        let prev_log_term = if prev_log_index == 0 {
            0
        } else {
            // prev is either the boundary entry itself or physically present
            self.log.entry_term(prev_log_index).unwrap_or(base.term)
        };
        let entries = self
            .log
            .entries_from(next_index, self.config.replication.max_entries_per_append);

        AppendEntriesRequest {
            term: self.current_term,
            prev_log_index,
            prev_log_term,
            entries,
            leader_commit: self.commit_index,
        }
    }

    /// One replication round: every registered peer gets a request.
    /// Send-hook failures are logged and skipped; the peer will be
    /// retried on the next round.
    pub(crate) fn replicate_to_peers(&mut self) {
        for peer_id in self.registry.peer_ids(self.node_id) {
            if let Err(e) = self.send_appendentries(peer_id) {
                warn!("[{}] replication to {} failed: {:?}", self.node_id, peer_id, e);
            }
        }
    }

    /// Follower-side acceptance of a leader's AppendEntries request.
    ///
    /// A request whose `prev_log_index`/`prev_log_term` equal the
    /// installed snapshot boundary matches even though that entry is no
    /// longer physically present. Conflicting uncommitted suffixes are
    /// truncated; duplicates are suppressed by term comparison.
    pub fn recv_appendentries(
        &mut self,
        request: AppendEntriesRequest,
    ) -> Result<AppendEntriesResponse> {
        if request.term < self.current_term {
            debug!(
                "[{}] rejecting stale append_entries (term {} < {})",
                self.node_id, request.term, self.current_term
            );
            return Ok(AppendEntriesResponse {
                term: self.current_term,
                success: false,
                current_index: self.log.last_index(),
            });
        }

        if request.term > self.current_term {
            self.set_current_term(request.term)?;
        }
        if self.role != RaftRole::Follower {
            self.set_state(RaftRole::Follower)?;
        }
        self.election_timer.reset();

        if !self.prev_log_matches(request.prev_log_index, request.prev_log_term) {
            debug!(
                "[{}] append_entries mismatch at prev=({}, {})",
                self.node_id, request.prev_log_index, request.prev_log_term
            );
            return Ok(AppendEntriesResponse {
                term: self.current_term,
                success: false,
                current_index: self.log.last_index(),
            });
        }

        let base_index = self.log.base().index;
        for (i, entry) in request.entries.into_iter().enumerate() {
            let index = request.prev_log_index + 1 + i as u64;
            if index <= base_index {
                // already captured by our snapshot
                continue;
            }
            match self.log.entry(index) {
                Some(existing) if existing.term == entry.term => continue,
                Some(_) => {
                    // conflicting uncommitted suffix, overwrite from here
                    self.log.truncate_from(index);
                    self.log.append(entry);
                }
                None => {
                    self.log.append(entry);
                }
            }
        }

        if request.leader_commit > self.commit_index {
            self.commit_index = request.leader_commit.min(self.log.last_index());
        }

        Ok(AppendEntriesResponse {
            term: self.current_term,
            success: true,
            current_index: self.log.last_index(),
        })
    }

    fn prev_log_matches(
        &self,
        prev_log_index: u64,
        prev_log_term: u64,
    ) -> bool {
        if prev_log_index == 0 {
            return true;
        }
        match self.log.entry_term(prev_log_index) {
            Some(term) => term == prev_log_term,
            None => false,
        }
    }

    /// Leader-side acknowledgement handling: moves the peer's cursors and
    /// re-derives the commit index on success, backs the cursor off on
    /// rejection. A higher term in the response dethrones us.
    pub fn recv_appendentries_response(
        &mut self,
        node_id: u32,
        response: AppendEntriesResponse,
    ) -> Result<()> {
        if response.term > self.current_term {
            self.set_current_term(response.term)?;
            self.set_state(RaftRole::Follower)?;
            return Ok(());
        }
        if self.role != RaftRole::Leader {
            return Err(ReplicationError::NotLeader.into());
        }

        let last_index = self.log.last_index();
        let node = self
            .registry
            .get_mut(node_id)
            .ok_or(ReplicationError::UnknownPeer { node_id })?;

        if response.success {
            node.match_index = response.current_index.min(last_index);
            node.next_index = node.match_index + 1;
            self.advance_commit_index()?;
        } else if response.current_index.saturating_add(1) >= node.next_index {
            // the follower's log reaches the rejected predecessor, so its
            // suffix diverges from ours; step back one entry per round
            // until the probe lands on common history
            node.next_index = node.next_index.saturating_sub(1).max(1);
        } else {
            // follower is simply short, resume from its reported frontier
            node.next_index = response.current_index.saturating_add(1).min(last_index + 1);
        }
        Ok(())
    }
}
