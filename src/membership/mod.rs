//! Peer bookkeeping for the replication core.
//!
//! [`NodeRegistry`] tracks every known cluster member together with the
//! leader-side replication cursors (`next_index`, `match_index`). Cursors
//! are mutated only by the consensus state machine in response to received
//! acknowledgements, never by the replication sender on its own.

mod node;
pub use node::*;


use std::collections::BTreeMap;

use crate::ReplicationError;
use crate::Result;

#[derive(Debug, Default)]
pub struct NodeRegistry {
    nodes: BTreeMap<u32, RaftNode>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a cluster member. Re-adding an existing id refreshes its
    /// voting flag but keeps the replication cursors.
    pub fn add(
        &mut self,
        id: u32,
        is_voting: bool,
    ) {
        self.nodes
            .entry(id)
            .and_modify(|n| n.is_voting = is_voting)
            .or_insert_with(|| RaftNode::new(id, is_voting));
    }

    pub fn remove(
        &mut self,
        id: u32,
    ) -> Option<RaftNode> {
        self.nodes.remove(&id)
    }

    pub fn get(
        &self,
        id: u32,
    ) -> Option<&RaftNode> {
        self.nodes.get(&id)
    }

    pub fn get_mut(
        &mut self,
        id: u32,
    ) -> Option<&mut RaftNode> {
        self.nodes.get_mut(&id)
    }

    pub fn require(
        &self,
        id: u32,
    ) -> Result<&RaftNode> {
        self.nodes
            .get(&id)
            .ok_or_else(|| ReplicationError::UnknownPeer { node_id: id }.into())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Ids of every member except `self_id`.
    pub fn peer_ids(
        &self,
        self_id: u32,
    ) -> Vec<u32> {
        self.nodes.keys().copied().filter(|&id| id != self_id).collect()
    }

    /// Ids of every voting member except `self_id`.
    pub fn voting_peer_ids(
        &self,
        self_id: u32,
    ) -> Vec<u32> {
        self.nodes
            .values()
            .filter(|n| n.is_voting && n.id != self_id)
            .map(|n| n.id)
            .collect()
    }

    /// Resets every peer's replication cursors for a fresh leadership term:
    /// `next_index` to one past the leader's last log index, `match_index`
    /// to zero.
    pub fn reset_replication_cursors(
        &mut self,
        leader_last_index: u64,
    ) {
        for node in self.nodes.values_mut() {
            node.next_index = leader_last_index + 1;
            node.match_index = 0;
        }
    }

    /// Highest index replicated on a majority of voting members, with the
    /// leader's own log standing in for its match index. `None` when no
    /// index is matched by a quorum.
    pub fn majority_matched_index(
        &self,
        leader_id: u32,
        leader_last_index: u64,
    ) -> Option<u64> {
        let mut matched: Vec<u64> = self
            .nodes
            .values()
            .filter(|n| n.is_voting)
            .map(|n| {
                if n.id == leader_id {
                    leader_last_index
                } else {
                    n.match_index
                }
            })
            .collect();

        if matched.is_empty() {
            return None;
        }

        matched.sort_unstable_by(|a, b| b.cmp(a));
        let majority = matched.len() / 2 + 1;
        Some(matched[majority - 1])
    }
}
