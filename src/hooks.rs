//! Caller-supplied integration hooks.
//!
//! The core is transport- and persistence-free: everything that leaves the
//! in-memory state machine goes through [`RaftHooks`], injected at
//! construction as a trait object. Every hook defaults to a no-op, so a
//! caller only implements the contracts it cares about. Hooks are expected
//! to either complete synchronously or be fire-and-forget; the core does
//! not wait on anything beyond the hook's own return.

#[cfg(test)]
use mockall::automock;

use crate::AppendEntriesRequest;
use crate::Entry;
use crate::RequestVoteRequest;
use crate::Result;

#[cfg_attr(test, automock)]
pub trait RaftHooks {
    /// Durably record the current term and vote. Invoked on every term
    /// advance, before the change is observable through the API.
    fn persist_term(
        &mut self,
        term: u64,
        voted_for: Option<u32>,
    ) -> Result<()> {
        let _ = (term, voted_for);
        Ok(())
    }

    /// Durably record a cast vote.
    fn persist_vote(
        &mut self,
        voted_for: Option<u32>,
    ) -> Result<()> {
        let _ = voted_for;
        Ok(())
    }

    /// Apply a committed entry to the application state machine. Invoked
    /// once per entry, in strict index order. Delivery is ordered
    /// at-least-once: a crash between apply and external checkpointing may
    /// replay entries.
    fn apply_log(
        &mut self,
        entry: &Entry,
        index: u64,
    ) -> Result<()> {
        let _ = (entry, index);
        Ok(())
    }

    /// Transmit a replication message to a peer.
    fn send_appendentries(
        &mut self,
        node_id: u32,
        request: &AppendEntriesRequest,
    ) -> Result<()> {
        let _ = (node_id, request);
        Ok(())
    }

    /// Transmit a vote request to a peer.
    fn send_requestvote(
        &mut self,
        node_id: u32,
        request: &RequestVoteRequest,
    ) -> Result<()> {
        let _ = (node_id, request);
        Ok(())
    }
}

/// Hook set that ignores everything. Useful for tests and for nodes that
/// drive the core purely through its API.
#[derive(Debug, Default)]
pub struct NoopHooks;

impl RaftHooks for NoopHooks {}
