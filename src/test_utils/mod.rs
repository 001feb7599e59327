//! Shared helpers for unit tests: entry builders, capturing hooks and
//! pre-wired node setups.

use std::cell::RefCell;
use std::rc::Rc;

use crate::AppendEntriesRequest;
use crate::ClientEntrySubmission;
use crate::Entry;
use crate::EntryKind;
use crate::Raft;
use crate::RaftConfig;
use crate::RaftHooks;
use crate::RaftRole;
use crate::RequestVoteRequest;
use crate::Result;

pub fn submission(id: u64) -> ClientEntrySubmission {
    ClientEntrySubmission {
        id,
        kind: EntryKind::Normal,
        payload: b"entry".to_vec(),
    }
}

pub fn entry(
    term: u64,
    id: u64,
) -> Entry {
    Entry {
        term,
        id,
        kind: EntryKind::Normal,
        payload: b"entry".to_vec(),
    }
}

/// Everything the capturing hook set observed, inspected by tests after
/// driving the core.
#[derive(Debug, Default)]
pub struct Captured {
    pub appendentries: Vec<(u32, AppendEntriesRequest)>,
    pub requestvotes: Vec<(u32, RequestVoteRequest)>,
    pub applied: Vec<(u64, Entry)>,
    pub persisted_terms: Vec<(u64, Option<u32>)>,
    pub persisted_votes: Vec<Option<u32>>,
}

/// Hook set that records every invocation, the moral equivalent of the
/// message-capturing callbacks used by transport-less harnesses.
pub struct CaptureHooks {
    captured: Rc<RefCell<Captured>>,
}

impl CaptureHooks {
    pub fn new() -> (Self, Rc<RefCell<Captured>>) {
        let captured = Rc::new(RefCell::new(Captured::default()));
        (
            Self {
                captured: captured.clone(),
            },
            captured,
        )
    }
}

impl RaftHooks for CaptureHooks {
    fn persist_term(
        &mut self,
        term: u64,
        voted_for: Option<u32>,
    ) -> Result<()> {
        self.captured.borrow_mut().persisted_terms.push((term, voted_for));
        Ok(())
    }

    fn persist_vote(
        &mut self,
        voted_for: Option<u32>,
    ) -> Result<()> {
        self.captured.borrow_mut().persisted_votes.push(voted_for);
        Ok(())
    }

    fn apply_log(
        &mut self,
        entry: &Entry,
        index: u64,
    ) -> Result<()> {
        self.captured.borrow_mut().applied.push((index, entry.clone()));
        Ok(())
    }

    fn send_appendentries(
        &mut self,
        node_id: u32,
        request: &AppendEntriesRequest,
    ) -> Result<()> {
        self.captured
            .borrow_mut()
            .appendentries
            .push((node_id, request.clone()));
        Ok(())
    }

    fn send_requestvote(
        &mut self,
        node_id: u32,
        request: &RequestVoteRequest,
    ) -> Result<()> {
        self.captured.borrow_mut().requestvotes.push((node_id, *request));
        Ok(())
    }
}

/// A follower node with capturing hooks and the given peers registered.
pub fn setup_node(
    node_id: u32,
    peers: &[u32],
) -> (Raft, Rc<RefCell<Captured>>) {
    let (hooks, captured) = CaptureHooks::new();
    let mut raft = Raft::new(node_id, RaftConfig::default(), Box::new(hooks));
    raft.add_node(node_id, true).expect("add self");
    for &peer in peers {
        raft.add_node(peer, true).expect("add peer");
    }
    (raft, captured)
}

/// A leader node with capturing hooks and the given peers registered.
pub fn setup_leader(
    node_id: u32,
    peers: &[u32],
) -> (Raft, Rc<RefCell<Captured>>) {
    let (mut raft, captured) = setup_node(node_id, peers);
    raft.set_state(RaftRole::Leader).expect("set leader");
    (raft, captured)
}
