//! End-to-end compaction scenarios driven through the public API: a
//! leader compacting its committed prefix while a lagging follower is
//! brought back to the boundary, and a follower installing an externally
//! delivered snapshot.

use std::cell::RefCell;
use std::rc::Rc;

use raftlet::AppendEntriesRequest;
use raftlet::ClientEntrySubmission;
use raftlet::Entry;
use raftlet::EntryKind;
use raftlet::Raft;
use raftlet::RaftConfig;
use raftlet::RaftHooks;
use raftlet::RaftRole;
use raftlet::Result;

/// Hook set recording outbound replication and applied entries.
#[derive(Default)]
struct RecordingHooks {
    sent: Rc<RefCell<Vec<(u32, AppendEntriesRequest)>>>,
    applied: Rc<RefCell<Vec<u64>>>,
}

impl RaftHooks for RecordingHooks {
    fn apply_log(
        &mut self,
        _entry: &Entry,
        index: u64,
    ) -> Result<()> {
        self.applied.borrow_mut().push(index);
        Ok(())
    }

    fn send_appendentries(
        &mut self,
        node_id: u32,
        request: &AppendEntriesRequest,
    ) -> Result<()> {
        self.sent.borrow_mut().push((node_id, request.clone()));
        Ok(())
    }
}

fn submission(id: u64) -> ClientEntrySubmission {
    ClientEntrySubmission {
        id,
        kind: EntryKind::Normal,
        payload: format!("command-{id}").into_bytes(),
    }
}

fn leader_with_peers(peers: &[u32]) -> (Raft, Rc<RefCell<Vec<(u32, AppendEntriesRequest)>>>) {
    let hooks = RecordingHooks::default();
    let sent = hooks.sent.clone();
    let mut raft = Raft::new(1, RaftConfig::default(), Box::new(hooks));
    raft.add_node(1, true).expect("add self");
    for &peer in peers {
        raft.add_node(peer, true).expect("add peer");
    }
    raft.set_state(RaftRole::Leader).expect("set leader");
    raft.set_current_term(1).expect("term advance");
    (raft, sent)
}

#[test]
fn leader_compacts_committed_prefix_and_keeps_replicating() {
    let (mut leader, sent) = leader_with_peers(&[2]);

    // five committed commands plus one uncommitted anchor
    for id in 1..=6 {
        leader.recv_entry(submission(id)).expect("accepted");
    }
    leader
        .recv_appendentries_response(
            2,
            raftlet::AppendEntriesResponse {
                term: 1,
                success: true,
                current_index: 5,
            },
        )
        .expect("handled");
    assert_eq!(5, leader.commit_index());
    assert_eq!(5, leader.num_snapshottable_logs());

    // capture + poll + close, the caller-driven compaction sequence
    leader.begin_snapshot().expect("compaction opened");
    assert_eq!(5, leader.last_applied_index());
    let mut captured = Vec::new();
    for _ in 0..5 {
        captured.push(leader.poll_entry().expect("captured entry"));
    }
    leader.end_snapshot().expect("compaction closed");

    assert_eq!(5, captured.len());
    assert_eq!(1, leader.log_count());
    assert_eq!(5, leader.log().base().index);
    assert_eq!(6, leader.current_index());
    assert_eq!(0, leader.num_snapshottable_logs());

    // a fresh command still replicates; the peer's cursor sits at the
    // first live entry, whose predecessor is the boundary itself
    sent.borrow_mut().clear();
    leader.recv_entry(submission(7)).expect("accepted");
    let sent = sent.borrow();
    let (_, request) = sent.last().expect("request emitted");
    assert_eq!(5, request.prev_log_index);
    assert_eq!(1, request.prev_log_term);
    assert_eq!(2, request.entries.len());
}

#[test]
fn compacted_peer_receives_boundary_anchored_request() {
    let (mut leader, sent) = leader_with_peers(&[2, 3]);

    for id in 1..=4 {
        leader.recv_entry(submission(id)).expect("accepted");
    }
    // peer 3 never acknowledged anything; its cursor stays at the start
    leader.set_commit_index(3).expect("commit");

    leader.begin_snapshot().expect("compaction opened");
    for _ in 0..3 {
        leader.poll_entry().expect("captured entry");
    }
    leader.end_snapshot().expect("compaction closed");

    sent.borrow_mut().clear();
    leader.send_appendentries(3).expect("request emitted");
    let sent_requests = sent.borrow();
    let (peer, request) = sent_requests.last().expect("request emitted");

    // peer 3's predecessor is gone: the request anchors at the boundary
    assert_eq!(3, *peer);
    assert_eq!(3, request.prev_log_index);
    assert_eq!(1, request.prev_log_term);
    assert!(request.entries.is_empty());
}

#[test]
fn follower_installs_snapshot_and_resumes_from_boundary() {
    let hooks = RecordingHooks::default();
    let applied = hooks.applied.clone();
    let mut follower = Raft::new(2, RaftConfig::default(), Box::new(hooks));
    follower.add_node(2, true).expect("add self");
    follower.add_node(1, true).expect("add leader");

    follower.begin_load_snapshot(10, 3).expect("installation opened");
    // mid-flight, client traffic and elections are off the table
    assert!(follower.snapshot_in_progress());
    follower.end_load_snapshot().expect("installation closed");

    assert_eq!(10, follower.current_index());
    assert_eq!(10, follower.commit_index());
    assert_eq!(10, follower.last_applied_index());
    assert_eq!(0, follower.log_count());

    // the leader resumes replication right after the boundary
    let response = follower
        .recv_appendentries(AppendEntriesRequest {
            term: 3,
            prev_log_index: 10,
            prev_log_term: 3,
            entries: vec![Entry {
                term: 3,
                id: 11,
                kind: EntryKind::Normal,
                payload: b"post-snapshot".to_vec(),
            }],
            leader_commit: 11,
        })
        .expect("handled");

    assert!(response.success);
    assert_eq!(11, follower.current_index());
    assert_eq!(11, follower.commit_index());

    follower.periodic(1).expect("tick");
    assert_eq!(vec![11], *applied.borrow());

    // re-delivery of the installed boundary is the idempotent signal
    let err = follower.begin_load_snapshot(10, 3).expect_err("already installed");
    assert!(err.is_snapshot_already_loaded());
}
