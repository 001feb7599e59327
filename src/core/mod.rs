mod commit;
mod raft;
mod replication;
mod snapshot;
mod timer;

pub use raft::*;
pub(crate) use snapshot::SnapshotMode;
pub(crate) use timer::*;
