//! A synchronously driven Raft consensus core with compaction-aware log
//! replication.
//!
//! The crate covers the interaction between log replication, commit/apply
//! sequencing, and log compaction via snapshotting: how a leader discards
//! already-committed log prefixes while continuing to replicate to
//! followers behind that boundary, and how a follower safely installs an
//! externally supplied snapshot. Transport, persistence and vote counting
//! stay outside, reached through the [`RaftHooks`] trait.

mod config;
mod core;
mod errors;
mod hooks;
mod membership;
mod messages;
mod storage;

pub use crate::config::*;
pub use crate::core::*;
pub use crate::errors::*;
pub use crate::hooks::*;
pub use crate::membership::*;
pub use crate::messages::*;
pub use crate::storage::*;

//-----------------------------------------------------------
// Test utils

#[cfg(test)]
pub mod test_utils;
