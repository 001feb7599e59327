mod hard_state;
mod raft_log;

pub use hard_state::*;
pub use raft_log::*;
