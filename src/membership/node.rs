/// A known cluster member and its leader-side replication cursors.
///
/// `next_index` is the index of the next entry the leader will send this
/// peer; after a compaction it may point below the log's base index, which
/// is the trigger for the boundary-referencing AppendEntries form.
/// `match_index` is the highest index known to be replicated on the peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaftNode {
    pub id: u32,
    pub next_index: u64,
    pub match_index: u64,
    pub is_voting: bool,
}

impl RaftNode {
    pub fn new(
        id: u32,
        is_voting: bool,
    ) -> Self {
        Self {
            id,
            next_index: 1,
            match_index: 0,
            is_voting,
        }
    }
}
