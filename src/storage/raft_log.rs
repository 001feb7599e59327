//! Core model in Raft: the compactable replicated log.
//!
//! Entries live in an in-memory arena addressed by a 1-based logical index
//! space that is durable across compaction: indices are never reused or
//! renumbered. `base` records the boundary entry immediately preceding the
//! first physically present entry (the snapshot boundary once any
//! compaction or installation has occurred), so the physical offset of a
//! logical index is `index - base.index - 1`.

use std::collections::VecDeque;

use tracing::trace;

use crate::Entry;
use crate::LogId;
use crate::Result;
use crate::StorageError;

#[derive(Debug, Default)]
pub struct RaftLog {
    entries: VecDeque<Entry>,
    base: LogId,
}

impl RaftLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The boundary entry preceding the first physically present entry.
    /// `LogId { index: 0, term: 0 }` until a compaction or installation
    /// has occurred.
    #[inline]
    pub fn base(&self) -> LogId {
        self.base
    }

    /// Number of physically present entries.
    #[inline]
    pub fn count(&self) -> u64 {
        self.entries.len() as u64
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the oldest physically present entry.
    #[inline]
    pub fn first_index(&self) -> u64 {
        self.base.index + 1
    }

    /// Highest log index, counting compacted history.
    #[inline]
    pub fn last_index(&self) -> u64 {
        self.base.index + self.entries.len() as u64
    }

    /// LogId of the newest entry, falling back to the boundary when the
    /// log is physically empty.
    pub fn last_log_id(&self) -> LogId {
        match self.entries.back() {
            Some(entry) => LogId::new(self.last_index(), entry.term),
            None => self.base,
        }
    }

    /// Appends an entry at the next index and returns that index.
    pub fn append(
        &mut self,
        entry: Entry,
    ) -> u64 {
        self.entries.push_back(entry);
        self.last_index()
    }

    fn offset(
        &self,
        index: u64,
    ) -> Option<usize> {
        if index <= self.base.index || index > self.last_index() {
            return None;
        }
        Some((index - self.base.index - 1) as usize)
    }

    /// Physically present entry at `index`, if any.
    pub fn entry(
        &self,
        index: u64,
    ) -> Option<&Entry> {
        self.offset(index).and_then(|o| self.entries.get(o))
    }

    /// Term of the entry at `index`. Unlike [`entry`](Self::entry), this
    /// can answer for the boundary entry itself even though it is no
    /// longer physically present.
    pub fn entry_term(
        &self,
        index: u64,
    ) -> Option<u64> {
        if index == self.base.index {
            return Some(self.base.term);
        }
        self.entry(index).map(|e| e.term)
    }

    /// Contiguous run of entries starting at `from_index`, at most `max`
    /// of them. Indices at or below the boundary yield nothing.
    pub fn entries_from(
        &self,
        from_index: u64,
        max: u64,
    ) -> Vec<Entry> {
        let Some(start) = self.offset(from_index) else {
            return Vec::new();
        };
        self.entries
            .iter()
            .skip(start)
            .take(max as usize)
            .cloned()
            .collect()
    }

    /// Removes and returns the oldest physically present entry, advancing
    /// the boundary to it. This is the only removal primitive usable
    /// while a compaction is in progress; it is intentionally decoupled
    /// from commit-index checks, so callers must never poll an entry whose
    /// index exceeds their commit index.
    pub fn poll_oldest(&mut self) -> Result<Entry> {
        let polled_index = self.first_index();
        let entry = self.entries.pop_front().ok_or(StorageError::EmptyLog)?;
        self.base = LogId::new(polled_index, entry.term);
        trace!("polled entry {}, base is now {:?}", polled_index, self.base);
        Ok(entry)
    }

    /// Removes all entries at or after `index`. Used for term-conflict
    /// recovery when a follower overwrites an uncommitted suffix.
    pub fn truncate_from(
        &mut self,
        index: u64,
    ) {
        if let Some(offset) = self.offset(index) {
            self.entries.truncate(offset);
        }
    }

    /// Wholesale clear + rebase: all prior entries are superseded by an
    /// installed snapshot and the log logically restarts at `boundary`.
    pub fn install_boundary(
        &mut self,
        boundary: LogId,
    ) {
        self.entries.clear();
        self.base = boundary;
    }
}
