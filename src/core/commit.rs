//! Apply pipeline and quorum commit advancement.
//!
//! Committed entries are delivered to the `apply_log` hook strictly in
//! index order, one at a time, each delivery advancing the applied
//! frontier by exactly one. The frontier is frozen while a snapshot is
//! mid-flight: compaction and commit advancement both touch the same log
//! prefix, and serializing them keeps the external capture consistent.

use tracing::debug;
use tracing::trace;

use super::SnapshotMode;
use crate::ApplyError;
use crate::Raft;
use crate::Result;
use crate::StorageError;

impl Raft {
    /// Applies the next committed-but-unapplied entry through the
    /// `apply_log` hook. Fails, with the frontier unchanged, when nothing
    /// unapplied is committed or a snapshot is mid-flight.
    pub fn apply_entry(&mut self) -> Result<()> {
        if !matches!(self.snapshot_mode, SnapshotMode::Idle) {
            return Err(ApplyError::NothingToApply.into());
        }
        if self.last_applied_index >= self.commit_index {
            return Err(ApplyError::NothingToApply.into());
        }

        let index = self.last_applied_index + 1;
        let entry = self
            .log
            .entry(index)
            .cloned()
            .ok_or(StorageError::Compacted {
                index,
                base_index: self.log.base().index,
            })?;

        self.hooks.apply_log(&entry, index)?;
        self.last_applied_index = index;
        trace!("[{}] applied entry {} (term {})", self.node_id, index, entry.term);
        Ok(())
    }

    /// Drains the apply pipeline up to the commit index. Used by the
    /// periodic drive and by `begin_snapshot` before the frontier is
    /// frozen. Hook failures propagate; already-applied work stays
    /// applied (delivery is at-least-once).
    pub(crate) fn apply_all(&mut self) -> Result<()> {
        while self.last_applied_index < self.commit_index {
            self.apply_entry()?;
        }
        Ok(())
    }

    /// Re-derives the commit index from peer match cursors: the highest
    /// index replicated on a majority of voting members, committed only
    /// when the entry there carries the current term (Raft paper §5.4.2:
    /// a leader never commits an earlier term's entry by counting
    /// replicas).
    pub(crate) fn advance_commit_index(&mut self) -> Result<()> {
        let Some(candidate) = self
            .registry
            .majority_matched_index(self.node_id, self.log.last_index())
        else {
            return Ok(());
        };

        if candidate <= self.commit_index {
            return Ok(());
        }
        if self.log.entry_term(candidate) != Some(self.current_term) {
            return Ok(());
        }

        debug!("[{}] commit index advanced {} -> {}", self.node_id, self.commit_index, candidate);
        self.commit_index = candidate;
        Ok(())
    }
}
