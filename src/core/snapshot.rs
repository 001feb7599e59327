//! Snapshot gating: leader-side compaction and follower-side installation.
//!
//! Both directions are modeled as a single tagged mode so that compacting
//! while installing (or twice over) is unrepresentable. A mode is entered
//! by `begin_*`, parked until the matching `end_*`, and there is no
//! cancellation path.

use tracing::debug;
use tracing::info;

use crate::LogId;
use crate::Raft;
use crate::Result;
use crate::SnapshotError;
use crate::StorageError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SnapshotMode {
    Idle,
    /// Leader-driven compaction of the committed prefix up to `boundary`.
    Compacting { boundary: LogId },
    /// Installation of an externally delivered snapshot with `boundary`.
    Installing { boundary: LogId },
}

impl Raft {
    /// Opens a compaction window over the committed prefix.
    ///
    /// Requires at least one committed-but-uncaptured entry, and at least
    /// one entry beyond the commit index that stays behind as the
    /// continuity anchor for the new boundary term. Any committed entries
    /// not yet applied are drained to the application first, so the
    /// external capture observes the full prefix.
    ///
    /// Removes nothing by itself: the caller reads the snapshottable
    /// range, persists it externally, polls each captured entry and then
    /// calls [`end_snapshot`](Self::end_snapshot).
    pub fn begin_snapshot(&mut self) -> Result<()> {
        if !matches!(self.snapshot_mode, SnapshotMode::Idle) {
            return Err(SnapshotError::OperationPending.into());
        }
        if self.num_snapshottable_logs() < 1 {
            return Err(SnapshotError::NothingToCompact.into());
        }
        if self.log.last_index() <= self.commit_index {
            return Err(SnapshotError::NoAnchorEntry {
                commit_index: self.commit_index,
            }
            .into());
        }

        // commit_index > base.index here, so the boundary entry is present
        let boundary_term = self
            .log
            .entry_term(self.commit_index)
            .ok_or(StorageError::Compacted {
                index: self.commit_index,
                base_index: self.log.base().index,
            })?;

        self.apply_all()?;

        let boundary = LogId::new(self.commit_index, boundary_term);
        self.snapshot_mode = SnapshotMode::Compacting { boundary };
        info!(
            "[{}] compaction begun up to {:?}, {} entries snapshottable",
            self.node_id,
            boundary,
            self.num_snapshottable_logs()
        );
        Ok(())
    }

    /// Closes the compaction window. The log boundary already sits at the
    /// last polled entry (polling advances it); commit and applied
    /// indices are untouched since compaction only removes entries at or
    /// below the commit index.
    pub fn end_snapshot(&mut self) -> Result<()> {
        if !matches!(self.snapshot_mode, SnapshotMode::Compacting { .. }) {
            return Err(SnapshotError::NotInProgress.into());
        }
        self.snapshot_mode = SnapshotMode::Idle;
        debug!("[{}] compaction finished, base is now {:?}", self.node_id, self.log.base());
        Ok(())
    }

    /// Validates and opens the installation of an externally delivered
    /// snapshot with boundary (`last_included_index`,
    /// `last_included_term`).
    ///
    /// Re-delivery of the boundary that is already installed returns the
    /// distinguished [`SnapshotError::AlreadyLoaded`] signal so the
    /// caller can treat it as success. A snapshot the node has applied
    /// past, or one that would discard entries the log already holds, is
    /// rejected unconditionally.
    pub fn begin_load_snapshot(
        &mut self,
        last_included_index: u64,
        last_included_term: u64,
    ) -> Result<()> {
        if last_included_term == 0 || last_included_index == 0 {
            return Err(SnapshotError::InvalidBoundary {
                index: last_included_index,
                term: last_included_term,
            }
            .into());
        }

        let boundary = LogId::new(last_included_index, last_included_term);
        if self.log.base() == boundary {
            return Err(SnapshotError::AlreadyLoaded {
                index: last_included_index,
                term: last_included_term,
            }
            .into());
        }
        if self.last_applied_index >= last_included_index {
            return Err(SnapshotError::StaleBoundary {
                index: last_included_index,
                last_applied: self.last_applied_index,
            }
            .into());
        }
        if self.log.last_index() > last_included_index {
            return Err(SnapshotError::LogAheadOfBoundary {
                index: last_included_index,
                last_index: self.log.last_index(),
            }
            .into());
        }
        if !matches!(self.snapshot_mode, SnapshotMode::Idle) {
            return Err(SnapshotError::OperationPending.into());
        }

        self.snapshot_mode = SnapshotMode::Installing { boundary };
        info!("[{}] snapshot installation begun, boundary {:?}", self.node_id, boundary);
        Ok(())
    }

    /// Completes an installation: every physically present entry is
    /// superseded by the snapshot, the log restarts at the boundary, and
    /// commit/applied frontiers jump to it. Subsequent appends receive
    /// `boundary.index + 1, …`.
    pub fn end_load_snapshot(&mut self) -> Result<()> {
        let SnapshotMode::Installing { boundary } = self.snapshot_mode else {
            return Err(SnapshotError::NotInProgress.into());
        };

        self.log.install_boundary(boundary);
        self.commit_index = boundary.index;
        self.last_applied_index = boundary.index;
        self.snapshot_mode = SnapshotMode::Idle;
        info!("[{}] snapshot installed, log restarts at {:?}", self.node_id, boundary);
        Ok(())
    }

    /// Advisory: true once the committed-but-uncaptured prefix crossed
    /// the configured threshold. The caller still drives the actual
    /// begin/poll/end sequence.
    pub fn snapshot_recommended(&self) -> bool {
        self.num_snapshottable_logs() >= self.config.snapshot.log_entries_threshold
    }
}
