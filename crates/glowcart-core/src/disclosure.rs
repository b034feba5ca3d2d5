//! Progressive disclosure of the filtered grid.
//!
//! The grid reveals results in fixed batches: the first batch is visible on
//! mount and each "load more" reveals one more batch, clamped to the number
//! of filtered results. Conceptually a two-state machine ("more available"
//! and "fully shown") with no transition back except [`Disclosure::reset`].
//! Callers must reset whenever the filter state changes, so a stale count
//! from a longer list never leaks onto a materially different one.

use serde::{Deserialize, Serialize};

/// Number of products revealed per batch.
pub const GRID_BATCH_SIZE: usize = 6;

/// Monotone "load more" counter over a filtered result list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Disclosure {
    batch: usize,
    visible: usize,
}

impl Default for Disclosure {
    fn default() -> Self {
        Self::new(GRID_BATCH_SIZE)
    }
}

impl Disclosure {
    /// Starts a fresh disclosure showing the first batch.
    #[must_use]
    pub fn new(batch: usize) -> Self {
        Self {
            batch,
            visible: batch,
        }
    }

    /// Resumes from a previously revealed count (e.g. a `show` query
    /// parameter round-tripped through the client). The count never goes
    /// below one batch.
    #[must_use]
    pub fn resume(batch: usize, visible: usize) -> Self {
        Self {
            batch,
            visible: visible.max(batch),
        }
    }

    /// Reveals one more batch, clamped to `total`. The stored counter is
    /// non-decreasing: shrinking `total` never pulls it back down.
    pub fn load_more(&mut self, total: usize) {
        self.visible = self.visible.max((self.visible + self.batch).min(total));
    }

    /// Returns to the first batch. Invoked on every filter change.
    pub fn reset(&mut self) {
        self.visible = self.batch;
    }

    /// How many of `total` results are currently visible.
    #[must_use]
    pub fn visible_count(&self, total: usize) -> usize {
        self.visible.min(total)
    }

    /// Whether further results remain hidden.
    #[must_use]
    pub fn has_more(&self, total: usize) -> bool {
        self.visible_count(total) < total
    }

    /// Percentage of results revealed, for the grid's progress bar.
    /// Defined as 0 when the list is empty, capped at 100.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress_percent(&self, total: usize) -> f64 {
        if total == 0 {
            return 0.0;
        }
        let percent = self.visible_count(total) as f64 / total as f64 * 100.0;
        percent.min(100.0)
    }
}
