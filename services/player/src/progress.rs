//! Client-side view of a video's watch progress
//!
//! Decides when the playhead has moved far enough to be worth saving and
//! folds save responses back into the cached percentage and completion flag.
//! Saves may overlap on a slow network, so each one carries a sequence
//! number and a response older than the newest applied one is ignored.

use api::models::VideoProgress;

/// Minimum playhead movement, in seconds, before a save is issued
pub const MIN_SAVE_DELTA_SECS: i32 = 2;

/// A save that has been issued and not yet answered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveTicket {
    pub sequence: u64,
    pub position: i32,
}

/// Saved position, percentage and completion for the current video
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressTracker {
    last_saved: i32,
    watch_percentage: f64,
    completed: bool,
    issued: u64,
    applied: u64,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from the stored progress; returns the position to resume from
    ///
    /// Completed videos start over from the beginning.
    pub fn resume_from(&mut self, progress: &VideoProgress) -> Option<i32> {
        self.watch_percentage = progress.watch_percentage;
        self.completed |= progress.is_completed;

        if progress.is_completed || progress.last_position_seconds <= 0 {
            return None;
        }

        self.last_saved = progress.last_position_seconds;
        Some(progress.last_position_seconds)
    }

    /// Issue a save for the playhead if it moved far enough
    pub fn begin_save(&mut self, position: i32) -> Option<SaveTicket> {
        if (position - self.last_saved).abs() < MIN_SAVE_DELTA_SECS {
            return None;
        }

        self.issued += 1;
        Some(SaveTicket {
            sequence: self.issued,
            position,
        })
    }

    /// Fold a save response in; returns false when it was superseded
    pub fn apply(&mut self, ticket: SaveTicket, response: &VideoProgress) -> bool {
        // Completion never reverts, whatever order responses arrive in
        self.completed |= response.is_completed;

        if ticket.sequence <= self.applied {
            return false;
        }

        self.applied = ticket.sequence;
        self.last_saved = ticket.position;
        self.watch_percentage = response.watch_percentage;
        true
    }

    /// Record an explicit completion
    pub fn mark_completed(&mut self) {
        self.completed = true;
    }

    pub fn last_saved(&self) -> i32 {
        self.last_saved
    }

    pub fn watch_percentage(&self) -> f64 {
        self.watch_percentage
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }
}
