//! Submission lifecycle and derived anchor status

use serde::Serialize;

use crate::error::{ServerError, ServerResult};
use crate::traits::LedgerEntry;

/// Where one submission is in the append-sign-anchor pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Received,
    Validated,
    Signed,
    Stored,
    AnchorPending,
    Anchored,
    AnchorFailed,
}

impl SubmissionState {
    /// Name for logs
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionState::Received => "received",
            SubmissionState::Validated => "validated",
            SubmissionState::Signed => "signed",
            SubmissionState::Stored => "stored",
            SubmissionState::AnchorPending => "anchor_pending",
            SubmissionState::Anchored => "anchored",
            SubmissionState::AnchorFailed => "anchor_failed",
        }
    }

    /// Check whether `next` is a legal successor
    ///
    /// `AnchorFailed -> AnchorPending` is the reconciliation re-drive.
    pub fn can_advance_to(self, next: SubmissionState) -> bool {
        use SubmissionState::*;
        matches!(
            (self, next),
            (Received, Validated)
                | (Validated, Signed)
                | (Signed, Stored)
                | (Stored, AnchorPending)
                | (AnchorPending, Anchored)
                | (AnchorPending, AnchorFailed)
                | (AnchorFailed, AnchorPending)
        )
    }

    /// The caller gets its answer once this state is reached
    pub fn is_durable(self) -> bool {
        matches!(
            self,
            SubmissionState::Stored
                | SubmissionState::AnchorPending
                | SubmissionState::Anchored
                | SubmissionState::AnchorFailed
        )
    }
}

impl std::fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tracks one submission through the pipeline
#[derive(Debug)]
pub struct Submission {
    state: SubmissionState,
}

impl Submission {
    pub fn new() -> Self {
        Self {
            state: SubmissionState::Received,
        }
    }

    /// Resume tracking from a known state
    pub fn resume(state: SubmissionState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    /// Move to the next state, rejecting illegal transitions
    pub fn advance(&mut self, next: SubmissionState) -> ServerResult<()> {
        if !self.state.can_advance_to(next) {
            return Err(ServerError::Internal(format!(
                "illegal submission transition {} -> {}",
                self.state, next
            )));
        }
        tracing::trace!(from = %self.state, to = %next, "Submission state changed");
        self.state = next;
        Ok(())
    }
}

impl Default for Submission {
    fn default() -> Self {
        Self::new()
    }
}

/// Anchor status of a stored entry, as reported on reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorStatus {
    /// Proof attached
    Anchored,
    /// Not anchored yet; a worker or reconciliation will try
    Pending,
    /// Not anchored and no transparency log is configured
    Disabled,
}

impl AnchorStatus {
    /// Derive the status of an entry
    pub fn of(entry: &LedgerEntry, anchoring_enabled: bool) -> Self {
        if entry.is_anchored() {
            AnchorStatus::Anchored
        } else if anchoring_enabled {
            AnchorStatus::Pending
        } else {
            AnchorStatus::Disabled
        }
    }
}
