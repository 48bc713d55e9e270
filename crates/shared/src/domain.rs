use serde::{Deserialize, Serialize};

use crate::error::NotifyError;

/// Where a session sits in its submission lifecycle. `Supported` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Idle,
    Submitting,
    Supported,
}

/// Read-only projection of the session state handed to the presentation
/// layer between calls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub count: u32,
    pub target_count: u32,
    pub has_supported: bool,
    pub is_submitting: bool,
}

impl SessionSnapshot {
    pub fn phase(&self) -> SessionPhase {
        if self.is_submitting {
            SessionPhase::Submitting
        } else if self.has_supported {
            SessionPhase::Supported
        } else {
            SessionPhase::Idle
        }
    }

    /// Fraction of the target reached, clamped to 1.0.
    pub fn progress(&self) -> f64 {
        (f64::from(self.count) / f64::from(self.target_count.max(1))).min(1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    AlreadySupported,
    SubmissionInFlight,
}

/// Result of one submission attempt.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The support action was committed. `notified` is true iff this
    /// submission crossed the threshold and the notification was delivered.
    Accepted { count: u32, notified: bool },
    /// Policy rejection; nothing changed and no dispatch was attempted.
    Rejected(RejectReason),
    /// The required notification failed; the session rolled back to idle.
    Failed(NotifyError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_follows_flags() {
        let mut snapshot = SessionSnapshot {
            count: 0,
            target_count: 5,
            has_supported: false,
            is_submitting: false,
        };
        assert_eq!(snapshot.phase(), SessionPhase::Idle);

        snapshot.is_submitting = true;
        assert_eq!(snapshot.phase(), SessionPhase::Submitting);

        snapshot.is_submitting = false;
        snapshot.has_supported = true;
        assert_eq!(snapshot.phase(), SessionPhase::Supported);
    }

    #[test]
    fn progress_clamps_at_full() {
        let snapshot = SessionSnapshot {
            count: 7,
            target_count: 5,
            has_supported: true,
            is_submitting: false,
        };
        assert_eq!(snapshot.progress(), 1.0);
    }

    #[test]
    fn reject_reason_serializes_snake_case() {
        let json = serde_json::to_string(&RejectReason::SubmissionInFlight).expect("json");
        assert_eq!(json, "\"submission_in_flight\"");
    }
}
