use std::sync::Arc;

use emailjs_integration::{EmailMessage, Notifier};
use shared::domain::{RejectReason, SessionSnapshot, SubmitOutcome};
use tokio::sync::Mutex;
use tracing::{error, info};

pub mod config;

const NOTIFY_SUBJECT: &str = "A proposal has reached its participation target!";

struct SupportSession {
    count: u32,
    has_supported: bool,
    is_submitting: bool,
}

/// Owns one visitor session's support state and decides when the threshold
/// notification goes out. The session is never persisted; it lives and dies
/// with the controller.
pub struct SupportController {
    session: Mutex<SupportSession>,
    target_count: u32,
    notify_recipient: String,
    notifier: Arc<dyn Notifier>,
}

impl SupportController {
    pub fn new(
        target_count: u32,
        notify_recipient: impl Into<String>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self::with_starting_count(target_count, notify_recipient, notifier, 0)
    }

    /// Starts the session with the tally already at `starting_count`, for
    /// callers that carry a count forward from elsewhere.
    pub fn with_starting_count(
        target_count: u32,
        notify_recipient: impl Into<String>,
        notifier: Arc<dyn Notifier>,
        starting_count: u32,
    ) -> Self {
        Self {
            session: Mutex::new(SupportSession {
                count: starting_count,
                has_supported: false,
                is_submitting: false,
            }),
            target_count: target_count.max(1),
            notify_recipient: notify_recipient.into(),
            notifier,
        }
    }

    /// Read-only projection for the presentation layer.
    pub async fn snapshot(&self) -> SessionSnapshot {
        let session = self.session.lock().await;
        SessionSnapshot {
            count: session.count,
            target_count: self.target_count,
            has_supported: session.has_supported,
            is_submitting: session.is_submitting,
        }
    }

    /// Registers this session's single support action.
    ///
    /// A session may support at most once, and only one submission may be in
    /// flight at a time; anything else is rejected without side effects.
    /// When the increment first reaches the target, the notification is
    /// dispatched before anything is committed: a failed dispatch leaves the
    /// session unchanged and eligible for retry.
    pub async fn submit(&self) -> SubmitOutcome {
        let (new_count, crossing) = {
            let mut session = self.session.lock().await;
            if session.has_supported {
                return SubmitOutcome::Rejected(RejectReason::AlreadySupported);
            }
            if session.is_submitting {
                return SubmitOutcome::Rejected(RejectReason::SubmissionInFlight);
            }
            session.is_submitting = true;
            let new_count = session.count + 1;
            let crossing = session.count < self.target_count && new_count >= self.target_count;
            (new_count, crossing)
        };

        // The lock is released across the dispatch; `is_submitting` keeps
        // further submissions out while this one is suspended.
        if crossing {
            let message = self.threshold_message(new_count);
            if let Err(err) = self.notifier.send(&message).await {
                error!(%err, "threshold notification failed; support not recorded");
                let mut session = self.session.lock().await;
                session.is_submitting = false;
                return SubmitOutcome::Failed(err);
            }
        }

        let mut session = self.session.lock().await;
        session.count = new_count;
        session.has_supported = true;
        session.is_submitting = false;
        info!(count = new_count, notified = crossing, "support recorded");
        SubmitOutcome::Accepted {
            count: new_count,
            notified: crossing,
        }
    }

    fn threshold_message(&self, count: u32) -> EmailMessage {
        EmailMessage {
            to_email: self.notify_recipient.clone(),
            subject: NOTIFY_SUBJECT.to_string(),
            message: format!(
                "Hello,\n\n\
                The proposal you submitted has reached its participation target \
                ({} supporters)!\n\n\
                Current supporter count: {}\n\n\
                This message was sent automatically when the target was reached.",
                self.target_count, count
            ),
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
