use thiserror::Error;

/// Failure reported by the notifier gateway. The controller passes it
/// through untouched; callers only ever inspect it for display.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("invalid notification payload: {0}")]
    InvalidPayload(String),
    #[error("notification transport failed: {0}")]
    Transport(String),
    #[error("notification endpoint rejected the message ({status}): {body}")]
    Rejected { status: u16, body: String },
}
