use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use shared::error::NotifyError;
use tracing::{info, warn};

const EMAILJS_API_BASE: &str = "https://api.emailjs.com";
const SEND_ENDPOINT: &str = "/api/v1.0/email/send";

/// Placeholder value shipped in unconfigured installs; a service id equal to
/// this means no real EmailJS account is wired up.
pub const SERVICE_ID_PLACEHOLDER: &str = "YOUR_SERVICE_ID";

/// Outbound notification payload. Field names double as the EmailJS
/// template parameter names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub to_email: String,
    pub subject: String,
    pub message: String,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotifyError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailJsConfig {
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
    /// Endpoint base; tests point this at a local server.
    pub api_base: String,
}

impl Default for EmailJsConfig {
    fn default() -> Self {
        Self {
            service_id: SERVICE_ID_PLACEHOLDER.into(),
            template_id: "YOUR_TEMPLATE_ID".into(),
            public_key: "YOUR_PUBLIC_KEY".into(),
            api_base: EMAILJS_API_BASE.into(),
        }
    }
}

impl EmailJsConfig {
    pub fn is_configured(&self) -> bool {
        !self.service_id.is_empty() && self.service_id != SERVICE_ID_PLACEHOLDER
    }
}

/// REST envelope understood by the EmailJS send endpoint.
#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a EmailMessage,
}

pub struct EmailJsNotifier {
    http: Client,
    config: EmailJsConfig,
}

impl EmailJsNotifier {
    pub fn new(config: EmailJsConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl Notifier for EmailJsNotifier {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotifyError> {
        if message.to_email.trim().is_empty() {
            return Err(NotifyError::InvalidPayload(
                "recipient address is empty".into(),
            ));
        }

        let request = SendEmailRequest {
            service_id: &self.config.service_id,
            template_id: &self.config.template_id,
            user_id: &self.config.public_key,
            template_params: message,
        };

        let response = self
            .http
            .post(format!("{}{}", self.config.api_base, SEND_ENDPOINT))
            .json(&request)
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "emailjs rejected notification");
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        info!(to_email = %message.to_email, "notification delivered");
        Ok(())
    }
}

/// Stand-in used when no EmailJS credentials are configured: performs no
/// network I/O and reports success, so callers follow their normal success
/// path.
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotifyError> {
        info!(
            to_email = %message.to_email,
            subject = %message.subject,
            "emailjs credentials not configured; treating notification as delivered"
        );
        Ok(())
    }
}

/// Test double that records every message instead of delivering it.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<EmailMessage>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// Pick the real sender when credentials are present, the no-op sender
/// otherwise.
pub fn notifier_from_config(config: &EmailJsConfig) -> Arc<dyn Notifier> {
    if config.is_configured() {
        Arc::new(EmailJsNotifier::new(config.clone()))
    } else {
        Arc::new(NoopNotifier)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
