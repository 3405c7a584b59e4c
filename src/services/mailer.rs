use async_trait::async_trait;
use serde::Serialize;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::MailConfig;

/// One outgoing email, in the shape the relay API accepts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail relay is not configured")]
    NotConfigured,

    #[error("no recipient address on file")]
    MissingRecipient,

    #[error("mail relay request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("mail relay rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError>;
}

/// Transactional mail relay reached over HTTPS with a bearer API key
pub struct RelayMailer {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl RelayMailer {
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        let api_key = config.api_key.clone().ok_or(MailError::NotConfigured)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key,
        })
    }
}

#[async_trait]
impl Mailer for RelayMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!("Relay accepted '{}' for {:?}", message.subject, message.to);
        Ok(())
    }
}

/// Stand-in used when no relay key is configured; every send fails
pub struct DisabledMailer;

#[async_trait]
impl Mailer for DisabledMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        warn!("Mail relay not configured, dropping '{}'", message.subject);
        Err(MailError::NotConfigured)
    }
}

/// Keeps sent messages in memory. Can be switched to fail every send.
#[derive(Default)]
pub struct MemoryMailer {
    outbox: Mutex<Vec<EmailMessage>>,
    failing: bool,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mailer whose relay always rejects
    pub fn failing() -> Self {
        Self {
            outbox: Mutex::new(Vec::new()),
            failing: true,
        }
    }

    /// Every message handed to the relay so far, including rejected ones
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.outbox.lock().map(|outbox| outbox.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        if let Ok(mut outbox) = self.outbox.lock() {
            outbox.push(message.clone());
        }
        if self.failing {
            return Err(MailError::Rejected {
                status: 503,
                body: "relay unavailable".to_string(),
            });
        }
        Ok(())
    }
}
