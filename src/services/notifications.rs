use std::sync::Arc;
use tracing::{info, warn};

use super::mailer::{EmailMessage, MailError, Mailer};
use super::templates::{self, RenderedEmail, SiteInfo};
use crate::config::AppConfig;
use crate::database::models::{ClientRequest, Form};

/// Formats and dispatches the site's transactional email
pub struct Notifier {
    mailer: Arc<dyn Mailer>,
    from: String,
    admin_address: Option<String>,
    site: SiteInfo,
}

impl Notifier {
    pub fn new(mailer: Arc<dyn Mailer>, config: &AppConfig) -> Self {
        Self {
            mailer,
            from: config.mail.from_address.clone(),
            admin_address: config.mail.admin_address.clone(),
            site: SiteInfo {
                name: config.server.site_name.clone(),
                url: config.server.site_url.clone(),
            },
        }
    }

    fn message(&self, to: &str, email: RenderedEmail, reply_to: Option<&str>) -> EmailMessage {
        EmailMessage {
            from: self.from.clone(),
            to: vec![to.to_string()],
            subject: email.subject,
            html: email.html,
            reply_to: reply_to.map(str::to_string),
        }
    }

    /// Tell the admin about a new request and send the requester a receipt.
    /// Both sends are best-effort: failures are logged, never returned.
    pub async fn request_received(&self, request: &ClientRequest, form: Option<&Form>) {
        let admin = async {
            let Some(admin) = self.admin_address.as_deref() else {
                warn!("MAIL_ADMIN_ADDRESS not set, skipping notification for request {}", request.id);
                return;
            };
            let email = match form {
                Some(form) => templates::submission_notification(&self.site, request, form),
                None => templates::inquiry_notification(&self.site, request),
            };
            let message = self.message(admin, email, request.reply_address());
            if let Err(e) = self.mailer.send(&message).await {
                warn!("Admin notification for request {} failed: {}", request.id, e);
            }
        };

        let receipt = async {
            let Some(to) = request.reply_address() else {
                return;
            };
            let message = self.message(to, templates::acknowledgement(&self.site, request), None);
            if let Err(e) = self.mailer.send(&message).await {
                warn!("Acknowledgement for request {} failed: {}", request.id, e);
            }
        };

        futures::join!(admin, receipt);
    }

    /// Email an admin reply to the requester. Fails before touching the relay
    /// when the request has no address on file.
    pub async fn send_reply(&self, request: &ClientRequest, message: &str) -> Result<(), MailError> {
        let to = request.reply_address().ok_or(MailError::MissingRecipient)?;
        let email = templates::admin_reply(&self.site, request, message);
        let outgoing = self.message(to, email, self.admin_address.as_deref());

        self.mailer.send(&outgoing).await?;
        info!("Reply sent for request {}", request.id);
        Ok(())
    }
}
