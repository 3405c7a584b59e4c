pub mod mailer;
pub mod notifications;
pub mod templates;

pub use mailer::{DisabledMailer, EmailMessage, MailError, Mailer, MemoryMailer, RelayMailer};
pub use notifications::Notifier;
