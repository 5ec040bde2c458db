use tracing::info;

use crate::config::MailConfig;

/// Outbound notifications.
pub trait MailService: Send + Sync {
    fn send(&self, subject: &str, message: &str);
}

/// Writes mail to the log instead of delivering it.
#[derive(Debug, Clone)]
pub struct LocalMailService {
    to: String,
    from: String,
}

impl LocalMailService {
    pub fn new(config: &MailConfig) -> Self {
        Self {
            to: config.to.clone(),
            from: config.from.clone(),
        }
    }
}

impl MailService for LocalMailService {
    fn send(&self, subject: &str, message: &str) {
        info!(
            from = %self.from,
            to = %self.to,
            subject,
            "Mail sent with {}: {}",
            std::any::type_name::<Self>(),
            message
        );
    }
}
