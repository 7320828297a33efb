use crate::errors::AppError;
use crate::models::RecipientId;
use async_trait::async_trait;
use tracing::info;

/// Outbound channel to a recipient. The chat transport lives behind this.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_text(&self, recipient_id: RecipientId, text: &str) -> Result<(), AppError>;
}

/// Writes outgoing messages to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_text(&self, recipient_id: RecipientId, text: &str) -> Result<(), AppError> {
        info!(recipient_id, "outgoing message:\n{text}");
        Ok(())
    }
}
