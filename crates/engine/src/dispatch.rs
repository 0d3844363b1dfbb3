//! Outbound notification seam.

use async_trait::async_trait;

/// Where scheduler announcements go. Implementations deliver to a chat
/// platform, a log, or a test buffer.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn send(&self, text: &str) -> anyhow::Result<()>;
}
