use async_trait::async_trait;

use crate::application::errors::SessionError;
use crate::domain::entities::InboundMessage;

/// EventSink trait - receiver for projected inbound events and their files
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Deliver a file extracted from an inbound event
    async fn post_file(
        &self,
        kind: &str,
        event: &InboundMessage,
        file_name: &str,
        data: &[u8],
    ) -> Result<(), SessionError>;

    /// Report an event that failed to project; best-effort, never fails
    async fn post_error(&self, kind: &str, note: &str, event: &InboundMessage);
}
