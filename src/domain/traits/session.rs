use async_trait::async_trait;

use crate::application::errors::SessionError;
use crate::domain::entities::{GroupInfo, Identity, MediaRef, OutboundMessage, SendReceipt};

/// Kind hint passed alongside a media upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Document,
}

/// MessagingSession trait - abstraction over the established client session.
///
/// Session setup, pairing and the wire protocol live behind this seam;
/// this core only issues calls against it.
#[async_trait]
pub trait MessagingSession: Send + Sync {
    /// Send an outbound message to a chat or user
    async fn send_message(
        &self,
        to: &Identity,
        message: &OutboundMessage,
    ) -> Result<SendReceipt, SessionError>;

    /// Upload raw media bytes, yielding a server-side reference
    async fn upload_media(&self, data: &[u8], kind: MediaKind) -> Result<MediaRef, SessionError>;

    /// Fetch the bytes behind a media reference
    async fn download_media(&self, media: &MediaRef) -> Result<Vec<u8>, SessionError>;

    /// Mint a fresh message ID
    fn generate_message_id(&self) -> String;

    /// Look up metadata for a joined group
    async fn get_group_info(&self, group: &Identity) -> Result<GroupInfo, SessionError>;

    /// List all groups the session has joined
    async fn list_joined_groups(&self) -> Result<Vec<GroupInfo>, SessionError>;
}
