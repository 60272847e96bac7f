//! Message composer - builds outbound message structures and hands them
//! to the session for dispatch

use std::path::Path;
use std::sync::Arc;

use crate::application::errors::ComposeError;
use crate::domain::entities::{
    ForgedQuote, Identity, ImageAttachment, InboundMessage, OutboundMessage, ScriptVariant,
    SendReceipt,
};
use crate::domain::traits::{MediaKind, MessagingSession};

/// Sniff a mimetype from the leading bytes of the payload. The file
/// extension is never consulted.
fn detect_mime(data: &[u8]) -> String {
    infer::get(data)
        .map(|kind| kind.mime_type().to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string())
}

/// Builds outbound messages and sends them through the session.
/// One send per call, no retries.
pub struct Composer {
    session: Arc<dyn MessagingSession>,
}

impl Composer {
    pub fn new(session: Arc<dyn MessagingSession>) -> Self {
        Self { session }
    }

    async fn send(
        &self,
        to: &Identity,
        message: OutboundMessage,
    ) -> Result<(OutboundMessage, SendReceipt), ComposeError> {
        match self.session.send_message(to, &message).await {
            Ok(receipt) => {
                tracing::info!("Message sent (server timestamp: {})", receipt.timestamp);
                Ok((message, receipt))
            }
            Err(err) => {
                tracing::error!("Error sending message: {}", err);
                Err(err.into())
            }
        }
    }

    /// Plain conversation text, no quoted context
    pub async fn conversation(
        &self,
        to: &Identity,
        text: &str,
    ) -> Result<(OutboundMessage, SendReceipt), ComposeError> {
        let message = OutboundMessage::Conversation {
            text: text.to_string(),
        };
        self.send(to, message).await
    }

    /// Text reply whose quoted context attributes a synthesized
    /// conversation message to `forged_from`
    pub async fn text_reply(
        &self,
        to: &Identity,
        forged_from: &Identity,
        stanza_id: &str,
        quoted_text: &str,
        reply_text: &str,
    ) -> Result<(OutboundMessage, SendReceipt), ComposeError> {
        let message = OutboundMessage::TextReply {
            text: reply_text.to_string(),
            quote: ForgedQuote::new(forged_from, stanza_id).with_text(quoted_text),
        };
        self.send(to, message).await
    }

    /// Image reply whose quoted context attributes an uploaded image to
    /// `forged_from`. Reads the file, uploads it, then builds the quote
    /// around the returned media reference.
    pub async fn image_reply(
        &self,
        to: &Identity,
        forged_from: &Identity,
        stanza_id: &str,
        path: &Path,
        quoted_caption: &str,
        reply_text: &str,
    ) -> Result<(OutboundMessage, SendReceipt), ComposeError> {
        let data = tokio::fs::read(path).await.map_err(|source| {
            tracing::error!("Failed to read {}: {}", path.display(), source);
            ComposeError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let uploaded = self
            .session
            .upload_media(&data, MediaKind::Image)
            .await
            .map_err(|err| {
                tracing::error!("Failed to upload file: {}", err);
                err
            })?;

        let mimetype = detect_mime(&data);
        let image = ImageAttachment::new(quoted_caption, uploaded, mimetype);
        let message = OutboundMessage::ImageReply {
            text: reply_text.to_string(),
            quote: ForgedQuote::new(forged_from, stanza_id).with_image(image),
        };
        self.send(to, message).await
    }

    /// Scripted demo broadcast. The spoofed identity is reported in the
    /// log line only; this variant cannot forge sender attribution.
    pub async fn scripted_broadcast(
        &self,
        to: &Identity,
        spoofed_from: &Identity,
        variant: ScriptVariant,
    ) -> Result<(OutboundMessage, SendReceipt), ComposeError> {
        let message = OutboundMessage::ScriptedBroadcast {
            body: variant.body().to_string(),
        };
        let sent = self.send(to, message).await?;
        tracing::info!(
            "mensagem disparada para {}, via ({} - num conectado)",
            to,
            spoofed_from
        );
        Ok(sent)
    }

    /// Re-forge attribution on an existing quote: lifts the quoted chain
    /// out of a received message and overwrites its participant with
    /// `forged_from`
    pub async fn reply_from(
        &self,
        to: &Identity,
        forged_from: &Identity,
        stanza_id: &str,
        reply_text: &str,
        source: &InboundMessage,
    ) -> Result<(OutboundMessage, SendReceipt), ComposeError> {
        let message = OutboundMessage::TextReply {
            text: reply_text.to_string(),
            quote: ForgedQuote::new(forged_from, stanza_id)
                .with_payload(source.quoted_payload().cloned()),
        };
        self.send(to, message).await
    }
}
