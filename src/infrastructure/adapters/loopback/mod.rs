//! Loopback adapter for development/dry runs
//!
//! Stands in for a paired client session: sends are printed and echoed
//! back as inbound events, uploads are held in memory so downloads can
//! return them, and the event sink writes files under the configured
//! downloads directory.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::Mutex;
use uuid::Uuid;

use crate::application::errors::SessionError;
use crate::domain::entities::{
    Attachment, ExtendedText, GroupInfo, Identity, InboundMessage, MediaRef, OutboundMessage,
    QuotedPayload, ReplyContext, SendReceipt,
};
use crate::domain::traits::{EventSink, MediaKind, MessagingSession};

/// Dry-run session adapter
pub struct LoopbackSession {
    id_prefix: String,
    media: Mutex<HashMap<String, Vec<u8>>>,
    inbox: Mutex<VecDeque<InboundMessage>>,
}

impl LoopbackSession {
    pub fn new(id_prefix: impl Into<String>) -> Self {
        Self {
            id_prefix: id_prefix.into(),
            media: Mutex::new(HashMap::new()),
            inbox: Mutex::new(VecDeque::new()),
        }
    }

    /// Next echoed inbound event, if a send produced one
    pub fn take_inbound(&self) -> Option<InboundMessage> {
        self.inbox.lock().unwrap().pop_front()
    }

    /// Mirror an outbound message as the inbound event a transport would
    /// deliver for it
    fn echo_inbound(&self, id: String, to: &Identity, message: &OutboundMessage) -> InboundMessage {
        let mut evt = InboundMessage::new(id, to.clone()).with_raw(serde_json::json!({
            "adapter": "loopback",
            "to": to.to_string(),
        }));
        match message {
            OutboundMessage::Conversation { text }
            | OutboundMessage::ScriptedBroadcast { body: text } => {
                evt = evt.with_conversation(text.clone());
            }
            OutboundMessage::TextReply { text, quote }
            | OutboundMessage::ImageReply { text, quote } => {
                evt = evt.with_extended(ExtendedText {
                    text: text.clone(),
                    context: Some(ReplyContext {
                        participant: Some(quote.participant.clone()),
                        stanza_id: Some(quote.stanza_id.clone()),
                        quoted: quote.quoted.clone(),
                    }),
                });
                if let Some(QuotedPayload::Image(image)) = &quote.quoted {
                    evt = evt.with_attachment(Attachment::Downloadable {
                        media: image.media.clone(),
                        mimetype: image.mimetype.clone(),
                    });
                }
            }
        }
        evt
    }
}

#[async_trait]
impl MessagingSession for LoopbackSession {
    async fn send_message(
        &self,
        to: &Identity,
        message: &OutboundMessage,
    ) -> Result<SendReceipt, SessionError> {
        println!("[loopback] -> {}: {:?}", to, message);
        let receipt = SendReceipt {
            id: self.generate_message_id(),
            timestamp: Utc::now(),
        };
        let echo = self.echo_inbound(receipt.id.clone(), to, message);
        self.inbox.lock().unwrap().push_back(echo);
        Ok(receipt)
    }

    async fn upload_media(&self, data: &[u8], kind: MediaKind) -> Result<MediaRef, SessionError> {
        tracing::info!("[loopback] upload of {} bytes ({:?})", data.len(), kind);
        let token = Uuid::new_v4();
        let key: Vec<u8> = token
            .into_bytes()
            .iter()
            .chain(token.into_bytes().iter())
            .copied()
            .collect();
        let direct_path = format!("/v/t62.7118-24/{}", token.simple());
        self.media
            .lock()
            .unwrap()
            .insert(direct_path.clone(), data.to_vec());
        Ok(MediaRef {
            direct_path,
            media_key: key.clone(),
            file_enc_sha256: key.clone(),
            file_sha256: key,
            file_length: data.len() as u64,
        })
    }

    async fn download_media(&self, media: &MediaRef) -> Result<Vec<u8>, SessionError> {
        self.media
            .lock()
            .unwrap()
            .get(&media.direct_path)
            .cloned()
            .ok_or_else(|| {
                SessionError::Download(format!(
                    "loopback session holds no media at {}",
                    media.direct_path
                ))
            })
    }

    fn generate_message_id(&self) -> String {
        format!(
            "{}{}",
            self.id_prefix,
            Uuid::new_v4().simple().to_string().to_uppercase()
        )
    }

    async fn get_group_info(&self, group: &Identity) -> Result<GroupInfo, SessionError> {
        Err(SessionError::Lookup(format!(
            "loopback session has not joined {}",
            group
        )))
    }

    async fn list_joined_groups(&self) -> Result<Vec<GroupInfo>, SessionError> {
        Ok(vec![])
    }
}

/// Event sink that writes projected files to a local directory
pub struct FileSink {
    directory: PathBuf,
}

impl FileSink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

#[async_trait]
impl EventSink for FileSink {
    async fn post_file(
        &self,
        kind: &str,
        _event: &InboundMessage,
        file_name: &str,
        data: &[u8],
    ) -> Result<(), SessionError> {
        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(|e| SessionError::Sink(e.to_string()))?;
        let path = self.directory.join(file_name);
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| SessionError::Sink(e.to_string()))?;
        tracing::info!("[{}] saved {}", kind, path.display());
        Ok(())
    }

    async fn post_error(&self, kind: &str, note: &str, event: &InboundMessage) {
        tracing::error!("[{}] {} (event {})", kind, note, event.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{ForgedQuote, Server};

    #[tokio::test]
    async fn generated_ids_carry_the_configured_prefix() {
        let session = LoopbackSession::new("3EB0");
        let id = session.generate_message_id();
        assert!(id.starts_with("3EB0"));
        assert!(id.len() > 4);
        assert_ne!(id, session.generate_message_id());
    }

    #[tokio::test]
    async fn uploads_fabricate_a_consistent_reference() {
        let session = LoopbackSession::new("3EB0");
        let media = session
            .upload_media(&[1, 2, 3, 4], MediaKind::Image)
            .await
            .unwrap();
        assert_eq!(media.file_length, 4);
        assert_eq!(media.media_key.len(), 32);
        assert!(media.direct_path.starts_with("/v/t62.7118-24/"));
    }

    #[tokio::test]
    async fn uploaded_media_can_be_downloaded_back() {
        let session = LoopbackSession::new("3EB0");
        let media = session
            .upload_media(&[9, 8, 7], MediaKind::Image)
            .await
            .unwrap();
        assert_eq!(session.download_media(&media).await.unwrap(), vec![9, 8, 7]);
    }

    #[tokio::test]
    async fn unknown_media_references_fail_to_download() {
        let session = LoopbackSession::new("3EB0");
        let missing = MediaRef {
            direct_path: "/v/t62.7118-24/never-uploaded".to_string(),
            media_key: vec![],
            file_enc_sha256: vec![],
            file_sha256: vec![],
            file_length: 0,
        };
        assert!(session.download_media(&missing).await.is_err());
    }

    #[tokio::test]
    async fn sends_echo_back_as_inbound_events() {
        let session = LoopbackSession::new("3EB0");
        let to = Identity::new("5511999", Server::User);

        session
            .send_message(
                &to,
                &OutboundMessage::Conversation {
                    text: "oi".to_string(),
                },
            )
            .await
            .unwrap();

        let evt = session.take_inbound().unwrap();
        assert_eq!(evt.chat, to);
        assert_eq!(evt.conversation.as_deref(), Some("oi"));
        assert!(session.take_inbound().is_none());
    }

    #[tokio::test]
    async fn echoed_replies_keep_the_forged_context() {
        let session = LoopbackSession::new("3EB0");
        let to = Identity::new("5511999", Server::User);
        let forged = Identity::new("5511888", Server::User);

        session
            .send_message(
                &to,
                &OutboundMessage::TextReply {
                    text: "World".to_string(),
                    quote: ForgedQuote::new(&forged, "STANZA1").with_text("Hello"),
                },
            )
            .await
            .unwrap();

        let evt = session.take_inbound().unwrap();
        let extended = evt.extended.as_ref().unwrap();
        assert_eq!(extended.text, "World");
        let context = extended.context.as_ref().unwrap();
        assert_eq!(context.participant.as_deref(), Some("5511888@s.whatsapp.net"));
        assert_eq!(
            context.quoted,
            Some(QuotedPayload::Text("Hello".to_string()))
        );
    }

    #[tokio::test]
    async fn command_flow_replies_to_the_echoed_event() {
        use crate::application::messaging::Dispatcher;
        use crate::domain::traits::MessagingSession;
        use std::sync::Arc;

        let session = Arc::new(LoopbackSession::new("3EB0"));
        let dispatcher = Dispatcher::new(Arc::clone(&session) as Arc<dyn MessagingSession>);

        let report = dispatcher
            .dispatch("send-spoofed-reply 5511999 ! 5511888 Hello|World", None)
            .await;
        assert!(report.contains("mensagem disparada"));
        let echoed = session.take_inbound().unwrap();

        let report = dispatcher
            .dispatch(
                "spoofed-reply-this 5511999 ! 5511777 agora sim",
                Some(&echoed),
            )
            .await;
        assert!(report.contains("[spoofed-reply-this] mensagem disparada"));

        let reforged = session.take_inbound().unwrap();
        let context = reforged.extended.unwrap().context.unwrap();
        assert_eq!(context.participant.as_deref(), Some("5511777@s.whatsapp.net"));
        assert_eq!(
            context.quoted,
            Some(QuotedPayload::Text("Hello".to_string()))
        );
    }

    #[tokio::test]
    async fn file_sink_writes_under_its_directory() {
        let dir = std::env::temp_dir().join("spoofcraft-sink-test");
        let sink = FileSink::new(&dir);
        let evt = InboundMessage::new("EVT", Identity::new("5511999", Server::User));

        sink.post_file("Message", &evt, "EVT.vcf", b"BEGIN:VCARD")
            .await
            .unwrap();
        let written = std::fs::read(dir.join("EVT.vcf")).unwrap();
        assert_eq!(written, b"BEGIN:VCARD");
        std::fs::remove_dir_all(&dir).ok();
    }
}
