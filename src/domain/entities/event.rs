use chrono::{DateTime, Utc};

use super::{Identity, MediaRef, QuotedPayload};

/// Attachment carried by an inbound message
#[derive(Debug, Clone, PartialEq)]
pub enum Attachment {
    /// Shared contact card; the payload is the vCard text itself
    Contact { vcard: String },
    /// Server-held media that must be fetched through the session
    Downloadable { media: MediaRef, mimetype: String },
}

impl Attachment {
    /// File extension used when the attachment is written out
    pub fn extension(&self) -> String {
        match self {
            Attachment::Contact { .. } => "vcf".to_string(),
            Attachment::Downloadable { mimetype, .. } => mime_guess::get_mime_extensions_str(mimetype)
                .and_then(|exts| exts.first())
                .map(|ext| ext.to_string())
                .unwrap_or_else(|| "bin".to_string()),
        }
    }
}

/// Reply context found on an inbound extended-text message
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReplyContext {
    pub participant: Option<String>,
    pub stanza_id: Option<String>,
    pub quoted: Option<QuotedPayload>,
}

/// Extended-text body of an inbound message
#[derive(Debug, Clone, PartialEq)]
pub struct ExtendedText {
    pub text: String,
    pub context: Option<ReplyContext>,
}

/// A message event received from the session
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    pub id: String,
    pub chat: Identity,
    pub conversation: Option<String>,
    pub extended: Option<ExtendedText>,
    pub attachment: Option<Attachment>,
    pub timestamp: DateTime<Utc>,
    pub raw: Option<serde_json::Value>,
}

impl InboundMessage {
    pub fn new(id: impl Into<String>, chat: Identity) -> Self {
        Self {
            id: id.into(),
            chat,
            conversation: None,
            extended: None,
            attachment: None,
            timestamp: Utc::now(),
            raw: None,
        }
    }

    pub fn with_conversation(mut self, text: impl Into<String>) -> Self {
        self.conversation = Some(text.into());
        self
    }

    pub fn with_extended(mut self, extended: ExtendedText) -> Self {
        self.extended = Some(extended);
        self
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    pub fn with_raw(mut self, raw: serde_json::Value) -> Self {
        self.raw = Some(raw);
        self
    }

    /// Quoted payload of the message this event was replying to, if any
    pub fn quoted_payload(&self) -> Option<&QuotedPayload> {
        self.extended
            .as_ref()
            .and_then(|e| e.context.as_ref())
            .and_then(|c| c.quoted.as_ref())
    }
}
