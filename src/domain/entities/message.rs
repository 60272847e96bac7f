use chrono::{DateTime, Utc};

use super::Identity;

/// Placeholder pixel dimensions stamped on quoted images.
/// Real dimensions are never probed.
pub const PLACEHOLDER_IMAGE_DIM: u32 = 100;

/// Reference to media held by the server, as returned by an upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRef {
    pub direct_path: String,
    pub media_key: Vec<u8>,
    pub file_enc_sha256: Vec<u8>,
    pub file_sha256: Vec<u8>,
    pub file_length: u64,
}

/// An image embedded as quoted content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub caption: String,
    pub media: MediaRef,
    pub mimetype: String,
    pub width: u32,
    pub height: u32,
    pub media_key_timestamp: i64,
}

impl ImageAttachment {
    pub fn new(caption: impl Into<String>, media: MediaRef, mimetype: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
            media,
            mimetype: mimetype.into(),
            width: PLACEHOLDER_IMAGE_DIM,
            height: PLACEHOLDER_IMAGE_DIM,
            media_key_timestamp: Utc::now().timestamp(),
        }
    }
}

/// Content carried inside a quoted context
#[derive(Debug, Clone, PartialEq)]
pub enum QuotedPayload {
    Text(String),
    Image(ImageAttachment),
}

/// Quoted-context of a reply, carrying the forged attribution.
///
/// The participant field names who the quoted content is presented as
/// coming from. It belongs to the quoted context only; the outer
/// envelope's sender stays the session's own authenticated identity.
#[derive(Debug, Clone, PartialEq)]
pub struct ForgedQuote {
    pub participant: String,
    pub stanza_id: String,
    pub quoted: Option<QuotedPayload>,
}

impl ForgedQuote {
    pub fn new(participant: &Identity, stanza_id: impl Into<String>) -> Self {
        Self {
            participant: participant.to_string(),
            stanza_id: stanza_id.into(),
            quoted: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.quoted = Some(QuotedPayload::Text(text.into()));
        self
    }

    pub fn with_image(mut self, image: ImageAttachment) -> Self {
        self.quoted = Some(QuotedPayload::Image(image));
        self
    }

    pub fn with_payload(mut self, payload: Option<QuotedPayload>) -> Self {
        self.quoted = payload;
        self
    }
}

/// An outbound message, built immediately before the send call
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundMessage {
    /// Plain conversation text, no quoted context
    Conversation { text: String },
    /// Text reply quoting content attributed to a forged participant
    TextReply { text: String, quote: ForgedQuote },
    /// Image reply quoting an uploaded image attributed to a forged participant
    ImageReply { text: String, quote: ForgedQuote },
    /// Scripted demo broadcast body
    ScriptedBroadcast { body: String },
}

impl OutboundMessage {
    /// Outer envelope text as the recipient sees it
    pub fn text(&self) -> &str {
        match self {
            OutboundMessage::Conversation { text } => text,
            OutboundMessage::TextReply { text, .. } => text,
            OutboundMessage::ImageReply { text, .. } => text,
            OutboundMessage::ScriptedBroadcast { body } => body,
        }
    }

    /// Forged participant of the quoted context, if this is a reply
    pub fn forged_participant(&self) -> Option<&str> {
        match self {
            OutboundMessage::TextReply { quote, .. } => Some(&quote.participant),
            OutboundMessage::ImageReply { quote, .. } => Some(&quote.participant),
            _ => None,
        }
    }

    pub fn quote(&self) -> Option<&ForgedQuote> {
        match self {
            OutboundMessage::TextReply { quote, .. } => Some(quote),
            OutboundMessage::ImageReply { quote, .. } => Some(quote),
            _ => None,
        }
    }
}

/// Acknowledgement returned by the session for a sent message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReceipt {
    pub id: String,
    pub timestamp: DateTime<Utc>,
}

/// Group metadata returned by group lookups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupInfo {
    pub jid: Identity,
    pub name: String,
    pub topic: Option<String>,
    pub participants: Vec<Identity>,
}
