mod event;
mod identity;
mod message;
mod script;

pub use event::{Attachment, ExtendedText, InboundMessage, ReplyContext};
pub use identity::{Identity, Server, DEFAULT_USER_SERVER, GROUP_SERVER};
pub use message::{
    ForgedQuote, GroupInfo, ImageAttachment, MediaRef, OutboundMessage, QuotedPayload,
    SendReceipt, PLACEHOLDER_IMAGE_DIM,
};
pub use script::{Audience, ScriptVariant};
