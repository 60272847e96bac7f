//! Inbound event projector - text extraction and attachment download

use std::sync::Arc;

use crate::application::errors::EventError;
use crate::domain::entities::{Attachment, InboundMessage};
use crate::domain::traits::{EventSink, MessagingSession};

/// Plain text carried by an inbound event: conversation text if present,
/// else the extended-text body, else empty. First match wins.
pub fn extract_text(evt: &InboundMessage) -> String {
    if let Some(text) = &evt.conversation {
        return text.clone();
    }
    if let Some(extended) = &evt.extended {
        return extended.text.clone();
    }
    String::new()
}

/// Projects inbound attachments out to an event sink
pub struct EventProjector {
    session: Arc<dyn MessagingSession>,
    sink: Arc<dyn EventSink>,
}

impl EventProjector {
    pub fn new(session: Arc<dyn MessagingSession>, sink: Arc<dyn EventSink>) -> Self {
        Self { session, sink }
    }

    /// Write the event's attachment through the sink, fetching bytes from
    /// the session when the attachment is server-held. Failures are
    /// reported to the sink before being propagated.
    pub async fn download_attachment(
        &self,
        kind: &str,
        evt: &InboundMessage,
    ) -> Result<(), EventError> {
        let Some(attachment) = &evt.attachment else {
            return Err(EventError::MissingFile);
        };
        let file_name = format!("{}.{}", evt.id, attachment.extension());

        let posted = match attachment {
            Attachment::Contact { vcard } => {
                self.sink
                    .post_file(kind, evt, &file_name, vcard.as_bytes())
                    .await
            }
            Attachment::Downloadable { media, .. } => {
                let data = match self.session.download_media(media).await {
                    Ok(data) => data,
                    Err(err) => {
                        self.sink
                            .post_error(kind, &format!("{} Failed to download", kind), evt)
                            .await;
                        return Err(err.into());
                    }
                };
                self.sink.post_file(kind, evt, &file_name, &data).await
            }
        };

        if let Err(err) = posted {
            self.sink
                .post_error(kind, &format!("{} Failed to save event", kind), evt)
                .await;
            return Err(err.into());
        }
        Ok(())
    }
}
