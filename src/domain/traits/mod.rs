mod session;
mod sink;

pub use session::{MediaKind, MessagingSession};
pub use sink::EventSink;
