//! Guest conversations with the widget.
//!
//! A conversation belongs to exactly one business and one guest. Messages are
//! immutable once stored; the conversation only tracks counters and times.

mod conversation;
mod message;

pub use conversation::Conversation;
pub use message::{ChatMessage, MessageRole, ReplySource, MAX_MESSAGE_CHARS};
pub(crate) use message::validate_guest_text;
