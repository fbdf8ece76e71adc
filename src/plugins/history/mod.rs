//! In-memory conversation history.
//!
//! Owns the conversation list, the current selection and the per-conversation
//! loading flags. Nothing here survives a restart.

mod error;
mod store;
mod title;
mod types;

pub use error::HistoryError;
pub use store::{HistoryStore, RequestGuard, RequestKind};
pub(crate) use store::new_id;
pub use title::UNTITLED;
pub use types::{Conversation, ConversationSummary, Message};
