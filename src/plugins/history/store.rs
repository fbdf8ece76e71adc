//! In-memory conversation store.
//!
//! Conversations live only for the lifetime of the process. The list is kept
//! newest-first (new conversations are prepended) and each conversation's
//! message list is append-only.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use uuid::Uuid;

use crate::services::events::{Events, SessionEvent};

use super::HistoryError;
use super::title;
use super::types::{Conversation, ConversationSummary, Message};

pub(crate) fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

pub(crate) fn new_id(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4())
}

/// How a request claims the loading flag of its conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Typed input: refused while anything else is in flight.
    Exclusive,
    /// Upload batches: several may overlap in one conversation, but none
    /// starts while typed input is in flight.
    Shared,
}

/// Outstanding calls of one conversation.
#[derive(Debug, Default)]
struct InFlight {
    count: usize,
    exclusive: bool,
}

#[derive(Default)]
struct HistoryState {
    conversations: Vec<Conversation>,
    current_id: Option<String>,
    in_flight: HashMap<String, InFlight>,
}

#[derive(Clone, Default)]
pub struct HistoryStore {
    inner: Arc<HistoryStoreInner>,
}

#[derive(Default)]
struct HistoryStoreInner {
    // Never held across an await point.
    state: Mutex<HistoryState>,
    events: Events,
}

/// Keeps the conversation's loading flag raised until dropped.
pub struct RequestGuard {
    store: HistoryStore,
    conversation_id: String,
    kind: RequestKind,
}

impl RequestGuard {
    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }
}

impl Drop for RequestGuard {
    fn drop(&mut self) {
        self.store.end_request(&self.conversation_id, self.kind);
    }
}

impl HistoryStore {
    pub fn new(events: Events) -> Self {
        Self {
            inner: Arc::new(HistoryStoreInner {
                state: Mutex::new(HistoryState::default()),
                events,
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HistoryState>, HistoryError> {
        self.inner
            .state
            .lock()
            .map_err(|_| HistoryError::internal("History store lock poisoned"))
    }

    /// Prepend a new empty conversation for `topic` and make it current.
    pub fn start_conversation(&self, topic: &str) -> Result<Conversation, HistoryError> {
        let conversation = Conversation::new(new_id("conv"), topic.to_string(), now_ms());
        {
            let mut state = self.lock()?;
            state.conversations.insert(0, conversation.clone());
            state.current_id = Some(conversation.id.clone());
        }

        log::debug!(
            "Started conversation {} on topic {:?}",
            conversation.id,
            conversation.topic
        );
        self.inner.events.emit(SessionEvent::ConversationStarted {
            conversation_id: conversation.id.clone(),
            topic: conversation.topic.clone(),
        });
        Ok(conversation)
    }

    /// Make `conversation_id` current. Unknown ids leave nothing selected.
    pub fn select_conversation(
        &self,
        conversation_id: &str,
    ) -> Result<Option<Conversation>, HistoryError> {
        let mut state = self.lock()?;
        let found = state
            .conversations
            .iter()
            .find(|c| c.id == conversation_id)
            .cloned();
        state.current_id = found.as_ref().map(|c| c.id.clone());
        Ok(found)
    }

    /// Remove a conversation. Returns the id that is current afterwards.
    ///
    /// Deleting the current conversation moves the selection to the first
    /// remaining conversation in stored order, or to nothing.
    pub fn delete_conversation(
        &self,
        conversation_id: &str,
    ) -> Result<Option<String>, HistoryError> {
        let mut state = self.lock()?;
        let Some(index) = state
            .conversations
            .iter()
            .position(|c| c.id == conversation_id)
        else {
            return Err(HistoryError::not_found("Conversation not found"));
        };

        state.conversations.remove(index);
        state.in_flight.remove(conversation_id);
        if state.current_id.as_deref() == Some(conversation_id) {
            state.current_id = state.conversations.first().map(|c| c.id.clone());
        }
        Ok(state.current_id.clone())
    }

    /// Append to a conversation. The first message also fixes its title.
    pub fn append_message(
        &self,
        conversation_id: &str,
        message: Message,
    ) -> Result<(), HistoryError> {
        let message_id = message.id.clone();
        let is_user = message.is_user;
        {
            let mut state = self.lock()?;
            let conversation = state
                .conversations
                .iter_mut()
                .find(|c| c.id == conversation_id)
                .ok_or_else(|| HistoryError::not_found("Conversation not found"))?;

            if conversation.messages.is_empty() {
                conversation.title = title::title_from_first_message(&message.content);
            }
            conversation.messages.push(message);
        }

        self.inner.events.emit(SessionEvent::MessageAppended {
            conversation_id: conversation_id.to_string(),
            message_id,
            is_user,
        });
        Ok(())
    }

    /// Sidebar listing.
    ///
    /// Empty query: every conversation, newest first. Otherwise only titles
    /// containing the query (case-insensitive), sorted alphabetically.
    pub fn search(&self, query: &str) -> Result<Vec<ConversationSummary>, HistoryError> {
        let state = self.lock()?;
        let current_id = state.current_id.as_deref();
        let query = query.trim().to_lowercase();

        let mut out: Vec<ConversationSummary> = state
            .conversations
            .iter()
            .filter(|c| query.is_empty() || c.title.to_lowercase().contains(&query))
            .map(|c| c.summary(current_id))
            .collect();

        if query.is_empty() {
            out.sort_by(|a, b| b.created_at_ms.cmp(&a.created_at_ms));
        } else {
            out.sort_by(|a, b| {
                a.title
                    .to_lowercase()
                    .cmp(&b.title.to_lowercase())
                    .then_with(|| a.title.cmp(&b.title))
            });
        }
        Ok(out)
    }

    pub fn get(&self, conversation_id: &str) -> Result<Conversation, HistoryError> {
        self.lock()?
            .conversations
            .iter()
            .find(|c| c.id == conversation_id)
            .cloned()
            .ok_or_else(|| HistoryError::not_found("Conversation not found"))
    }

    pub fn current_id(&self) -> Result<Option<String>, HistoryError> {
        Ok(self.lock()?.current_id.clone())
    }

    pub fn current(&self) -> Result<Option<Conversation>, HistoryError> {
        let state = self.lock()?;
        let Some(id) = state.current_id.as_deref() else {
            return Ok(None);
        };
        Ok(state.conversations.iter().find(|c| c.id == id).cloned())
    }

    pub fn is_loading(&self, conversation_id: &str) -> bool {
        self.lock()
            .map(|state| state.in_flight.get(conversation_id).is_some_and(|f| f.count > 0))
            .unwrap_or(false)
    }

    /// Raise the loading flag for an outbound call on `conversation_id`.
    pub fn begin_request(
        &self,
        conversation_id: &str,
        kind: RequestKind,
    ) -> Result<RequestGuard, HistoryError> {
        let raised = {
            let mut state = self.lock()?;
            if !state.conversations.iter().any(|c| c.id == conversation_id) {
                return Err(HistoryError::not_found("Conversation not found"));
            }
            let flight = state
                .in_flight
                .entry(conversation_id.to_string())
                .or_default();
            let busy = match kind {
                RequestKind::Exclusive => flight.count > 0,
                RequestKind::Shared => flight.exclusive,
            };
            if busy {
                return Err(HistoryError::busy("Conversation is busy"));
            }
            flight.count += 1;
            flight.exclusive = kind == RequestKind::Exclusive;
            flight.count == 1
        };

        if raised {
            self.inner.events.emit(SessionEvent::LoadingChanged {
                conversation_id: conversation_id.to_string(),
                loading: true,
            });
        }

        Ok(RequestGuard {
            store: self.clone(),
            conversation_id: conversation_id.to_string(),
            kind,
        })
    }

    fn end_request(&self, conversation_id: &str, kind: RequestKind) {
        // Drop path: poisoning must not turn into a panic here.
        let lowered = match self.inner.state.lock() {
            Ok(mut state) => match state.in_flight.get_mut(conversation_id) {
                Some(flight) if flight.count > 1 => {
                    flight.count -= 1;
                    if kind == RequestKind::Exclusive {
                        flight.exclusive = false;
                    }
                    false
                }
                Some(_) => {
                    state.in_flight.remove(conversation_id);
                    true
                }
                // Conversation deleted while the call was outstanding.
                None => true,
            },
            Err(_) => true,
        };

        if lowered {
            self.inner.events.emit(SessionEvent::LoadingChanged {
                conversation_id: conversation_id.to_string(),
                loading: false,
            });
        }
    }
}
