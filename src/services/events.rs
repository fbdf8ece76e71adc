//! State notifications for whatever front end drives the dashboard.
//!
//! Every mutation that a view would re-render on is published here. The shell
//! subscribes through an unbounded channel; library users that do not care
//! can use [`Events::noop`].

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;

/// Event name for a freshly started conversation
pub const EVT_CONVERSATION_STARTED: &str = "conversation-started";
/// Event name for an appended message
pub const EVT_MESSAGE_APPENDED: &str = "message-appended";
/// Event name for loading flag transitions
pub const EVT_LOADING_CHANGED: &str = "loading-changed";
/// Event name for upload lifecycle changes
pub const EVT_UPLOAD: &str = "upload";
/// Event name for auth state changes
pub const EVT_AUTH: &str = "auth";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Home,
    Login,
    Dashboard,
    Profile,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SessionEvent {
    #[serde(rename_all = "camelCase")]
    ConversationStarted {
        conversation_id: String,
        topic: String,
    },
    #[serde(rename_all = "camelCase")]
    MessageAppended {
        conversation_id: String,
        message_id: String,
        is_user: bool,
    },
    #[serde(rename_all = "camelCase")]
    LoadingChanged {
        conversation_id: String,
        loading: bool,
    },
    #[serde(rename_all = "camelCase")]
    UploadRegistered { file_id: String, name: String },
    #[serde(rename_all = "camelCase")]
    UploadProgress { file_id: String, progress: u8 },
    #[serde(rename_all = "camelCase")]
    UploadRemoved { file_id: String },
    UploadsCleared,
    LoggedOut,
    Navigate { route: Route },
}

impl SessionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ConversationStarted { .. } => EVT_CONVERSATION_STARTED,
            Self::MessageAppended { .. } => EVT_MESSAGE_APPENDED,
            Self::LoadingChanged { .. } => EVT_LOADING_CHANGED,
            Self::UploadRegistered { .. }
            | Self::UploadProgress { .. }
            | Self::UploadRemoved { .. }
            | Self::UploadsCleared => EVT_UPLOAD,
            Self::LoggedOut | Self::Navigate { .. } => EVT_AUTH,
        }
    }
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: SessionEvent);
}

struct NoopSink;

impl EventSink for NoopSink {
    fn emit(&self, _event: SessionEvent) {}
}

struct ChannelSink {
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl EventSink for ChannelSink {
    fn emit(&self, event: SessionEvent) {
        // Receiver gone means nobody is rendering any more.
        let _ = self.tx.send(event);
    }
}

/// Cheaply cloneable handle to the active sink.
#[derive(Clone)]
pub struct Events {
    sink: Arc<dyn EventSink>,
}

impl Events {
    pub fn noop() -> Self {
        Self {
            sink: Arc::new(NoopSink),
        }
    }

    pub fn channel() -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                sink: Arc::new(ChannelSink { tx }),
            },
            rx,
        )
    }

    pub fn from_sink(sink: Arc<dyn EventSink>) -> Self {
        Self { sink }
    }

    pub fn emit(&self, event: SessionEvent) {
        log::trace!("event {}: {:?}", event.name(), event);
        self.sink.emit(event);
    }
}

impl Default for Events {
    fn default() -> Self {
        Self::noop()
    }
}
