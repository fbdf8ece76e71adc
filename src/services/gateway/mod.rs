//! AI gateway: topic routing, the HTTP client and the Message Dispatcher.

mod client;
mod dispatch;
mod types;

pub use client::{Gateway, HttpGateway};
pub use dispatch::{DispatchOutcome, Dispatcher, UploadOutcome, UploadReport, failure_text};
pub use types::{
    CHALLENGES, Challenge, FilePayload, GatewayRequest, JournalEntry, JournalSubmission,
    ProgressSender, ServiceId, default_challenge, find_challenge, service_for_topic,
};
