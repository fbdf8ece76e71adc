//! Message Dispatcher: one user intent in, one gateway call out, one reply
//! appended.
//!
//! The user's message is appended before the call goes out. Whatever the
//! call returns, exactly one assistant message follows it, and the
//! conversation's loading flag is lowered by the request guard's `Drop` on
//! every path.

use std::sync::Arc;

use futures_util::future::join_all;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::plugins::history::{HistoryError, HistoryStore, Message, RequestKind};
use crate::services::auth::AuthSession;
use crate::services::http::HttpError;
use crate::services::prompts;
use crate::services::upload::{BatchValidation, ProgressMode, UploadTracker};

use super::client::Gateway;
use super::types::{FilePayload, GatewayRequest, JournalSubmission, ServiceId, service_for_topic};

/// What happened to a dispatched intent once the call settled.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// The pretty-printed response body was appended.
    Replied(Message),
    /// An error message was appended in place of a reply.
    Failed { reply: Message, error: HttpError },
    /// The conversation was deleted while the call was in flight.
    Discarded,
}

#[derive(Debug)]
pub struct UploadOutcome {
    pub file_name: String,
    pub result: Result<DispatchOutcome, HistoryError>,
}

/// Result of an upload batch: validation rejections plus one outcome per
/// accepted file, in submission order.
#[derive(Debug, Default)]
pub struct UploadReport {
    pub rejected: Vec<String>,
    pub outcomes: Vec<UploadOutcome>,
}

#[derive(Clone)]
pub struct Dispatcher {
    history: HistoryStore,
    gateway: Arc<dyn Gateway>,
    auth: AuthSession,
    uploads: UploadTracker,
    progress_mode: ProgressMode,
}

/// Text shown for a failed call.
pub fn failure_text(err: &HttpError) -> String {
    if err.is_unauthorized() {
        return prompts::SESSION_EXPIRED.to_string();
    }
    err.server_message()
        .map(str::to_string)
        .unwrap_or_else(|| prompts::GENERIC_FAILURE.to_string())
}

fn pretty_json(body: &Value) -> String {
    serde_json::to_string_pretty(body).unwrap_or_else(|_| body.to_string())
}

impl Dispatcher {
    pub fn new(
        history: HistoryStore,
        gateway: Arc<dyn Gateway>,
        auth: AuthSession,
        uploads: UploadTracker,
        progress_mode: ProgressMode,
    ) -> Self {
        Self {
            history,
            gateway,
            auth,
            uploads,
            progress_mode,
        }
    }

    fn service_for(&self, conversation_id: &str) -> Result<ServiceId, HistoryError> {
        let conversation = self.history.get(conversation_id)?;
        Ok(service_for_topic(&conversation.topic))
    }

    /// Send typed text. Refused with `Busy` while the conversation is loading.
    pub async fn send_text(
        &self,
        conversation_id: &str,
        content: &str,
    ) -> Result<DispatchOutcome, HistoryError> {
        if content.trim().is_empty() {
            return Err(HistoryError::invalid_input("Message is empty"));
        }
        let service = self.service_for(conversation_id)?;
        let _loading = self
            .history
            .begin_request(conversation_id, RequestKind::Exclusive)?;
        self.history
            .append_message(conversation_id, Message::user(content))?;

        log::info!("Dispatching text to {} for {}", service, conversation_id);
        let result = self
            .gateway
            .send(
                service,
                GatewayRequest::Text(content.to_string()),
                self.auth.token(),
                None,
            )
            .await;
        self.settle(conversation_id, result)
    }

    /// Submit journal entries for reverse-transaction analysis.
    pub async fn send_journal(
        &self,
        conversation_id: &str,
        submission: JournalSubmission,
    ) -> Result<DispatchOutcome, HistoryError> {
        submission.validate().map_err(HistoryError::invalid_input)?;
        self.history.get(conversation_id)?;
        let _loading = self
            .history
            .begin_request(conversation_id, RequestKind::Exclusive)?;
        self.history
            .append_message(conversation_id, Message::user(submission.summary_markdown()))?;

        let service = ServiceId::Service2;
        log::info!(
            "Dispatching {} journal entries to {} for {}",
            submission.entries.len(),
            service,
            conversation_id
        );
        let result = self
            .gateway
            .send(
                service,
                GatewayRequest::Journal(submission),
                self.auth.token(),
                None,
            )
            .await;
        self.settle(conversation_id, result)
    }

    /// Validate and upload a batch. Files progress and settle independently.
    pub async fn upload_files(
        &self,
        conversation_id: &str,
        files: Vec<FilePayload>,
    ) -> Result<UploadReport, HistoryError> {
        let service = self.service_for(conversation_id)?;
        let BatchValidation { accepted, rejected } = self.uploads.validate_batch(files);
        for reason in &rejected {
            log::info!("Upload rejected: {}", reason);
        }
        if accepted.is_empty() {
            return Ok(UploadReport {
                rejected,
                outcomes: Vec::new(),
            });
        }

        let _loading = self
            .history
            .begin_request(conversation_id, RequestKind::Shared)?;
        let outcomes = join_all(accepted.into_iter().map(|file| async move {
            let file_name = file.name.clone();
            let result = self.upload_one(conversation_id, service, file).await;
            UploadOutcome { file_name, result }
        }))
        .await;

        Ok(UploadReport { rejected, outcomes })
    }

    async fn upload_one(
        &self,
        conversation_id: &str,
        service: ServiceId,
        file: FilePayload,
    ) -> Result<DispatchOutcome, HistoryError> {
        let tracked = self.uploads.register(&file);
        let note = prompts::uploaded_file_message(&file.name);
        log::info!(
            "Uploading {} ({} bytes) to {} for {}",
            file.name,
            file.size(),
            service,
            conversation_id
        );

        let result = match self.progress_mode {
            ProgressMode::Simulated { step, interval } => {
                self.uploads
                    .drive_simulated(&tracked.id, step, interval)
                    .await;
                self.note_upload(conversation_id, &note);
                self.gateway
                    .send(service, GatewayRequest::File(file), self.auth.token(), None)
                    .await
            }
            ProgressMode::Live => {
                let (tx, rx) = mpsc::unbounded_channel();
                let send = self.gateway.send(
                    service,
                    GatewayRequest::File(file),
                    self.auth.token(),
                    Some(tx),
                );
                let watch = self.uploads.watch_progress(&tracked.id, rx, || {
                    self.note_upload(conversation_id, &note)
                });
                let (result, reached_full) = tokio::join!(send, watch);
                if !reached_full {
                    // Body never fully streamed (early failure); keep the
                    // user message ahead of the reply anyway.
                    self.uploads.advance(&tracked.id, 100);
                    self.note_upload(conversation_id, &note);
                }
                result
            }
        };

        self.uploads.finish(&tracked.id);
        self.settle(conversation_id, result)
    }

    fn note_upload(&self, conversation_id: &str, note: &str) {
        if let Err(e) = self
            .history
            .append_message(conversation_id, Message::user(note))
        {
            log::warn!("Upload note for {} not recorded: {}", conversation_id, e);
        }
    }

    /// Append the reply (or error) for a settled call and apply the 401 policy.
    fn settle(
        &self,
        conversation_id: &str,
        result: Result<Value, HttpError>,
    ) -> Result<DispatchOutcome, HistoryError> {
        let (reply, error) = match result {
            Ok(body) => (Message::assistant(pretty_json(&body)), None),
            Err(err) => {
                log::warn!("Gateway call for {} failed: {}", conversation_id, err);
                (Message::assistant(failure_text(&err)), Some(err))
            }
        };

        let appended = match self.history.append_message(conversation_id, reply.clone()) {
            Ok(()) => Ok(true),
            Err(HistoryError::NotFound { .. }) => {
                log::warn!(
                    "Dropping reply for deleted conversation {}",
                    conversation_id
                );
                Ok(false)
            }
            Err(e) => Err(e),
        };

        if error.as_ref().is_some_and(HttpError::is_unauthorized) {
            self.auth.logout();
        }

        Ok(match (appended?, error) {
            (false, _) => DispatchOutcome::Discarded,
            (true, None) => DispatchOutcome::Replied(reply),
            (true, Some(error)) => DispatchOutcome::Failed { reply, error },
        })
    }
}
