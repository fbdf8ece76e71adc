//! Dashboard: the state a chat front end drives.
//!
//! Owns the selected challenge and wires the Session Store, Upload Tracker
//! and Message Dispatcher together so every user intent is one call here.

use std::sync::Arc;

use crate::plugins::history::{Conversation, ConversationSummary, HistoryError, HistoryStore};
use crate::services::auth::AuthSession;
use crate::services::config::ClientConfig;
use crate::services::events::Events;
use crate::services::gateway::{
    Challenge, DispatchOutcome, Dispatcher, FilePayload, Gateway, HttpGateway, JournalSubmission,
    UploadReport, default_challenge, find_challenge,
};
use crate::services::upload::{ProgressMode, UploadTracker, UploadedFile};

pub struct Dashboard {
    history: HistoryStore,
    uploads: UploadTracker,
    dispatcher: Dispatcher,
    auth: AuthSession,
    selected: &'static Challenge,
}

impl Dashboard {
    /// Dashboard talking to the real gateway at `config.base_url`.
    pub fn new(config: &ClientConfig, auth: AuthSession, events: Events) -> Self {
        Self::with_gateway(
            Arc::new(HttpGateway::new(config)),
            auth,
            events,
            config.upload_mode.into(),
        )
    }

    pub fn with_gateway(
        gateway: Arc<dyn Gateway>,
        auth: AuthSession,
        events: Events,
        progress_mode: ProgressMode,
    ) -> Self {
        let history = HistoryStore::new(events.clone());
        let uploads = UploadTracker::new(events);
        let dispatcher = Dispatcher::new(
            history.clone(),
            gateway,
            auth.clone(),
            uploads.clone(),
            progress_mode,
        );
        Self {
            history,
            uploads,
            dispatcher,
            auth,
            selected: default_challenge(),
        }
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn auth(&self) -> &AuthSession {
        &self.auth
    }

    pub fn selected_challenge(&self) -> &'static Challenge {
        self.selected
    }

    /// Fresh conversation on the selected challenge; pending uploads are
    /// dropped from the widget.
    pub fn start_new_chat(&self) -> Result<Conversation, HistoryError> {
        self.uploads.clear();
        self.history.start_conversation(self.selected.topic)
    }

    /// Switch challenge by id or name. Always starts a new conversation,
    /// even when the challenge is already selected.
    pub fn select_challenge(&mut self, key: &str) -> Result<Conversation, HistoryError> {
        let challenge = find_challenge(key)
            .ok_or_else(|| HistoryError::invalid_input(format!("Unknown challenge: {}", key)))?;
        log::info!("Challenge selected: {}", challenge.id);
        self.selected = challenge;
        self.start_new_chat()
    }

    pub fn load_conversation(&self, id: &str) -> Result<Option<Conversation>, HistoryError> {
        self.history.select_conversation(id)
    }

    pub fn delete_conversation(&self, id: &str) -> Result<Option<String>, HistoryError> {
        self.history.delete_conversation(id)
    }

    pub fn search(&self, query: &str) -> Result<Vec<ConversationSummary>, HistoryError> {
        self.history.search(query)
    }

    pub fn current(&self) -> Result<Option<Conversation>, HistoryError> {
        self.history.current()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.history.current_id(), Ok(Some(id)) if self.history.is_loading(&id))
    }

    fn current_id(&self) -> Result<String, HistoryError> {
        self.history
            .current_id()?
            .ok_or_else(|| HistoryError::invalid_input("No conversation selected"))
    }

    pub async fn send_message(&self, content: &str) -> Result<DispatchOutcome, HistoryError> {
        let id = self.current_id()?;
        self.dispatcher.send_text(&id, content).await
    }

    pub async fn submit_journal(
        &self,
        submission: JournalSubmission,
    ) -> Result<DispatchOutcome, HistoryError> {
        let id = self.current_id()?;
        self.dispatcher.send_journal(&id, submission).await
    }

    pub async fn upload_files(&self, files: Vec<FilePayload>) -> Result<UploadReport, HistoryError> {
        let id = self.current_id()?;
        self.dispatcher.upload_files(&id, files).await
    }

    pub fn uploads(&self) -> Vec<UploadedFile> {
        self.uploads.list()
    }

    pub fn upload_tracker(&self) -> &UploadTracker {
        &self.uploads
    }

    pub fn remove_file(&self, file_id: &str) -> bool {
        self.uploads.remove_file(file_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{Value, json};

    use crate::services::auth::{AuthClient, CredentialStore};
    use crate::services::gateway::{GatewayRequest, ProgressSender, ServiceId};
    use crate::services::http::HttpError;

    struct EchoGateway;

    #[async_trait]
    impl Gateway for EchoGateway {
        async fn send(
            &self,
            service: ServiceId,
            request: GatewayRequest,
            _bearer: Option<String>,
            _progress: Option<ProgressSender>,
        ) -> Result<Value, HttpError> {
            Ok(json!({ "service": service.as_str(), "kind": request.kind() }))
        }
    }

    fn dashboard() -> Dashboard {
        let config = ClientConfig::default().with_base_url("http://127.0.0.1:9");
        let auth = AuthSession::new(
            AuthClient::new(&config),
            CredentialStore::in_memory(),
            Events::noop(),
        );
        Dashboard::with_gateway(
            Arc::new(EchoGateway),
            auth,
            Events::noop(),
            ProgressMode::simulated(),
        )
    }

    #[tokio::test]
    async fn test_send_without_conversation_is_rejected() {
        let dash = dashboard();
        let err = dash.send_message("hello").await.unwrap_err();
        assert!(matches!(err, HistoryError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn test_challenge_switch_routes_new_conversation() {
        let mut dash = dashboard();
        let first = dash.start_new_chat().unwrap();
        assert_eq!(first.topic, "Use Case Scenario");

        let second = dash.select_challenge("reverse-transactions").unwrap();
        assert_eq!(second.topic, "Reverse Transactions");
        assert_eq!(dash.current().unwrap().unwrap().id, second.id);
        assert_eq!(dash.search("").unwrap().len(), 2);

        let reply = match dash.send_message("Ijarah reversal").await.unwrap() {
            DispatchOutcome::Replied(reply) => reply,
            other => panic!("unexpected outcome: {other:?}"),
        };
        assert!(reply.content.contains("\"service\": \"service2\""));
        assert!(!dash.is_loading());
    }

    #[test]
    fn test_unknown_challenge_keeps_selection() {
        let mut dash = dashboard();
        assert!(dash.select_challenge("astrology").is_err());
        assert_eq!(dash.selected_challenge().id, "use-cases");
        assert!(dash.current().unwrap().is_none());
    }

    #[test]
    fn test_new_chat_clears_pending_uploads() {
        let dash = dashboard();
        dash.upload_tracker().register(&FilePayload {
            name: "a.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
            data: vec![1, 2, 3],
        });
        assert_eq!(dash.uploads().len(), 1);
        dash.start_new_chat().unwrap();
        assert!(dash.uploads().is_empty());
    }

    #[test]
    fn test_load_and_delete() {
        let dash = dashboard();
        let a = dash.start_new_chat().unwrap();
        let b = dash.start_new_chat().unwrap();
        assert_eq!(dash.load_conversation(&a.id).unwrap().unwrap().id, a.id);
        assert_eq!(dash.delete_conversation(&a.id).unwrap(), Some(b.id.clone()));
        assert!(dash.load_conversation(&a.id).unwrap().is_none());
        assert!(dash.current().unwrap().is_none());
    }
}
