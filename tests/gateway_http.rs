//! Real reqwest clients against an in-process axum backend.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use ifa_lib::plugins::history::Message;
use ifa_lib::services::auth::{AuthClient, AuthError, AuthSession, CredentialStore, ProfileUpdate};
use ifa_lib::services::config::{ClientConfig, UploadMode};
use ifa_lib::services::dashboard::Dashboard;
use ifa_lib::services::events::{Events, Route, SessionEvent};
use ifa_lib::services::gateway::{
    DispatchOutcome, FilePayload, Gateway, GatewayRequest, HttpGateway, JournalEntry,
    JournalSubmission, ServiceId,
};
use ifa_lib::services::http::HttpError;

#[derive(Debug, Clone)]
struct Recorded {
    path: String,
    authorization: Option<String>,
    content_type: Option<String>,
    body: String,
}

#[derive(Clone, Default)]
struct Backend {
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl Backend {
    fn record(&self, path: String, headers: &HeaderMap, body: &[u8]) -> Recorded {
        let text = |name: header::HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let recorded = Recorded {
            path,
            authorization: text(header::AUTHORIZATION),
            content_type: text(header::CONTENT_TYPE),
            body: String::from_utf8_lossy(body).into_owned(),
        };
        self.requests.lock().unwrap().push(recorded.clone());
        recorded
    }

    fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

fn bearer_ok(recorded: &Recorded) -> bool {
    recorded.authorization.as_deref() == Some("Bearer good-token")
}

async fn gateway(
    State(backend): State<Backend>,
    Path(service): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let recorded = backend.record(format!("/gateway/{service}"), &headers, &body);
    if !bearer_ok(&recorded) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Token expired" })),
        );
    }
    match service.as_str() {
        "service3" => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "message": ["text is required", "text must be a string"] })),
        ),
        "service4" => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({}))),
        _ => (
            StatusCode::OK,
            Json(json!({ "service": service, "bytes": body.len() })),
        ),
    }
}

async fn login(
    State(backend): State<Backend>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    backend.record("/auth/login".to_string(), &headers, &body);
    let form: Value = serde_json::from_slice(&body).unwrap_or_default();
    if form["password"] == "correct-horse" {
        (
            StatusCode::OK,
            Json(json!({
                "access_token": "good-token",
                "user": { "_id": "u-1", "username": "Aisha", "email": form["email"] }
            })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid credentials" })),
        )
    }
}

async fn register(
    State(backend): State<Backend>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    backend.record("/auth/register".to_string(), &headers, &body);
    (
        StatusCode::CONFLICT,
        Json(json!({ "message": "Email already registered" })),
    )
}

async fn me(State(backend): State<Backend>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    let recorded = backend.record("/api/auth/me".to_string(), &headers, &[]);
    if !bearer_ok(&recorded) {
        return (StatusCode::UNAUTHORIZED, Json(json!({})));
    }
    (
        StatusCode::OK,
        Json(json!({ "user": { "id": "u-1", "fullName": "Aisha", "mail": "aisha@example.com" } })),
    )
}

async fn profile(
    State(backend): State<Backend>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let recorded = backend.record("/api/auth/profile".to_string(), &headers, &body);
    if !bearer_ok(&recorded) {
        return (StatusCode::UNAUTHORIZED, Json(json!({})));
    }
    (StatusCode::OK, Json(json!({ "message": "Profile updated" })))
}

async fn spawn_backend() -> (SocketAddr, Backend) {
    let backend = Backend::default();
    let app = Router::new()
        .route("/gateway/:service", post(gateway))
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/api/auth/me", get(me))
        .route("/api/auth/profile", patch(profile))
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    (addr, backend)
}

fn config(addr: SocketAddr) -> ClientConfig {
    ClientConfig::default().with_base_url(&format!("http://{addr}/"))
}

fn session(config: &ClientConfig, token: Option<&str>) -> AuthSession {
    let session = AuthSession::new(
        AuthClient::new(config),
        CredentialStore::in_memory(),
        Events::noop(),
    );
    if let Some(token) = token {
        session.credentials().save(token).unwrap();
    }
    session
}

fn transcript(messages: &[Message]) -> Vec<(bool, String)> {
    messages
        .iter()
        .map(|m| (m.is_user, m.content.clone()))
        .collect()
}

#[tokio::test]
async fn test_text_is_sent_as_multipart_field_with_bearer() {
    let (addr, backend) = spawn_backend().await;
    let gateway = HttpGateway::new(&config(addr));

    let body = gateway
        .send(
            ServiceId::Service1,
            GatewayRequest::Text("Vehicle cost $60,000, 3-year lease".to_string()),
            Some("good-token".to_string()),
            None,
        )
        .await
        .unwrap();
    assert_eq!(body["service"], "service1");

    let request = &backend.requests()[0];
    assert_eq!(request.path, "/gateway/service1");
    assert_eq!(request.authorization.as_deref(), Some("Bearer good-token"));
    assert!(
        request
            .content_type
            .as_deref()
            .unwrap()
            .starts_with("multipart/form-data")
    );
    assert!(request.body.contains("name=\"text\""));
    assert!(request.body.contains("Vehicle cost $60,000, 3-year lease"));
}

#[tokio::test]
async fn test_journal_is_sent_as_json() {
    let (addr, backend) = spawn_backend().await;
    let gateway = HttpGateway::new(&config(addr));
    let submission = JournalSubmission {
        entries: vec![JournalEntry {
            account: "Ijarah Asset".to_string(),
            debit: 60000.0,
            credit: 0.0,
        }],
        description: "Lease inception".to_string(),
    };

    gateway
        .send(
            ServiceId::Service2,
            GatewayRequest::Journal(submission.clone()),
            Some("good-token".to_string()),
            None,
        )
        .await
        .unwrap();

    let request = &backend.requests()[0];
    assert_eq!(request.content_type.as_deref(), Some("application/json"));
    let sent: JournalSubmission = serde_json::from_str(&request.body).unwrap();
    assert_eq!(sent, submission);
}

#[tokio::test]
async fn test_error_statuses_map_to_http_error() {
    let (addr, _backend) = spawn_backend().await;
    let gateway = HttpGateway::new(&config(addr));
    let send = |service, token: &str| {
        gateway.send(
            service,
            GatewayRequest::Text("q".to_string()),
            Some(token.to_string()),
            None,
        )
    };

    let err = send(ServiceId::Service1, "stale").await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.server_message(), Some("Token expired"));

    let err = send(ServiceId::Service3, "good-token").await.unwrap_err();
    assert_eq!(err.status(), Some(422));
    assert_eq!(
        err.server_message(),
        Some("text is required, text must be a string")
    );

    let err = send(ServiceId::Service4, "good-token").await.unwrap_err();
    assert_eq!(err, HttpError::server(500, None));
}

#[tokio::test]
async fn test_unauthorized_reply_logs_out() {
    let (addr, _backend) = spawn_backend().await;
    let config = config(addr);
    let auth = session(&config, Some("stale"));
    let dash = Dashboard::new(&config, auth.clone(), Events::noop());
    let conversation = dash.start_new_chat().unwrap();

    let outcome = dash.send_message("Murabaha markup?").await.unwrap();
    assert!(matches!(outcome, DispatchOutcome::Failed { .. }));
    assert!(!auth.is_authenticated());

    let stored = dash.history().get(&conversation.id).unwrap();
    assert_eq!(
        transcript(&stored.messages),
        vec![
            (true, "Murabaha markup?".to_string()),
            (
                false,
                "Your session has expired. Please log in again.".to_string()
            ),
        ]
    );
}

#[tokio::test]
async fn test_live_upload_reports_and_cleans_up() {
    let (addr, backend) = spawn_backend().await;
    let mut config = config(addr);
    config.upload_mode = UploadMode::Live;
    let dash = Dashboard::new(&config, session(&config, Some("good-token")), Events::noop());
    let conversation = dash.start_new_chat().unwrap();

    let report = dash
        .upload_files(vec![FilePayload {
            name: "lease.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
            data: vec![b'%'; 200 * 1024],
        }])
        .await
        .unwrap();

    assert!(report.rejected.is_empty());
    assert!(matches!(
        report.outcomes[0].result,
        Ok(DispatchOutcome::Replied(_))
    ));
    assert!(dash.uploads().is_empty());

    let stored = dash.history().get(&conversation.id).unwrap();
    assert_eq!(stored.messages.len(), 2);
    assert_eq!(stored.messages[0].content, "Uploaded file: lease.pdf");
    assert!(!stored.messages[1].is_user);
    assert!(stored.messages[1].content.contains("\"bytes\""));

    let request = &backend.requests()[0];
    assert!(request.body.contains("name=\"file\"; filename=\"lease.pdf\""));
    assert!(request.body.contains("application/pdf"));
}

#[tokio::test]
async fn test_login_restore_and_profile() {
    let (addr, backend) = spawn_backend().await;
    let config = config(addr);
    let auth = session(&config, None);

    let err = auth.login("aisha@example.com", "wrong-pass").await.unwrap_err();
    assert_eq!(err, AuthError::unauthorized("Invalid credentials"));

    let user = auth
        .login("aisha@example.com", "correct-horse")
        .await
        .unwrap();
    assert_eq!(user.id, "u-1");
    assert_eq!(user.name, "Aisha");
    assert_eq!(auth.token().as_deref(), Some("good-token"));

    let restored = auth.restore().await.unwrap();
    assert_eq!(restored.email, "aisha@example.com");

    let updated = auth
        .update_profile(
            ProfileUpdate {
                name: Some("Aisha Rahman".to_string()),
                ..ProfileUpdate::default()
            },
            None,
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Aisha Rahman");

    let patch = backend
        .requests()
        .into_iter()
        .find(|r| r.path == "/api/auth/profile")
        .unwrap();
    let sent: Value = serde_json::from_str(&patch.body).unwrap();
    assert_eq!(sent, json!({ "name": "Aisha Rahman" }));
}

#[tokio::test]
async fn test_signup_surfaces_backend_message() {
    let (addr, _backend) = spawn_backend().await;
    let config = config(addr);
    let auth = session(&config, None);

    let err = auth
        .signup("Aisha", "aisha@example.com", "password1", "password1")
        .await
        .unwrap_err();
    assert_eq!(err, AuthError::server("Email already registered"));
    assert!(!auth.is_authenticated());
}

#[tokio::test]
async fn test_restore_with_rejected_token_clears_it() {
    let (addr, _backend) = spawn_backend().await;
    let config = config(addr);
    let (events, mut rx) = Events::channel();
    let auth = AuthSession::new(AuthClient::new(&config), CredentialStore::in_memory(), events);
    auth.credentials().save("stale").unwrap();

    assert!(auth.restore().await.is_none());
    assert!(auth.token().is_none());
    assert_eq!(rx.try_recv().ok(), Some(SessionEvent::LoggedOut));
    assert_eq!(
        rx.try_recv().ok(),
        Some(SessionEvent::Navigate { route: Route::Home })
    );
}
