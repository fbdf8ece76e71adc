use std::sync::Arc;

use arc_swap::ArcSwapOption;

use crate::services::events::{Events, Route, SessionEvent};
use crate::services::prompts::auth_messages as msg;

use super::client::AuthClient;
use super::credentials::CredentialStore;
use super::user::{AuthUser, ProfileUpdate};
use super::validate;
use super::AuthError;

/// Signed-in state: the persisted credential plus the cached user.
#[derive(Clone)]
pub struct AuthSession {
    inner: Arc<AuthSessionInner>,
}

struct AuthSessionInner {
    client: AuthClient,
    credentials: CredentialStore,
    user: ArcSwapOption<AuthUser>,
    events: Events,
}

impl AuthSession {
    pub fn new(client: AuthClient, credentials: CredentialStore, events: Events) -> Self {
        Self {
            inner: Arc::new(AuthSessionInner {
                client,
                credentials,
                user: ArcSwapOption::empty(),
                events,
            }),
        }
    }

    /// Bearer token for the next request, read fresh each time.
    pub fn token(&self) -> Option<String> {
        self.inner.credentials.token()
    }

    pub fn current_user(&self) -> Option<AuthUser> {
        self.inner.user.load_full().map(|u| u.as_ref().clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.inner.credentials
    }

    fn adopt(&self, token: &str, user: AuthUser) -> Result<AuthUser, AuthError> {
        self.inner.credentials.save(token)?;
        self.inner.user.store(Some(Arc::new(user.clone())));
        Ok(user)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        validate::validate_login(email, password)?;
        let (token, user) = self
            .inner
            .client
            .login(email.trim(), password)
            .await
            .map_err(|e| AuthError::from_http(e, msg::LOGIN_FAILED))?;
        log::info!("Logged in as {}", user.email);
        self.adopt(&token, user)
    }

    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
        confirm: &str,
    ) -> Result<AuthUser, AuthError> {
        if let Some(first) = validate::signup_errors(name, email, password, confirm)
            .into_iter()
            .next()
        {
            return Err(first);
        }
        let (token, user) = self
            .inner
            .client
            .register(name.trim(), email.trim(), password)
            .await
            .map_err(|e| AuthError::from_http(e, msg::SIGNUP_FAILED))?;
        log::info!("Registered {}", user.email);
        self.adopt(&token, user)
    }

    /// Re-validate a persisted credential. A 401 logs out; any other
    /// failure discards the credential without notifying the view.
    pub async fn restore(&self) -> Option<AuthUser> {
        let token = self.token()?;
        match self.inner.client.me(&token).await {
            Ok(user) => {
                self.inner.user.store(Some(Arc::new(user.clone())));
                Some(user)
            }
            Err(e) if e.is_unauthorized() => {
                log::info!("Stored session expired: {}", e);
                self.logout();
                None
            }
            Err(e) => {
                log::info!("Stored session rejected: {}", e);
                if let Err(e) = self.inner.credentials.clear() {
                    log::warn!("{}", e);
                }
                self.inner.user.store(None);
                None
            }
        }
    }

    pub async fn update_profile(
        &self,
        patch: ProfileUpdate,
        confirm_new_password: Option<&str>,
    ) -> Result<AuthUser, AuthError> {
        validate::validate_profile(&patch, confirm_new_password)?;
        let fallback = if patch.changes_password() {
            msg::PASSWORD_UPDATE_FAILED
        } else {
            msg::PROFILE_UPDATE_FAILED
        };
        let Some(token) = self.token() else {
            self.logout();
            return Err(AuthError::unauthorized(fallback));
        };

        match self.inner.client.update_profile(&token, &patch).await {
            Ok(returned) => {
                let user = match (returned, self.current_user()) {
                    (Some(user), _) => user,
                    (None, Some(cached)) => patch.apply_to(&cached),
                    (None, None) => return Err(AuthError::server(fallback)),
                };
                self.inner.user.store(Some(Arc::new(user.clone())));
                Ok(user)
            }
            Err(e) if e.is_unauthorized() => {
                self.logout();
                Err(AuthError::from_http(e, fallback))
            }
            Err(e) => Err(AuthError::from_http(e, fallback)),
        }
    }

    /// Clear the credential and the user, then send the view home.
    pub fn logout(&self) {
        if let Err(e) = self.inner.credentials.clear() {
            log::warn!("{}", e);
        }
        self.inner.user.store(None);
        log::info!("Logged out");
        self.inner.events.emit(SessionEvent::LoggedOut);
        self.inner.events.emit(SessionEvent::Navigate { route: Route::Home });
    }
}
