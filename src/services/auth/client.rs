use serde_json::{Value, json};

use crate::services::config::ClientConfig;
use crate::services::http::{self, HttpError};

use super::user::{AuthUser, ProfileUpdate, extract_token, normalize_user};

/// Thin client for the auth backend. Holds no credential of its own.
pub struct AuthClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl AuthClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            http_client: http::build_client(config.timeout),
            base_url: config.base_url.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        http::endpoint(&self.base_url, path)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(String, AuthUser), HttpError> {
        let response = self
            .http_client
            .post(self.url("auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        session_from(http::read_json(response).await?)
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(String, AuthUser), HttpError> {
        let response = self
            .http_client
            .post(self.url("auth/register"))
            .json(&json!({ "name": name, "email": email, "password": password }))
            .send()
            .await?;
        session_from(http::read_json(response).await?)
    }

    pub async fn me(&self, token: &str) -> Result<AuthUser, HttpError> {
        let response = self
            .http_client
            .get(self.url("api/auth/me"))
            .bearer_auth(token)
            .send()
            .await?;
        let body = http::read_json(response).await?;
        normalize_user(&body).ok_or_else(|| HttpError::decode("Response has no user"))
    }

    /// `Ok(None)` when the backend accepted the change but sent no user back.
    pub async fn update_profile(
        &self,
        token: &str,
        patch: &ProfileUpdate,
    ) -> Result<Option<AuthUser>, HttpError> {
        let response = self
            .http_client
            .patch(self.url("api/auth/profile"))
            .bearer_auth(token)
            .json(patch)
            .send()
            .await?;
        let body = http::read_json(response).await?;
        Ok(normalize_user(&body))
    }
}

fn session_from(body: Value) -> Result<(String, AuthUser), HttpError> {
    let token = extract_token(&body).ok_or_else(|| HttpError::decode("Response has no token"))?;
    let user = normalize_user(&body).ok_or_else(|| HttpError::decode("Response has no user"))?;
    Ok((token, user))
}
