//! Authentication against the backend: login, signup, profile edits and
//! the persisted bearer token.

mod client;
mod credentials;
mod error;
mod session;
mod user;
pub mod validate;

pub use client::AuthClient;
pub use credentials::{Credential, CredentialStore};
pub use error::AuthError;
pub use session::AuthSession;
pub use user::{AuthUser, ProfileUpdate, extract_token, normalize_user};
