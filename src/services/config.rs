//! Client configuration loading.
//!
//! The only value the backend contract depends on is the base URL; the rest
//! are local tuning knobs. `ClientPublicConfig` is safe to print.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// How upload progress is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadMode {
    /// Real byte progress of the request body.
    #[default]
    Live,
    /// Fixed-interval ticker, then the request.
    Simulated,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub upload_mode: UploadMode,
    pub data_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            upload_mode: UploadMode::Live,
            data_dir: None,
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = normalize_base_url(base_url);
        self
    }
}

pub(crate) fn normalize_base_url(base_url: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    if base.is_empty() {
        return DEFAULT_BASE_URL.to_string();
    }
    base.to_string()
}

fn parse_upload_mode(raw: &str) -> UploadMode {
    match raw.trim().to_ascii_lowercase().as_str() {
        "simulated" | "simulate" | "fake" => UploadMode::Simulated,
        _ => UploadMode::Live,
    }
}

/// Load client configuration from `.env`/environment.
///
/// Reads:
/// - `IFA_API_BASE_URL` (fallback: `API_BASE_URL`, `NEXT_PUBLIC_API_URL`)
/// - `IFA_HTTP_TIMEOUT_SECS`
/// - `IFA_UPLOAD_MODE` (`live` | `simulated`)
/// - `IFA_DATA_DIR`
pub fn load_client_config() -> ClientConfig {
    let _ = dotenvy::dotenv();
    config_from_lookup(|key| std::env::var(key).ok())
}

pub(crate) fn config_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ClientConfig {
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    let base_url = non_empty("IFA_API_BASE_URL")
        .or_else(|| non_empty("API_BASE_URL"))
        .or_else(|| non_empty("NEXT_PUBLIC_API_URL"))
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    let timeout_secs = non_empty("IFA_HTTP_TIMEOUT_SECS")
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_TIMEOUT_SECS)
        .clamp(1, 3_600);

    ClientConfig {
        base_url: normalize_base_url(&base_url),
        timeout: Duration::from_secs(timeout_secs),
        upload_mode: non_empty("IFA_UPLOAD_MODE")
            .map(|v| parse_upload_mode(&v))
            .unwrap_or_default(),
        data_dir: non_empty("IFA_DATA_DIR").map(PathBuf::from),
    }
}

/// Public client configuration (no credentials).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientPublicConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub upload_mode: UploadMode,
    pub data_dir: Option<String>,
    pub has_credential: bool,
}

impl ClientPublicConfig {
    pub fn new(config: &ClientConfig, data_dir: Option<PathBuf>, has_credential: bool) -> Self {
        Self {
            base_url: config.base_url.clone(),
            timeout_secs: config.timeout.as_secs(),
            upload_mode: config.upload_mode,
            data_dir: data_dir.map(|d| d.display().to_string()),
            has_credential,
        }
    }
}
