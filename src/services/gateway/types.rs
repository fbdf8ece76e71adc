use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::services::prompts::journal_messages;

/// Backend analysis pipeline a request is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceId {
    #[default]
    Service1,
    Service2,
    Service3,
    Service4,
}

impl ServiceId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Service1 => "service1",
            Self::Service2 => "service2",
            Self::Service3 => "service3",
            Self::Service4 => "service4",
        }
    }
}

impl std::fmt::Display for ServiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A selectable topic. Picking one always starts a fresh conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    pub id: &'static str,
    pub name: &'static str,
    pub topic: &'static str,
    pub service: ServiceId,
}

pub const CHALLENGES: [Challenge; 4] = [
    Challenge {
        id: "use-cases",
        name: "Use Case Scenario",
        topic: "Use Case Scenario",
        service: ServiceId::Service1,
    },
    Challenge {
        id: "reverse-transactions",
        name: "Reverse Transactions",
        topic: "Reverse Transactions",
        service: ServiceId::Service2,
    },
    Challenge {
        id: "standards-enhancement",
        name: "Standards Enhancements",
        topic: "Standards Enhancements",
        service: ServiceId::Service3,
    },
    Challenge {
        id: "custom-category",
        name: "Team Own Category",
        topic: "Team Own Category",
        service: ServiceId::Service4,
    },
];

pub fn default_challenge() -> &'static Challenge {
    &CHALLENGES[0]
}

/// Look a challenge up by id, name or topic (case-insensitive).
pub fn find_challenge(key: &str) -> Option<&'static Challenge> {
    let key = key.trim();
    CHALLENGES.iter().find(|c| {
        c.id.eq_ignore_ascii_case(key)
            || c.name.eq_ignore_ascii_case(key)
            || c.topic.eq_ignore_ascii_case(key)
    })
}

/// Topics nobody recognises go to the default service.
pub fn service_for_topic(topic: &str) -> ServiceId {
    find_challenge(topic)
        .map(|c| c.service)
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub account: String,
    pub debit: f64,
    pub credit: f64,
}

/// Body of a journal-entry analysis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalSubmission {
    pub entries: Vec<JournalEntry>,
    pub description: String,
}

impl JournalSubmission {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.entries.is_empty() {
            return Err(journal_messages::NO_ENTRIES);
        }
        for entry in &self.entries {
            if entry.account.trim().is_empty() {
                return Err(journal_messages::ACCOUNT_REQUIRED);
            }
            let valid = |v: f64| v.is_finite() && v >= 0.0;
            if !valid(entry.debit) || !valid(entry.credit) {
                return Err(journal_messages::AMOUNT_INVALID);
            }
        }
        Ok(())
    }

    /// Markdown recorded as the user's message for this submission.
    pub fn summary_markdown(&self) -> String {
        let mut out = String::from("Journal entries:\n");
        for entry in &self.entries {
            out.push_str(&format!(
                "- {}: Dr {} / Cr {}\n",
                entry.account.trim(),
                entry.debit,
                entry.credit
            ));
        }
        let description = self.description.trim();
        if !description.is_empty() {
            out.push('\n');
            out.push_str(description);
        }
        out.trim_end().to_string()
    }
}

/// A file read into memory and ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePayload {
    pub name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl FilePayload {
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// One outbound gateway call.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayRequest {
    /// Multipart field `text`.
    Text(String),
    /// Multipart field `file`.
    File(FilePayload),
    /// JSON body `{ entries, description }`.
    Journal(JournalSubmission),
}

impl GatewayRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::File(_) => "file",
            Self::Journal(_) => "journal",
        }
    }
}

/// Receives request-body progress in percent (0..=100).
pub type ProgressSender = mpsc::UnboundedSender<u8>;
