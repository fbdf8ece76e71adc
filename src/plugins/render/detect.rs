use serde::Serialize;
use serde_json::Value;

use crate::services::prompts;

use super::types::{ClassificationResponse, StandardsResponse};

/// How a message body should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Text,
    Classification,
    Pipeline,
}

impl ContentKind {
    /// Parse an explicit discriminant (a `type` tag or a caller hint).
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "text" => Some(Self::Text),
            "classification" => Some(Self::Classification),
            "pipeline" | "enhancement_pipeline" => Some(Self::Pipeline),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbabilityRow {
    pub standard: String,
    /// Percentage with one decimal, e.g. `85.3%`.
    pub percent: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationView {
    pub most_likely_standard: String,
    /// Rows in the order the backend sent them.
    pub rows: Vec<ProbabilityRow>,
    pub key_features: Vec<String>,
    pub detailed_explanation: Option<String>,
    pub timestamp: Option<String>,
}

impl From<ClassificationResponse> for ClassificationView {
    fn from(response: ClassificationResponse) -> Self {
        Self {
            most_likely_standard: response.most_likely_standard,
            rows: response
                .standard_probabilities
                .into_iter()
                .map(|p| ProbabilityRow {
                    standard: p.standard,
                    percent: format_percent(p.probability),
                    reason: p.reason,
                })
                .collect(),
            key_features: response.key_features.unwrap_or_default(),
            detailed_explanation: response
                .detailed_explanation
                .filter(|s| !s.trim().is_empty()),
            timestamp: response.timestamp.filter(|s| !s.trim().is_empty()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "camelCase")]
pub enum RenderedView {
    Markdown { text: String },
    Classification(ClassificationView),
    Pipeline(Box<StandardsResponse>),
    ParseError { message: String },
}

pub(crate) fn format_percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

/// Drop anything after the last `}` (stray bytes some backends append).
pub fn trim_trailing(content: &str) -> &str {
    match content.rfind('}') {
        Some(end) => &content[..=end],
        None => content,
    }
}

/// Classify a parsed payload: structural fingerprints first, then a
/// recognised `type` tag, then plain text.
pub fn detect_kind(value: &Value) -> ContentKind {
    let has = |key: &str| value.get(key).is_some();
    if has("most_likely_standard") && has("standard_probabilities") {
        return ContentKind::Classification;
    }
    if has("audit_trail") && has("pipeline_stages") && has("enhanced_standard") {
        return ContentKind::Pipeline;
    }
    value
        .get("type")
        .and_then(Value::as_str)
        .and_then(ContentKind::from_tag)
        .unwrap_or(ContentKind::Text)
}

fn parse_error() -> RenderedView {
    RenderedView::ParseError {
        message: prompts::RENDER_PARSE_FAILED.to_string(),
    }
}

fn markdown(text: &str) -> RenderedView {
    RenderedView::Markdown {
        text: text.to_string(),
    }
}

/// Decide how to present a message body. Never fails: anything that cannot
/// be decoded becomes markdown or an inline parse error.
pub fn render(content: &str, hint: Option<ContentKind>) -> RenderedView {
    if hint == Some(ContentKind::Text) {
        return markdown(content);
    }

    let value: Value = match serde_json::from_str(trim_trailing(content.trim())) {
        Ok(value) => value,
        Err(e) => {
            if hint.is_some() {
                log::warn!("Structured response did not parse: {}", e);
                return parse_error();
            }
            return markdown(content);
        }
    };

    match hint.unwrap_or_else(|| detect_kind(&value)) {
        ContentKind::Text => match value {
            // Non-JSON bodies are stored as JSON strings.
            Value::String(text) => markdown(&text),
            _ => markdown(content),
        },
        ContentKind::Classification => match serde_json::from_value::<ClassificationResponse>(value) {
            Ok(response) => RenderedView::Classification(response.into()),
            Err(e) => {
                log::warn!("Classification response did not decode: {}", e);
                parse_error()
            }
        },
        ContentKind::Pipeline => match serde_json::from_value::<StandardsResponse>(value) {
            Ok(response) => RenderedView::Pipeline(Box::new(response)),
            Err(e) => {
                log::warn!("Standards response did not decode: {}", e);
                parse_error()
            }
        },
    }
}
