//! Shapes of the structured responses the gateway is known to send.
//!
//! Fingerprint fields are required; everything else defaults so a partial
//! payload still renders.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardProbability {
    pub standard: String,
    /// Fraction in `0.0..=1.0`.
    pub probability: f64,
    #[serde(default)]
    pub reason: String,
}

/// Reverse-transaction classification: which standard a transaction most
/// likely falls under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResponse {
    pub most_likely_standard: String,
    pub standard_probabilities: Vec<StandardProbability>,
    #[serde(default)]
    pub key_features: Option<Vec<String>>,
    #[serde(default)]
    pub detailed_explanation: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditTrail {
    pub start_time: String,
    pub input_length: u64,
    pub pipeline_stages: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineStage {
    pub timestamp: String,
    pub quality_score: f64,
    pub notes: Vec<String>,
    pub processing_steps: Vec<String>,
}

/// Named entries in the order the backend sent them. Unknown names are
/// kept; `null` entries are skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyed<T>(Vec<(String, T)>);

impl<T> Default for Keyed<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> Keyed<T> {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T> FromIterator<(String, T)> for Keyed<T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<T: Serialize> Serialize for Keyed<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

struct KeyedVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for KeyedVisitor<T> {
    type Value = Keyed<T>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of named entries")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Keyed::default())
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Keyed::default())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((name, value)) = map.next_entry::<String, Option<T>>()? {
            if let Some(value) = value {
                entries.push((name, value));
            }
        }
        Ok(Keyed(entries))
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Keyed<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(KeyedVisitor(PhantomData))
    }
}

/// Stage name to stage result, e.g. `preprocessor`, `reviewer`.
pub type PipelineStages = Keyed<PipelineStage>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Assessment {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub improvements: Vec<String>,
}

/// Reviewer role to its assessment.
pub type DetailedAssessment = Keyed<Assessment>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Enhancement {
    pub improvement: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinalSummary {
    pub completion_time: String,
    pub average_quality_score: f64,
    /// Seconds.
    pub total_processing_time: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandardSection {
    pub title: String,
    pub clauses: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Definition {
    pub term: String,
    pub definition: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhancedStandard {
    pub title: String,
    pub sections: Vec<StandardSection>,
    pub definitions: Vec<Definition>,
}

/// Multi-stage standards enhancement result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardsResponse {
    pub audit_trail: AuditTrail,
    pub pipeline_stages: PipelineStages,
    #[serde(default)]
    pub detailed_assessment: DetailedAssessment,
    #[serde(default)]
    pub enhancements: Vec<Enhancement>,
    #[serde(default)]
    pub final_summary: Option<FinalSummary>,
    pub enhanced_standard: EnhancedStandard,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stages_keep_received_order_and_unknown_names() {
        let stages: PipelineStages = serde_json::from_value(json!({
            "validator": { "quality_score": 90 },
            "shariah_review": { "quality_score": 70, "notes": ["riba check"] },
            "preprocessor": { "quality_score": 60 },
            "enhancer": null
        }))
        .unwrap();

        let names: Vec<&str> = stages.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["validator", "shariah_review", "preprocessor"]);
        assert_eq!(stages.get("shariah_review").unwrap().notes, vec!["riba check"]);
        assert!(stages.get("enhancer").is_none());
    }

    #[test]
    fn test_missing_or_null_assessment_is_empty() {
        let response: StandardsResponse = serde_json::from_value(json!({
            "audit_trail": {},
            "pipeline_stages": {},
            "detailed_assessment": null,
            "enhanced_standard": {}
        }))
        .unwrap();
        assert!(response.pipeline_stages.is_empty());
        assert!(response.detailed_assessment.is_empty());
    }
}
