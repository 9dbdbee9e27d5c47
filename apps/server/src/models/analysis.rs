//! Wire types for the document analysis REST contract.
//!
//! Only the parts of the payload this service reads are modelled. Everything
//! else the service returns is ignored by serde.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

/// Opaque URL returned in the `Operation-Location` header after submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationLocation(String);

impl OperationLocation {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OperationLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Status of an analysis operation as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationStatus {
    NotStarted,
    Running,
    Succeeded,
    Failed,
    /// Anything the service sends that is not one of the above.
    Unknown(String),
}

impl OperationStatus {
    /// Parse a wire status, ignoring case.
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "notstarted" => Self::NotStarted,
            "running" => Self::Running,
            "succeeded" => Self::Succeeded,
            "failed" => Self::Failed,
            _ => Self::Unknown(s.to_string()),
        }
    }
}

/// Error object attached to a failed operation.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServiceError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of a poll response.
///
/// `analyze_result` stays untyped here; it is validated once by the field
/// extractor so a malformed result surfaces as an extraction failure rather
/// than a transport error.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeOperation {
    pub status: String,
    #[serde(default)]
    pub analyze_result: Option<JsonValue>,
    #[serde(default)]
    pub error: Option<ServiceError>,
}

impl AnalyzeOperation {
    pub fn operation_status(&self) -> OperationStatus {
        OperationStatus::parse(&self.status)
    }
}

/// Typed view of `analyzeResult`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResult {
    #[serde(default)]
    pub model_id: Option<String>,
    #[serde(default)]
    pub documents: Vec<AnalyzedDocument>,
}

/// One document recognized by the model.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedDocument {
    #[serde(default)]
    pub doc_type: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    /// Missing entirely when the model found no field container. Entries that
    /// do not decode as a field (`null`, wrong shape) are kept as `None`.
    #[serde(default, deserialize_with = "lenient_fields")]
    pub fields: LenientFields,
}

/// Field map keyed by name; `None` marks an entry that did not decode.
pub type LenientFields = Option<BTreeMap<String, Option<DocumentField>>>;

fn lenient_fields<'de, D>(deserializer: D) -> Result<LenientFields, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Option::<BTreeMap<String, JsonValue>>::deserialize(deserializer)?;
    Ok(entries.map(|entries| {
        entries
            .into_iter()
            .map(|(name, value)| (name, DocumentField::deserialize(value).ok()))
            .collect()
    }))
}

/// A single extracted field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentField {
    #[serde(rename = "type", default)]
    pub field_type: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}
