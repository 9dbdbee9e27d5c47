//! Field extraction from a completed analysis result.
//!
//! The payload is validated against [`AnalyzeResult`] once, here. A missing or
//! malformed individual field maps to [`NOT_FOUND`]; a missing field container
//! fails the whole extraction.

use std::collections::BTreeMap;

use serde_json::Value as JsonValue;

use crate::error::AnalysisError;
use crate::models::{AnalyzeResult, DdrFields, DocumentField, NOT_FOUND, RawFields};

/// Fields extracted from the first analyzed document.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub fields: DdrFields,
    pub raw: RawFields,
}

/// Extract DDR fields from an `analyzeResult` payload.
pub fn extract_fields(payload: &JsonValue) -> Result<Extraction, AnalysisError> {
    let result: AnalyzeResult = serde_json::from_value(payload.clone())
        .map_err(|e| AnalysisError::ExtractionFailed(format!("Malformed analyze result: {}", e)))?;

    let document = result
        .documents
        .into_iter()
        .next()
        .ok_or_else(|| AnalysisError::ExtractionFailed("Result contains no documents".into()))?;

    let fields = document.fields.ok_or_else(|| {
        AnalysisError::ExtractionFailed("First document has no fields container".into())
    })?;

    Ok(Extraction {
        fields: DdrFields::from_lookup(|field| content_of(&fields, field.wire_name())),
        raw: raw_fields(&fields),
    })
}

type FieldMap = BTreeMap<String, Option<DocumentField>>;

fn content_of(fields: &FieldMap, name: &str) -> Option<String> {
    fields
        .get(name)
        .and_then(Option::as_ref)
        .and_then(|field| field.content.clone())
}

fn raw_fields(fields: &FieldMap) -> RawFields {
    fields
        .keys()
        .map(|name| {
            let content = content_of(fields, name).unwrap_or_else(|| NOT_FOUND.to_string());
            (name.clone(), content)
        })
        .collect()
}
