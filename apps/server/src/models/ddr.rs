//! Daily Drilling Report models and response DTOs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Placeholder shown for any field the model did not return.
pub const NOT_FOUND: &str = "Not found";

/// The fields the DDR model is trained to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DdrField {
    WellName,
    ReportDate,
    CurrentDepth,
    MudWeight,
    DrillingHours,
    OperationType,
    Remarks,
}

impl DdrField {
    /// Field name as it appears in the analysis result.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::WellName => "WellName",
            Self::ReportDate => "ReportDate",
            Self::CurrentDepth => "CurrentDepth",
            Self::MudWeight => "MudWeight",
            Self::DrillingHours => "DrillingHours",
            Self::OperationType => "OperationType",
            Self::Remarks => "Remarks",
        }
    }
}

/// Extracted DDR values. Every member holds content or [`NOT_FOUND`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DdrFields {
    pub well_name: String,
    pub report_date: String,
    pub current_depth: String,
    pub mud_weight: String,
    pub drilling_hours: String,
    pub operation_type: String,
    pub remarks: String,
}

impl DdrFields {
    /// Build the record by resolving each known field through `lookup`.
    ///
    /// `lookup` returns `None` for absent fields, which become [`NOT_FOUND`].
    pub fn from_lookup<F>(mut lookup: F) -> Self
    where
        F: FnMut(DdrField) -> Option<String>,
    {
        let mut resolve = |field| lookup(field).unwrap_or_else(|| NOT_FOUND.to_string());
        Self {
            well_name: resolve(DdrField::WellName),
            report_date: resolve(DdrField::ReportDate),
            current_depth: resolve(DdrField::CurrentDepth),
            mud_weight: resolve(DdrField::MudWeight),
            drilling_hours: resolve(DdrField::DrillingHours),
            operation_type: resolve(DdrField::OperationType),
            remarks: resolve(DdrField::Remarks),
        }
    }
}

/// Every field the document carried, name to content (or [`NOT_FOUND`]).
pub type RawFields = BTreeMap<String, String>;

/// Engineer-facing summary.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EngineerSummary {
    pub headline: String,
}

/// Supervisor-facing summary with the complete remarks.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SupervisorSummary {
    pub headline: String,
    pub remarks: String,
}

/// Analyst-facing summary with truncated key remarks.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AnalystSummary {
    pub headline: String,
    pub key_remarks: String,
}

/// The three role summaries derived from one report.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoleSummaries {
    pub engineer: EngineerSummary,
    pub supervisor: SupervisorSummary,
    pub analyst: AnalystSummary,
}

/// Result of analyzing one uploaded DDR.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DdrReport {
    /// Correlation id for this analysis (also in server logs).
    pub analysis_id: Uuid,
    pub file_name: String,
    pub well_name: String,
    pub report_date: String,
    /// UTC time the analysis finished, e.g. "2024-05-01 14:03:22 UTC".
    pub analyzed_at: String,
    pub summaries: RoleSummaries,
    /// Present only when raw fields were requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_fields: Option<BTreeMap<String, String>>,
}

/// Query parameters for the analyze endpoint.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct AnalyzeQuery {
    /// Include every extracted field in the response.
    #[serde(default)]
    pub show_raw: bool,
}

/// An uploaded PDF held in memory for the duration of one request.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
}
