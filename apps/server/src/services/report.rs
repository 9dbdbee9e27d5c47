//! Role summaries built from extracted DDR fields.

use crate::models::{AnalystSummary, DdrFields, EngineerSummary, RoleSummaries, SupervisorSummary};
use crate::services::summarizer::{DEFAULT_MAX_REMARK_CHARS, summarize_remarks};

/// Compose the engineer, supervisor and analyst summaries.
pub fn compose_summaries(fields: &DdrFields) -> RoleSummaries {
    RoleSummaries {
        engineer: EngineerSummary {
            headline: format!(
                "Drilling ongoing at {}. Mud weight: {}. No major issues. Operation: {}.",
                fields.current_depth, fields.mud_weight, fields.operation_type
            ),
        },
        supervisor: SupervisorSummary {
            headline: format!(
                "On {} at {}, operation included: {}.",
                fields.report_date, fields.well_name, fields.operation_type
            ),
            remarks: fields.remarks.clone(),
        },
        analyst: AnalystSummary {
            headline: format!(
                "Drilling time: {} hrs. Mud weight: {}.",
                fields.drilling_hours, fields.mud_weight
            ),
            key_remarks: summarize_remarks(&fields.remarks, DEFAULT_MAX_REMARK_CHARS),
        },
    }
}
