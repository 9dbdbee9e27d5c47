//! Domain models for DDR analysis.

pub mod analysis;
pub mod ddr;

// Re-export commonly used types
pub use analysis::{
    AnalyzeOperation, AnalyzeResult, AnalyzedDocument, DocumentField, OperationLocation,
    OperationStatus, ServiceError,
};
pub use ddr::{
    AnalystSummary, AnalyzeQuery, DdrField, DdrFields, DdrReport, EngineerSummary, NOT_FOUND,
    RawFields, RoleSummaries, SupervisorSummary, UploadedDocument,
};
