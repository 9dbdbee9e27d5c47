//! End-to-end analysis of one uploaded DDR.
//!
//! submit → poll → extract → compose. Each stage ends the request on error.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::AnalysisError;
use crate::models::{DdrReport, RoleSummaries, UploadedDocument};
use crate::services::analyzer::DocumentAnalysisClient;
use crate::services::extractor::{Extraction, extract_fields};
use crate::services::poller::{PollPolicy, Sleeper, TokioSleeper, poll_until_complete};
use crate::services::report::compose_summaries;

/// Timestamp format shown in the report header.
const ANALYZED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Runs the analysis pipeline. Cheap to clone; shared across workers.
#[derive(Clone)]
pub struct AnalysisService {
    client: DocumentAnalysisClient,
    sleeper: Arc<dyn Sleeper>,
    policy: PollPolicy,
}

impl AnalysisService {
    /// Create a service that sleeps on the tokio timer.
    pub fn new(client: DocumentAnalysisClient, policy: PollPolicy) -> Self {
        Self::with_sleeper(client, policy, Arc::new(TokioSleeper))
    }

    pub fn with_sleeper(
        client: DocumentAnalysisClient,
        policy: PollPolicy,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            client,
            sleeper,
            policy,
        }
    }

    /// Analyze one document and build its report.
    ///
    /// `analysis_id` is reported back to the client and tags every log line.
    pub async fn analyze(
        &self,
        analysis_id: Uuid,
        document: UploadedDocument,
        include_raw: bool,
    ) -> Result<DdrReport, AnalysisError> {
        let started = Instant::now();
        let UploadedDocument { file_name, bytes } = document;

        info!(
            %analysis_id,
            file_name = %file_name,
            size = bytes.len(),
            "Submitting document for analysis"
        );

        match self.run(bytes).await {
            Ok((Extraction { fields, raw }, summaries)) => {
                info!(
                    %analysis_id,
                    well_name = %fields.well_name,
                    duration_ms = %started.elapsed().as_millis(),
                    "Analysis complete"
                );
                Ok(DdrReport {
                    analysis_id,
                    file_name,
                    well_name: fields.well_name,
                    report_date: fields.report_date,
                    analyzed_at: Utc::now().format(ANALYZED_AT_FORMAT).to_string(),
                    summaries,
                    raw_fields: include_raw.then_some(raw),
                })
            }
            Err(e) => {
                warn!(
                    %analysis_id,
                    duration_ms = %started.elapsed().as_millis(),
                    "Analysis failed: {}",
                    e
                );
                Err(e)
            }
        }
    }

    async fn run(&self, pdf: Vec<u8>) -> Result<(Extraction, RoleSummaries), AnalysisError> {
        let operation = self.client.submit(pdf).await?;
        let payload = poll_until_complete(
            &self.client,
            self.sleeper.as_ref(),
            &operation,
            &self.policy,
        )
        .await?;

        let extraction = extract_fields(&payload)?;
        let summaries = compose_summaries(&extraction.fields);

        Ok((extraction, summaries))
    }
}
