//! Poll loop for asynchronous analysis operations.
//!
//! The loop is a small state machine:
//!
//! ```text
//! Running { polls } --poll--> Running { polls + 1 }
//!                    \------> Succeeded(payload)   (terminal)
//!                     \-----> Failed(error)        (terminal)
//! ```
//!
//! Status fetches and sleeps go through traits so the loop can be driven by a
//! scripted source and a recording sleeper in tests.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::error::AnalysisError;
use crate::models::{AnalyzeOperation, OperationLocation, OperationStatus};

/// Default delay between status polls.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Default number of polls before giving up (two minutes at the default interval).
const DEFAULT_MAX_ATTEMPTS: u32 = 120;

/// Fetches the current state of an operation.
#[async_trait]
pub trait OperationStatusSource: Send + Sync {
    async fn fetch_status(
        &self,
        operation: &OperationLocation,
    ) -> Result<AnalyzeOperation, AnalysisError>;
}

/// Waits between polls.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeper backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// What to do when the service reports a status the loop does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownStatusPolicy {
    /// End the request with [`AnalysisError::UnknownStatus`].
    #[default]
    Fail,
    /// Keep polling as if the operation were still running.
    Wait,
}

impl UnknownStatusPolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "fail" => Some(Self::Fail),
            "wait" => Some(Self::Wait),
            _ => None,
        }
    }
}

/// Bounds and behavior of the poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Fixed delay between polls
    pub interval: Duration,
    /// Maximum number of status requests
    pub max_attempts: u32,
    /// Handling of unrecognized statuses
    pub unknown_status: UnknownStatusPolicy,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            unknown_status: UnknownStatusPolicy::default(),
        }
    }
}

#[derive(Debug)]
enum PollState {
    Running { polls: u32 },
    Succeeded(JsonValue),
    Failed(AnalysisError),
}

impl PollState {
    /// Transition after the `polls`-th status response.
    fn after_poll(polls: u32, response: AnalyzeOperation, policy: &PollPolicy) -> Self {
        match response.operation_status() {
            OperationStatus::NotStarted | OperationStatus::Running => Self::Running { polls },
            OperationStatus::Succeeded => Self::Succeeded(
                response
                    .analyze_result
                    .unwrap_or_else(|| JsonValue::Object(Default::default())),
            ),
            OperationStatus::Failed => {
                let error = response.error.unwrap_or_default();
                Self::Failed(AnalysisError::AnalysisFailed {
                    code: error.code,
                    message: error.message,
                })
            }
            OperationStatus::Unknown(status) => match policy.unknown_status {
                UnknownStatusPolicy::Fail => Self::Failed(AnalysisError::UnknownStatus(status)),
                UnknownStatusPolicy::Wait => {
                    warn!("Unrecognized operation status '{}', still waiting", status);
                    Self::Running { polls }
                }
            },
        }
    }
}

/// Poll `operation` until it reaches a terminal status.
///
/// Returns the raw `analyzeResult` payload on success. Sleeps only between
/// polls, so `n` polls incur `n - 1` sleeps. At least one poll is always made.
pub async fn poll_until_complete(
    source: &dyn OperationStatusSource,
    sleeper: &dyn Sleeper,
    operation: &OperationLocation,
    policy: &PollPolicy,
) -> Result<JsonValue, AnalysisError> {
    let max_attempts = policy.max_attempts.max(1);
    let mut state = PollState::Running { polls: 0 };

    loop {
        match state {
            PollState::Running { polls } => {
                if polls >= max_attempts {
                    return Err(AnalysisError::Timeout { attempts: polls });
                }
                if polls > 0 {
                    sleeper.sleep(policy.interval).await;
                }

                let response = source.fetch_status(operation).await?;
                debug!(poll = polls + 1, status = %response.status, "Operation status");
                state = PollState::after_poll(polls + 1, response, policy);
            }
            PollState::Succeeded(payload) => return Ok(payload),
            PollState::Failed(error) => return Err(error),
        }
    }
}
