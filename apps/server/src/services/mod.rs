//! Business logic services.

pub mod analyzer;
pub mod extractor;
pub mod pipeline;
pub mod poller;
pub mod report;
pub mod summarizer;

pub use analyzer::DocumentAnalysisClient;
pub use pipeline::AnalysisService;
pub use poller::{PollPolicy, Sleeper, TokioSleeper, UnknownStatusPolicy};
