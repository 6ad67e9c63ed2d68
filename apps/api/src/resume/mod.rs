pub mod annotator;
pub mod extract;
pub mod fields;
pub mod handlers;
pub mod ingest;

use thiserror::Error;

/// Document-level failures. Extraction problems never surface here; they
/// degrade to empty text.
#[derive(Debug, Error)]
pub enum ResumeError {
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),
}
