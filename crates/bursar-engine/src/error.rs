//! Error types for the analysis engine

use thiserror::Error;

/// Failures of a single model analysis attempt
///
/// These never escape the engine: the failure branch is where the
/// deterministic pending-review record gets built, so callers always
/// receive a complete record.
#[derive(Error, Debug)]
pub enum AnalystError {
    /// The provider call itself failed
    #[error("Provider error: {0}")]
    Provider(String),

    /// The provider replied, but no structured payload could be recovered
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}
