use thiserror::Error;

/// Failure taxonomy for discovery sources.
///
/// Cancellation is deliberately absent: a cancelled loop returns the
/// partial results it has accumulated, not an error. No variant here ever
/// aborts the overall run; the orchestrator logs the source and moves on.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source endpoint or external binary could not be reached or
    /// invoked. The source's contribution is simply empty.
    #[error("source unavailable: {0}")]
    Unavailable(String),

    /// The source answered with something unparseable. Individual bad
    /// records/lines are skipped in place; this variant is for bodies
    /// that are unusable as a whole.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Required inputs (wordlist, resolver list) could not be prepared.
    /// Fatal to this discovery path only.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Unavailable(err.to_string())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Malformed(err.to_string())
    }
}

impl From<std::io::Error> for SourceError {
    fn from(err: std::io::Error) -> Self {
        SourceError::Unavailable(err.to_string())
    }
}
