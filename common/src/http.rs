use std::time::Duration;

use crate::error::SourceError;

/// Browser user agent presented to passive source endpoints.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Builds the HTTP client used by source adapters.
///
/// Every adapter carries its own bounded timeout so one slow endpoint
/// cannot stall the whole run. Certificate validation is relaxed because
/// recon targets routinely present broken chains.
pub fn client(timeout: Duration, user_agent: &str) -> Result<reqwest::Client, SourceError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .danger_accept_invalid_certs(true)
        .build()
        .map_err(|err| SourceError::Config(err.to_string()))
}
