use std::time::Duration;

use subscope_common::config::ScanConfig;
use subscope_common::error::SourceError;
use subscope_common::http;

const TIMEOUT: Duration = Duration::from_secs(2);

/// Fetches `url` and reports the HTTP status code. Bounded tightly so a
/// dead host costs at most the timeout.
pub async fn status_code(url: &str, cfg: &ScanConfig) -> Result<u16, SourceError> {
    let client = http::client(TIMEOUT, &cfg.user_agent)?;
    let response = client.get(url).send().await?;
    Ok(response.status().as_u16())
}
