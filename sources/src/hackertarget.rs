use std::time::Duration;

use async_trait::async_trait;

use subscope_common::cancel::CancelToken;
use subscope_common::config::ScanConfig;
use subscope_common::error::SourceError;
use subscope_common::http;
use subscope_common::record::SubdomainRecord;
use subscope_common::source::SubdomainSource;

const API_URL: &str = "https://api.hackertarget.com/hostsearch/?q=";
const TIMEOUT: Duration = Duration::from_secs(10);

/// HackerTarget host search. Free tier, hard API limit; over-quota
/// responses come back as a plain-text notice instead of results.
pub struct HackerTarget;

#[async_trait]
impl SubdomainSource for HackerTarget {
    fn name(&self) -> &'static str {
        "hackertarget"
    }

    async fn scan(
        &self,
        domain: &str,
        cfg: &ScanConfig,
        _cancel: &CancelToken,
    ) -> Result<Vec<SubdomainRecord>, SourceError> {
        let client = http::client(TIMEOUT, &cfg.user_agent)?;
        let body = client
            .get(format!("{API_URL}{domain}"))
            .send()
            .await?
            .text()
            .await?;

        if !body.contains(domain) {
            // Quota notices and error banners never mention the target.
            return Err(SourceError::Malformed(body.trim().to_string()));
        }

        Ok(parse_hostsearch(&body, self.name()))
    }
}

/// One `hostname,ip` pair per line; lines without a comma are skipped.
fn parse_hostsearch(body: &str, source: &str) -> Vec<SubdomainRecord> {
    body.lines()
        .filter_map(|line| line.split_once(','))
        .map(|(host, address)| SubdomainRecord::new(host, source).with_address(address))
        .collect()
}
