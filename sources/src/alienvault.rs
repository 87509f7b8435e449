use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use subscope_common::cancel::CancelToken;
use subscope_common::config::ScanConfig;
use subscope_common::error::SourceError;
use subscope_common::http;
use subscope_common::record::SubdomainRecord;
use subscope_common::source::SubdomainSource;

const API_URL: &str = "https://otx.alienvault.com/api/v1/indicators/domain";
const TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct PassiveDnsResponse {
    #[serde(default)]
    passive_dns: Vec<PassiveDnsEntry>,
}

#[derive(Debug, Deserialize)]
struct PassiveDnsEntry {
    #[serde(default)]
    hostname: String,
    #[serde(default)]
    address: String,
    #[serde(default)]
    record_type: String,
}

/// AlienVault OTX passive DNS index.
pub struct AlienVault;

#[async_trait]
impl SubdomainSource for AlienVault {
    fn name(&self) -> &'static str {
        "alienvault"
    }

    async fn scan(
        &self,
        domain: &str,
        cfg: &ScanConfig,
        _cancel: &CancelToken,
    ) -> Result<Vec<SubdomainRecord>, SourceError> {
        let client = http::client(TIMEOUT, &cfg.user_agent)?;
        let response: PassiveDnsResponse = client
            .get(format!("{API_URL}/{domain}/passive_dns"))
            .send()
            .await?
            .json()
            .await
            .map_err(|err| SourceError::Malformed(err.to_string()))?;

        let records = response
            .passive_dns
            .into_iter()
            .map(|entry| {
                SubdomainRecord::new(&entry.hostname, self.name())
                    .with_address(&entry.address)
                    .with_record_type(&entry.record_type)
            })
            .collect();
        Ok(records)
    }
}
