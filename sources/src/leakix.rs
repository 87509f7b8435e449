use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use subscope_common::cancel::CancelToken;
use subscope_common::config::ScanConfig;
use subscope_common::error::SourceError;
use subscope_common::http;
use subscope_common::record::SubdomainRecord;
use subscope_common::source::SubdomainSource;

const API_URL: &str = "https://leakix.net/api/subdomains";
// LeakIX rate-limits aggressively; keep the window tight.
const TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Deserialize)]
struct LeakixEntry {
    #[serde(default)]
    subdomain: String,
}

/// LeakIX subdomain index.
pub struct Leakix;

#[async_trait]
impl SubdomainSource for Leakix {
    fn name(&self) -> &'static str {
        "leakix"
    }

    async fn scan(
        &self,
        domain: &str,
        cfg: &ScanConfig,
        _cancel: &CancelToken,
    ) -> Result<Vec<SubdomainRecord>, SourceError> {
        let client = http::client(TIMEOUT, &cfg.user_agent)?;
        let body = client
            .get(format!("{API_URL}/{domain}"))
            .send()
            .await?
            .text()
            .await?;

        if !body.contains(domain) {
            return Err(SourceError::Malformed(body.trim().to_string()));
        }

        let entries: Vec<LeakixEntry> =
            serde_json::from_str(&body).map_err(|err| SourceError::Malformed(err.to_string()))?;

        Ok(entries
            .into_iter()
            .filter(|entry| !entry.subdomain.is_empty())
            .map(|entry| SubdomainRecord::new(&entry.subdomain, self.name()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_subdomain_array() {
        let body = r#"[{"subdomain":"mail.example.com"},{"subdomain":"www.example.com"}]"#;
        let entries: Vec<LeakixEntry> = serde_json::from_str(body).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].subdomain, "mail.example.com");
    }
}
