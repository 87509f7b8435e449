use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use subscope_common::cancel::CancelToken;
use subscope_common::config::ScanConfig;
use subscope_common::error::SourceError;
use subscope_common::http;
use subscope_common::record::SubdomainRecord;
use subscope_common::source::SubdomainSource;

const API_URL: &str = "https://urlscan.io/api/v1/search/?q=";
const TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    task: Task,
}

#[derive(Debug, Default, Deserialize)]
struct Task {
    #[serde(default)]
    domain: String,
}

/// urlscan.io search API; scanned-page tasks carry the hostname that was
/// visited.
pub struct UrlScan;

#[async_trait]
impl SubdomainSource for UrlScan {
    fn name(&self) -> &'static str {
        "urlscan"
    }

    async fn scan(
        &self,
        domain: &str,
        cfg: &ScanConfig,
        _cancel: &CancelToken,
    ) -> Result<Vec<SubdomainRecord>, SourceError> {
        let client = http::client(TIMEOUT, &cfg.user_agent)?;
        let response: SearchResponse = client
            .get(format!("{API_URL}{domain}"))
            .send()
            .await?
            .json()
            .await
            .map_err(|err| SourceError::Malformed(err.to_string()))?;

        let suffix = format!(".{domain}");
        let records = response
            .results
            .into_iter()
            .map(|result| result.task.domain)
            .filter(|host| host == domain || host.ends_with(&suffix))
            .map(|host| SubdomainRecord::new(&host, self.name()))
            .collect();
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_task_domains() {
        let body = r#"{"results":[
            {"task":{"domain":"mail.example.com","url":"https://mail.example.com/"}},
            {"task":{"domain":"unrelated.org"}}
        ],"total":2}"#;
        let response: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results[0].task.domain, "mail.example.com");
    }
}
