use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;

use subscope_common::cancel::CancelToken;
use subscope_common::config::ScanConfig;
use subscope_common::error::SourceError;
use subscope_common::http;
use subscope_common::record::SubdomainRecord;
use subscope_common::source::SubdomainSource;

const TIMEOUT: Duration = Duration::from_secs(20);

/// Wayback Machine CDX index: every archived URL under the target domain,
/// reduced to the set of distinct hostnames.
pub struct ArchiveOrg;

#[async_trait]
impl SubdomainSource for ArchiveOrg {
    fn name(&self) -> &'static str {
        "archiveorg"
    }

    async fn scan(
        &self,
        domain: &str,
        cfg: &ScanConfig,
        _cancel: &CancelToken,
    ) -> Result<Vec<SubdomainRecord>, SourceError> {
        let client = http::client(TIMEOUT, &cfg.user_agent)?;
        let url = format!(
            "http://web.archive.org/cdx/search/cdx?url={domain}&matchType=domain&output=json&fl=original&collapse=original"
        );
        let rows: Vec<Vec<String>> = client
            .get(url)
            .send()
            .await?
            .json()
            .await
            .map_err(|err| SourceError::Malformed(err.to_string()))?;

        Ok(extract_hosts(&rows, domain)
            .into_iter()
            .map(|host| SubdomainRecord::new(&host, self.name()))
            .collect())
    }
}

/// Pulls the host out of each snapshot URL and keeps the distinct ones
/// belonging to the target domain. The first CDX row is the field header.
fn extract_hosts(rows: &[Vec<String>], domain: &str) -> Vec<String> {
    let Ok(host_pattern) = Regex::new(r"^https?://([^/@?#]+)") else {
        return Vec::new();
    };
    let suffix = format!(".{domain}");

    let mut hosts = HashSet::new();
    for row in rows.iter().skip(1) {
        let Some(url) = row.first() else { continue };
        let Some(captures) = host_pattern.captures(url) else {
            continue;
        };
        let host = captures[1]
            .rsplit_once(':')
            .map_or(&captures[1], |(host, _port)| host)
            .to_ascii_lowercase();
        if host == domain || host.ends_with(&suffix) {
            hosts.insert(host);
        }
    }

    let mut hosts: Vec<String> = hosts.into_iter().collect();
    hosts.sort();
    hosts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(urls: &[&str]) -> Vec<Vec<String>> {
        let mut rows = vec![vec!["original".to_string()]];
        rows.extend(urls.iter().map(|url| vec![url.to_string()]));
        rows
    }

    #[test]
    fn extracts_distinct_in_scope_hosts() {
        let rows = rows(&[
            "https://mail.example.com/inbox",
            "http://mail.example.com:8080/other",
            "https://www.example.com/",
            "https://evil.org/example.com",
        ]);
        let hosts = extract_hosts(&rows, "example.com");
        assert_eq!(hosts, vec!["mail.example.com", "www.example.com"]);
    }

    #[test]
    fn header_row_is_ignored() {
        let hosts = extract_hosts(&rows(&[]), "example.com");
        assert!(hosts.is_empty());
    }
}
