use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};

use subscope_common::cancel::CancelToken;
use subscope_common::config::ScanConfig;
use subscope_common::error::SourceError;
use subscope_common::http;
use subscope_common::record::SubdomainRecord;
use subscope_common::source::SubdomainSource;

const TIMEOUT: Duration = Duration::from_secs(10);

/// RapidDNS. No API; the result table is scraped from HTML, columns are
/// `# | name | address | type | date`.
pub struct RapidDns;

#[async_trait]
impl SubdomainSource for RapidDns {
    fn name(&self) -> &'static str {
        "rapiddns"
    }

    async fn scan(
        &self,
        domain: &str,
        cfg: &ScanConfig,
        _cancel: &CancelToken,
    ) -> Result<Vec<SubdomainRecord>, SourceError> {
        let client = http::client(TIMEOUT, &cfg.user_agent)?;
        let body = client
            .get(format!("https://rapiddns.io/subdomain/{domain}?full=1"))
            .send()
            .await?
            .text()
            .await?;

        Ok(parse_result_table(&body, self.name()))
    }
}

fn parse_result_table(body: &str, source: &str) -> Vec<SubdomainRecord> {
    let document = Html::parse_document(body);
    let Ok(row_selector) = Selector::parse("tr") else {
        return Vec::new();
    };
    let Ok(cell_selector) = Selector::parse("td") else {
        return Vec::new();
    };

    let mut records = Vec::new();
    for row in document.select(&row_selector) {
        let cells: Vec<String> = row
            .select(&cell_selector)
            .map(|cell| cell.text().collect::<String>().trim().to_string())
            .collect();
        if cells.len() < 4 || cells[1].is_empty() {
            continue;
        }
        records.push(
            SubdomainRecord::new(&cells[1], source)
                .with_address(&cells[2])
                .with_record_type(&cells[3]),
        );
    }
    records
}
