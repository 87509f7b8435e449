use tracing::{info, warn};

use subscope_common::cancel::CancelToken;
use subscope_common::config::ScanConfig;
use subscope_common::record::SubdomainRecord;
use subscope_common::source::SubdomainSource;

use crate::aggregate::Aggregator;

/// Runs every registered discovery source against a target domain and
/// folds their observations into one canonical record set.
///
/// Sources are an explicit registry assembled by the caller; adding a
/// module means adding a constructor to that list. A source failure is
/// logged and skipped; partial results always beat no results.
pub struct DiscoveryEngine {
    sources: Vec<Box<dyn SubdomainSource>>,
}

impl DiscoveryEngine {
    pub fn new(sources: Vec<Box<dyn SubdomainSource>>) -> Self {
        Self { sources }
    }

    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|source| source.name()).collect()
    }

    /// Scans with every source in registry order, merging each source's
    /// records as it completes. Returns whatever has been aggregated when
    /// the registry is exhausted or cancellation trips between sources.
    pub async fn run(
        &self,
        domain: &str,
        cfg: &ScanConfig,
        cancel: &CancelToken,
    ) -> Vec<SubdomainRecord> {
        let mut aggregator = Aggregator::new();

        for source in &self.sources {
            if cancel.is_tripped() {
                info!("cancel signal received, skipping remaining sources");
                break;
            }

            info!("scanning subdomains with {}", source.name());
            match source.scan(domain, cfg, cancel).await {
                Ok(records) => {
                    let observed = records.len();
                    aggregator.extend(records);
                    info!(
                        "{}: {observed} records, {} unique entries so far",
                        source.name(),
                        aggregator.len()
                    );
                }
                Err(err) => {
                    warn!("{} failed: {err}; continuing with remaining sources", source.name());
                }
            }
        }

        aggregator.records()
    }
}
