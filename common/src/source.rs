use async_trait::async_trait;

use crate::cancel::CancelToken;
use crate::config::ScanConfig;
use crate::error::SourceError;
use crate::record::SubdomainRecord;

/// Contract implemented by every discovery source, passive or active.
///
/// Calls are independent and stateless across domains. A failing source
/// must not take the run down with it: the orchestrator logs the error
/// and continues with the remaining sources. Network timeouts are the
/// source's own responsibility.
#[async_trait]
pub trait SubdomainSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Returns every observation the source has for `domain`. Long-running
    /// implementations poll `cancel` and return partial results when it
    /// trips.
    async fn scan(
        &self,
        domain: &str,
        cfg: &ScanConfig,
        cancel: &CancelToken,
    ) -> Result<Vec<SubdomainRecord>, SourceError>;
}
