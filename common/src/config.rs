use std::path::PathBuf;

use crate::http;

/// Settings for one discovery run, shared read-only by every source.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Trades coverage for speed: flat wordlist, shorter DNS timeouts,
    /// lower wildcard threshold.
    pub fast: bool,
    pub verbose: bool,
    /// Upper bound on resolver pool workers; the pool still enforces its
    /// own minimum.
    pub concurrency: usize,
    /// Local wordlist file used instead of the remote defaults.
    pub wordlist: Option<PathBuf>,
    /// Probe discovered hosts for HTTP/HTTPS status codes after the scan.
    pub probe_status: bool,
    pub no_export: bool,
    pub user_agent: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            fast: false,
            verbose: false,
            concurrency: 100,
            wordlist: None,
            probe_status: false,
            no_export: false,
            user_agent: http::DEFAULT_USER_AGENT.to_string(),
        }
    }
}
