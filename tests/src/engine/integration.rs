use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use subscope_common::cancel::CancelToken;
use subscope_common::config::ScanConfig;
use subscope_common::error::SourceError;
use subscope_common::record::SubdomainRecord;
use subscope_common::source::SubdomainSource;
use subscope_core::engine::DiscoveryEngine;
use subscope_core::pool;

/// A source returning a fixed record set.
struct FixedSource {
    name: &'static str,
    records: Vec<SubdomainRecord>,
}

#[async_trait]
impl SubdomainSource for FixedSource {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn scan(
        &self,
        _domain: &str,
        _cfg: &ScanConfig,
        _cancel: &CancelToken,
    ) -> Result<Vec<SubdomainRecord>, SourceError> {
        Ok(self.records.clone())
    }
}

/// A source that always fails.
struct BrokenSource;

#[async_trait]
impl SubdomainSource for BrokenSource {
    fn name(&self) -> &'static str {
        "broken"
    }

    async fn scan(
        &self,
        _domain: &str,
        _cfg: &ScanConfig,
        _cancel: &CancelToken,
    ) -> Result<Vec<SubdomainRecord>, SourceError> {
        Err(SourceError::Unavailable("endpoint down".to_string()))
    }
}

/// A source that trips the shared cancellation token mid-run and still
/// returns its partial results.
struct TrippingSource;

#[async_trait]
impl SubdomainSource for TrippingSource {
    fn name(&self) -> &'static str {
        "tripping"
    }

    async fn scan(
        &self,
        _domain: &str,
        _cfg: &ScanConfig,
        cancel: &CancelToken,
    ) -> Result<Vec<SubdomainRecord>, SourceError> {
        cancel.trip();
        Ok(vec![SubdomainRecord::new("partial.example.com", "tripping")])
    }
}

/// A source that records whether it was ever invoked.
struct FlaggingSource {
    called: Arc<AtomicBool>,
}

#[async_trait]
impl SubdomainSource for FlaggingSource {
    fn name(&self) -> &'static str {
        "flagging"
    }

    async fn scan(
        &self,
        _domain: &str,
        _cfg: &ScanConfig,
        _cancel: &CancelToken,
    ) -> Result<Vec<SubdomainRecord>, SourceError> {
        self.called.store(true, Ordering::Relaxed);
        Ok(vec![SubdomainRecord::new("late.example.com", "flagging")])
    }
}

fn record(name: &str, address: &str, record_type: &str, source: &'static str) -> SubdomainRecord {
    SubdomainRecord::new(name, source)
        .with_address(address)
        .with_record_type(record_type)
}

#[tokio::test]
async fn failing_source_does_not_abort_the_run() {
    let engine = DiscoveryEngine::new(vec![
        Box::new(BrokenSource),
        Box::new(FixedSource {
            name: "fixed",
            records: vec![record("mail.example.com", "1.2.3.4", "A", "fixed")],
        }),
    ]);

    let records = engine
        .run("example.com", &ScanConfig::default(), &CancelToken::new())
        .await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].domain_name, "mail.example.com");
}

#[tokio::test]
async fn records_merge_across_sources() {
    let engine = DiscoveryEngine::new(vec![
        Box::new(FixedSource {
            name: "one",
            records: vec![
                record("a.example.com", "1.1.1.1", "A", "one"),
                record("b.example.com", "", "", "one"),
            ],
        }),
        Box::new(FixedSource {
            name: "two",
            records: vec![
                // Same observation again: collapses.
                record("a.example.com", "1.1.1.1", "A", "two"),
                // Conflicting address: survives alongside.
                record("a.example.com", "2.2.2.2", "A", "two"),
                // Empty name: dropped before aggregation.
                record("", "3.3.3.3", "A", "two"),
            ],
        }),
    ]);

    let records = engine
        .run("example.com", &ScanConfig::default(), &CancelToken::new())
        .await;

    assert_eq!(records.len(), 3);
    let a_entries: Vec<_> = records
        .iter()
        .filter(|r| r.domain_name == "a.example.com")
        .collect();
    assert_eq!(a_entries.len(), 2);
    assert!(records.iter().all(|r| !r.domain_name.is_empty()));
}

#[tokio::test]
async fn cancellation_between_sources_returns_partial_results() {
    let called_after_trip = Arc::new(AtomicBool::new(false));
    let engine = DiscoveryEngine::new(vec![
        Box::new(TrippingSource),
        Box::new(FlaggingSource {
            called: Arc::clone(&called_after_trip),
        }),
    ]);

    let cancel = CancelToken::new();
    let records = engine.run("example.com", &ScanConfig::default(), &cancel).await;

    // The tripping source's own records survive; the later source never ran.
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].domain_name, "partial.example.com");
    assert!(!called_after_trip.load(Ordering::Relaxed));
    assert!(cancel.is_tripped());
}

#[tokio::test]
async fn pre_tripped_run_is_empty_but_not_an_error() {
    let engine = DiscoveryEngine::new(vec![Box::new(FixedSource {
        name: "fixed",
        records: vec![record("mail.example.com", "1.2.3.4", "A", "fixed")],
    })]);

    let cancel = CancelToken::new();
    cancel.trip();

    let records = engine.run("example.com", &ScanConfig::default(), &cancel).await;
    assert!(records.is_empty());
}

#[tokio::test]
async fn pool_cancellation_terminates_promptly() {
    let cfg = ScanConfig::default();
    let cancel = CancelToken::new();
    cancel.trip();

    let resolvers = Arc::new(pool::build_resolvers(Duration::from_millis(50)).expect("resolvers"));
    let hostnames: Vec<String> = (0..1000).map(|i| format!("h{i}.example.com")).collect();

    let started = std::time::Instant::now();
    let records = pool::resolve_all(
        hostnames,
        resolvers,
        Duration::from_millis(50),
        &cfg,
        &cancel,
    )
    .await;

    assert!(records.is_empty());
    // No queries should have been dispatched: this is queue setup and
    // teardown only.
    assert!(started.elapsed() < Duration::from_secs(5));
}
