use std::collections::HashSet;
use std::time::Instant;

use anyhow::Result;
use indicatif::ProgressStyle;
use tracing::{Instrument, debug, info, info_span, warn};
use tracing_indicatif::span_ext::IndicatifSpanExt;

use subscope_common::cancel::CancelToken;
use subscope_common::config::ScanConfig;
use subscope_common::record::SubdomainRecord;
use subscope_common::source::SubdomainSource;
use subscope_core::bulk::BulkResolver;
use subscope_core::engine::DiscoveryEngine;
use subscope_core::pool::ResolverPool;
use subscope_sources::alienvault::AlienVault;
use subscope_sources::archiveorg::ArchiveOrg;
use subscope_sources::hackertarget::HackerTarget;
use subscope_sources::leakix::Leakix;
use subscope_sources::rapiddns::RapidDns;
use subscope_sources::urlscan::UrlScan;

use crate::terminal::print;
use crate::{export, probe};

pub async fn run(domain: &str, cfg: &ScanConfig) -> Result<()> {
    let cancel = CancelToken::new();
    spawn_interrupt_handler(cancel.clone());

    let engine = DiscoveryEngine::new(source_registry());
    print::module_list(domain, cfg, &engine.source_names());

    let span = info_span!("discovery", indicatif.pb_show = true);
    span.pb_set_style(&spinner_style());
    span.pb_set_message(&format!("enumerating {domain}"));

    let started = Instant::now();
    let records = engine.run(domain, cfg, &cancel).instrument(span).await;
    let elapsed = started.elapsed();

    print::report(&records, elapsed);

    if cfg.probe_status {
        probe_status_codes(&records, cfg, &cancel).await;
    }

    if !cfg.no_export && !records.is_empty() {
        match export::write_csv(&records) {
            Ok(path) => info!("CSV report written to {}", path.display()),
            Err(err) => warn!("CSV export failed: {err}"),
        }
    }

    Ok(())
}

/// Every discovery source, passive first, active resolvers last. Adding
/// a module is adding a constructor here.
fn source_registry() -> Vec<Box<dyn SubdomainSource>> {
    vec![
        Box::new(HackerTarget),
        Box::new(Leakix),
        Box::new(AlienVault),
        Box::new(ArchiveOrg),
        Box::new(RapidDns),
        Box::new(UrlScan),
        Box::new(BulkResolver),
        Box::new(ResolverPool),
    ]
}

/// First Ctrl+C trips the run's cancellation token; loops drain out on
/// their next poll.
fn spawn_interrupt_handler(cancel: CancelToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Ctrl+C received, finishing in-flight work and stopping");
            cancel.trip();
        }
    });
}

async fn probe_status_codes(records: &[SubdomainRecord], cfg: &ScanConfig, cancel: &CancelToken) {
    print::header("http status probe");

    let mut probed: HashSet<&str> = HashSet::new();
    for record in records {
        if cancel.is_tripped() {
            info!("cancel signal received, stopping status probe");
            break;
        }
        if !probed.insert(record.domain_name.as_str()) {
            continue;
        }

        for scheme in ["https", "http"] {
            let url = format!("{scheme}://{}", record.domain_name);
            match probe::status_code(&url, cfg).await {
                Ok(code) => print::status_line(&record.domain_name, scheme, code),
                Err(err) => debug!("{url}: {err}"),
            }
        }
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&[
            "▁▁▁▁▁", "▁▂▂▂▁", "▁▄▂▄▁", "▂▄▆▄▂", "▄▆█▆▄", "▂▄▆▄▂", "▁▄▂▄▁", "▁▂▂▂▁",
        ])
}
