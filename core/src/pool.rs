use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::TokioResolver;
use hickory_resolver::config::{NameServerConfig, ResolverConfig, ResolverOpts};
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::proto::xfer::Protocol;
use rand::seq::SliceRandom;
use tokio::sync::Mutex as AsyncMutex;
use tokio::sync::mpsc;
use tracing::{debug, info};

use subscope_common::cancel::CancelToken;
use subscope_common::config::ScanConfig;
use subscope_common::error::SourceError;
use subscope_common::record::SubdomainRecord;
use subscope_common::source::SubdomainSource;

use crate::candidates;
use crate::filter::FalsePositiveTable;
use crate::wordlist;

pub const SOURCE_NAME: &str = "resolver-pool";

/// Curated public resolvers the pool spreads its queries across.
pub const PUBLIC_RESOLVERS: &[&str] = &[
    "8.8.8.8",        // Google
    "1.1.1.1",        // Cloudflare
    "208.67.222.222", // OpenDNS
    "9.9.9.9",        // Quad9
    "64.6.64.6",      // Verisign
    "8.26.56.26",     // Comodo Secure
    "199.85.126.20",  // Norton ConnectSafe
    "208.76.50.50",   // Alternate DNS
    "185.228.168.9",  // CleanBrowsing
    "8.8.4.4",        // Google secondary
];

const MIN_WORKERS: usize = 100;
const QUERY_TIMEOUT: Duration = Duration::from_millis(200);
const FAST_QUERY_TIMEOUT: Duration = Duration::from_millis(100);
/// Resolvers tried per task; effectively the whole shuffled pool at its
/// current size.
const MAX_ATTEMPTS_PER_TASK: usize = 500;

/// One unit of pool work, created by the dispatcher and consumed by
/// exactly one worker.
struct ResolverTask {
    hostname: String,
    resolvers: Arc<Vec<TokioResolver>>,
    timeout: Duration,
}

/// Internal concurrent resolver: a worker pool spreading lookups across
/// public resolvers, with no external tooling involved.
pub struct ResolverPool;

#[async_trait]
impl SubdomainSource for ResolverPool {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn scan(
        &self,
        domain: &str,
        cfg: &ScanConfig,
        cancel: &CancelToken,
    ) -> Result<Vec<SubdomainRecord>, SourceError> {
        let prefixes = wordlist::prefixes(cfg, false).await?;
        let hostnames = candidates::generate(&prefixes, domain, true);
        info!("resolver pool: {} candidates for {domain}", hostnames.len());

        let timeout = if cfg.fast {
            FAST_QUERY_TIMEOUT
        } else {
            QUERY_TIMEOUT
        };
        let resolvers = Arc::new(build_resolvers(timeout)?);

        let baseline = root_baseline(&resolvers, domain, timeout).await;
        if !baseline.is_empty() {
            debug!("root baseline for {domain}: {baseline:?}");
        }

        let records = resolve_all(hostnames, resolvers, timeout, cfg, cancel).await;

        // Wildcard suppression over the pool's own answers.
        let mut table = FalsePositiveTable::new(cfg.fast);
        let kept: Vec<SubdomainRecord> = records
            .into_iter()
            .filter(|record| !table.is_false_positive(&baseline, &record.address))
            .collect();

        info!("resolver pool finished, {} subdomains found", kept.len());
        Ok(kept)
    }
}

/// Resolves every candidate with `max(MIN_WORKERS, concurrency)` workers
/// pulling from a shared queue. Workers append successes to a shared
/// list; the dispatcher closes the queue once all candidates are enqueued
/// (or cancellation trips) and then waits for every worker to drain out.
pub async fn resolve_all(
    hostnames: Vec<String>,
    resolvers: Arc<Vec<TokioResolver>>,
    timeout: Duration,
    cfg: &ScanConfig,
    cancel: &CancelToken,
) -> Vec<SubdomainRecord> {
    let worker_count = cfg.concurrency.max(MIN_WORKERS);
    let (tx, rx) = mpsc::channel::<ResolverTask>(worker_count);
    let rx = Arc::new(AsyncMutex::new(rx));
    let results = Arc::new(Mutex::new(Vec::new()));

    let mut workers = Vec::with_capacity(worker_count);
    for _ in 0..worker_count {
        let rx = Arc::clone(&rx);
        let results = Arc::clone(&results);
        let cancel = cancel.clone();
        workers.push(tokio::spawn(worker_loop(rx, results, cancel)));
    }

    let total = hostnames.len();
    for (done, hostname) in hostnames.into_iter().enumerate() {
        if cancel.is_tripped() {
            info!("cancel signal received, stopping dispatch");
            break;
        }
        debug!("dispatching {hostname} ({}/{total})", done + 1);
        let task = ResolverTask {
            hostname,
            resolvers: Arc::clone(&resolvers),
            timeout,
        };
        if tx.send(task).await.is_err() {
            break;
        }
    }
    drop(tx);

    for worker in workers {
        let _ = worker.await;
    }

    Arc::try_unwrap(results)
        .map(|mutex| mutex.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner()))
        .unwrap_or_default()
}

async fn worker_loop(
    rx: Arc<AsyncMutex<mpsc::Receiver<ResolverTask>>>,
    results: Arc<Mutex<Vec<SubdomainRecord>>>,
    cancel: CancelToken,
) {
    loop {
        let task = { rx.lock().await.recv().await };
        let Some(task) = task else { break };
        if cancel.is_tripped() {
            break;
        }
        if let Some(record) = resolve_task(&task, &cancel).await {
            if let Ok(mut guard) = results.lock() {
                guard.push(record);
            }
        }
    }
}

/// Tries a freshly shuffled resolver order until the first resolver
/// answers; the first address of that answer wins and the remaining
/// resolvers are not consulted.
async fn resolve_task(task: &ResolverTask, cancel: &CancelToken) -> Option<SubdomainRecord> {
    let mut order: Vec<usize> = (0..task.resolvers.len()).collect();
    order.shuffle(&mut rand::rng());

    for index in order.into_iter().take(MAX_ATTEMPTS_PER_TASK) {
        if cancel.is_tripped() {
            return None;
        }
        let lookup = tokio::time::timeout(
            task.timeout,
            task.resolvers[index].lookup_ip(task.hostname.as_str()),
        )
        .await;
        let Ok(Ok(answer)) = lookup else { continue };
        let Some(address) = answer.iter().next() else {
            continue;
        };

        debug!("{} resolved to {address}", task.hostname);
        let record_type = match address {
            IpAddr::V4(_) => "A",
            IpAddr::V6(_) => "AAAA",
        };
        return Some(
            SubdomainRecord::new(&task.hostname, SOURCE_NAME)
                .with_address(&address.to_string())
                .with_record_type(record_type),
        );
    }
    None
}

/// Answer set for the bare domain, the ground truth used to recognize
/// wildcard DNS in the pool's results.
async fn root_baseline(resolvers: &[TokioResolver], domain: &str, timeout: Duration) -> Vec<String> {
    let mut order: Vec<usize> = (0..resolvers.len()).collect();
    order.shuffle(&mut rand::rng());

    for index in order {
        let lookup = tokio::time::timeout(timeout, resolvers[index].lookup_ip(domain)).await;
        let Ok(Ok(answer)) = lookup else { continue };
        let addresses: Vec<String> = answer.iter().map(|ip| ip.to_string()).collect();
        if !addresses.is_empty() {
            return addresses;
        }
    }
    Vec::new()
}

/// One resolver per public nameserver, so a worker can address each
/// upstream individually.
pub fn build_resolvers(timeout: Duration) -> Result<Vec<TokioResolver>, SourceError> {
    PUBLIC_RESOLVERS
        .iter()
        .map(|ip| {
            let address: IpAddr = ip
                .parse()
                .map_err(|_| SourceError::Config(format!("invalid resolver address {ip}")))?;
            Ok(resolver_for(address, timeout))
        })
        .collect()
}

fn resolver_for(address: IpAddr, timeout: Duration) -> TokioResolver {
    let mut config = ResolverConfig::new();
    config.add_name_server(NameServerConfig::new(
        SocketAddr::new(address, 53),
        Protocol::Udp,
    ));

    let mut options = ResolverOpts::default();
    options.timeout = timeout;
    options.attempts = 1;

    TokioResolver::builder_with_config(config, TokioConnectionProvider::default())
        .with_options(options)
        .build()
}
