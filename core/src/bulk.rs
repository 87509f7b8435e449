use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

use subscope_common::cancel::CancelToken;
use subscope_common::config::ScanConfig;
use subscope_common::error::SourceError;
use subscope_common::record::SubdomainRecord;
use subscope_common::source::SubdomainSource;

use crate::candidates;
use crate::filter::FalsePositiveTable;
use crate::wordlist;

pub const SOURCE_NAME: &str = "massdns";

const MASSDNS_BIN: &str = "massdns";
/// `-s` value for the candidate pass: concurrent lookups massdns keeps in
/// flight.
const CONCURRENT_LOOKUPS: &str = "500";
const RECORD_TYPES: &[&str] = &["A", "AAAA"];

/// One line of massdns `-o J` output.
#[derive(Debug, Deserialize)]
struct ResolutionLine {
    name: String,
    status: String,
    #[serde(default)]
    resolver: String,
    #[serde(default)]
    data: ResolutionData,
}

#[derive(Debug, Default, Deserialize)]
struct ResolutionData {
    #[serde(default)]
    answers: Vec<ResolutionAnswer>,
}

#[derive(Debug, Deserialize)]
struct ResolutionAnswer {
    #[serde(rename = "type")]
    answer_type: String,
    data: String,
}

impl ResolutionLine {
    /// The address answering the queried record type, if this line is a
    /// clean resolution. Answers of other types (CNAME chains and the
    /// like) do not count.
    fn address_for(&self, record_type: &str) -> Option<&str> {
        if self.status != "NOERROR" {
            return None;
        }
        self.data
            .answers
            .iter()
            .find(|answer| answer.answer_type == record_type)
            .map(|answer| answer.data.as_str())
    }
}

/// Bulk resolution through an external massdns process: the same goal as
/// the internal pool, but the UDP fan-out is delegated to a tool built
/// for millions of queries. Output is consumed as a stream, one JSON line
/// at a time, so progress and cancellation work mid-run.
pub struct BulkResolver;

#[async_trait]
impl SubdomainSource for BulkResolver {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn scan(
        &self,
        domain: &str,
        cfg: &ScanConfig,
        cancel: &CancelToken,
    ) -> Result<Vec<SubdomainRecord>, SourceError> {
        if !massdns_runnable() {
            return Err(SourceError::Unavailable(format!(
                "{MASSDNS_BIN} is not installed or not on PATH (try `apt install massdns`)"
            )));
        }

        let workdir = wordlist::workdir()?;
        let resolvers_path = workdir.join("dns-resolvers.txt");
        wordlist::fetch_to_file(wordlist::RESOLVER_LIST_URL, &resolvers_path, cfg).await?;

        // Fast mode takes the long list flat; thorough mode squares the
        // short list into hyphenated pairs.
        let prefixes = wordlist::prefixes(cfg, cfg.fast).await?;
        if !cfg.fast {
            info!("generating prefix combinations, this can take a while");
        }
        let hostnames = candidates::generate(&prefixes, domain, cfg.fast);
        info!(
            "massdns: {} candidates for {domain}; press Ctrl+C to stop early",
            hostnames.len()
        );

        let mut records = Vec::new();
        for &record_type in RECORD_TYPES {
            if cancel.is_tripped() {
                break;
            }
            let pass = self
                .scan_record_type(domain, &resolvers_path, &hostnames, record_type, cfg, cancel)
                .await?;
            records.extend(pass);
        }
        Ok(records)
    }
}

impl BulkResolver {
    /// Two massdns invocations per record type: the root baseline, then
    /// the streamed candidate pass with wildcard suppression.
    async fn scan_record_type(
        &self,
        domain: &str,
        resolvers_path: &Path,
        hostnames: &[String],
        record_type: &str,
        cfg: &ScanConfig,
        cancel: &CancelToken,
    ) -> Result<Vec<SubdomainRecord>, SourceError> {
        info!("massdns: root baseline pass for type {record_type}");
        let baseline = root_baseline(domain, resolvers_path, record_type, cancel).await?;
        info!("massdns: root addresses for {record_type}: {baseline:?}");

        info!("massdns: candidate pass for type {record_type}");
        let mut table = FalsePositiveTable::new(cfg.fast);

        let mut child = massdns_command(resolvers_path, record_type, true)
            .spawn()
            .map_err(|err| {
                SourceError::Unavailable(format!("failed to start {MASSDNS_BIN}: {err}"))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| SourceError::Unavailable("massdns stdin not piped".to_string()))?;
        let payload = hostnames.join("\n");
        tokio::spawn(async move {
            let _ = stdin.write_all(payload.as_bytes()).await;
            let _ = stdin.shutdown().await;
        });

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| SourceError::Unavailable("massdns stdout not piped".to_string()))?;
        let mut lines = BufReader::new(stdout).lines();

        let total = hostnames.len().max(1);
        let mut seen = 0usize;
        let mut provisional: Vec<SubdomainRecord> = Vec::new();
        let mut cancelled = false;

        while let Some(line) = lines.next_line().await? {
            if cancel.is_tripped() {
                info!("cancel signal received, leaving massdns stream");
                cancelled = true;
                break;
            }
            seen += 1;

            let parsed: ResolutionLine = match serde_json::from_str(&line) {
                Ok(parsed) => parsed,
                Err(err) => {
                    warn!("skipping unparseable massdns line: {err}");
                    continue;
                }
            };
            let Some(address) = parsed.address_for(record_type) else {
                continue;
            };
            let address = address.to_string();

            if table.is_false_positive(&baseline, &address) {
                debug!("{} looks like wildcard noise ({address})", parsed.name);
                continue;
            }

            info!(
                "massdns: {} {record_type} {address} ({}/{total}, {}%) via {}",
                parsed.name,
                seen,
                seen * 100 / total,
                parsed.resolver
            );
            provisional.push(
                SubdomainRecord::new(&parsed.name, SOURCE_NAME)
                    .with_address(&address)
                    .with_record_type(record_type),
            );
        }

        // Threshold crossings discovered late in the stream must
        // retroactively exclude earlier records with the same address.
        let kept: Vec<SubdomainRecord> = provisional
            .into_iter()
            .filter(|record| !table.is_false_positive(&baseline, &record.address))
            .collect();

        if cancelled {
            // The process keeps running; we just stop consuming it.
            return Ok(kept);
        }
        let _ = child.wait().await;
        Ok(kept)
    }
}

/// Resolves the bare target domain to get its true answer set for one
/// record type. An empty baseline means the domain itself does not
/// resolve for that type; the frequency threshold still applies.
async fn root_baseline(
    domain: &str,
    resolvers_path: &Path,
    record_type: &str,
    cancel: &CancelToken,
) -> Result<Vec<String>, SourceError> {
    let mut child = massdns_command(resolvers_path, record_type, false)
        .spawn()
        .map_err(|err| SourceError::Unavailable(format!("failed to start {MASSDNS_BIN}: {err}")))?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| SourceError::Unavailable("massdns stdin not piped".to_string()))?;
    let domain_line = domain.to_string();
    tokio::spawn(async move {
        let _ = stdin.write_all(domain_line.as_bytes()).await;
        let _ = stdin.shutdown().await;
    });

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| SourceError::Unavailable("massdns stdout not piped".to_string()))?;
    let mut lines = BufReader::new(stdout).lines();

    let mut baseline = Vec::new();
    while let Some(line) = lines.next_line().await? {
        if cancel.is_tripped() {
            return Ok(baseline);
        }
        let parsed: ResolutionLine = match serde_json::from_str(&line) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!("skipping unparseable massdns line: {err}");
                continue;
            }
        };
        if parsed.status == "NOERROR" {
            baseline = parsed
                .data
                .answers
                .iter()
                .filter(|answer| answer.answer_type == record_type)
                .map(|answer| answer.data.clone())
                .collect();
            break;
        }
    }

    let _ = child.wait().await;
    Ok(baseline)
}

fn massdns_command(resolvers_path: &Path, record_type: &str, candidate_pass: bool) -> Command {
    let mut cmd = Command::new(MASSDNS_BIN);
    cmd.arg("-r").arg(resolvers_path);
    cmd.arg("-t").arg(record_type);
    if candidate_pass {
        cmd.arg("-s").arg(CONCURRENT_LOOKUPS);
    }
    cmd.arg("-o").arg("J").arg("-q");
    cmd.stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null());
    cmd
}

/// Preflight: the binary only needs to be spawnable; exit status of the
/// usage output is not interpreted.
fn massdns_runnable() -> bool {
    std::process::Command::new(MASSDNS_BIN)
        .arg("-h")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESOLVED: &str = r#"{"name":"mail.example.com.","type":"A","class":"IN","status":"NOERROR","rx_ts":1,"data":{"answers":[{"ttl":300,"type":"A","class":"IN","name":"mail.example.com.","data":"93.184.216.34"}]},"resolver":"8.8.8.8:53"}"#;
    const NXDOMAIN: &str = r#"{"name":"nope.example.com.","type":"A","class":"IN","status":"NXDOMAIN","rx_ts":1,"resolver":"8.8.8.8:53"}"#;
    const CNAME_ONLY: &str = r#"{"name":"www.example.com.","type":"A","class":"IN","status":"NOERROR","rx_ts":1,"data":{"answers":[{"ttl":300,"type":"CNAME","class":"IN","name":"www.example.com.","data":"example.com."}]},"resolver":"8.8.8.8:53"}"#;

    #[test]
    fn resolved_line_yields_matching_answer() {
        let parsed: ResolutionLine = serde_json::from_str(RESOLVED).unwrap();
        assert_eq!(parsed.address_for("A"), Some("93.184.216.34"));
        assert_eq!(parsed.name, "mail.example.com.");
        assert_eq!(parsed.resolver, "8.8.8.8:53");
    }

    #[test]
    fn non_noerror_status_is_not_a_resolution() {
        let parsed: ResolutionLine = serde_json::from_str(NXDOMAIN).unwrap();
        assert_eq!(parsed.address_for("A"), None);
    }

    #[test]
    fn answers_of_other_types_do_not_count() {
        let parsed: ResolutionLine = serde_json::from_str(CNAME_ONLY).unwrap();
        assert_eq!(parsed.address_for("A"), None);
    }

    #[test]
    fn garbage_line_is_a_parse_error() {
        assert!(serde_json::from_str::<ResolutionLine>("not json").is_err());
    }
}
