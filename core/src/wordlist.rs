use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::info;

use subscope_common::config::ScanConfig;
use subscope_common::error::SourceError;
use subscope_common::http;

/// Short prefix list; squared into hyphenated pairs in thorough mode.
pub const WORDLIST_URL: &str = "https://raw.githubusercontent.com/danielmiessler/SecLists/master/Discovery/DNS/subdomains-top1million-5000.txt";
/// Long prefix list, used flat in fast mode.
pub const WORDLIST_LONG_URL: &str = "https://raw.githubusercontent.com/danielmiessler/SecLists/master/Discovery/DNS/subdomains-top1million-20000.txt";
pub const RESOLVER_LIST_URL: &str = "https://public-dns.info/nameservers.txt";

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Loads the brute-force prefix list: the local override when configured,
/// otherwise one of the remote defaults. `long` selects the flat 20k list.
pub async fn prefixes(cfg: &ScanConfig, long: bool) -> Result<Vec<String>, SourceError> {
    if let Some(path) = &cfg.wordlist {
        return read_lines(path);
    }

    let url = if long { WORDLIST_LONG_URL } else { WORDLIST_URL };
    let body = fetch(url, cfg).await?;
    Ok(split_lines(&body))
}

/// Downloads `url` into `path`, for inputs that must exist on disk (the
/// massdns resolver list).
pub async fn fetch_to_file(url: &str, path: &Path, cfg: &ScanConfig) -> Result<(), SourceError> {
    let body = fetch(url, cfg).await?;
    tokio::fs::write(path, body).await?;
    Ok(())
}

/// Temp directory for downloaded artifacts; created on first use.
pub fn workdir() -> Result<PathBuf, SourceError> {
    let dir = std::env::temp_dir().join("subscope");
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

async fn fetch(url: &str, cfg: &ScanConfig) -> Result<String, SourceError> {
    info!("downloading {url}");
    let client = http::client(FETCH_TIMEOUT, &cfg.user_agent)?;
    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(SourceError::Config(format!(
            "failed to download {url} (HTTP status {})",
            response.status()
        )));
    }
    Ok(response.text().await?)
}

fn read_lines(path: &Path) -> Result<Vec<String>, SourceError> {
    let body = std::fs::read_to_string(path)
        .map_err(|err| SourceError::Config(format!("cannot read {}: {err}", path.display())))?;
    Ok(split_lines(&body))
}

fn split_lines(body: &str) -> Vec<String> {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
