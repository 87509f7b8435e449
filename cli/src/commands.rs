pub mod scan;

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "subscope")]
#[command(version, about = "Subdomain discovery through passive sources and DNS brute force.")]
pub struct CommandLine {
    /// The domain to enumerate
    pub domain: String,

    /// Trade coverage for speed: flat wordlist, shorter DNS timeouts
    #[arg(short, long)]
    pub fast: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Upper bound on concurrent resolver workers
    #[arg(short, long, default_value_t = 100)]
    pub threads: usize,

    /// Local wordlist file used instead of the remote defaults
    #[arg(short, long)]
    pub wordlist: Option<PathBuf>,

    /// Probe discovered hosts for HTTP/HTTPS status codes
    #[arg(short, long)]
    pub probe: bool,

    /// Skip the CSV export
    #[arg(long)]
    pub no_export: bool,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Strips a URL scheme, path slashes and the FQDN trailing dot, so that
/// `https://Example.com/` and `example.com` enumerate the same target.
pub fn normalize_domain(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_scheme = trimmed
        .split_once("://")
        .map_or(trimmed, |(_scheme, rest)| rest);
    without_scheme
        .trim_end_matches('/')
        .trim_end_matches('.')
        .to_ascii_lowercase()
}
