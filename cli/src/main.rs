mod commands;
mod export;
mod probe;
mod terminal;

use commands::CommandLine;
use subscope_common::config::ScanConfig;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CommandLine::parse_args();

    logging::init(args.verbose);
    print::banner();

    let cfg = ScanConfig {
        fast: args.fast,
        verbose: args.verbose,
        concurrency: args.threads,
        wordlist: args.wordlist.clone(),
        probe_status: args.probe,
        no_export: args.no_export,
        ..ScanConfig::default()
    };

    let domain = commands::normalize_domain(&args.domain);
    commands::scan::run(&domain, &cfg).await
}
