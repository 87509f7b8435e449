use std::collections::BTreeMap;
use std::time::Duration;

use colored::*;

use subscope_common::config::ScanConfig;
use subscope_common::record::SubdomainRecord;

pub const TOTAL_WIDTH: usize = 64;

pub fn banner() {
    let text = format!("⟦ SUBSCOPE v{} ⟧", env!("CARGO_PKG_VERSION"));
    let text_width = console::measure_text_width(&text);
    let sep = "═".repeat(TOTAL_WIDTH.saturating_sub(text_width) / 2);
    println!(
        "{}{}{}",
        sep.bright_black(),
        text.bright_green().bold(),
        sep.bright_black()
    );
}

pub fn header(msg: &str) {
    let formatted = format!("⟦ {} ⟧", msg.to_uppercase());
    let width = console::measure_text_width(&formatted);
    let dashes = TOTAL_WIDTH.saturating_sub(width);
    let left = dashes / 2;
    let right = dashes - left;
    println!(
        "{}{}{}",
        "─".repeat(left).bright_black(),
        formatted.bright_green(),
        "─".repeat(right).bright_black()
    );
}

pub fn module_list(domain: &str, cfg: &ScanConfig, names: &[&'static str]) {
    header("discovery modules");
    status_line_raw(&format!("target domain: {}", domain.bold()));
    status_line_raw(&format!("fast scan: {}", cfg.fast.to_string().bold()));
    for name in names {
        println!(" {} {}", "•".bright_black(), name);
    }
}

pub fn report(records: &[SubdomainRecord], elapsed: Duration) {
    if records.is_empty() {
        header("zero subdomains found");
        return;
    }

    header("discovery results");

    let mut grouped: BTreeMap<&str, Vec<&SubdomainRecord>> = BTreeMap::new();
    for record in records {
        grouped.entry(&record.domain_name).or_default().push(record);
    }

    for (idx, (domain, rows)) in grouped.iter().enumerate() {
        tree_head(idx, domain);
        for (pos, record) in rows.iter().enumerate() {
            let branch = if pos + 1 == rows.len() {
                "└─"
            } else {
                "├─"
            };
            println!(
                " {} {:<6} {:<40} {}",
                branch.bright_black(),
                or_dash(&record.record_type),
                or_dash(&record.address),
                record.source.bright_black()
            );
        }
    }

    let hosts = grouped.len().to_string().bold().green();
    let entries = records.len().to_string().bold().green();
    let took = format!("{:.2}s", elapsed.as_secs_f64()).bold().yellow();
    println!();
    println!("{} {entries} entries across {hosts} hosts in {took}", ">".bright_black());
}

pub fn status_line(host: &str, scheme: &str, code: u16) {
    let code = match code {
        200..=299 => code.to_string().green(),
        300..=399 => code.to_string().yellow(),
        _ => code.to_string().red(),
    };
    println!("   {} {scheme}://{host} {code}", "└─".bright_black());
}

fn tree_head(idx: usize, name: &str) {
    println!(
        "{} {}",
        format!("[{idx}]").bright_black(),
        name.bright_green()
    );
}

fn status_line_raw(msg: &str) {
    println!("{} {msg}", ">".bright_black());
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}
