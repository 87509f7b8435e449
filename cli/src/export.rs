use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};

use subscope_common::record::SubdomainRecord;

/// Writes the final record set as CSV into the system temp directory and
/// returns the file path.
pub fn write_csv(records: &[SubdomainRecord]) -> Result<PathBuf> {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();
    let path = std::env::temp_dir().join(format!("subscope_subdomain-scan_{stamp}.csv"));
    write_csv_to(records, &path)?;
    Ok(path)
}

fn write_csv_to(records: &[SubdomainRecord], path: &PathBuf) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("cannot create {}", path.display()))?;

    writer.write_record(["Domain", "Address", "Type", "Source"])?;
    for record in records {
        writer.write_record([
            &record.domain_name,
            &record.address,
            &record.record_type,
            &record.source,
        ])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_and_one_row_per_record() {
        let records = vec![
            SubdomainRecord::new("mail.example.com", "massdns")
                .with_address("1.2.3.4")
                .with_record_type("A"),
            SubdomainRecord::new("www.example.com", "leakix"),
        ];
        let path = std::env::temp_dir().join("subscope-export-test.csv");

        write_csv_to(&records, &path).unwrap();
        let body = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Domain,Address,Type,Source");
        assert_eq!(lines[1], "mail.example.com,1.2.3.4,A,massdns");
        assert_eq!(lines[2], "www.example.com,,,leakix");
    }
}
