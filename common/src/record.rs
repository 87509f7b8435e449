use serde::{Deserialize, Serialize};

/// One observation of a hostname, as produced by a discovery source.
///
/// `address` and `record_type` are empty when the source did not observe
/// them (typical for passive indexes that only return names).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubdomainRecord {
    pub domain_name: String,
    pub address: String,
    pub record_type: String,
    pub source: String,
}

impl SubdomainRecord {
    /// Builds a record with a canonicalized hostname: lower-case, no
    /// trailing dot. Records whose name canonicalizes to the empty string
    /// are discarded before aggregation.
    pub fn new(domain_name: &str, source: &str) -> Self {
        Self {
            domain_name: canonical_name(domain_name),
            address: String::new(),
            record_type: String::new(),
            source: source.to_string(),
        }
    }

    pub fn with_address(mut self, address: &str) -> Self {
        self.address = address.trim().to_string();
        self
    }

    pub fn with_record_type(mut self, record_type: &str) -> Self {
        self.record_type = record_type.trim().to_string();
        self
    }
}

/// Lower-cases a hostname and strips surrounding whitespace and the
/// trailing dot of a fully-qualified DNS name.
pub fn canonical_name(raw: &str) -> String {
    raw.trim().trim_end_matches('.').to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalizes_name_on_construction() {
        let record = SubdomainRecord::new("  Mail.Example.COM. ", "test");
        assert_eq!(record.domain_name, "mail.example.com");
        assert!(record.address.is_empty());
        assert!(record.record_type.is_empty());
    }

    #[test]
    fn builders_trim_values() {
        let record = SubdomainRecord::new("a.example.com", "test")
            .with_address(" 1.2.3.4 ")
            .with_record_type("A");
        assert_eq!(record.address, "1.2.3.4");
        assert_eq!(record.record_type, "A");
    }
}
