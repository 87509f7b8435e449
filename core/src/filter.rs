use std::collections::HashMap;

/// Occurrence counters used to tell genuine subdomains from wildcard DNS
/// noise. Scoped to a single resolution run: one domain, one record-type
/// pass, owned by the resolver that created it.
///
/// An address that matches the root baseline is always genuine. Anything
/// else is counted per probe; once its count passes the threshold it is
/// treated as a catch-all wildcard answer. Because the counters keep
/// advancing, re-checking a record later can reject what an earlier check
/// accepted, which is exactly how late threshold crossings retroactively
/// exclude earlier records sharing the address.
#[derive(Debug)]
pub struct FalsePositiveTable {
    counts: HashMap<String, usize>,
    threshold: usize,
}

/// Maximum occurrences of a non-baseline address before it is considered
/// wildcard noise.
const THRESHOLD: usize = 10;
const FAST_THRESHOLD: usize = 4;

impl FalsePositiveTable {
    pub fn new(fast: bool) -> Self {
        Self {
            counts: HashMap::new(),
            threshold: if fast { FAST_THRESHOLD } else { THRESHOLD },
        }
    }

    /// Counts one observation of `address` and reports whether it should
    /// be discarded as a wildcard false positive.
    pub fn is_false_positive(&mut self, baseline: &[String], address: &str) -> bool {
        if baseline.iter().any(|root| root == address) {
            return false;
        }
        let count = self.counts.entry(address.to_string()).or_insert(0);
        *count += 1;
        *count > self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_addresses_are_always_genuine() {
        let baseline = vec!["9.9.9.9".to_string()];
        let mut table = FalsePositiveTable::new(true);
        for _ in 0..100 {
            assert!(!table.is_false_positive(&baseline, "9.9.9.9"));
        }
    }

    #[test]
    fn fast_mode_rejects_fifth_occurrence() {
        let baseline = vec!["9.9.9.9".to_string()];
        let mut table = FalsePositiveTable::new(true);
        for _ in 0..4 {
            assert!(!table.is_false_positive(&baseline, "6.6.6.6"));
        }
        assert!(table.is_false_positive(&baseline, "6.6.6.6"));
        assert!(table.is_false_positive(&baseline, "6.6.6.6"));
    }

    #[test]
    fn thorough_mode_uses_higher_threshold() {
        let mut table = FalsePositiveTable::new(false);
        for _ in 0..10 {
            assert!(!table.is_false_positive(&[], "6.6.6.6"));
        }
        assert!(table.is_false_positive(&[], "6.6.6.6"));
    }

    #[test]
    fn addresses_are_counted_independently() {
        let mut table = FalsePositiveTable::new(true);
        for _ in 0..4 {
            assert!(!table.is_false_positive(&[], "1.1.1.1"));
        }
        // A different address starts from zero.
        assert!(!table.is_false_positive(&[], "2.2.2.2"));
    }

    #[test]
    fn recheck_rejects_records_accepted_before_the_crossing() {
        // Stream pass: four candidates resolve to the same non-baseline
        // address and are provisionally accepted.
        let mut table = FalsePositiveTable::new(true);
        for _ in 0..4 {
            assert!(!table.is_false_positive(&[], "6.6.6.6"));
        }
        // Final pass over the provisional records: the counter keeps
        // climbing, so every one of them is now past the threshold.
        for _ in 0..4 {
            assert!(table.is_false_positive(&[], "6.6.6.6"));
        }
    }
}
