use std::collections::HashMap;

use subscope_common::record::SubdomainRecord;

/// Running deduplicated view over every source's observations, keyed by
/// hostname with `name+address` / `name+type` secondary keys for entries
/// that carry materially different information.
///
/// Merge rule, applied per record in arrival order:
/// 1. unseen name: insert;
/// 2. both addresses non-empty and different: keep both;
/// 3. else both record types non-empty and different: keep both;
/// 4. otherwise the record is a duplicate and is dropped: the first
///    observation for a name wins. The tie-break is kept as upstream
///    consumers expect it, even though "last wins" would be as defensible.
///
/// Re-merging an already-merged record lands on the same key with the
/// same value, so the operation is idempotent.
#[derive(Debug, Default)]
pub struct Aggregator {
    entries: HashMap<String, SubdomainRecord>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge(&mut self, record: SubdomainRecord) {
        if record.domain_name.is_empty() {
            return;
        }

        let Some(existing) = self.entries.get(&record.domain_name) else {
            self.entries.insert(record.domain_name.clone(), record);
            return;
        };

        if !existing.address.is_empty()
            && !record.address.is_empty()
            && existing.address != record.address
        {
            let key = format!("{}{}", record.domain_name, record.address);
            self.entries.insert(key, record);
        } else if !existing.record_type.is_empty()
            && !record.record_type.is_empty()
            && existing.record_type != record.record_type
        {
            let key = format!("{}{}", record.domain_name, record.record_type);
            self.entries.insert(key, record);
        }
        // Same address or type, or either side unknown: duplicate.
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = SubdomainRecord>) {
        for record in records {
            self.merge(record);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Canonical record set, ordered for stable reporting.
    pub fn records(&self) -> Vec<SubdomainRecord> {
        let mut records: Vec<SubdomainRecord> = self.entries.values().cloned().collect();
        records.sort_by(|a, b| {
            (&a.domain_name, &a.address, &a.record_type)
                .cmp(&(&b.domain_name, &b.address, &b.record_type))
        });
        records
    }
}
