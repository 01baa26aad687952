//! Record merging by id.

use std::collections::HashSet;

use crate::collect::record::Record;

/// Ids already present in a record set.
#[derive(Debug, Default)]
pub struct SeenIds {
    ids: HashSet<String>,
}

impl SeenIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every id in `records`.
    pub fn from_records(records: &[Record]) -> Self {
        Self {
            ids: records.iter().map(|r| r.id.clone()).collect(),
        }
    }

    /// Record an id. Returns `false` if it was already seen.
    pub fn insert(&mut self, id: &str) -> bool {
        if self.ids.contains(id) {
            return false;
        }
        self.ids.insert(id.to_string())
    }
}

/// `existing` followed by every record of `incoming` whose id is new.
///
/// Incoming order is preserved; repeated ids within `incoming` keep the first.
pub fn merge(mut existing: Vec<Record>, incoming: Vec<Record>) -> Vec<Record> {
    append_unique(&mut existing, incoming, usize::MAX);
    existing
}

/// Append up to `limit` records of `incoming` whose id is not yet in `existing`.
///
/// Returns how many records were appended.
pub fn append_unique(existing: &mut Vec<Record>, incoming: Vec<Record>, limit: usize) -> usize {
    let mut seen = SeenIds::from_records(existing);
    let mut added = 0;

    for record in incoming {
        if added >= limit {
            break;
        }
        if seen.insert(&record.id) {
            existing.push(record);
            added += 1;
        }
    }

    added
}
