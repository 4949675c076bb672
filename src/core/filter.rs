//! Text search and account-number prefix filtering

use crate::core::record::ClientRecord;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PREFIXES: [&str; 3] = ["AH", "BH", "CH"];

/// Three user-editable account-number prefixes. An empty slot filters nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct PrefixSet([String; 3]);

impl PrefixSet {
    pub fn new(prefixes: [&str; 3]) -> Self {
        let mut set = Self(Default::default());
        for (slot, prefix) in prefixes.into_iter().enumerate() {
            set.set(slot, prefix);
        }
        set
    }

    /// Stores `value` upper-cased. Out-of-range slots are ignored.
    pub fn set(&mut self, slot: usize, value: &str) {
        if let Some(p) = self.0.get_mut(slot) {
            *p = value.to_uppercase();
        }
    }

    pub fn clear(&mut self, slot: usize) {
        self.set(slot, "");
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl Default for PrefixSet {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIXES)
    }
}

impl From<Vec<String>> for PrefixSet {
    fn from(values: Vec<String>) -> Self {
        let mut set = Self(Default::default());
        for (slot, value) in values.iter().enumerate() {
            set.set(slot, value);
        }
        set
    }
}

impl From<PrefixSet> for Vec<String> {
    fn from(set: PrefixSet) -> Self {
        set.0.into()
    }
}

fn matches_query(record: &ClientRecord, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let name = if record.client_name.is_empty() {
        &record.id
    } else {
        &record.client_name
    };
    name.to_lowercase().contains(query) || record.account_number.to_lowercase().contains(query)
}

fn matches_prefix(record: &ClientRecord, active_filter_index: usize, prefixes: &[String]) -> bool {
    if active_filter_index == 0 {
        return true;
    }
    match prefixes.get(active_filter_index - 1) {
        Some(prefix) if !prefix.is_empty() => record.account_number.starts_with(prefix.as_str()),
        _ => true,
    }
}

/// Keeps the records that pass both the text search and the active prefix
/// filter, in their existing order.
///
/// `active_filter_index` 0 disables prefix filtering; 1..=3 selects
/// `prefixes[index - 1]`. An empty or missing prefix lets every record pass.
pub fn filter<'a>(
    records: &'a [ClientRecord],
    query: &str,
    active_filter_index: usize,
    prefixes: &[String],
) -> Vec<&'a ClientRecord> {
    let query = query.trim().to_lowercase();
    records
        .iter()
        .filter(|r| matches_query(r, &query))
        .filter(|r| matches_prefix(r, active_filter_index, prefixes))
        .collect()
}
