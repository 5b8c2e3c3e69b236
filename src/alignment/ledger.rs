use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::alignment::disambiguation::DropList;

/// Aggregate counts: source connector → equivalent → count.
///
/// The empty-string equivalent is a real key meaning "no equivalent found"
/// and is kept through every operation except an explicit row drop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MatchLedger {
    counts: BTreeMap<String, BTreeMap<String, u64>>,
}

impl MatchLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one (connector, equivalent) observation.
    pub fn note_match(&mut self, connector: &str, equivalent: &str) {
        self.note_matches(connector, equivalent, 1);
    }

    fn note_matches(&mut self, connector: &str, equivalent: &str, times: u64) {
        // Hot path on large corpora: only allocate keys the first time a pair is seen.
        if let Some(row) = self.counts.get_mut(connector) {
            if let Some(count) = row.get_mut(equivalent) {
                *count += times;
            } else {
                row.insert(equivalent.to_string(), times);
            }
            return;
        }
        let mut row = BTreeMap::new();
        row.insert(equivalent.to_string(), times);
        self.counts.insert(connector.to_string(), row);
    }

    pub fn count(&self, connector: &str, equivalent: &str) -> u64 {
        self.counts
            .get(connector)
            .and_then(|row| row.get(equivalent))
            .copied()
            .unwrap_or(0)
    }

    /// Number of recorded occurrences of `connector`, all equivalents included.
    pub fn total(&self, connector: &str) -> u64 {
        self.counts
            .get(connector)
            .map(|row| row.values().sum())
            .unwrap_or(0)
    }

    pub fn equivalents(&self, connector: &str) -> Option<&BTreeMap<String, u64>> {
        self.counts.get(connector)
    }

    /// Source connectors with at least one recorded match, sorted.
    pub fn connectors(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    /// Distinct equivalents across all connectors: the table's row keys.
    pub fn row_keys(&self) -> BTreeSet<&str> {
        self.counts
            .values()
            .flat_map(|row| row.keys().map(String::as_str))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, u64>)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Key-wise addition of another run's ledger, used at export time.
    pub fn merge(&mut self, other: &MatchLedger) {
        for (connector, row) in &other.counts {
            for (equivalent, &count) in row {
                self.note_matches(connector, equivalent, count);
            }
        }
    }

    /// Copy of the ledger with every dropped equivalent row removed from all connectors.
    pub fn without_rows(&self, drop_list: &DropList) -> MatchLedger {
        let counts = self
            .counts
            .iter()
            .map(|(connector, row)| {
                let kept = row
                    .iter()
                    .filter(|(equivalent, _)| !drop_list.contains(equivalent))
                    .map(|(equivalent, &count)| (equivalent.clone(), count))
                    .collect();
                (connector.clone(), kept)
            })
            .collect();
        MatchLedger { counts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_match_counts_each_pair() {
        let mut ledger = MatchLedger::new();
        ledger.note_match("aber", "but");
        ledger.note_match("aber", "but");
        ledger.note_match("aber", "however");
        ledger.note_match("doch", "");

        assert_eq!(ledger.count("aber", "but"), 2);
        assert_eq!(ledger.count("aber", "however"), 1);
        assert_eq!(ledger.count("doch", ""), 1);
        assert_eq!(ledger.count("doch", "but"), 0);
        assert_eq!(ledger.count("jedoch", "but"), 0);
        assert_eq!(ledger.total("aber"), 3);
    }

    #[test]
    fn empty_equivalent_is_a_row_key() {
        let mut ledger = MatchLedger::new();
        ledger.note_match("aber", "");
        ledger.note_match("doch", "yet");
        let rows: Vec<&str> = ledger.row_keys().into_iter().collect();
        assert_eq!(rows, ["", "yet"]);
    }

    #[test]
    fn merge_adds_key_wise() {
        let mut a = MatchLedger::new();
        a.note_match("aber", "but");
        let mut b = MatchLedger::new();
        b.note_match("aber", "but");
        b.note_match("aber", "");
        b.note_match("hingegen", "whereas");

        a.merge(&b);
        assert_eq!(a.count("aber", "but"), 2);
        assert_eq!(a.count("aber", ""), 1);
        assert_eq!(a.count("hingegen", "whereas"), 1);
        assert_eq!(b.count("aber", "but"), 1);
    }

    #[test]
    fn without_rows_removes_whole_rows_only() {
        let mut ledger = MatchLedger::new();
        ledger.note_match("aber", "but");
        ledger.note_match("aber", "still");
        ledger.note_match("doch", "still");
        ledger.note_match("doch", "yet");

        let drop_list: DropList = ["still"].into_iter().collect();
        let pruned = ledger.without_rows(&drop_list);
        assert_eq!(pruned.count("aber", "still"), 0);
        assert_eq!(pruned.count("doch", "still"), 0);
        assert_eq!(pruned.count("aber", "but"), 1);
        assert_eq!(pruned.count("doch", "yet"), 1);
        assert_eq!(ledger.count("doch", "still"), 1);
    }

    #[test]
    fn serializes_as_nested_map() {
        let mut ledger = MatchLedger::new();
        ledger.note_match("aber", "but");
        let json = serde_json::to_string(&ledger).expect("serialize ledger");
        assert_eq!(json, r#"{"aber":{"but":1}}"#);
    }
}
