use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;

use crate::category::resolve_category;
use crate::record::Row;

/// One ranked value and how often it occurs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FrequencyEntry {
    pub key: String,
    pub count: usize,
}

/// Values ranked by descending count; equal counts keep first-seen order
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FrequencyTable {
    pub entries: Vec<FrequencyEntry>,
}

impl FrequencyTable {
    /// Count `values` and rank them
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let counted = count_first_seen(values.into_iter().map(|v| v.as_ref().to_string()));
        Self::ranked(counted)
    }

    fn ranked(counted: Vec<(String, usize)>) -> Self {
        let mut entries: Vec<FrequencyEntry> = counted
            .into_iter()
            .map(|(key, count)| FrequencyEntry { key, count })
            .collect();

        // stable: ties stay in first-seen order
        entries.sort_by(|a, b| b.count.cmp(&a.count));
        Self { entries }
    }

    /// Keep only the `n` highest-ranked entries
    pub fn top(mut self, n: usize) -> Self {
        self.entries.truncate(n);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn pairs(&self) -> Vec<(&str, usize)> {
        self.entries.iter().map(|e| (e.key.as_str(), e.count)).collect()
    }
}

/// Count occurrences, returning keys in the order they were first seen
fn count_first_seen<K, I>(values: I) -> Vec<(K, usize)>
where
    K: Hash + Eq + Clone,
    I: IntoIterator<Item = K>,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut counted: Vec<(K, usize)> = Vec::new();

    for value in values {
        match index.get(&value) {
            Some(&slot) => counted[slot].1 += 1,
            None => {
                index.insert(value.clone(), counted.len());
                counted.push((value, 1));
            }
        }
    }

    counted
}

/// Most frequent channels
pub fn channel_frequency(rows: &[Row], top_n: usize) -> FrequencyTable {
    FrequencyTable::from_values(rows.iter().map(|r| r.channel.as_str())).top(top_n)
}

/// Category counts by display name. Rows without a category id are left out
/// entirely rather than counted as unknown. Ids sharing a display name are
/// counted separately.
pub fn category_frequency(rows: &[Row]) -> FrequencyTable {
    let counted = count_first_seen(rows.iter().filter_map(|r| r.category_id))
        .into_iter()
        .map(|(id, count)| (resolve_category(id).to_string(), count))
        .collect();

    FrequencyTable::ranked(counted)
}

/// Most frequent tags across all rows
pub fn tag_frequency(rows: &[Row], top_n: usize) -> FrequencyTable {
    FrequencyTable::from_values(rows.iter().flat_map(|r| r.tags.iter())).top(top_n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, channel: &str, category_id: Option<u32>, tags: &[&str]) -> Row {
        Row {
            id: id.to_string(),
            title: format!("Video {}", id),
            channel: channel.to_string(),
            duration_seconds: 0.0,
            published_at: None,
            liked_at: None,
            category_id,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_channel_ranking_with_ties() {
        let rows = vec![
            row("1", "B", None, &[]),
            row("2", "A", None, &[]),
            row("3", "C", None, &[]),
            row("4", "A", None, &[]),
            row("5", "C", None, &[]),
        ];

        let table = channel_frequency(&rows, 10);
        assert_eq!(table.pairs(), vec![("A", 2), ("C", 2), ("B", 1)]);
    }

    #[test]
    fn test_channel_top_n() {
        let rows: Vec<Row> = (0..15).map(|i| row(&i.to_string(), &format!("ch{}", i), None, &[])).collect();
        let table = channel_frequency(&rows, 10);
        assert_eq!(table.len(), 10);
        assert_eq!(table.entries[0].key, "ch0");
    }

    #[test]
    fn test_category_excludes_missing_ids() {
        let rows = vec![
            row("1", "A", Some(10), &[]),
            row("2", "A", None, &[]),
            row("3", "A", Some(27), &[]),
            row("4", "A", Some(10), &[]),
            row("5", "A", Some(999), &[]),
        ];

        let table = category_frequency(&rows);
        assert_eq!(table.pairs(), vec![("Music", 2), ("Education", 1), ("Unknown", 1)]);
        assert_eq!(table.entries.iter().map(|e| e.count).sum::<usize>(), 4);
    }

    #[test]
    fn test_category_duplicate_names_stay_separate() {
        let rows = vec![row("1", "A", Some(23), &[]), row("2", "A", Some(34), &[])];
        let table = category_frequency(&rows);
        assert_eq!(table.pairs(), vec![("Comedy", 1), ("Comedy", 1)]);
    }

    #[test]
    fn test_tag_frequency_flattens() {
        let rows = vec![
            row("1", "A", None, &["rust", "cli"]),
            row("2", "A", None, &[]),
            row("3", "A", None, &["rust"]),
        ];

        let table = tag_frequency(&rows, 10);
        assert_eq!(table.pairs(), vec![("rust", 2), ("cli", 1)]);
    }

    #[test]
    fn test_empty_input() {
        assert!(channel_frequency(&[], 10).is_empty());
        assert!(category_frequency(&[]).is_empty());
        assert!(tag_frequency(&[], 10).is_empty());
    }
}
