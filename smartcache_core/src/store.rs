//! Entry storage with a running byte total
//!
//! [`CacheStore`] owns the entries and the `size_bytes` counter. The counter
//! is adjusted on every insert and removal and is only rebuilt by summation
//! when a store is constructed from persisted entries.

use crate::cache_type::CacheType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Build the composite key `"{type}_{key}"`
pub fn composite_key(cache_type: CacheType, key: &str) -> String {
    format!("{}_{}", cache_type.as_str(), key)
}

/// Serialized size of a payload in bytes (compact JSON, UTF-8)
pub fn payload_size(data: &Value) -> u64 {
    data.to_string().len() as u64
}

/// A cached result and its bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub data: Value,
    #[serde(rename = "type")]
    pub cache_type: CacheType,
    pub created_at: DateTime<Utc>,
    /// Size of `data` when it was inserted; never revalidated
    #[serde(default)]
    pub size_bytes: u64,
}

impl CacheEntry {
    /// Create an entry, measuring the payload
    pub fn new(data: Value, cache_type: CacheType, created_at: DateTime<Utc>) -> Self {
        let size_bytes = payload_size(&data);
        Self {
            data,
            cache_type,
            created_at,
            size_bytes,
        }
    }
}

/// Map from composite key to entry, plus the running byte total
#[derive(Debug, Clone, Default)]
pub struct CacheStore {
    entries: HashMap<String, CacheEntry>,
    size_bytes: u64,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from persisted entries, summing their sizes
    ///
    /// Entries persisted without a size are measured from their payload.
    pub fn from_entries(entries: impl IntoIterator<Item = (String, CacheEntry)>) -> Self {
        let entries: HashMap<String, CacheEntry> = entries
            .into_iter()
            .map(|(key, mut entry)| {
                if entry.size_bytes == 0 {
                    entry.size_bytes = payload_size(&entry.data);
                }
                (key, entry)
            })
            .collect();
        let size_bytes = entries.values().map(|e| e.size_bytes).sum();
        Self {
            entries,
            size_bytes,
        }
    }

    /// Insert or replace an entry, returning the replaced one
    pub fn insert(&mut self, key: String, entry: CacheEntry) -> Option<CacheEntry> {
        let added = entry.size_bytes;
        let previous = self.entries.insert(key, entry);
        if let Some(old) = &previous {
            self.size_bytes = self.size_bytes.saturating_sub(old.size_bytes);
        }
        self.size_bytes += added;
        previous
    }

    pub fn remove(&mut self, key: &str) -> Option<CacheEntry> {
        let removed = self.entries.remove(key)?;
        self.size_bytes = self.size_bytes.saturating_sub(removed.size_bytes);
        Some(removed)
    }

    pub fn get(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Running total of `size_bytes` over all entries
    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CacheEntry)> {
        self.entries.iter()
    }

    /// Keys of the `count` oldest entries by `created_at`, ties broken by key
    pub fn oldest_keys(&self, count: usize) -> Vec<String> {
        let mut by_age: Vec<(&String, &CacheEntry)> = self.entries.iter().collect();
        by_age.sort_by(|(ka, a), (kb, b)| a.created_at.cmp(&b.created_at).then_with(|| ka.cmp(kb)));
        by_age
            .into_iter()
            .take(count)
            .map(|(k, _)| k.clone())
            .collect()
    }

    /// Keys whose entries satisfy `predicate`
    pub fn keys_where(&self, mut predicate: impl FnMut(&CacheEntry) -> bool) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, e)| predicate(e))
            .map(|(k, _)| k.clone())
            .collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.size_bytes = 0;
    }

    /// Sum of entry sizes, computed from scratch
    pub fn summed_size(&self) -> u64 {
        self.entries.values().map(|e| e.size_bytes).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use serde_json::json;

    fn entry_at(data: Value, offset_secs: i64) -> CacheEntry {
        let base = DateTime::<Utc>::UNIX_EPOCH + TimeDelta::days(1);
        CacheEntry::new(data, CacheType::Job, base + TimeDelta::seconds(offset_secs))
    }

    #[test]
    fn test_composite_key_format() {
        assert_eq!(composite_key(CacheType::Cv, "cv_42"), "cv_cv_42");
        assert_eq!(composite_key(CacheType::Semantic, "matches_x"), "semantic_matches_x");
    }

    #[test]
    fn test_payload_size_is_compact_json_length() {
        assert_eq!(payload_size(&json!("abc")), 5);
        assert_eq!(payload_size(&json!({"a": 1})), 7);
        // multi-byte characters count as UTF-8 bytes
        assert_eq!(payload_size(&json!("é")), 4);
    }

    #[test]
    fn test_insert_replace_does_not_double_count() {
        let mut store = CacheStore::new();
        store.insert("k".into(), entry_at(json!("aaaa"), 0));
        assert_eq!(store.size_bytes(), 6);

        let old = store.insert("k".into(), entry_at(json!("aaaaaaaa"), 1));
        assert!(old.is_some());
        assert_eq!(store.len(), 1);
        assert_eq!(store.size_bytes(), 10);
        assert_eq!(store.size_bytes(), store.summed_size());
    }

    #[test]
    fn test_remove_decrements_size() {
        let mut store = CacheStore::new();
        store.insert("a".into(), entry_at(json!("12"), 0));
        store.insert("b".into(), entry_at(json!("1234"), 1));

        let removed = store.remove("a").unwrap();
        assert_eq!(removed.size_bytes, 4);
        assert_eq!(store.size_bytes(), 6);
        assert!(store.remove("a").is_none());
        assert_eq!(store.size_bytes(), 6);
    }

    #[test]
    fn test_oldest_keys_orders_by_created_at() {
        let mut store = CacheStore::new();
        store.insert("young".into(), entry_at(json!(1), 30));
        store.insert("oldest".into(), entry_at(json!(1), 0));
        store.insert("middle".into(), entry_at(json!(1), 10));

        assert_eq!(store.oldest_keys(2), vec!["oldest".to_string(), "middle".to_string()]);
        assert_eq!(store.oldest_keys(10).len(), 3);
    }

    #[test]
    fn test_from_entries_sums_sizes() {
        let mut entry = entry_at(json!("xx"), 0);
        entry.size_bytes = 100;
        let store = CacheStore::from_entries(vec![
            ("a".to_string(), entry.clone()),
            ("b".to_string(), entry_at(json!("yy"), 1)),
        ]);
        assert_eq!(store.size_bytes(), 104);
    }

    #[test]
    fn test_entry_serializes_type_field() {
        let entry = entry_at(json!({"skills": []}), 0);
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["type"], "job");
        assert_eq!(value["size_bytes"], 13);
    }

    #[test]
    fn test_clear_resets_size() {
        let mut store = CacheStore::new();
        store.insert("a".into(), entry_at(json!("payload"), 0));
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.size_bytes(), 0);
    }
}
