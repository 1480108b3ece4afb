use std::collections::HashMap;
use std::sync::Arc;

use super::model::Dataset;

/// Insert-once, read-many map from row-count bound to loaded dataset.
///
/// Entries are never replaced or evicted; a dataset lives as long as the
/// cache that owns it.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<usize, Arc<Dataset>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, row_limit: usize) -> Option<Arc<Dataset>> {
        self.entries.get(&row_limit).cloned()
    }

    /// Store `dataset` under `row_limit` unless an entry already exists.
    /// Returns the entry that ends up in the cache.
    pub fn insert(&mut self, row_limit: usize, dataset: Arc<Dataset>) -> Arc<Dataset> {
        self.entries.entry(row_limit).or_insert(dataset).clone()
    }

    pub fn contains(&self, row_limit: usize) -> bool {
        self.entries.contains_key(&row_limit)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::three_pickups;

    #[test]
    fn test_insert_once() {
        let mut cache = DatasetCache::new();
        let first = Arc::new(three_pickups());
        let second = Arc::new(Dataset::default());

        let stored = cache.insert(10, first.clone());
        assert!(Arc::ptr_eq(&stored, &first));

        let stored = cache.insert(10, second);
        assert!(Arc::ptr_eq(&stored, &first), "existing entry must win");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_keys_are_independent() {
        let mut cache = DatasetCache::new();
        cache.insert(10, Arc::new(three_pickups()));
        assert!(cache.contains(10));
        assert!(!cache.contains(20));
        assert!(cache.get(20).is_none());
        assert_eq!(cache.get(10).map(|d| d.len()), Some(3));
    }
}
