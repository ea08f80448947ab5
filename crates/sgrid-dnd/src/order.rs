#![forbid(unsafe_code)]

//! Child order manager.
//!
//! Holds the container's items as an internally mutable ordered list so the
//! drag engine can reorder, insert and remove without waiting for the
//! consumer to hand over a new collection.
//!
//! # Invariants
//!
//! 1. Every key is non-blank and unique.
//! 2. `keys()[i] == items()[i].key` for all `i`.
//! 3. [`OrderManager::update`] either replaces both lists or leaves the
//!    previous state untouched.

use ahash::AHashMap;
use sgrid_core::ItemKey;

/// A consumer-supplied item: identity plus renderable content.
#[derive(Debug, Clone, PartialEq)]
pub struct SortableItem<T> {
    pub key: ItemKey,
    pub content: T,
}

impl<T> SortableItem<T> {
    #[must_use]
    pub fn new(key: impl Into<ItemKey>, content: T) -> Self {
        Self {
            key: key.into(),
            content,
        }
    }
}

/// Invalid item collection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderError {
    #[error("item at index {index} has no key")]
    MissingKey { index: usize },
    #[error("duplicate item key {key:?} at indices {first} and {second}")]
    DuplicateKey {
        key: ItemKey,
        first: usize,
        second: usize,
    },
}

/// Check that every key is present and unique.
pub fn validate<T>(items: &[SortableItem<T>]) -> Result<(), OrderError> {
    let mut seen: AHashMap<&ItemKey, usize> = AHashMap::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        if item.key.is_blank() {
            return Err(OrderError::MissingKey { index });
        }
        if let Some(&first) = seen.get(&item.key) {
            return Err(OrderError::DuplicateKey {
                key: item.key.clone(),
                first,
                second: index,
            });
        }
        seen.insert(&item.key, index);
    }
    Ok(())
}

/// Ordered, key-unique item list.
#[derive(Debug, Clone)]
pub struct OrderManager<T> {
    items: Vec<SortableItem<T>>,
    keys: Vec<ItemKey>,
}

impl<T> Default for OrderManager<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            keys: Vec::new(),
        }
    }
}

impl<T> OrderManager<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a collection, validating it.
    pub fn from_items(items: Vec<SortableItem<T>>) -> Result<Self, OrderError> {
        let mut manager = Self::new();
        manager.update(items)?;
        Ok(manager)
    }

    /// Validate and replace the collection atomically.
    pub fn update(&mut self, items: Vec<SortableItem<T>>) -> Result<(), OrderError> {
        validate(&items)?;
        self.keys = items.iter().map(|i| i.key.clone()).collect();
        self.items = items;
        Ok(())
    }

    #[must_use]
    pub fn items(&self) -> &[SortableItem<T>] {
        &self.items
    }

    #[must_use]
    pub fn keys(&self) -> &[ItemKey] {
        &self.keys
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn index_of(&self, key: &ItemKey) -> Option<usize> {
        self.keys.iter().position(|k| k == key)
    }

    #[must_use]
    pub fn contains(&self, key: &ItemKey) -> bool {
        self.index_of(key).is_some()
    }

    #[must_use]
    pub fn get(&self, key: &ItemKey) -> Option<&SortableItem<T>> {
        self.index_of(key).map(|i| &self.items[i])
    }

    /// Remove `key`. Removing an absent key is a no-op returning `None`.
    pub fn remove(&mut self, key: &ItemKey) -> Option<SortableItem<T>> {
        let index = self.index_of(key)?;
        self.keys.remove(index);
        Some(self.items.remove(index))
    }

    /// Insert at `index` (clamped to the end). Refuses blank or duplicate keys.
    pub fn insert(&mut self, index: usize, item: SortableItem<T>) -> bool {
        if item.key.is_blank() || self.contains(&item.key) {
            return false;
        }
        let index = index.min(self.items.len());
        self.keys.insert(index, item.key.clone());
        self.items.insert(index, item);
        true
    }

    /// Move `from` into the slot currently held by `to`.
    pub fn move_key(&mut self, from: &ItemKey, to: &ItemKey) -> bool {
        let (Some(from_idx), Some(to_idx)) = (self.index_of(from), self.index_of(to)) else {
            return false;
        };
        if from_idx == to_idx {
            return false;
        }
        let key = self.keys.remove(from_idx);
        self.keys.insert(to_idx, key);
        let item = self.items.remove(from_idx);
        self.items.insert(to_idx, item);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(names: &[&str]) -> Vec<SortableItem<u32>> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| SortableItem::new(*n, i as u32))
            .collect()
    }

    fn key_strs<T>(m: &OrderManager<T>) -> Vec<&str> {
        m.keys().iter().map(ItemKey::as_str).collect()
    }

    #[test]
    fn update_derives_keys() {
        let m = OrderManager::from_items(items(&["a", "b", "c"])).expect("valid");
        assert_eq!(key_strs(&m), vec!["a", "b", "c"]);
        assert_eq!(m.get(&ItemKey::from("b")).map(|i| i.content), Some(1));
    }

    #[test]
    fn duplicate_key_is_rejected_without_mutation() {
        let mut m = OrderManager::from_items(items(&["a", "b"])).expect("valid");
        let err = m.update(items(&["x", "y", "x"])).expect_err("dup");
        assert_eq!(
            err,
            OrderError::DuplicateKey {
                key: ItemKey::from("x"),
                first: 0,
                second: 2,
            }
        );
        assert_eq!(key_strs(&m), vec!["a", "b"]);
        assert_eq!(m.items().len(), 2);
    }

    #[test]
    fn blank_key_is_rejected() {
        let err = OrderManager::from_items(items(&["a", ""])).expect_err("blank");
        assert_eq!(err, OrderError::MissingKey { index: 1 });
        assert_eq!(err.to_string(), "item at index 1 has no key");
    }

    #[test]
    fn remove_is_idempotent() {
        let mut m = OrderManager::from_items(items(&["a", "b"])).expect("valid");
        assert!(m.remove(&ItemKey::from("a")).is_some());
        assert!(m.remove(&ItemKey::from("a")).is_none());
        assert_eq!(key_strs(&m), vec!["b"]);
    }

    #[test]
    fn insert_refuses_duplicates_and_clamps() {
        let mut m = OrderManager::from_items(items(&["a", "b"])).expect("valid");
        assert!(!m.insert(0, SortableItem::new("b", 9)));
        assert!(m.insert(99, SortableItem::new("z", 9)));
        assert!(m.insert(1, SortableItem::new("x", 7)));
        assert_eq!(key_strs(&m), vec!["a", "x", "b", "z"]);
    }

    #[test]
    fn move_key_matches_layout_shift() {
        let mut m = OrderManager::from_items(items(&["a", "b", "c"])).expect("valid");
        assert!(m.move_key(&ItemKey::from("a"), &ItemKey::from("c")));
        assert_eq!(key_strs(&m), vec!["b", "c", "a"]);
        assert_eq!(m.items()[2].content, 0);
        assert!(!m.move_key(&ItemKey::from("a"), &ItemKey::from("a")));
        assert!(!m.move_key(&ItemKey::from("a"), &ItemKey::from("q")));
    }
}
