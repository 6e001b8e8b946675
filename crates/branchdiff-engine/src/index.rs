//! Insertion-ordered multimap from a key to commit positions

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// Maps keys to lists of commit positions, iterating keys in first-seen order
///
/// Iteration order decides the order groups and results are produced in, so
/// a plain `HashMap` walk is not enough for repeatable output.
#[derive(Debug, Clone)]
pub struct OrderedIndex<K> {
    keys: Vec<K>,
    positions: HashMap<K, Vec<usize>>,
}

impl<K> Default for OrderedIndex<K> {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            positions: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> OrderedIndex<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: K, position: usize) {
        match self.positions.get_mut(&key) {
            Some(list) => list.push(position),
            None => {
                self.keys.push(key.clone());
                self.positions.insert(key, vec![position]);
            }
        }
    }

    /// Positions stored under `key`, empty when absent
    pub fn get<Q>(&self, key: &Q) -> &[usize]
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.positions.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.positions.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.keys.iter()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &[usize])> {
        self.keys.iter().map(move |k| (k, self.get(k)))
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of stored positions over all keys
    pub fn total_len(&self) -> usize {
        self.positions.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_in_first_seen_order() {
        let mut idx = OrderedIndex::new();
        idx.push("b".to_string(), 0);
        idx.push("a".to_string(), 1);
        idx.push("b".to_string(), 2);

        let keys: Vec<&String> = idx.keys().collect();
        assert_eq!(keys, ["b", "a"]);
        assert_eq!(idx.get("b"), &[0, 2]);
        assert_eq!(idx.get("missing"), &[] as &[usize]);
        assert_eq!(idx.len(), 2);
        assert_eq!(idx.total_len(), 3);
    }
}
