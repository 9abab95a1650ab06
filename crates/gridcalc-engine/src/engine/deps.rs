//! Bidirectional dependency index between cell names.
//!
//! Stores the set of `(referencer, referenced)` pairs: `A1 -> B1` means the
//! formula in `A1` mentions `B1`. Both directions are kept in hash maps so
//! either side can be queried without a scan, and every mutation updates the
//! two maps together.
//!
//! Neighbour sets are sorted, so iteration order is a function of the current
//! pairs alone and not of the order edits happened in.

use std::collections::{BTreeSet, HashMap};

#[derive(Clone, Debug, Default)]
pub struct DependencyIndex {
    /// referencer -> names its formula mentions
    references: HashMap<String, BTreeSet<String>>,
    /// referenced -> names whose formula mentions it
    referencers: HashMap<String, BTreeSet<String>>,
    pairs: usize,
}

fn insert_into(map: &mut HashMap<String, BTreeSet<String>>, key: &str, value: &str) -> bool {
    map.entry(key.to_string()).or_default().insert(value.to_string())
}

fn remove_from(map: &mut HashMap<String, BTreeSet<String>>, key: &str, value: &str) -> bool {
    let Some(set) = map.get_mut(key) else {
        return false;
    };
    let removed = set.remove(value);
    if set.is_empty() {
        map.remove(key);
    }
    removed
}

impl DependencyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `(referencer, referenced)` pairs.
    pub fn len(&self) -> usize {
        self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs == 0
    }

    /// Record that `referencer` mentions `referenced`. No-op if already present.
    pub fn add(&mut self, referencer: &str, referenced: &str) {
        if insert_into(&mut self.references, referencer, referenced) {
            insert_into(&mut self.referencers, referenced, referencer);
            self.pairs += 1;
        }
    }

    /// Forget that `referencer` mentions `referenced`. No-op if absent.
    pub fn remove(&mut self, referencer: &str, referenced: &str) {
        if remove_from(&mut self.references, referencer, referenced) {
            remove_from(&mut self.referencers, referenced, referencer);
            self.pairs -= 1;
        }
    }

    /// Replace everything `referencer` mentions with `referenced`.
    pub fn replace_references<I, S>(&mut self, referencer: &str, referenced: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for old in self.references(referencer) {
            self.remove(referencer, &old);
        }
        for new in referenced {
            self.add(referencer, new.as_ref());
        }
    }

    /// Replace every referencer of `referenced` with `referencers`.
    pub fn replace_referencers<I, S>(&mut self, referenced: &str, referencers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for old in self.referencers(referenced) {
            self.remove(&old, referenced);
        }
        for new in referencers {
            self.add(new.as_ref(), referenced);
        }
    }

    /// Names mentioned by `referencer`'s formula. Empty when there are none.
    pub fn references(&self, referencer: &str) -> Vec<String> {
        self.references
            .get(referencer)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Names whose formula mentions `referenced`. Empty when there are none.
    pub fn referencers(&self, referenced: &str) -> Vec<String> {
        self.referencers
            .get(referenced)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn has_references(&self, referencer: &str) -> bool {
        self.references.contains_key(referencer)
    }

    pub fn has_referencers(&self, referenced: &str) -> bool {
        self.referencers.contains_key(referenced)
    }

    /// How many names mention `referenced`.
    pub fn referencer_count(&self, referenced: &str) -> usize {
        self.referencers.get(referenced).map_or(0, BTreeSet::len)
    }

    pub fn contains(&self, referencer: &str, referenced: &str) -> bool {
        self.references
            .get(referencer)
            .is_some_and(|set| set.contains(referenced))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_consistent(index: &DependencyIndex) {
        let forward: usize = index.references.values().map(BTreeSet::len).sum();
        let reverse: usize = index.referencers.values().map(BTreeSet::len).sum();
        assert_eq!(forward, index.len());
        assert_eq!(reverse, index.len());
        for (referencer, set) in &index.references {
            assert!(!set.is_empty());
            for referenced in set {
                assert!(index.referencers[referenced].contains(referencer));
            }
        }
    }

    #[test]
    fn test_empty_index() {
        let index = DependencyIndex::new();
        assert!(index.is_empty());
        assert!(index.references("A1").is_empty());
        assert!(index.referencers("A1").is_empty());
        assert_eq!(index.referencer_count("A1"), 0);
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut index = DependencyIndex::new();
        index.add("B1", "A1");
        index.add("B1", "A1");
        assert_eq!(index.len(), 1);
        assert_eq!(index.references("B1"), vec!["A1"]);
        assert_eq!(index.referencers("A1"), vec!["B1"]);
        assert_consistent(&index);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut index = DependencyIndex::new();
        index.add("B1", "A1");
        index.remove("B1", "A1");
        index.remove("B1", "A1");
        index.remove("Z9", "Q1");
        assert!(index.is_empty());
        assert!(!index.has_references("B1"));
        assert!(!index.has_referencers("A1"));
        assert_consistent(&index);
    }

    #[test]
    fn test_both_directions() {
        let mut index = DependencyIndex::new();
        index.add("C1", "A1");
        index.add("C1", "B1");
        index.add("D1", "A1");
        assert_eq!(index.references("C1"), vec!["A1", "B1"]);
        assert_eq!(index.referencers("A1"), vec!["C1", "D1"]);
        assert_eq!(index.referencer_count("A1"), 2);
        assert!(index.contains("D1", "A1"));
        assert!(!index.contains("A1", "D1"));
        assert_consistent(&index);
    }

    #[test]
    fn test_replace_references() {
        let mut index = DependencyIndex::new();
        index.add("C1", "A1");
        index.add("C1", "B1");
        index.add("D1", "B1");
        index.replace_references("C1", ["B1", "E1"]);
        assert_eq!(index.references("C1"), vec!["B1", "E1"]);
        assert!(index.referencers("A1").is_empty());
        assert_eq!(index.referencers("B1"), vec!["C1", "D1"]);
        assert_eq!(index.len(), 3);
        assert_consistent(&index);

        index.replace_references("C1", Vec::<String>::new());
        assert!(!index.has_references("C1"));
        assert_eq!(index.len(), 1);
        assert_consistent(&index);
    }

    #[test]
    fn test_replace_referencers() {
        let mut index = DependencyIndex::new();
        index.add("B1", "A1");
        index.add("C1", "A1");
        index.replace_referencers("A1", ["C1", "D1"]);
        assert_eq!(index.referencers("A1"), vec!["C1", "D1"]);
        assert!(index.references("B1").is_empty());
        assert_eq!(index.len(), 2);
        assert_consistent(&index);
    }

    #[test]
    fn test_restoring_previous_references_restores_state() {
        let mut index = DependencyIndex::new();
        index.add("C1", "A1");
        index.add("C1", "B1");
        index.add("D1", "A1");
        let before = index.references("C1");
        index.replace_references("C1", ["X1"]);
        index.replace_references("C1", &before);
        assert_eq!(index.references("C1"), vec!["A1", "B1"]);
        assert_eq!(index.referencers("A1"), vec!["C1", "D1"]);
        assert!(index.referencers("X1").is_empty());
        assert_consistent(&index);
    }
}
