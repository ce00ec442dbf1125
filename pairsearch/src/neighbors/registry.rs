use std::collections::HashMap;

use indexmap::IndexMap;

/// Sort the two ids in a pair, to get the key used for unordered pairs
#[inline]
fn pair_key(first: usize, second: usize) -> (usize, usize) {
    if first <= second {
        (first, second)
    } else {
        (second, first)
    }
}

/// Container of pair records, indexed by unordered pairs of particle ids.
///
/// Each unordered pair `{i, j}` appears at most once in the registry:
/// inserting `j-i` after `i-j` does nothing. Pairs are kept in insertion
/// order, which makes iteration reproducible.
#[derive(Debug, Clone)]
pub struct PairRegistry<P> {
    pairs: IndexMap<(usize, usize), P>,
    /// position in `pairs` of all the pairs containing a given particle
    by_particle: HashMap<usize, Vec<usize>>,
}

impl<P> Default for PairRegistry<P> {
    fn default() -> Self {
        PairRegistry::new()
    }
}

impl<P: PartialEq> PartialEq for PairRegistry<P> {
    /// Two registries are equal if they contain the same pairs, regardless of
    /// insertion order
    fn eq(&self, other: &Self) -> bool {
        self.pairs == other.pairs
    }
}

impl<P> PairRegistry<P> {
    /// Create a new empty registry
    pub fn new() -> PairRegistry<P> {
        PairRegistry {
            pairs: IndexMap::new(),
            by_particle: HashMap::new(),
        }
    }

    /// Insert a new `record` for the pair between particles `first` and
    /// `second`. If this pair (or the `second-first` pair) is already in the
    /// registry, the registry is left unchanged and this function returns
    /// `false`.
    pub fn insert(&mut self, first: usize, second: usize, record: P) -> bool {
        let key = pair_key(first, second);
        if self.pairs.contains_key(&key) {
            return false;
        }

        let (position, _) = self.pairs.insert_full(key, record);
        self.by_particle.entry(key.0).or_default().push(position);
        if key.0 != key.1 {
            self.by_particle.entry(key.1).or_default().push(position);
        }

        return true;
    }

    /// Get the record associated with the pair between `first` and `second`,
    /// in any order
    pub fn find(&self, first: usize, second: usize) -> Option<&P> {
        self.pairs.get(&pair_key(first, second))
    }

    /// Check if the pair between `first` and `second` is in this registry
    pub fn contains(&self, first: usize, second: usize) -> bool {
        self.pairs.contains_key(&pair_key(first, second))
    }

    /// Get the number of pairs in this registry
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterate over all the records in this registry, in insertion order
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &P> + '_ {
        self.pairs.values()
    }

    /// Iterate over all the pairs in this registry, in insertion order. The
    /// ids of each pair are sorted.
    pub fn pairs(&self) -> impl ExactSizeIterator<Item = ((usize, usize), &P)> + '_ {
        self.pairs.iter().map(|(&key, record)| (key, record))
    }

    /// Iterate over all the records involving the particle with the given
    /// `id`, in insertion order
    pub fn pairs_containing(&self, id: usize) -> impl Iterator<Item = &P> + '_ {
        self.by_particle.get(&id)
            .into_iter()
            .flatten()
            .map(move |&position| &self.pairs[position])
    }

    /// Remove all pairs from this registry, keeping the allocated memory
    pub fn clear(&mut self) {
        self.pairs.clear();
        self.by_particle.clear();
    }

    /// Move all pairs from `other` into this registry, skipping the ones
    /// already present. This returns the number of pairs added.
    pub fn merge(&mut self, other: PairRegistry<P>) -> usize {
        let mut added = 0;
        for ((first, second), record) in other.pairs {
            if self.insert(first, second, record) {
                added += 1;
            }
        }
        return added;
    }
}

impl<'a, P> IntoIterator for &'a PairRegistry<P> {
    type Item = &'a P;
    type IntoIter = indexmap::map::Values<'a, (usize, usize), P>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_find() {
        let mut registry = PairRegistry::new();
        assert!(registry.is_empty());

        assert!(registry.insert(3, 1, "3-1"));
        assert!(registry.insert(1, 2, "1-2"));
        assert!(!registry.insert(1, 3, "1-3"));
        assert_eq!(registry.len(), 2);

        assert_eq!(registry.find(1, 3), Some(&"3-1"));
        assert_eq!(registry.find(3, 1), Some(&"3-1"));
        assert_eq!(registry.find(2, 3), None);
        assert!(registry.contains(2, 1));
        assert!(!registry.contains(2, 3));
    }

    #[test]
    fn iteration() {
        let mut registry = PairRegistry::new();
        registry.insert(5, 4, 'a');
        registry.insert(0, 1, 'b');
        registry.insert(4, 0, 'c');

        assert_eq!(registry.iter().copied().collect::<String>(), "abc");
        // iteration can be restarted, and gives the same order
        assert_eq!((&registry).into_iter().copied().collect::<String>(), "abc");

        let keys = registry.pairs().map(|(key, _)| key).collect::<Vec<_>>();
        assert_eq!(keys, [(4, 5), (0, 1), (0, 4)]);

        assert_eq!(registry.pairs_containing(4).copied().collect::<String>(), "ac");
        assert_eq!(registry.pairs_containing(1).copied().collect::<String>(), "b");
        assert_eq!(registry.pairs_containing(42).count(), 0);
    }

    #[test]
    fn merge_and_clear() {
        let mut first = PairRegistry::new();
        first.insert(0, 1, 1.0);
        first.insert(1, 2, 2.0);

        let mut second = PairRegistry::new();
        second.insert(2, 1, 20.0);
        second.insert(2, 3, 3.0);

        assert_eq!(first.merge(second), 1);
        assert_eq!(first.len(), 3);
        assert_eq!(first.find(1, 2), Some(&2.0));
        assert_eq!(first.pairs_containing(3).count(), 1);

        first.clear();
        assert!(first.is_empty());
        assert_eq!(first.pairs_containing(1).count(), 0);
    }

    #[test]
    fn equality_ignores_order() {
        let mut first = PairRegistry::new();
        first.insert(0, 1, 1.0);
        first.insert(1, 2, 2.0);

        let mut second = PairRegistry::new();
        second.insert(2, 1, 2.0);
        second.insert(1, 0, 1.0);

        assert_eq!(first, second);

        second.insert(5, 6, 0.0);
        assert_ne!(first, second);
    }
}
