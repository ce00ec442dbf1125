use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use crate::{Error, Frame};

/// Set of particle pairs which must never be reported by a neighbor search,
/// typically because they are bonded to each other.
///
/// Exclusions are symmetric (if `i` excludes `j`, then `j` excludes `i`), and
/// a particle is never excluded from itself. The table can not be modified
/// after creation, use [`ExclusionsBuilder`] to create it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExclusionTable {
    exclusions: HashMap<usize, HashSet<usize>>,
    /// number of unordered excluded pairs
    n_pairs: usize,
}

impl ExclusionTable {
    /// Create an empty table, excluding nothing
    pub fn new() -> ExclusionTable {
        ExclusionTable::default()
    }

    /// Create a table excluding all pairs separated by up to
    /// `max_bond_distance` bonds in the bond graph defined by `bonds`. Using
    /// `1` excludes directly bonded pairs, `2` also excludes 1-3 pairs, `3`
    /// also excludes 1-4 pairs, *etc.*
    pub fn from_bonds(bonds: &[(usize, usize)], max_bond_distance: usize) -> Result<ExclusionTable, Error> {
        let mut builder = ExclusionsBuilder::new(max_bond_distance);
        for &(first, second) in bonds {
            builder.add_bond(first, second);
        }
        return builder.build();
    }

    /// Create a table excluding all pairs separated by up to
    /// `max_bond_distance` bonds in the `frame`
    pub fn from_frame(frame: &Frame, max_bond_distance: usize) -> Result<ExclusionTable, Error> {
        ExclusionTable::from_bonds(frame.bonds(), max_bond_distance)
    }

    /// Check whether the pair between `first` and `second` is excluded
    #[inline]
    pub fn is_excluded(&self, first: usize, second: usize) -> bool {
        match self.exclusions.get(&first) {
            Some(excluded) => excluded.contains(&second),
            None => false,
        }
    }

    /// Get the sorted list of particles excluded from the particle `id`
    pub fn exclusions_of(&self, id: usize) -> Vec<usize> {
        let mut excluded = self.exclusions.get(&id)
            .map(|excluded| excluded.iter().copied().collect::<Vec<_>>())
            .unwrap_or_default();
        excluded.sort_unstable();
        return excluded;
    }

    /// Get the number of excluded pairs in this table
    pub fn len(&self) -> usize {
        self.n_pairs
    }

    pub fn is_empty(&self) -> bool {
        self.n_pairs == 0
    }

    fn insert(&mut self, first: usize, second: usize) {
        if first == second {
            return;
        }

        if self.exclusions.entry(first).or_default().insert(second) {
            self.exclusions.entry(second).or_default().insert(first);
            self.n_pairs += 1;
        }
    }

    fn remove(&mut self, first: usize, second: usize) {
        if !self.remove_one_side(first, second) {
            return;
        }
        self.remove_one_side(second, first);
        self.n_pairs -= 1;
    }

    /// Remove `second` from the exclusions of `first`, dropping empty entries
    fn remove_one_side(&mut self, first: usize, second: usize) -> bool {
        let Some(excluded) = self.exclusions.get_mut(&first) else {
            return false;
        };

        let removed = excluded.remove(&second);
        if excluded.is_empty() {
            self.exclusions.remove(&first);
        }
        return removed;
    }
}

/// Builder for [`ExclusionTable`].
///
/// Exclusions coming from bonds, explicit pairs and groups are all added to
/// the table, and the groups given to [`ExclusionsBuilder::remove`] are
/// removed last, regardless of the order of the calls.
#[derive(Debug, Clone)]
pub struct ExclusionsBuilder {
    max_bond_distance: usize,
    bonds: HashMap<usize, Vec<usize>>,
    pairs: Vec<(usize, usize)>,
    groups: Vec<Vec<usize>>,
    removed: Vec<Vec<usize>>,
}

impl ExclusionsBuilder {
    /// Create a new builder, where bonds will exclude all pairs separated by
    /// up to `max_bond_distance` bonds.
    pub fn new(max_bond_distance: usize) -> ExclusionsBuilder {
        ExclusionsBuilder {
            max_bond_distance: max_bond_distance,
            bonds: HashMap::new(),
            pairs: Vec::new(),
            groups: Vec::new(),
            removed: Vec::new(),
        }
    }

    /// Add a bond between the particles `first` and `second`
    pub fn add_bond(&mut self, first: usize, second: usize) -> &mut Self {
        if first != second {
            self.bonds.entry(first).or_default().push(second);
            self.bonds.entry(second).or_default().push(first);
        }
        self
    }

    /// Exclude the pair between `first` and `second`, regardless of bonds
    pub fn exclude_pair(&mut self, first: usize, second: usize) -> &mut Self {
        self.pairs.push((first, second));
        self
    }

    /// Exclude all pairs between the particles in `group`
    pub fn exclude_all(&mut self, group: impl IntoIterator<Item = usize>) -> &mut Self {
        self.groups.push(group.into_iter().collect());
        self
    }

    /// Exclude all pairs between particles in the same molecule of the
    /// `frame`. Particles without a molecule are not affected.
    pub fn exclude_intramolecular(&mut self, frame: &Frame) -> &mut Self {
        let mut molecules = BTreeMap::<usize, Vec<usize>>::new();
        for particle in frame.particles() {
            if let Some(molecule) = particle.molecule() {
                molecules.entry(molecule).or_default().push(particle.id());
            }
        }

        self.groups.extend(molecules.into_values());
        self
    }

    /// Remove all exclusions between particles in `group`
    pub fn remove(&mut self, group: impl IntoIterator<Item = usize>) -> &mut Self {
        self.removed.push(group.into_iter().collect());
        self
    }

    /// Build the final exclusion table
    pub fn build(&self) -> Result<ExclusionTable, Error> {
        if self.max_bond_distance == 0 {
            return Err(Error::Configuration(
                "the maximal bond distance for exclusions must be at least 1".into()
            ));
        }

        let mut table = ExclusionTable::new();

        // breadth-first search in the bond graph, starting from each particle
        let mut queue = VecDeque::new();
        let mut distances = HashMap::new();
        for &start in self.bonds.keys() {
            queue.clear();
            distances.clear();

            queue.push_back(start);
            distances.insert(start, 0);
            while let Some(current) = queue.pop_front() {
                let distance = distances[&current];
                if distance == self.max_bond_distance {
                    continue;
                }

                for &neighbor in &self.bonds[&current] {
                    if !distances.contains_key(&neighbor) {
                        distances.insert(neighbor, distance + 1);
                        table.insert(start, neighbor);
                        queue.push_back(neighbor);
                    }
                }
            }
        }

        for &(first, second) in &self.pairs {
            table.insert(first, second);
        }

        for group in &self.groups {
            for (i, &first) in group.iter().enumerate() {
                for &second in &group[(i + 1)..] {
                    table.insert(first, second);
                }
            }
        }

        for group in &self.removed {
            for &first in group {
                for &second in group {
                    table.remove(first, second);
                }
            }
        }

        return Ok(table);
    }
}
