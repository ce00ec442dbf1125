use std::ops::Range;

use log::warn;
use rayon::prelude::*;

use crate::{Error, Particle, ParticleSet, UnitCell, Vector3D};

use super::cell_list::CellList;
use super::parameters::check_cutoff;
use super::{ExclusionTable, Pair, PairRecord, PairRegistry, SearchParameters, Strategy};

/// Particles closer than this distance are reported as overlapping
const OVERLAP_DISTANCE: f64 = 1e-3;

type MatchFunction<'a> = Box<dyn FnMut(&Particle, &Particle, Vector3D, f64) -> Result<bool, Error> + 'a>;
type PairFactory<'a, P> = Box<dyn FnMut(&Particle, &Particle, Vector3D) -> Result<P, Error> + 'a>;

/// Default match function, accepting all pairs
fn match_always(_: &Particle, _: &Particle, _: Vector3D, _: f64) -> Result<bool, Error> {
    Ok(true)
}

/// `NeighborSearch` enumerates all pairs of particles within a cutoff
/// distance of one another, and stores them in a [`PairRegistry`].
///
/// Each candidate pair within the cutoff goes through the following steps:
///
/// 1. if the exclusion policy is enabled and the pair is part of the
///    [`ExclusionTable`], it is skipped;
/// 2. the match function is called with both particles, the displacement
///    vector and the distance; the pair is skipped if it returns `false`;
/// 3. if the pair is not already in the registry, a pair record is created
///    with the pair factory and added to the registry.
///
/// The match function can have side effects, and always returning `false`
/// from it allows to process pairs on the fly without storing them.
///
/// ```
/// # use pairsearch::{Frame, NeighborSearch, Particle, ParticleSet, UnitCell, Vector3D};
/// let mut frame = Frame::new(UnitCell::cubic(10.0)?);
/// frame.add_particle(Particle::new(0, "Ar").with_position(Vector3D::new(0.0, 0.0, 0.0)))?;
/// frame.add_particle(Particle::new(1, "Ar").with_position(Vector3D::new(9.0, 0.0, 0.0)))?;
///
/// let argon = ParticleSet::select(&frame, "Ar")?;
///
/// let mut search: NeighborSearch = NeighborSearch::new();
/// search.set_cutoff(2.0);
/// let pairs = search.generate_single(&argon)?;
///
/// let pair = pairs.find(0, 1).unwrap();
/// assert_eq!(pair.distance, 1.0);
/// # Ok::<(), pairsearch::Error>(())
/// ```
pub struct NeighborSearch<'a, P = Pair> {
    cutoff: Option<f64>,
    strategy: Strategy,
    exclusion_policy: bool,
    exclusions: Option<&'a ExclusionTable>,
    match_function: Option<MatchFunction<'a>>,
    pair_factory: PairFactory<'a, P>,
    /// was the pair factory set by the user?
    custom_factory: bool,
}

impl<'a, P> std::fmt::Debug for NeighborSearch<'a, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NeighborSearch")
            .field("cutoff", &self.cutoff)
            .field("strategy", &self.strategy)
            .field("exclusion_policy", &self.exclusion_policy)
            .field("exclusions", &self.exclusions.map(ExclusionTable::len))
            .field("match_function", &self.match_function.is_some())
            .field("custom_factory", &self.custom_factory)
            .finish_non_exhaustive()
    }
}

impl<'a, P: PairRecord + 'a> Default for NeighborSearch<'a, P> {
    fn default() -> Self {
        NeighborSearch::new()
    }
}

impl<'a, P: PairRecord + 'a> NeighborSearch<'a, P> {
    /// Create a new search, creating pairs with [`PairRecord::create`] and
    /// accepting all pairs within the cutoff. The cutoff must be set before
    /// generating pairs.
    pub fn new() -> NeighborSearch<'a, P> {
        let mut search = NeighborSearch::with_pair_factory(|first, second, vector| Ok(P::create(first, second, vector)));
        search.custom_factory = false;
        return search;
    }

    /// Create a new search configured with the given `parameters`
    pub fn with_parameters(parameters: &SearchParameters) -> Result<NeighborSearch<'a, P>, Error> {
        parameters.validate()?;

        let mut search = NeighborSearch::new();
        search.set_cutoff(parameters.cutoff);
        search.set_exclusion_policy(parameters.exclusions);
        search.set_strategy(parameters.strategy);
        return Ok(search);
    }
}

impl<'a, P> NeighborSearch<'a, P> {
    /// Create a new search using `factory` to create pair records
    pub fn with_pair_factory<F>(factory: F) -> NeighborSearch<'a, P>
        where F: FnMut(&Particle, &Particle, Vector3D) -> Result<P, Error> + 'a
    {
        NeighborSearch {
            cutoff: None,
            strategy: Strategy::default(),
            exclusion_policy: true,
            exclusions: None,
            match_function: Some(Box::new(match_always)),
            pair_factory: Box::new(factory),
            custom_factory: true,
        }
    }

    /// Set the cutoff distance. Pairs separated by exactly the cutoff are
    /// included in the search results.
    pub fn set_cutoff(&mut self, cutoff: f64) {
        self.cutoff = Some(cutoff);
    }

    /// Get the cutoff distance, if it was set
    pub fn cutoff(&self) -> Option<f64> {
        self.cutoff
    }

    /// Set the algorithm used to find candidate pairs. This does not change
    /// the pairs found by the search, nor their order.
    pub fn set_strategy(&mut self, strategy: Strategy) {
        self.strategy = strategy;
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Enable or disable the use of the exclusion table. This is enabled by
    /// default.
    pub fn set_exclusion_policy(&mut self, enabled: bool) {
        self.exclusion_policy = enabled;
    }

    pub fn exclusion_policy(&self) -> bool {
        self.exclusion_policy
    }

    /// Set the exclusion table used to skip pairs of particles
    pub fn set_exclusions(&mut self, exclusions: &'a ExclusionTable) {
        self.exclusions = Some(exclusions);
    }

    /// Set the match function, deciding whether a pair within the cutoff
    /// should be added to the registry. The function is called with both
    /// particles, the displacement vector from the first particle to the
    /// second one, and the distance between them.
    ///
    /// This function is only used by the serial search,
    /// [`NeighborSearch::generate_parallel`] takes its own match function.
    pub fn set_match_function<F>(&mut self, mut function: F)
        where F: FnMut(&Particle, &Particle, Vector3D, f64) -> bool + 'a
    {
        self.match_function = Some(Box::new(
            move |first: &Particle, second: &Particle, vector: Vector3D, distance: f64| -> Result<bool, Error> {
                Ok(function(first, second, vector, distance))
            }
        ));
    }

    /// Set a match function which can fail. The first error returned by the
    /// function interrupts the search and is returned to the caller.
    pub fn set_fallible_match_function<F>(&mut self, function: F)
        where F: FnMut(&Particle, &Particle, Vector3D, f64) -> Result<bool, Error> + 'a
    {
        self.match_function = Some(Box::new(function));
    }

    /// Remove the match function. Pairs can not be generated until a new
    /// match function is set.
    pub fn clear_match_function(&mut self) {
        self.match_function = None;
    }

    /// Set the function used to create the record stored in the registry for
    /// each accepted pair. The first error returned by the function
    /// interrupts the search and is returned to the caller.
    ///
    /// [`NeighborSearch::generate_parallel`] always creates pairs with
    /// [`PairRecord::create`], and fails if a pair factory was set.
    pub fn set_pair_factory<F>(&mut self, factory: F)
        where F: FnMut(&Particle, &Particle, Vector3D) -> Result<P, Error> + 'a
    {
        self.pair_factory = Box::new(factory);
        self.custom_factory = true;
    }

    fn checked_cutoff(&self) -> Result<f64, Error> {
        match self.cutoff {
            Some(cutoff) => {
                check_cutoff(cutoff)?;
                Ok(cutoff)
            }
            None => Err(Error::Configuration(
                "the cutoff must be set before searching for neighbors".into()
            )),
        }
    }

    fn active_exclusions(&self) -> Option<&'a ExclusionTable> {
        if self.exclusion_policy {
            self.exclusions
        } else {
            None
        }
    }

    /// Find all pairs between particles in `first` and particles in `second`,
    /// and return them in a new registry.
    ///
    /// If `first` and `second` are the same set (the same object in memory),
    /// each pair of particles inside this set is considered once. Otherwise,
    /// all pairs between a particle in `first` and a particle in `second` are
    /// considered, skipping pairs of a particle with itself.
    pub fn generate(&mut self, first: &ParticleSet, second: &ParticleSet) -> Result<PairRegistry<P>, Error> {
        let mut registry = PairRegistry::new();
        self.generate_into(first, second, &mut registry)?;
        return Ok(registry);
    }

    /// Find all pairs of particles inside the given `set`
    pub fn generate_single(&mut self, set: &ParticleSet) -> Result<PairRegistry<P>, Error> {
        self.generate(set, set)
    }

    /// Find all pairs between particles in `first` and particles in `second`,
    /// adding them to an existing `registry`. Pairs already in the registry
    /// are not created again.
    ///
    /// If this function returns an error coming from the match function or
    /// the pair factory, the registry contains the pairs added before the
    /// error.
    #[time_graph::instrument(name = "NeighborSearch::generate")]
    pub fn generate_into(&mut self, first: &ParticleSet, second: &ParticleSet, registry: &mut PairRegistry<P>) -> Result<(), Error> {
        let cutoff = self.checked_cutoff()?;
        let strategy = self.strategy;
        let exclusions = self.active_exclusions();

        let pair_factory = &mut self.pair_factory;
        let match_function = match self.match_function.as_mut() {
            Some(function) => function,
            None => return Err(Error::Configuration(
                "a match function must be set before searching for neighbors".into()
            )),
        };

        let enumeration = Enumeration::new(first, second, cutoff, strategy, exclusions)?;

        let mut candidates = Vec::new();
        for index in 0..enumeration.len() {
            enumeration.visit(index, &mut candidates, |first, second, vector, distance| {
                if match_function(first, second, vector, distance)? && !registry.contains(first.id(), second.id()) {
                    let record = pair_factory(first, second, vector)?;
                    registry.insert(first.id(), second.id(), record);
                }
                Ok(())
            })?;
        }

        return Ok(());
    }
}

impl<'a, P: PairRecord + Send> NeighborSearch<'a, P> {
    /// Find all pairs between particles in `first` and particles in `second`
    /// using multiple threads.
    ///
    /// The particles in `first` are split in chunks, and each chunk is
    /// processed in parallel with its own registry. The registries are then
    /// merged in order, giving the same result as [`NeighborSearch::generate`]
    /// with the same `match_function`.
    ///
    /// Since it is shared between threads, the match function given here
    /// replaces the one set on this search (even if it was cleared), and
    /// pairs are always created with [`PairRecord::create`]. This function
    /// returns an error if a custom pair factory was set on this search.
    #[time_graph::instrument(name = "NeighborSearch::generate_parallel")]
    pub fn generate_parallel<F>(&self, first: &ParticleSet, second: &ParticleSet, match_function: F) -> Result<PairRegistry<P>, Error>
        where F: Fn(&Particle, &Particle, Vector3D, f64) -> bool + Sync
    {
        if self.custom_factory {
            return Err(Error::Configuration(
                "the parallel search can not use a custom pair factory".into()
            ));
        }

        let cutoff = self.checked_cutoff()?;
        let enumeration = Enumeration::new(first, second, cutoff, self.strategy, self.active_exclusions())?;

        let registries = chunks(enumeration.len(), rayon::current_num_threads())
            .into_par_iter()
            .map(|range| -> Result<PairRegistry<P>, Error> {
                let mut registry = PairRegistry::new();
                let mut candidates = Vec::new();
                for index in range {
                    enumeration.visit(index, &mut candidates, |first, second, vector, distance| {
                        if match_function(first, second, vector, distance) && !registry.contains(first.id(), second.id()) {
                            registry.insert(first.id(), second.id(), P::create(first, second, vector));
                        }
                        Ok(())
                    })?;
                }
                Ok(registry)
            })
            .collect::<Result<Vec<_>, Error>>()?;

        let mut registry = PairRegistry::new();
        for partial in registries {
            registry.merge(partial);
        }

        return Ok(registry);
    }
}

/// Split `0..size` in contiguous ranges, with a few ranges per thread to
/// balance the work
fn chunks(size: usize, n_threads: usize) -> Vec<Range<usize>> {
    let chunk_size = usize::max(size / (4 * n_threads.max(1)), 1);
    (0..size).step_by(chunk_size)
        .map(|start| start..usize::min(start + chunk_size, size))
        .collect()
}

/// Candidate pairs for one call to the neighbor search, shared between the
/// serial and parallel implementations.
struct Enumeration<'s> {
    first: &'s [&'s Particle],
    second: &'s [&'s Particle],
    first_positions: Vec<Vector3D>,
    second_positions: Vec<Vector3D>,
    /// are we looking for pairs inside a single set?
    single: bool,
    cell: UnitCell,
    cutoff: f64,
    exclusions: Option<&'s ExclusionTable>,
    cell_list: Option<CellList>,
}

impl<'s> Enumeration<'s> {
    fn new(
        first: &'s ParticleSet,
        second: &'s ParticleSet,
        cutoff: f64,
        strategy: Strategy,
        exclusions: Option<&'s ExclusionTable>,
    ) -> Result<Enumeration<'s>, Error> {
        let single = std::ptr::eq(first, second);
        if !single && first.cell() != second.cell() {
            return Err(Error::Configuration(
                "both particle sets must use the same unit cell".into()
            ));
        }

        let first_positions = first.positions()?;
        let second_positions = if single {
            first_positions.clone()
        } else {
            second.positions()?
        };

        let cell = first.cell();
        let cell_list = match strategy {
            Strategy::BruteForce => None,
            Strategy::CellList => {
                let all_positions = first_positions.iter().chain(&second_positions);
                let mut cell_list = CellList::new(cell, cutoff, all_positions);
                for (index, &position) in second_positions.iter().enumerate() {
                    cell_list.add_particle(index, position);
                }
                Some(cell_list)
            }
        };

        Ok(Enumeration {
            first: first.particles(),
            second: second.particles(),
            first_positions: first_positions,
            second_positions: second_positions,
            single: single,
            cell: cell,
            cutoff: cutoff,
            exclusions: exclusions,
            cell_list: cell_list,
        })
    }

    /// Number of particles in the first set
    fn len(&self) -> usize {
        self.first.len()
    }

    /// Call `callback` for all pairs within the cutoff and not excluded,
    /// between the particle at `index` in the first set and the particles in
    /// the second set. Pairs are visited in increasing order of index in the
    /// second set. `candidates` is used as scratch space.
    fn visit<F>(&self, index: usize, candidates: &mut Vec<usize>, mut callback: F) -> Result<(), Error>
        where F: FnMut(&Particle, &Particle, Vector3D, f64) -> Result<(), Error>
    {
        let position = self.first_positions[index];
        match &self.cell_list {
            Some(cell_list) => cell_list.candidates(position, candidates),
            None => {
                candidates.clear();
                if self.single {
                    candidates.extend((index + 1)..self.second.len());
                } else {
                    candidates.extend(0..self.second.len());
                }
            }
        }

        let first = self.first[index];
        for &other in candidates.iter() {
            if self.single && other <= index {
                continue;
            }

            let second = self.second[other];
            if first.id() == second.id() {
                continue;
            }

            let vector = self.cell.displacement(position, self.second_positions[other]);
            let distance = vector.norm();
            if distance > self.cutoff {
                continue;
            }

            if let Some(exclusions) = self.exclusions {
                if exclusions.is_excluded(first.id(), second.id()) {
                    continue;
                }
            }

            if distance < OVERLAP_DISTANCE {
                warn!(
                    "particles {} and {} are very close to one another ({})",
                    first.id(), second.id(), distance
                );
            }

            callback(first, second, vector, distance)?;
        }

        return Ok(());
    }
}
