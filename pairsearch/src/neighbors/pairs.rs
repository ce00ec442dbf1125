use crate::{Particle, Vector3D};

/// Types which can be created by the neighbor search to represent a pair of
/// particles.
///
/// Implement this trait to attach additional data to each pair found by
/// [`NeighborSearch`](super::NeighborSearch), without changing the search
/// itself. For one-off data, a pair factory closure can be used instead, see
/// [`NeighborSearch::set_pair_factory`](super::NeighborSearch::set_pair_factory).
pub trait PairRecord: Sized {
    /// Create a new pair between `first` and `second`, where `vector` is the
    /// displacement from `first` to `second`, accounting for periodic
    /// boundary conditions.
    fn create(first: &Particle, second: &Particle, vector: Vector3D) -> Self;
}

/// Pair of particles found by a neighbor search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pair {
    /// id of the first particle in the pair
    pub first: usize,
    /// id of the second particle in the pair
    pub second: usize,
    /// vector from the first particle to the second one, using the minimum
    /// image convention
    pub vector: Vector3D,
    /// distance between the two particles
    pub distance: f64,
}

impl PairRecord for Pair {
    fn create(first: &Particle, second: &Particle, vector: Vector3D) -> Pair {
        Pair {
            first: first.id(),
            second: second.id(),
            vector: vector,
            distance: vector.norm(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_pair() {
        let first = Particle::new(3, "A");
        let second = Particle::new(1, "B");

        let pair = Pair::create(&first, &second, Vector3D::new(0.0, 3.0, 4.0));
        assert_eq!(pair.first, 3);
        assert_eq!(pair.second, 1);
        assert_eq!(pair.vector, Vector3D::new(0.0, 3.0, 4.0));
        assert_eq!(pair.distance, 5.0);
    }
}
