use std::collections::HashMap;

use crate::Error;
use super::{Particle, UnitCell};

/// A `Frame` owns all the particles of one simulation snapshot, together with
/// the unit cell and the bonds between particles.
///
/// Particles are identified by their id, which must be unique in a frame.
#[derive(Clone, Debug)]
pub struct Frame {
    cell: UnitCell,
    particles: Vec<Particle>,
    /// index of each particle in `particles`, by id
    indexes: HashMap<usize, usize>,
    bonds: Vec<(usize, usize)>,
}

impl Frame {
    /// Create a new empty frame with the given unit cell
    pub fn new(cell: UnitCell) -> Frame {
        Frame {
            cell: cell,
            particles: Vec::new(),
            indexes: HashMap::new(),
            bonds: Vec::new(),
        }
    }

    pub fn cell(&self) -> UnitCell {
        self.cell
    }

    pub fn set_cell(&mut self, cell: UnitCell) {
        self.cell = cell;
    }

    /// Get the number of particles in this frame
    pub fn size(&self) -> usize {
        self.particles.len()
    }

    /// Add a particle to this frame. This fails if another particle with the
    /// same id is already part of the frame.
    pub fn add_particle(&mut self, particle: Particle) -> Result<(), Error> {
        if self.indexes.contains_key(&particle.id()) {
            return Err(Error::Configuration(format!(
                "a particle with id {} already exists in this frame", particle.id()
            )));
        }

        self.indexes.insert(particle.id(), self.particles.len());
        self.particles.push(particle);
        Ok(())
    }

    /// Get all the particles in this frame, in the order they were added
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Get the particle with the given `id`
    pub fn particle(&self, id: usize) -> Option<&Particle> {
        self.indexes.get(&id).map(|&index| &self.particles[index])
    }

    /// Get mutable access to the particle with the given `id`, for example to
    /// update its position for a new snapshot
    pub fn particle_mut(&mut self, id: usize) -> Option<&mut Particle> {
        match self.indexes.get(&id) {
            Some(&index) => Some(&mut self.particles[index]),
            None => None,
        }
    }

    /// Add a bond between the particles with ids `first` and `second`. Both
    /// particles must already be part of this frame.
    pub fn add_bond(&mut self, first: usize, second: usize) -> Result<(), Error> {
        if first == second {
            return Err(Error::Configuration(format!(
                "can not create a bond between particle {} and itself", first
            )));
        }

        for id in [first, second] {
            if !self.indexes.contains_key(&id) {
                return Err(Error::Configuration(format!(
                    "can not create a bond with particle {}: it is not part of this frame", id
                )));
            }
        }

        self.bonds.push((first, second));
        Ok(())
    }

    /// Get the list of bonds in this frame, as pairs of particle ids
    pub fn bonds(&self) -> &[(usize, usize)] {
        &self.bonds
    }
}
