use std::collections::HashSet;

use glob::Pattern;

use crate::{Error, Vector3D};
use super::{Frame, Particle, UnitCell};

/// An ordered set of particles taken from a single [`Frame`], used as input
/// for neighbor searches.
///
/// A `ParticleSet` borrows the particles from the frame and never contains
/// the same particle id twice. The set is immutable once created.
#[derive(Debug, Clone)]
pub struct ParticleSet<'a> {
    cell: UnitCell,
    particles: Vec<&'a Particle>,
}

impl<'a> ParticleSet<'a> {
    /// Create a set from an explicit list of particles, using the given unit
    /// cell for periodic boundary conditions. This fails if the same particle
    /// id appears more than once.
    pub fn new(cell: UnitCell, particles: impl IntoIterator<Item = &'a Particle>) -> Result<ParticleSet<'a>, Error> {
        let particles = particles.into_iter().collect::<Vec<_>>();

        let mut ids = HashSet::with_capacity(particles.len());
        for particle in &particles {
            if !ids.insert(particle.id()) {
                return Err(Error::Configuration(format!(
                    "particle {} appears multiple times in the same particle set", particle.id()
                )));
            }
        }

        return Ok(ParticleSet { cell, particles });
    }

    /// Create a set containing all particles in the `frame`
    pub fn all(frame: &'a Frame) -> ParticleSet<'a> {
        ParticleSet::filter(frame, |_| true)
    }

    /// Create a set containing all particles in the `frame` for which
    /// `predicate` returns `true`
    pub fn filter(frame: &'a Frame, mut predicate: impl FnMut(&Particle) -> bool) -> ParticleSet<'a> {
        ParticleSet {
            cell: frame.cell(),
            // ids are unique inside a frame, no need to check them again
            particles: frame.particles().iter().filter(|&p| predicate(p)).collect(),
        }
    }

    /// Create a set containing all particles in the `frame` with a type
    /// matching the wildcard `pattern`. The pattern can use `*` to match any
    /// sequence of characters, `?` to match a single character and `[...]`
    /// to match a range of characters.
    pub fn select(frame: &'a Frame, pattern: &str) -> Result<ParticleSet<'a>, Error> {
        let pattern = Pattern::new(pattern)?;
        Ok(ParticleSet::filter(frame, |p| pattern.matches(p.particle_type())))
    }

    /// Create a set containing all particles in the `frame` with a name
    /// matching the wildcard `pattern`.
    pub fn select_by_name(frame: &'a Frame, pattern: &str) -> Result<ParticleSet<'a>, Error> {
        let pattern = Pattern::new(pattern)?;
        Ok(ParticleSet::filter(frame, |p| pattern.matches(p.name())))
    }

    /// Create a set containing all particles in the `frame` with a type
    /// matching `pattern` and within `radius` of `center`. Distances use the
    /// minimum image convention of the frame cell; a particle exactly at
    /// `radius` is part of the set.
    pub fn in_sphere(frame: &'a Frame, pattern: &str, center: Vector3D, radius: f64) -> Result<ParticleSet<'a>, Error> {
        if !(radius >= 0.0) {
            return Err(Error::Configuration(format!(
                "the radius of a spherical selection must be positive, got {}", radius
            )));
        }

        let pattern = Pattern::new(pattern)?;
        let cell = frame.cell();

        let mut particles = Vec::new();
        for particle in frame.particles() {
            if !pattern.matches(particle.particle_type()) {
                continue;
            }

            if cell.distance(center, particle.position()?) <= radius {
                particles.push(particle);
            }
        }

        return Ok(ParticleSet { cell, particles });
    }

    /// Get the unit cell used for periodic boundary conditions
    pub fn cell(&self) -> UnitCell {
        self.cell
    }

    /// Get the number of particles in this set
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Get the particle at the given `index` in this set
    pub fn get(&self, index: usize) -> Option<&'a Particle> {
        self.particles.get(index).copied()
    }

    /// Iterate over the particles in this set, in order
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &'a Particle> + '_ {
        self.particles.iter().copied()
    }

    /// Get the ids of all particles in this set, in order
    pub fn ids(&self) -> Vec<usize> {
        self.particles.iter().map(|p| p.id()).collect()
    }

    /// Get the positions of all particles in this set, in order. This fails
    /// if any of the particles does not have a position.
    pub fn positions(&self) -> Result<Vec<Vector3D>, Error> {
        self.particles.iter().map(|p| p.position()).collect()
    }

    pub(crate) fn particles(&self) -> &[&'a Particle] {
        &self.particles
    }
}
