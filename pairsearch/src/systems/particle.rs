use crate::{Error, Vector3D};

/// A single particle (atom or coarse-grained bead) in a frame.
///
/// The position of a particle starts unset, and must be set before the
/// particle takes part in a neighbor search.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    id: usize,
    particle_type: String,
    name: String,
    molecule: Option<usize>,
    position: Option<Vector3D>,
}

impl Particle {
    /// Create a new particle with the given `id` and type. The name of the
    /// particle defaults to its type.
    pub fn new(id: usize, particle_type: impl Into<String>) -> Particle {
        let particle_type = particle_type.into();
        Particle {
            id: id,
            name: particle_type.clone(),
            particle_type: particle_type,
            molecule: None,
            position: None,
        }
    }

    /// Set the name of this particle
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Particle {
        self.name = name.into();
        self
    }

    /// Assign this particle to the molecule with the given id
    #[must_use]
    pub fn with_molecule(mut self, molecule: usize) -> Particle {
        self.molecule = Some(molecule);
        self
    }

    /// Set the position of this particle
    #[must_use]
    pub fn with_position(mut self, position: Vector3D) -> Particle {
        self.position = Some(position);
        self
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn particle_type(&self) -> &str {
        &self.particle_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the id of the molecule containing this particle, if any
    pub fn molecule(&self) -> Option<usize> {
        self.molecule
    }

    /// Get the position of this particle, or an error if the position was
    /// never set.
    pub fn position(&self) -> Result<Vector3D, Error> {
        self.position.ok_or_else(|| Error::Precompletion(format!(
            "the position of particle {} ({}) is not set", self.id, self.name
        )))
    }

    /// Check whether the position of this particle was set
    pub fn has_position(&self) -> bool {
        self.position.is_some()
    }

    pub fn set_position(&mut self, position: Vector3D) {
        self.position = Some(position);
    }
}
