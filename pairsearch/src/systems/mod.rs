//! Particles, frames and particle sets, which are the inputs of the neighbor
//! search.

mod cell;
pub use self::cell::{UnitCell, CellShape};

mod particle;
pub use self::particle::Particle;

mod frame;
pub use self::frame::Frame;

mod selection;
pub use self::selection::ParticleSet;

#[cfg(test)]
pub(crate) mod test_utils;
