#![warn(clippy::all, clippy::pedantic)]

// disable some style lints
#![allow(clippy::needless_return, clippy::must_use_candidate, clippy::comparison_chain)]
#![allow(clippy::redundant_field_names, clippy::redundant_closure_for_method_calls)]
#![allow(clippy::unreadable_literal, clippy::option_if_let_else, clippy::range_plus_one)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc, clippy::module_name_repetitions)]

#![allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap, clippy::cast_lossless, clippy::cast_sign_loss)]
#![allow(clippy::default_trait_access)]

// Tests lints
#![cfg_attr(test, allow(clippy::float_cmp))]

//! Enumeration of pairs of particles within a cutoff distance, for structural
//! analysis of molecular simulations.
//!
//! Particles live in a [`Frame`], and are selected into [`ParticleSet`]s. A
//! [`NeighborSearch`] then finds all pairs of particles in one set (or between
//! two sets) closer than a cutoff, skipping pairs listed in an
//! [`ExclusionTable`] and pairs rejected by a user-defined match function.
//! The pairs found are stored in a [`PairRegistry`].

pub mod types;
pub use types::*;

mod errors;
pub use self::errors::Error;

pub mod systems;
pub use systems::{CellShape, Frame, Particle, ParticleSet, UnitCell};

pub mod neighbors;
pub use neighbors::{ExclusionTable, ExclusionsBuilder, NeighborSearch, Pair, PairRecord, PairRegistry};
pub use neighbors::{SearchParameters, Strategy};
