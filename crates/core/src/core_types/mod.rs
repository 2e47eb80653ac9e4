//! Core types: units, species reference data and tree observations

pub mod species;
pub mod tree;
pub mod units;

pub use species::{SpeciesCatalog, SpeciesProfile};
pub use tree::TreeObservation;
pub use units::*;
