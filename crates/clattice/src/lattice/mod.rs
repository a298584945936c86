//! 2D lattice bases and crystal descriptions.
//!
//! Purpose
//! - `LatticeBasis`: the two primitive vectors of a 2D Bravais lattice, stored
//!   as `nalgebra` column vectors so points are plain `m1·e1 + m2·e2` sums.
//! - `RotationSense`: which of the two historical rotation matrices turns
//!   lattice B during a sweep.
//! - `Crystal`: the four-line description file (label, atoms, Bravais name,
//!   parameters) used to assemble bases for crystal pairs.
//!
//! Conventions
//! - Angles are in degrees at every public boundary and converted to radians
//!   once per sample by the search engine.
//! - Bases are never mutated; rotation produces a new `LatticeBasis`.

mod crystal;
mod types;

pub use crystal::{BravaisKind, Crystal, CrystalError};
pub use types::{LatticeBasis, RotationSense};

#[cfg(test)]
mod tests;
