//! Supercells built from the coincidences of one angle.
//!
//! Purpose
//! - Reduce an angle's quadruples to the pair `(m1, m2, n1, n2)`,
//!   `(m1', m2', n1', n2')` spanning the smallest positive area `m × m'`, and
//!   report the resulting supercell: atoms, per-vector strain (eq. 12) and
//!   scaling relative to each crystal.
//! - Enumerate crystal pairs (`Combination`) and run the search per pair.
//!
//! Candidates are not deduplicated by symmetry; equivalent supercells at
//! different angles are all reported.

mod cell;
mod combination;

pub use cell::{minimum_area_pair, Supercell};
pub use combination::{combinations, Combination};

#[cfg(test)]
mod tests;
