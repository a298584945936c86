//! Coincidence lattices of two 2D crystals.
//!
//! Given the bases of two 2D Bravais lattices A and B, the search sweeps a
//! rotation angle θ applied to B and collects every integer quadruple
//! (m1, m2, n1, n2) with `m1·a1 + m2·a2 ≈ R(θ)(n1·b1 + n2·b2)` under a relative
//! tolerance (and optionally an angular one).
//!
//! Layout
//! - `lattice`: bases, rotation conventions, crystal description files.
//! - `search`: the sweep and the O(S·N⁴) coincidence engine.
//! - `io`: flat-text loader for the eight basis numbers and the result sink.
//! - `supercell`: minimum-area pairs, strain and atom counts per angle.
//!
//! Reference: D. S. Koda et al., J. Phys. Chem. C 120 (2016) 10895, eqs. 10–12.

pub mod api;
pub mod io;
pub mod lattice;
pub mod search;
pub mod supercell;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use nalgebra::{Matrix2 as Mat2, Vector2 as Vec2};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::io::{read_bases, search_file, write_solutions, SinkSummary};
    pub use crate::lattice::{Crystal, LatticeBasis, RotationSense};
    pub use crate::search::{
        search, search_all, AngleSolutions, CancelToken, CoefficientQuadruple, CoefficientRange,
        DistanceTest, SearchCfg, SweepBoundary, SweepSpec,
    };
    pub use crate::supercell::{combinations, Combination, Supercell};
    pub use nalgebra::{Matrix2 as Mat2, Vector2 as Vec2};
}

/// Signed area of the parallelogram spanned by integer vectors `(a1, a2)` and `(b1, b2)`.
///
/// Computed in `i64`, so it cannot overflow for any `i32` inputs.
#[inline]
pub fn integer_cross(a: (i32, i32), b: (i32, i32)) -> i64 {
    i64::from(a.0) * i64::from(b.1) - i64::from(b.0) * i64::from(a.1)
}
