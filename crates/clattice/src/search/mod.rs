//! Coincidence search over a sweep of rotation angles.
//!
//! Purpose
//! - For every sampled angle θ, test all coefficient quadruples
//!   (m1, m2, n1, n2) within the search radius and keep those whose lattice
//!   points `A·m` and `R(θ)·B·n` coincide within tolerance (eq. 11).
//!
//! Design
//! - Boundary conventions (coefficient ranges, sweep end, distance formula,
//!   rotation sense) are named policies in `SearchCfg`/`SweepSpec`.
//! - The A grid is built once per run and the rotated B grid once per angle.
//! - `search` is lazy: one `AngleSolutions` block per sample, in sweep order.
//! - A zero-length candidate vector is never coincident, so the origin
//!   quadruple is never reported.

mod engine;
mod sweep;
mod types;

#[cfg(feature = "parallel")]
pub use engine::search_par;
pub use engine::{search, search_all, solve_angle, CoincidenceSearch};
pub use sweep::{SweepBoundary, SweepSpec, MAX_SAMPLES};
pub use types::{
    AngleSolutions, CancelToken, CoefficientQuadruple, CoefficientRange, DistanceTest, SearchCfg,
    SearchError,
};
