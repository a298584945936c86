//! Curated surface for bindings and the command line (UNSTABLE).
//!
//! Important
//! - Not a stable public API. Callers inside this workspace (`cli`,
//!   `clattice-py`) import from here so the module layout can move freely.

// Lattices and crystals
pub use crate::lattice::{BravaisKind, Crystal, CrystalError, LatticeBasis, RotationSense};
// Search engine
pub use crate::search::{
    search, search_all, solve_angle, AngleSolutions, CancelToken, CoefficientQuadruple,
    CoefficientRange, CoincidenceSearch, DistanceTest, SearchCfg, SearchError, SweepBoundary,
    SweepSpec, MAX_SAMPLES,
};
#[cfg(feature = "parallel")]
pub use crate::search::search_par;
// Loader and sink
pub use crate::io::{
    parse_bases, read_bases, search_file, write_angle_block, write_bases, write_solutions,
    write_solutions_file, LoadError, RunError, SinkSummary,
};
// Supercells
pub use crate::supercell::{combinations, minimum_area_pair, Combination, Supercell};
