//! PyO3 bindings for the `clattice` search.
//!
//! Notes
//! - Bindings stay thin: bases are `((x1, y1), (x2, y2))` tuples, solutions
//!   come back as lists of `(m1, m2, n1, n2)` tuples.
//! - `clattices_loop` keeps the historical file-to-file entry point so older
//!   drivers can switch to this module without changes.

use pyo3::prelude::*;

mod common;
mod search;
mod supercell;

#[pymodule]
fn clattice_native(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add("__version__", clattice::VERSION)?;
    search::register(m)?;
    supercell::register(m)?;
    Ok(())
}
