//! Crystal files and supercell reduction.

use crate::common::{
    basis_to_py, map_crystal_err, map_search_err, options_from_dict, quad_to_py, PyBasis,
};
use clattice::api::{combinations, Crystal, SearchError, Supercell, SweepSpec};
use pyo3::prelude::*;
use pyo3::types::PyDict;

/// Load a crystal file as `(label, atoms, lattice, basis)`.
#[pyfunction]
pub fn read_crystal(path: &str) -> PyResult<(String, u32, String, PyBasis)> {
    let c = Crystal::from_path(path).map_err(map_crystal_err)?;
    Ok((c.label, c.atoms, c.kind.to_string(), basis_to_py(&c.basis)))
}

fn supercell_to_py<'py>(py: Python<'py>, s: &Supercell) -> PyResult<&'py PyDict> {
    let d = PyDict::new(py);
    d.set_item("system", format!("{}/{}", s.labels.0, s.labels.1))?;
    d.set_item("angle", s.angle)?;
    d.set_item(
        "solutions",
        (quad_to_py(&s.solutions.0), quad_to_py(&s.solutions.1)),
    )?;
    d.set_item("area_scaling", s.area_scaling.to_vec())?;
    d.set_item("vector_norms", s.vector_norms.to_vec())?;
    d.set_item("vector_scaling", s.vector_scaling.to_vec())?;
    d.set_item("vector_scaling_squared", s.scaling_squared().to_vec())?;
    d.set_item("atoms", s.atoms)?;
    d.set_item("strain", s.strain.to_vec())?;
    Ok(d)
}

/// Minimum-area supercells for every pair of crystal files, as dicts.
///
/// Accepts the search options of `coincidence_search` plus
/// `self_combinations` (default `False`).
#[pyfunction]
#[pyo3(signature = (paths, start, end, step, self_combinations=false, **options))]
pub fn supercells<'py>(
    py: Python<'py>,
    paths: Vec<String>,
    start: f64,
    end: f64,
    step: f64,
    self_combinations: bool,
    options: Option<&PyDict>,
) -> PyResult<Vec<&'py PyDict>> {
    let opts = options_from_dict(options)?;
    let crystals = paths
        .iter()
        .map(Crystal::from_path)
        .collect::<Result<Vec<_>, _>>()
        .map_err(map_crystal_err)?;
    let sweep = SweepSpec::new(start, end, step).with_boundary(opts.boundary);
    let cells = py
        .allow_threads(|| {
            let mut cells = Vec::new();
            for combo in combinations(&crystals, self_combinations) {
                cells.extend(combo.supercells(&sweep, &opts.cfg)?);
            }
            Ok::<_, SearchError>(cells)
        })
        .map_err(map_search_err)?;
    cells.iter().map(|s| supercell_to_py(py, s)).collect()
}

pub fn register(m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(read_crystal, m)?)?;
    m.add_function(wrap_pyfunction!(supercells, m)?)?;
    Ok(())
}
