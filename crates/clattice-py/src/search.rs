//! Coincidence search bindings.

use crate::common::{
    basis_from_py, map_run_err, map_search_err, options_from_dict, quad_to_py, PyBasis, PyQuad,
};
use clattice::api::{
    search_all, search_file, search_par, solve_angle, CoefficientRange, DistanceTest,
    RotationSense, SearchCfg, SweepBoundary, SweepSpec,
};
use pyo3::prelude::*;
use pyo3::types::PyDict;

/// Coefficient quadruples coinciding at one angle (degrees).
///
/// Keyword options: `nmax`, `tolerance`, `angle_tolerance`, `distance`,
/// `range`, `rotation`.
#[pyfunction]
#[pyo3(signature = (a, b, angle, **options))]
pub fn coincidences_at(
    py: Python<'_>,
    a: PyBasis,
    b: PyBasis,
    angle: f64,
    options: Option<&PyDict>,
) -> PyResult<Vec<PyQuad>> {
    let opts = options_from_dict(options)?;
    let (a, b) = (basis_from_py(a), basis_from_py(b));
    let found = py
        .allow_threads(|| solve_angle(&a, &b, angle, &opts.cfg))
        .map_err(map_search_err)?;
    Ok(found.iter().map(quad_to_py).collect())
}

/// Sweep `start..end` by `step` and return `[(angle, [(m1, m2, n1, n2), ...]), ...]`.
///
/// Accepts the options of `coincidences_at` plus `sweep_end` (`"closed"` or
/// `"padded"`) and `parallel`.
#[pyfunction]
#[pyo3(signature = (a, b, start, end, step, **options))]
pub fn coincidence_search(
    py: Python<'_>,
    a: PyBasis,
    b: PyBasis,
    start: f64,
    end: f64,
    step: f64,
    options: Option<&PyDict>,
) -> PyResult<Vec<(f64, Vec<PyQuad>)>> {
    let opts = options_from_dict(options)?;
    let (a, b) = (basis_from_py(a), basis_from_py(b));
    let sweep = SweepSpec::new(start, end, step).with_boundary(opts.boundary);
    let blocks = py
        .allow_threads(|| {
            if opts.parallel {
                search_par(&a, &b, &sweep, &opts.cfg, None)
            } else {
                search_all(&a, &b, &sweep, &opts.cfg, None)
            }
        })
        .map_err(map_search_err)?;
    Ok(blocks
        .into_iter()
        .map(|blk| (blk.angle, blk.solutions.iter().map(quad_to_py).collect()))
        .collect())
}

/// File-to-file search with the historical loop conventions.
///
/// Reads `input` (eight numbers), writes per-angle blocks to `output` and
/// returns `(angles, solutions)`. The sweep runs while `angle < end + step`,
/// `n2` stops one short of `nmax`, and B is rotated clockwise.
#[pyfunction]
#[pyo3(signature = (
    angle_start,
    angle_end,
    angle_step,
    nmax,
    tolerance,
    angle_tolerance=None,
    input="lattices.tmp",
    output="coincidences.tmp",
))]
#[allow(clippy::too_many_arguments)]
pub fn clattices_loop(
    py: Python<'_>,
    angle_start: f64,
    angle_end: f64,
    angle_step: f64,
    nmax: i32,
    tolerance: f64,
    angle_tolerance: Option<f64>,
    input: &str,
    output: &str,
) -> PyResult<(usize, usize)> {
    let sweep =
        SweepSpec::new(angle_start, angle_end, angle_step).with_boundary(SweepBoundary::Padded);
    let cfg = SearchCfg {
        nmax,
        tolerance,
        angle_tolerance,
        distance: DistanceTest::Euclidean,
        range: CoefficientRange::InclusiveOpenN2,
        rotation: RotationSense::Clockwise,
    };
    let summary = py
        .allow_threads(|| search_file(input, output, &sweep, &cfg))
        .map_err(map_run_err)?;
    Ok((summary.angles, summary.solutions))
}

pub fn register(m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(coincidences_at, m)?)?;
    m.add_function(wrap_pyfunction!(coincidence_search, m)?)?;
    m.add_function(wrap_pyfunction!(clattices_loop, m)?)?;
    Ok(())
}
