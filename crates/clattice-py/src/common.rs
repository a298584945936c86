use clattice::api::{
    CoefficientQuadruple, CoefficientRange, CrystalError, DistanceTest, LatticeBasis, LoadError,
    RotationSense, RunError, SearchCfg, SearchError, SweepBoundary,
};
use nalgebra::Vector2;
use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

pub type PyBasis = ((f64, f64), (f64, f64));
pub type PyQuad = (i32, i32, i32, i32);

pub fn basis_from_py(((x1, y1), (x2, y2)): PyBasis) -> LatticeBasis {
    LatticeBasis::new(Vector2::new(x1, y1), Vector2::new(x2, y2))
}

pub fn basis_to_py(b: &LatticeBasis) -> PyBasis {
    ((b.e1.x, b.e1.y), (b.e2.x, b.e2.y))
}

pub fn quad_to_py(q: &CoefficientQuadruple) -> PyQuad {
    (q.m1, q.m2, q.n1, q.n2)
}

/// Keyword options accepted by the search bindings.
#[derive(Clone, Copy, Debug, Default)]
pub struct SearchOptions {
    pub cfg: SearchCfg,
    pub boundary: SweepBoundary,
    pub parallel: bool,
}

const OPTION_KEYS: &[&str] = &[
    "nmax",
    "tolerance",
    "angle_tolerance",
    "distance",
    "range",
    "rotation",
    "sweep_end",
    "parallel",
];

fn choice<T: Copy>(key: &str, value: &str, table: &[(&str, T)]) -> PyResult<T> {
    table
        .iter()
        .find(|(name, _)| *name == value)
        .map(|(_, v)| *v)
        .ok_or_else(|| {
            let names: Vec<&str> = table.iter().map(|(n, _)| *n).collect();
            PyValueError::new_err(format!(
                "'{key}' must be one of {names:?}, got '{value}'"
            ))
        })
}

pub fn options_from_dict(dict: Option<&PyDict>) -> PyResult<SearchOptions> {
    let mut opts = SearchOptions::default();
    let Some(dict) = dict else {
        return Ok(opts);
    };
    for key in dict.keys() {
        let key: &str = key.extract()?;
        if !OPTION_KEYS.contains(&key) {
            return Err(PyValueError::new_err(format!("unknown option '{key}'")));
        }
    }
    if let Some(v) = dict.get_item("nmax")? {
        opts.cfg.nmax = v.extract()?;
    }
    if let Some(v) = dict.get_item("tolerance")? {
        opts.cfg.tolerance = v.extract()?;
    }
    if let Some(v) = dict.get_item("angle_tolerance")? {
        opts.cfg.angle_tolerance = if v.is_none() { None } else { Some(v.extract()?) };
    }
    if let Some(v) = dict.get_item("distance")? {
        opts.cfg.distance = choice(
            "distance",
            v.extract()?,
            &[
                ("euclidean", DistanceTest::Euclidean),
                ("coordinate-wise", DistanceTest::CoordinateWise),
            ],
        )?;
    }
    if let Some(v) = dict.get_item("range")? {
        opts.cfg.range = choice(
            "range",
            v.extract()?,
            &[
                ("inclusive", CoefficientRange::Inclusive),
                ("inclusive-open-n2", CoefficientRange::InclusiveOpenN2),
                ("exclusive", CoefficientRange::Exclusive),
            ],
        )?;
    }
    if let Some(v) = dict.get_item("rotation")? {
        opts.cfg.rotation = choice(
            "rotation",
            v.extract()?,
            &[
                ("ccw", RotationSense::CounterClockwise),
                ("cw", RotationSense::Clockwise),
            ],
        )?;
    }
    if let Some(v) = dict.get_item("sweep_end")? {
        opts.boundary = choice(
            "sweep_end",
            v.extract()?,
            &[("closed", SweepBoundary::Closed), ("padded", SweepBoundary::Padded)],
        )?;
    }
    if let Some(v) = dict.get_item("parallel")? {
        opts.parallel = v.extract()?;
    }
    Ok(opts)
}

pub fn map_search_err(err: SearchError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

pub fn map_crystal_err(err: CrystalError) -> PyErr {
    match err {
        CrystalError::Io { .. } => PyIOError::new_err(err.to_string()),
        _ => PyValueError::new_err(err.to_string()),
    }
}

pub fn map_run_err(err: RunError) -> PyErr {
    match err {
        RunError::Load(LoadError::Missing { .. } | LoadError::Io(_)) | RunError::Output { .. } => {
            PyIOError::new_err(err.to_string())
        }
        _ => PyValueError::new_err(err.to_string()),
    }
}
