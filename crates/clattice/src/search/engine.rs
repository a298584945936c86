//! The O(S·N⁴) coincidence loop.

use nalgebra::Vector2;

use crate::lattice::LatticeBasis;

use super::sweep::SweepSpec;
use super::types::{
    AngleSolutions, CancelToken, CoefficientQuadruple, DistanceTest, SearchCfg, SearchError,
};

/// A lattice point with its coefficients and cached norm.
#[derive(Clone, Copy, Debug)]
struct GridPoint {
    c1: i32,
    c2: i32,
    p: Vector2<f64>,
    norm: f64,
}

/// All points `c1·e1 + c2·e2` over the given ranges, `c1` outermost.
fn lattice_grid(
    basis: &LatticeBasis,
    r1: std::ops::RangeInclusive<i32>,
    r2: std::ops::RangeInclusive<i32>,
) -> Vec<GridPoint> {
    let mut out = Vec::new();
    for c1 in r1 {
        for c2 in r2.clone() {
            let p = basis.point(c1, c2);
            out.push(GridPoint {
                c1,
                c2,
                p,
                norm: p.norm(),
            });
        }
    }
    out
}

#[inline]
fn coincides(a: &GridPoint, b: &GridPoint, cfg: &SearchCfg) -> bool {
    let norm = a.norm.min(b.norm);
    let d = a.p - b.p;
    let close = match cfg.distance {
        DistanceTest::CoordinateWise => {
            d.x.abs() / norm < cfg.tolerance && d.y.abs() / norm < cfg.tolerance
        }
        DistanceTest::Euclidean => d.norm() / norm < cfg.tolerance,
    };
    if !close {
        return false;
    }
    match cfg.angle_tolerance {
        None => true,
        Some(max_deg) => {
            // Rounding can push the cosine slightly outside [-1, 1].
            let cos = (a.p.dot(&b.p) / (a.norm * b.norm)).clamp(-1.0, 1.0);
            cos.acos().to_degrees().abs() < max_deg.abs()
        }
    }
}

/// Scans one angle against a precomputed, zero-free A grid.
fn scan(
    a_grid: &[GridPoint],
    b: &LatticeBasis,
    angle_deg: f64,
    cfg: &SearchCfg,
) -> Vec<CoefficientQuadruple> {
    let (n_range, n2_range) = cfg.range.bounds(cfg.nmax);
    let rotated = b.rotated(&cfg.rotation.matrix(angle_deg.to_radians()));
    let mut b_grid = lattice_grid(&rotated, n_range, n2_range);
    b_grid.retain(|g| g.norm > 0.0);

    let mut found = Vec::new();
    for pa in a_grid {
        for pb in &b_grid {
            if coincides(pa, pb, cfg) {
                found.push(CoefficientQuadruple::new(pa.c1, pa.c2, pb.c1, pb.c2));
            }
        }
    }
    tracing::debug!(angle = angle_deg, solutions = found.len(), "angle scanned");
    found
}

fn a_grid_for(a: &LatticeBasis, cfg: &SearchCfg) -> Vec<GridPoint> {
    let (m_range, _) = cfg.range.bounds(cfg.nmax);
    let mut grid = lattice_grid(a, m_range.clone(), m_range);
    grid.retain(|g| g.norm > 0.0);
    grid
}

fn validate_inputs(
    a: &LatticeBasis,
    b: &LatticeBasis,
    sweep: &SweepSpec,
    cfg: &SearchCfg,
) -> Result<(), SearchError> {
    cfg.validate()?;
    sweep.validate()?;
    if !(a.is_finite() && b.is_finite()) {
        return Err(SearchError::invalid("lattice basis vectors must be finite"));
    }
    Ok(())
}

/// Quadruples coinciding at a single angle (degrees).
pub fn solve_angle(
    a: &LatticeBasis,
    b: &LatticeBasis,
    angle_deg: f64,
    cfg: &SearchCfg,
) -> Result<Vec<CoefficientQuadruple>, SearchError> {
    validate_inputs(a, b, &SweepSpec::single(angle_deg), cfg)?;
    Ok(scan(&a_grid_for(a, cfg), b, angle_deg, cfg))
}

/// Lazy per-angle search; yields one block per sweep sample, in order.
///
/// Stops early (yielding nothing further) once its `CancelToken` fires.
#[derive(Clone, Debug)]
pub struct CoincidenceSearch {
    b: LatticeBasis,
    sweep: SweepSpec,
    cfg: SearchCfg,
    a_grid: Vec<GridPoint>,
    next: usize,
    len: usize,
    cancel: Option<CancelToken>,
    cancelled: bool,
}

impl CoincidenceSearch {
    /// Attach a cancellation token, checked before each angle.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn sweep(&self) -> &SweepSpec {
        &self.sweep
    }

    pub fn cfg(&self) -> &SearchCfg {
        &self.cfg
    }

    /// True if iteration ended because of cancellation.
    pub fn was_cancelled(&self) -> bool {
        self.cancelled
    }
}

impl Iterator for CoincidenceSearch {
    type Item = AngleSolutions;

    fn next(&mut self) -> Option<AngleSolutions> {
        if self.next >= self.len || self.cancelled {
            return None;
        }
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            self.cancelled = true;
            return None;
        }
        let angle = self.sweep.angle(self.next);
        self.next += 1;
        let solutions = scan(&self.a_grid, &self.b, angle, &self.cfg);
        Some(AngleSolutions { angle, solutions })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.cancelled {
            return (0, Some(0));
        }
        let rest = self.len - self.next;
        (0, Some(rest))
    }
}

/// Validates inputs and returns the lazy search.
///
/// Nothing is computed beyond the A grid until the iterator is polled.
pub fn search(
    a: &LatticeBasis,
    b: &LatticeBasis,
    sweep: &SweepSpec,
    cfg: &SearchCfg,
) -> Result<CoincidenceSearch, SearchError> {
    validate_inputs(a, b, sweep, cfg)?;
    let len = sweep.len();
    tracing::debug!(
        samples = len,
        nmax = cfg.nmax,
        tolerance = cfg.tolerance,
        "coincidence search"
    );
    Ok(CoincidenceSearch {
        b: *b,
        sweep: *sweep,
        cfg: *cfg,
        a_grid: a_grid_for(a, cfg),
        next: 0,
        len,
        cancel: None,
        cancelled: false,
    })
}

/// Runs the whole sweep sequentially and collects every block.
pub fn search_all(
    a: &LatticeBasis,
    b: &LatticeBasis,
    sweep: &SweepSpec,
    cfg: &SearchCfg,
    cancel: Option<&CancelToken>,
) -> Result<Vec<AngleSolutions>, SearchError> {
    let mut it = search(a, b, sweep, cfg)?;
    if let Some(token) = cancel {
        it = it.with_cancel(token.clone());
    }
    let out: Vec<_> = it.by_ref().collect();
    if it.was_cancelled() {
        return Err(SearchError::Cancelled);
    }
    Ok(out)
}

/// Parallel sweep: angles are scanned on the rayon pool and merged in sweep order.
#[cfg(feature = "parallel")]
pub fn search_par(
    a: &LatticeBasis,
    b: &LatticeBasis,
    sweep: &SweepSpec,
    cfg: &SearchCfg,
    cancel: Option<&CancelToken>,
) -> Result<Vec<AngleSolutions>, SearchError> {
    use rayon::prelude::*;

    validate_inputs(a, b, sweep, cfg)?;
    let a_grid = a_grid_for(a, cfg);
    let blocks: Vec<Option<AngleSolutions>> = (0..sweep.len())
        .into_par_iter()
        .map(|i| {
            if cancel.is_some_and(CancelToken::is_cancelled) {
                return None;
            }
            let angle = sweep.angle(i);
            Some(AngleSolutions {
                angle,
                solutions: scan(&a_grid, b, angle, cfg),
            })
        })
        .collect();
    blocks
        .into_iter()
        .collect::<Option<Vec<_>>>()
        .ok_or(SearchError::Cancelled)
}
