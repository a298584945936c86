//! Configuration, result and error types of the coincidence search.

use std::fmt;
use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::lattice::RotationSense;

/// Integer multipliers of one candidate pairing: `A·(m1, m2) ≈ R(θ)·B·(n1, n2)`.
///
/// Field order matches the loop nesting, so the derived `Ord` is the
/// iteration order of the search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CoefficientQuadruple {
    pub m1: i32,
    pub m2: i32,
    pub n1: i32,
    pub n2: i32,
}

impl CoefficientQuadruple {
    #[inline]
    pub fn new(m1: i32, m2: i32, n1: i32, n2: i32) -> Self {
        Self { m1, m2, n1, n2 }
    }

    #[inline]
    pub fn m(&self) -> (i32, i32) {
        (self.m1, self.m2)
    }

    #[inline]
    pub fn n(&self) -> (i32, i32) {
        (self.n1, self.n2)
    }
}

impl From<(i32, i32, i32, i32)> for CoefficientQuadruple {
    fn from(q: (i32, i32, i32, i32)) -> Self {
        Self::new(q.0, q.1, q.2, q.3)
    }
}

impl fmt::Display for CoefficientQuadruple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.m1, self.m2, self.n1, self.n2)
    }
}

/// All quadruples accepted at one sampled angle (degrees), in iteration order.
#[derive(Clone, Debug, PartialEq)]
pub struct AngleSolutions {
    pub angle: f64,
    pub solutions: Vec<CoefficientQuadruple>,
}

/// Distance criterion between `A·m` and `R(θ)·B·n`, relative to the smaller norm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DistanceTest {
    /// `|Δx|/norm < tol` and `|Δy|/norm < tol`.
    CoordinateWise,
    /// `|Δ|/norm < tol`.
    #[default]
    Euclidean,
}

/// Integer range convention for the four coefficients.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CoefficientRange {
    /// All four in `[−N, N)`.
    Exclusive,
    /// `m1, m2, n1` in `[−N, N]`, `n2` in `[−N, N)`.
    InclusiveOpenN2,
    /// All four in `[−N, N]`.
    #[default]
    Inclusive,
}

impl CoefficientRange {
    /// Ranges for `(m1, m2, n1)`, and for `n2`.
    ///
    /// A negative `nmax` is treated as 0.
    pub fn bounds(self, nmax: i32) -> (RangeInclusive<i32>, RangeInclusive<i32>) {
        let n = nmax.max(0);
        let closed = -n..=n;
        let open = -n..=n - 1;
        match self {
            CoefficientRange::Exclusive => (open.clone(), open),
            CoefficientRange::InclusiveOpenN2 => (closed, open),
            CoefficientRange::Inclusive => (closed.clone(), closed),
        }
    }
}

/// Search parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchCfg {
    /// Search radius; coefficients stay within `[−nmax, nmax]`.
    pub nmax: i32,
    /// Relative distance tolerance (dimensionless).
    pub tolerance: f64,
    /// Maximum angle in degrees between `A·m` and `R(θ)·B·n`; sign ignored.
    pub angle_tolerance: Option<f64>,
    pub distance: DistanceTest,
    pub range: CoefficientRange,
    pub rotation: RotationSense,
}

impl Default for SearchCfg {
    fn default() -> Self {
        Self {
            nmax: 7,
            tolerance: 0.02,
            angle_tolerance: None,
            distance: DistanceTest::default(),
            range: CoefficientRange::default(),
            rotation: RotationSense::default(),
        }
    }
}

impl SearchCfg {
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.nmax < 0 {
            return Err(SearchError::invalid(format!(
                "nmax must be >= 0, got {}",
                self.nmax
            )));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(SearchError::invalid(format!(
                "tolerance must be finite and > 0, got {}",
                self.tolerance
            )));
        }
        if let Some(at) = self.angle_tolerance {
            if !at.is_finite() || at == 0.0 {
                return Err(SearchError::invalid(format!(
                    "angle tolerance must be finite and non-zero, got {at}"
                )));
            }
        }
        Ok(())
    }
}

/// Cooperative cancellation flag, checked between angle samples.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Errors of the search entry points.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchError {
    InvalidParams { reason: String },
    Cancelled,
}

impl SearchError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidParams {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParams { reason } => write!(f, "invalid search parameters: {reason}"),
            Self::Cancelled => write!(f, "search cancelled"),
        }
    }
}

impl std::error::Error for SearchError {}
