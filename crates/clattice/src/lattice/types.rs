//! Lattice basis and rotation convention.

use nalgebra::{Matrix2, Vector2};

/// Two primitive vectors `(e1, e2)` of a 2D lattice.
///
/// Invariants:
/// - Immutable once built; search code only reads it.
/// - No reduction or orientation normalization is applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatticeBasis {
    pub e1: Vector2<f64>,
    pub e2: Vector2<f64>,
}

impl LatticeBasis {
    #[inline]
    pub fn new(e1: Vector2<f64>, e2: Vector2<f64>) -> Self {
        Self { e1, e2 }
    }

    /// Basis from a matrix whose columns are `e1` and `e2`.
    #[inline]
    pub fn from_columns(m: Matrix2<f64>) -> Self {
        Self {
            e1: m.column(0).into_owned(),
            e2: m.column(1).into_owned(),
        }
    }

    /// Matrix `[e1 e2]` (the A or B matrix of eq. 11).
    #[inline]
    pub fn matrix(&self) -> Matrix2<f64> {
        Matrix2::from_columns(&[self.e1, self.e2])
    }

    /// Lattice point `m1·e1 + m2·e2`.
    #[inline]
    pub fn point(&self, m1: i32, m2: i32) -> Vector2<f64> {
        self.e1 * f64::from(m1) + self.e2 * f64::from(m2)
    }

    /// Applies `rot` to both basis vectors.
    #[inline]
    pub fn rotated(&self, rot: &Matrix2<f64>) -> Self {
        Self {
            e1: rot * self.e1,
            e2: rot * self.e2,
        }
    }

    /// Unit-cell area `|det [e1 e2]|`.
    #[inline]
    pub fn cell_area(&self) -> f64 {
        (self.e1.x * self.e2.y - self.e1.y * self.e2.x).abs()
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.e1.iter().chain(self.e2.iter()).all(|v| v.is_finite())
    }

    pub fn square(a: f64) -> Self {
        Self::rectangular(a, a)
    }

    pub fn rectangular(ax: f64, ay: f64) -> Self {
        Self::new(Vector2::new(ax, 0.0), Vector2::new(0.0, ay))
    }

    /// Hexagonal lattice with `e2` at 60° from `e1`.
    pub fn hexagonal(a: f64) -> Self {
        Self::oblique(a, a, 60.0)
    }

    /// `e1 = (a1, 0)`, `e2 = a2·(cos γ, sin γ)` with `gamma_deg` in degrees.
    pub fn oblique(a1: f64, a2: f64, gamma_deg: f64) -> Self {
        let g = gamma_deg.to_radians();
        Self::new(Vector2::new(a1, 0.0), Vector2::new(a2 * g.cos(), a2 * g.sin()))
    }
}

/// Sense in which lattice B is rotated by the sweep angle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RotationSense {
    /// Standard `[[cos, −sin], [sin, cos]]`.
    #[default]
    CounterClockwise,
    /// `[[cos, sin], [−sin, cos]]` as written in eq. 10 of the reference paper.
    Clockwise,
}

impl RotationSense {
    /// Rotation matrix for `theta` in radians.
    #[inline]
    pub fn matrix(self, theta: f64) -> Matrix2<f64> {
        let (s, c) = theta.sin_cos();
        match self {
            RotationSense::CounterClockwise => Matrix2::new(c, -s, s, c),
            RotationSense::Clockwise => Matrix2::new(c, s, -s, c),
        }
    }
}
