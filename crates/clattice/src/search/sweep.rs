//! Angle sweep sampling.
//!
//! Samples are `start + i·step`, never accumulated, so the count depends only
//! on the inputs and not on rounding drift.

use super::types::SearchError;

/// Relative slack (in units of `step`) applied at the sweep end.
const SWEEP_SLACK: f64 = 1e-9;

/// Upper bound on the number of samples a sweep may have.
pub const MAX_SAMPLES: usize = 1 << 24;

/// Which end condition bounds the sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SweepBoundary {
    /// Keep samples with `angle ≤ end`.
    #[default]
    Closed,
    /// Keep samples with `angle < end + step`; may overshoot `end` by less than a step.
    Padded,
}

/// Ordered, finite sequence of rotation angles in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepSpec {
    pub start: f64,
    pub end: f64,
    pub step: f64,
    pub boundary: SweepBoundary,
}

impl SweepSpec {
    pub fn new(start: f64, end: f64, step: f64) -> Self {
        Self {
            start,
            end,
            step,
            boundary: SweepBoundary::default(),
        }
    }

    pub fn with_boundary(mut self, boundary: SweepBoundary) -> Self {
        self.boundary = boundary;
        self
    }

    /// A sweep of exactly one angle.
    pub fn single(angle: f64) -> Self {
        Self::new(angle, angle, 1.0)
    }

    /// Sample count as a float, before any range check.
    fn raw_count(&self) -> f64 {
        let span = (self.end - self.start) / self.step;
        match self.boundary {
            SweepBoundary::Closed => (span + SWEEP_SLACK).floor() + 1.0,
            SweepBoundary::Padded => (span + 1.0 - SWEEP_SLACK).ceil(),
        }
    }

    /// Number of samples; zero for malformed sweeps and for sweeps longer
    /// than [`MAX_SAMPLES`].
    pub fn len(&self) -> usize {
        if !(self.start.is_finite() && self.end.is_finite() && self.step.is_finite())
            || self.step <= 0.0
        {
            return 0;
        }
        let count = self.raw_count();
        if (1.0..=MAX_SAMPLES as f64).contains(&count) {
            count as usize
        } else {
            0
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `i`-th sample.
    #[inline]
    pub fn angle(&self, i: usize) -> f64 {
        self.start + i as f64 * self.step
    }

    pub fn angles(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len()).map(move |i| self.angle(i))
    }

    pub fn validate(&self) -> Result<(), SearchError> {
        if !(self.start.is_finite() && self.end.is_finite() && self.step.is_finite()) {
            return Err(SearchError::invalid("sweep bounds and step must be finite"));
        }
        if self.step <= 0.0 {
            return Err(SearchError::invalid(format!(
                "angle step must be > 0, got {}",
                self.step
            )));
        }
        let count = self.raw_count();
        if !count.is_finite() || count > MAX_SAMPLES as f64 {
            return Err(SearchError::invalid(format!(
                "angle sweep {}..{} by {} exceeds {MAX_SAMPLES} samples",
                self.start, self.end, self.step
            )));
        }
        if self.is_empty() {
            return Err(SearchError::invalid(format!(
                "empty angle sweep: start {} > end {}",
                self.start, self.end
            )));
        }
        Ok(())
    }
}
