//! Rate-of-rise estimation.
//!
//! Fits a spline to the (time, hot) series and exposes the analytic
//! derivative, used both for live redraw during acquisition and for the
//! final profile.

use crate::spline::{BSpline, SplineError};
use thiserror::Error;

/// Degree of the primary interpolating fit.
const FIT_DEGREE: usize = 4;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FitError {
    #[error("need at least 2 samples, got {0}")]
    TooFewSamples(usize),
    #[error("time and temperature lengths differ ({time} vs {temp})")]
    LengthMismatch { time: usize, temp: usize },
    #[error("time must be strictly increasing (violated at index {0})")]
    NonMonotonicTime(usize),
    #[error("non-finite sample at index {0}")]
    NonFinite(usize),
    #[error(transparent)]
    Spline(#[from] SplineError),
}

/// Derivative evaluator for the hot-junction trace, in °C per second.
#[derive(Debug, Clone)]
pub struct RateOfRise {
    deriv: BSpline,
    t_min: f64,
    t_max: f64,
}

impl RateOfRise {
    /// Evaluate at time `t` (seconds), clamped to the fitted domain.
    pub fn at(&self, t: f64) -> f64 {
        self.deriv.value(t.clamp(self.t_min, self.t_max))
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.t_min, self.t_max)
    }
}

/// Fit the hot-junction series and return its derivative evaluator.
///
/// The primary fit interpolates with a degree-4 spline. When that is
/// infeasible (too few points, or a singular collocation system) the fit
/// relaxes to an unconstrained least-squares spline of degree
/// `min(4, n - 1)` instead of failing: live visualization tolerates a
/// looser fit better than a crash. Errors are reserved for inputs the
/// caller must gate on: fewer than 2 samples, mismatched lengths,
/// non-finite values, or non-increasing time.
pub fn fit(time: &[f64], hot: &[f64]) -> Result<RateOfRise, FitError> {
    let n = time.len();
    if hot.len() != n {
        return Err(FitError::LengthMismatch {
            time: n,
            temp: hot.len(),
        });
    }
    if n < 2 {
        return Err(FitError::TooFewSamples(n));
    }
    for (i, (&t, &h)) in time.iter().zip(hot).enumerate() {
        if !t.is_finite() || !h.is_finite() {
            return Err(FitError::NonFinite(i));
        }
        if i > 0 && t <= time[i - 1] {
            return Err(FitError::NonMonotonicTime(i));
        }
    }

    let spline = match BSpline::interpolate(time, hot, FIT_DEGREE) {
        Ok(s) => s,
        Err(e) => {
            tracing::debug!(error = %e, samples = n, "interpolating fit infeasible, relaxing to least squares");
            BSpline::least_squares(time, hot, FIT_DEGREE.min(n - 1))?
        }
    };
    Ok(RateOfRise {
        deriv: spline.derivative(),
        t_min: time[0],
        t_max: time[n - 1],
    })
}
