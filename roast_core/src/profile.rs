//! Finalization of a completed session into an immutable roast profile.

use crate::ror::{self, RateOfRise};
use crate::store::SampleStore;

/// Finalized roast record: equal-length channels, crack transition edges,
/// and the fitted derivative. Constructed once per session via
/// [`finalize`]; read-only to every consumer afterwards.
#[derive(Debug, Clone)]
pub struct RoastProfile {
    time: Vec<f64>,
    hot: Vec<f64>,
    cold: Vec<f64>,
    crack_edge: Vec<bool>,
    rate_of_rise: Option<RateOfRise>,
}

impl RoastProfile {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Sample times in seconds.
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// Hot-junction temperatures in °C.
    pub fn hot(&self) -> &[f64] {
        &self.hot
    }

    /// Cold-junction temperatures in °C.
    pub fn cold(&self) -> &[f64] {
        &self.cold
    }

    /// True at samples where the crack stage just changed.
    pub fn crack_edge(&self) -> &[bool] {
        &self.crack_edge
    }

    /// Derivative of the hot trace, when the fit was feasible.
    pub fn rate_of_rise(&self) -> Option<&RateOfRise> {
        self.rate_of_rise.as_ref()
    }

    /// Highest rate of rise over the sampled times, as (time, °C/s).
    pub fn peak_rate_of_rise(&self) -> Option<(f64, f64)> {
        let ror = self.rate_of_rise.as_ref()?;
        self.time
            .iter()
            .map(|&t| (t, ror.at(t)))
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }
}

/// Transition-edge flags for a crack stage sequence. An edge is only
/// knowable retrospectively, so it is attributed to the sample after the
/// reading that established it; the first element is always false.
pub(crate) fn crack_edges(crack: &[i32]) -> Vec<bool> {
    crack
        .iter()
        .enumerate()
        .map(|(i, &c)| i > 0 && crack[i - 1] != c)
        .collect()
}

/// Finalize a store into an immutable profile: trim ragged channel tails to
/// the crack-aligned length, derive crack edges, and attach the derivative.
///
/// Pure in the store contents: finalizing equal stores yields identical
/// sequences. A failed derivative fit is logged and leaves the profile
/// without one; the temperature data is never discarded.
pub fn finalize(store: SampleStore) -> RoastProfile {
    let n = store.completed_rounds();
    let time: Vec<f64> = store.time()[..n].iter().map(|&t| t as f64).collect();
    let hot = store.hot()[..n].to_vec();
    let cold = store.cold()[..n].to_vec();
    let crack_edge = crack_edges(&store.crack()[..n]);

    let rate_of_rise = if n >= 2 {
        match ror::fit(&time, &hot) {
            Ok(r) => Some(r),
            Err(e) => {
                tracing::warn!(error = %e, samples = n, "rate-of-rise unavailable for this profile");
                None
            }
        }
    } else {
        None
    };

    RoastProfile {
        time,
        hot,
        cold,
        crack_edge,
        rate_of_rise,
    }
}
