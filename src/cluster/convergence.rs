//! Stopping rules.
//!
//! Both variants stop once the relative change between successive centroid
//! matrices drops to the tolerance:
//!
//! ```text
//! error = ‖next − current‖₂ / ‖current‖₂
//! ```
//!
//! over the flattened matrices. Mini-batch fits also watch the batch inertia
//! and give up after it fails to beat its best value for more than
//! `max_no_improve` consecutive iterations.

use core::fmt;

use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Lifecycle of a fit call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitState {
    /// Choosing the starting centroids.
    Initializing,
    /// Running assignment/update iterations.
    Iterating,
    /// Relative error fell to the tolerance.
    Converged,
    /// Iteration budget spent before converging.
    MaxIterExhausted,
    /// Mini-batch inertia stopped improving.
    EarlyStopped,
}

impl FitState {
    /// True for the three states a finished fit can end in.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            FitState::Converged | FitState::MaxIterExhausted | FitState::EarlyStopped
        )
    }
}

impl fmt::Display for FitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FitState::Initializing => "initializing",
            FitState::Iterating => "iterating",
            FitState::Converged => "converged",
            FitState::MaxIterExhausted => "max_iter_exhausted",
            FitState::EarlyStopped => "early_stopped",
        };
        f.write_str(s)
    }
}

/// Reject tolerances that are not strictly positive and finite.
pub(crate) fn check_tolerance(tol: f64) -> Result<()> {
    if tol > 0.0 && tol.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidParameter {
            name: "tol",
            message: "must be finite and greater than zero",
        })
    }
}

/// Relative Frobenius change from `current` to `next`.
///
/// When `current` is all zeros the ratio is undefined; equal matrices give
/// 0 and anything else gives +∞.
pub fn relative_error(current: ArrayView2<'_, f64>, next: ArrayView2<'_, f64>) -> f64 {
    debug_assert_eq!(current.dim(), next.dim());

    let diff = current
        .iter()
        .zip(next.iter())
        .map(|(a, b)| (a - b) * (a - b))
        .sum::<f64>()
        .sqrt();
    let norm = current.iter().map(|a| a * a).sum::<f64>().sqrt();

    if norm == 0.0 {
        if diff == 0.0 {
            0.0
        } else {
            f64::INFINITY
        }
    } else {
        diff / norm
    }
}

/// Best-inertia tracker with a patience counter.
#[derive(Debug, Clone)]
pub struct NoImprovement {
    patience: usize,
    best: Option<(usize, f64)>,
    stalled: usize,
}

impl NoImprovement {
    /// Stop after more than `patience` consecutive non-improving iterations.
    pub fn new(patience: usize) -> Self {
        Self {
            patience,
            best: None,
            stalled: 0,
        }
    }

    /// Record the inertia of `iteration`. Returns `true` when the fit should
    /// stop.
    pub fn observe(&mut self, iteration: usize, inertia: f64) -> bool {
        match self.best {
            Some((_, best)) if inertia >= best => self.stalled += 1,
            _ => {
                self.best = Some((iteration, inertia));
                self.stalled = 0;
            }
        }
        self.stalled > self.patience
    }

    /// Lowest inertia seen so far and the iteration it came from.
    pub fn best(&self) -> Option<(usize, f64)> {
        self.best
    }

    /// Consecutive iterations without improvement.
    pub fn stalled(&self) -> usize {
        self.stalled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_relative_error() {
        let a = array![[3.0, 0.0], [0.0, 4.0]];
        let b = array![[3.0, 0.0], [0.0, 4.5]];
        assert!((relative_error(a.view(), b.view()) - 0.1).abs() < 1e-12);
        assert_eq!(relative_error(a.view(), a.view()), 0.0);
    }

    #[test]
    fn test_relative_error_from_zero() {
        let zero = array![[0.0, 0.0]];
        let one = array![[1.0, 0.0]];
        assert_eq!(relative_error(zero.view(), zero.view()), 0.0);
        assert_eq!(relative_error(zero.view(), one.view()), f64::INFINITY);
    }

    #[test]
    fn test_no_improvement_patience() {
        let mut tracker = NoImprovement::new(2);
        assert!(!tracker.observe(0, 10.0));
        assert!(!tracker.observe(1, 8.0));
        assert!(!tracker.observe(2, 9.0));
        assert!(!tracker.observe(3, 8.0));
        // Third consecutive miss exceeds patience 2.
        assert!(tracker.observe(4, 8.5));
        assert_eq!(tracker.best(), Some((1, 8.0)));
        assert_eq!(tracker.stalled(), 3);
    }

    #[test]
    fn test_improvement_resets_counter() {
        let mut tracker = NoImprovement::new(1);
        assert!(!tracker.observe(0, 5.0));
        assert!(!tracker.observe(1, 6.0));
        assert!(!tracker.observe(2, 4.0));
        assert_eq!(tracker.stalled(), 0);
        assert!(!tracker.observe(3, 4.0));
        assert!(tracker.observe(4, 4.0));
    }

    #[test]
    fn test_zero_patience_stops_on_first_miss() {
        let mut tracker = NoImprovement::new(0);
        assert!(!tracker.observe(0, 1.0));
        assert!(tracker.observe(1, 1.0));
    }

    #[test]
    fn test_check_tolerance() {
        assert!(check_tolerance(1e-8).is_ok());
        assert!(check_tolerance(0.0).is_err());
        assert!(check_tolerance(-1.0).is_err());
        assert!(check_tolerance(f64::NAN).is_err());
        assert!(check_tolerance(f64::INFINITY).is_err());
    }

    #[test]
    fn test_terminal_states() {
        assert!(!FitState::Initializing.is_terminal());
        assert!(!FitState::Iterating.is_terminal());
        assert!(FitState::Converged.is_terminal());
        assert!(FitState::MaxIterExhausted.is_terminal());
        assert!(FitState::EarlyStopped.is_terminal());
        assert_eq!(FitState::MaxIterExhausted.to_string(), "max_iter_exhausted");
    }
}
