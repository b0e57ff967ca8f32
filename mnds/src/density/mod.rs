//! This module contains density estimators used to prefer solutions from less crowded regions of
//! objective space when a front has to be truncated.

mod crowding_distance;
pub use self::crowding_distance::CrowdingDistance;

use crate::utils::{Float, compare_floats};
use std::cmp::Ordering;

/// Estimates density of solutions inside of one front.
pub trait DensityEstimator<S> {
    /// Returns a density value for each solution in the same order as given.
    fn estimate(&self, solutions: &[&S]) -> Vec<Float>;

    /// Compares two density values: `Ordering::Less` means that the first one is preferred.
    /// Default implementation prefers larger values.
    fn compare(&self, a: Float, b: Float) -> Ordering {
        compare_floats(b, a)
    }
}
