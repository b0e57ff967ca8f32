//! This crate implements Merge Non-Dominated Sorting (MNDS): a Pareto dominance ranking engine
//! which partitions a population of solutions into non-domination fronts.
//!
//! Besides batch ranking of a whole population, the engine supports a steady-state update when
//! exactly one solution is evicted and one is inserted. On top of the engine, the crate provides a
//! replacement which selects survivors of a joint population using ranking and a density estimator.
//!
//! All objectives are minimized.

#![warn(missing_docs)]

#[cfg(test)]
#[path = "../tests/helpers/mod.rs"]
#[macro_use]
pub mod helpers;

#[cfg(test)]
#[path = "../tests/discovery/mod.rs"]
mod discovery;

pub mod algorithms;
pub mod config;
pub mod density;
pub mod prelude;
pub mod replacement;
pub mod utils;

use crate::utils::Float;

/// Represents a solution which can be ranked by the engine.
///
/// The engine never copies or inspects solution payload: only objective values are read.
pub trait RankedSolution {
    /// Returns objective values, all of them are minimized.
    fn objectives(&self) -> &[Float];

    /// Sets a rank (front index) of the solution. Default implementation does nothing.
    fn set_rank(&mut self, _rank: usize) {}
}

impl RankedSolution for Vec<Float> {
    fn objectives(&self) -> &[Float] {
        self.as_slice()
    }
}
