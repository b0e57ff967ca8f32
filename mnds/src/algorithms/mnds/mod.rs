//! This module contains an implementation of Merge Non-Dominated Sorting.
//!
//! The algorithm sorts population once per objective and keeps for every solution a bit-vector of
//! solutions which precede it in all objective orders seen so far. Such solutions are exactly its
//! dominators after the last objective pass, so the rank is one more than the highest rank of them.
//!
//! See "Merge Non-Dominated Sorting Algorithm for Many-Objective Optimization" by J. Moreno et al.

mod bitset;
pub use self::bitset::DominanceBitset;

mod engine;
pub use self::engine::MergeNonDominatedSort;

mod index;
pub use self::index::DominanceBitsetIndex;

mod ranking;
pub use self::ranking::{Ranking, RankingStatistics};

mod snapshot;
pub use self::snapshot::PopulationSnapshot;

mod sorter;
pub use self::sorter::{DEFAULT_INSERTION_THRESHOLD, ObjectiveSorter};

mod steady_state;
pub use self::steady_state::SteadyStateUpdater;
