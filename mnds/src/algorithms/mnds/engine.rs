#[cfg(test)]
#[path = "../../../tests/unit/algorithms/mnds/engine_test.rs"]
mod engine_test;

use super::index::DominanceBitsetIndex;
use super::ranking::{Ranking, RankingStatistics};
use super::snapshot::PopulationSnapshot;
use super::sorter::ObjectiveSorter;
use super::steady_state::SteadyStateUpdater;
use crate::RankedSolution;
use crate::config::{RankingConfig, validate_insertion_threshold};
use crate::utils::{Float, GenericResult};
use std::cmp::Ordering;

/// Implements Merge Non-Dominated Sorting: a non-dominated sorting algorithm which establishes
/// dominance relations by sorting population once per objective and intersecting per solution
/// bit-vectors of solutions visited so far.
///
/// The engine supports two modes:
/// - batch ranking of a whole population, see [`MergeNonDominatedSort::compute_ranking`];
/// - steady-state ranking update after exactly one solution is replaced by a new one,
///   see [`MergeNonDominatedSort::replace`].
///
/// The engine is single threaded: each call runs to completion mutating internal arrays.
pub struct MergeNonDominatedSort {
    config: RankingConfig,
    state: Option<SortState>,
    ranking: Ranking,
}

/// Keeps engine state between the batch ranking and following steady-state updates.
pub(super) struct SortState {
    pub snapshot: PopulationSnapshot,
    pub index: DominanceBitsetIndex,
    pub sorter: ObjectiveSorter,
    pub updater: Option<SteadyStateUpdater>,
}

impl Default for MergeNonDominatedSort {
    fn default() -> Self {
        Self::new(RankingConfig::default())
    }
}

impl MergeNonDominatedSort {
    /// Creates a new instance of `MergeNonDominatedSort`.
    pub fn new(config: RankingConfig) -> Self {
        Self { config, state: None, ranking: Ranking::default() }
    }

    /// Returns engine configuration.
    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// Ranks the whole population from scratch. Each solution is referenced in the result by its
    /// position in `solutions`. Arrays allocated by the previous batch ranking are reused.
    pub fn compute_ranking<S: RankedSolution>(&mut self, solutions: &[S]) -> GenericResult<&Ranking> {
        validate_insertion_threshold(self.config.insertion_threshold)?;

        if solutions.is_empty() {
            self.clear();
            return Ok(&self.ranking);
        }

        let mut state = match self.state.take() {
            Some(mut state) => {
                state.reset(solutions)?;
                state
            }
            None => SortState::new(solutions, self.config.insertion_threshold)?,
        };
        let size = state.snapshot.size();

        let early_detections = state.rank_population(self.config.early_detection);
        let statistics =
            RankingStatistics { comparisons: state.sorter.comparisons(), early_detections, recomputed_ranks: size };

        self.ranking = Ranking::new(state.ranks(), statistics);

        self.config.log(|| {
            format!(
                "batch ranking of {size} solutions: {} fronts, {} duplicates, {early_detections} early detections",
                self.ranking.fronts_count(),
                state.snapshot.duplicates().len(),
            )
        });

        self.state = Some(state);

        Ok(&self.ranking)
    }

    /// Replaces solution in given slot with a new one and updates ranking incrementally.
    /// Requires a prior batch ranking.
    pub fn replace<S: RankedSolution>(&mut self, slot: usize, solution: &S) -> GenericResult<&Ranking> {
        let state =
            self.state.as_mut().ok_or_else(|| "steady-state update requires batch ranking first".to_string())?;

        let size = state.snapshot.size();
        if slot >= size {
            return Err(format!("invalid slot: {slot}, population size is {size}").into());
        }

        let objectives_count = state.snapshot.objectives_count();
        if solution.objectives().len() != objectives_count {
            return Err(format!(
                "new solution has {} objectives, expected {objectives_count}",
                solution.objectives().len()
            )
            .into());
        }

        let comparisons_before =
            state.sorter.comparisons() + state.updater.as_ref().map_or(0, |updater| updater.comparisons());

        let updater =
            state.updater.get_or_insert_with(|| SteadyStateUpdater::new(&state.snapshot, &mut state.sorter));
        let recomputed_ranks = updater.replace(&mut state.snapshot, &mut state.index, slot, solution.objectives());

        let statistics = RankingStatistics {
            comparisons: state.sorter.comparisons() + updater.comparisons() - comparisons_before,
            early_detections: 0,
            recomputed_ranks,
        };

        self.ranking = Ranking::new(state.ranks(), statistics);

        Ok(&self.ranking)
    }

    /// Returns the last computed ranking.
    pub fn ranking(&self) -> &Ranking {
        &self.ranking
    }

    /// Returns objective values kept for the solution in given slot.
    pub fn objectives(&self, slot: usize) -> Option<&[Float]> {
        self.state.as_ref().filter(|state| slot < state.snapshot.size()).map(|state| state.snapshot.objectives(slot))
    }

    /// Returns slots of solutions known to dominate the solution in given slot.
    pub fn dominators(&self, slot: usize) -> Vec<usize> {
        self.state
            .as_ref()
            .filter(|state| slot < state.snapshot.size())
            .map(|state| {
                let ordinal = state.snapshot.ordinal(slot);
                let mut slots =
                    state.index.dominators(ordinal).iter().map(|other| state.snapshot.slot(other)).collect::<Vec<_>>();
                slots.sort_unstable();

                slots
            })
            .unwrap_or_default()
    }

    /// Returns `(duplicate, canonical)` slot pairs of solutions with identical objective values.
    pub fn duplicates(&self) -> Vec<(usize, usize)> {
        self.state.as_ref().map_or_else(Vec::new, |state| {
            let mut duplicates = state
                .snapshot
                .duplicates()
                .into_iter()
                .map(|(duplicate, canonical)| (state.snapshot.slot(duplicate), state.snapshot.slot(canonical)))
                .collect::<Vec<_>>();
            duplicates.sort_unstable();

            duplicates
        })
    }

    /// Checks whether the engine keeps a population snapshot usable for steady-state updates.
    pub fn has_snapshot(&self) -> bool {
        self.state.is_some()
    }

    /// Releases population snapshot, dominance bit-vectors and the last ranking.
    pub fn clear(&mut self) {
        self.state = None;
        self.ranking = Ranking::default();
    }
}

impl SortState {
    fn new<S: RankedSolution>(solutions: &[S], threshold: usize) -> GenericResult<Self> {
        let snapshot = PopulationSnapshot::new(solutions)?;
        let size = snapshot.size();

        Ok(Self {
            snapshot,
            index: DominanceBitsetIndex::new(size),
            sorter: ObjectiveSorter::new(threshold, size)?,
            updater: None,
        })
    }

    /// Prepares state for a new population keeping allocated arrays.
    fn reset<S: RankedSolution>(&mut self, solutions: &[S]) -> GenericResult<()> {
        self.snapshot.reset(solutions)?;

        let size = self.snapshot.size();
        self.index.reset(size);
        self.sorter.reset(size);
        self.updater = None;

        Ok(())
    }

    /// Runs objective passes and assigns ranks. Returns amount of early detections.
    fn rank_population(&mut self, early_detection: bool) -> u64 {
        let mut early_detections = 0;

        self.sort_first_objective();

        let has_dominance = self.sort_second_objective();
        if !has_dominance {
            early_detections += 1;
        }

        if has_dominance || !early_detection {
            early_detections += self.sort_rest_objectives(early_detection);
        }

        self.patch_duplicates();

        early_detections
    }

    /// Sorts population lexicographically, assigns ordinals and detects duplicates.
    fn sort_first_objective(&mut self) {
        let objectives_count = self.snapshot.objectives_count();

        self.sorter.sort(&self.snapshot, 0, objectives_count);
        self.snapshot.assign_ordinals(self.sorter.order());

        for ordinal in 1..self.snapshot.size() {
            let (previous, current) = (self.snapshot.slot(ordinal - 1), self.snapshot.slot(ordinal));
            if self.sorter.compare(&self.snapshot, previous, current, 0, objectives_count) == Ordering::Equal {
                self.snapshot.add_duplicate(ordinal, ordinal - 1);
            }
        }
    }

    /// Seeds dominance bit-vectors in the joint order of the first two objectives.
    /// Returns true if at least one solution is dominated.
    fn sort_second_objective(&mut self) -> bool {
        let is_last = self.snapshot.objectives_count() == 2;
        let mut has_dominance = false;

        self.sorter.sort(&self.snapshot, 1, 2);

        for &slot in self.sorter.order() {
            let ordinal = self.snapshot.ordinal(slot);
            if self.snapshot.is_duplicate(ordinal) {
                continue;
            }

            has_dominance |= self.index.initialize(ordinal);
            self.index.visit(ordinal);

            if is_last {
                self.index.compute_rank(ordinal);
            }
        }

        has_dominance
    }

    /// Intersects dominance bit-vectors with each remaining objective order and computes ranks
    /// during the last one. Returns amount of early detections.
    fn sort_rest_objectives(&mut self, early_detection: bool) -> u64 {
        let objectives_count = self.snapshot.objectives_count();
        let mut early_detections = 0;

        for objective in 2..objectives_count {
            let is_last = objective + 1 == objectives_count;

            // the order is the same as in previous objective, so dominance cannot change
            if self.sorter.sort(&self.snapshot, objective, objective + 1) {
                if is_last {
                    self.compute_ranks();
                }
                continue;
            }

            self.index.clear_visited();
            let mut has_dominance = false;

            for &slot in self.sorter.order() {
                let ordinal = self.snapshot.ordinal(slot);
                if self.snapshot.is_duplicate(ordinal) {
                    continue;
                }

                has_dominance |= self.index.intersect(ordinal);
                if is_last {
                    self.index.compute_rank(ordinal);
                }

                self.index.visit(ordinal);
            }

            if !is_last && !has_dominance {
                early_detections += 1;
                if early_detection {
                    break;
                }
            }
        }

        early_detections
    }

    fn compute_ranks(&mut self) {
        for &slot in self.sorter.order() {
            let ordinal = self.snapshot.ordinal(slot);
            if !self.snapshot.is_duplicate(ordinal) {
                self.index.compute_rank(ordinal);
            }
        }
    }

    /// Copies rank and bit-vector of canonical solution into its duplicates and marks duplicates
    /// as dominators wherever canonical solution is one.
    fn patch_duplicates(&mut self) {
        let duplicates = self.snapshot.duplicates();
        if duplicates.is_empty() {
            return;
        }

        duplicates.iter().for_each(|&(duplicate, canonical)| self.index.copy_solution(canonical, duplicate));

        for ordinal in 0..self.snapshot.size() {
            for &(duplicate, canonical) in duplicates.iter() {
                if self.index.is_dominated_by(ordinal, canonical) {
                    self.index.insert_dominator(ordinal, duplicate);
                }
            }
        }
    }

    /// Returns ranks keyed by slot.
    pub fn ranks(&self) -> Vec<usize> {
        (0..self.snapshot.size()).map(|slot| self.index.rank(self.snapshot.ordinal(slot))).collect()
    }
}
