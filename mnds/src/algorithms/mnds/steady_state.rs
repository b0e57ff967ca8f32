#[cfg(test)]
#[path = "../../../tests/unit/algorithms/mnds/steady_state_test.rs"]
mod steady_state_test;

use super::bitset::{DominanceBitset, words_for};
use super::index::DominanceBitsetIndex;
use super::snapshot::PopulationSnapshot;
use super::sorter::{ObjectiveSorter, compare_lex};
use crate::utils::{Float, compare_floats};
use std::cmp::Ordering;

/// Updates dominance bit-vectors and ranks after a single solution is replaced.
///
/// For each objective the updater keeps ordinals sorted by that objective (the first one in full
/// lexicographic order). A new solution is located in each order by binary search, which gives a
/// signed delta for every other solution: how many times the new one is better or worse. Only the
/// bit of the replaced ordinal is touched in other bit-vectors.
pub struct SteadyStateUpdater {
    orders: Vec<Vec<usize>>,
    better: Vec<u32>,
    worse: Vec<u32>,
    changed: Vec<bool>,
    rank_changed: DominanceBitset,
    comparisons: u64,
}

impl SteadyStateUpdater {
    /// Creates a new instance of `SteadyStateUpdater` from the state left by batch ranking.
    pub fn new(snapshot: &PopulationSnapshot, sorter: &mut ObjectiveSorter) -> Self {
        let size = snapshot.size();
        let objectives_count = snapshot.objectives_count();

        let lex_order = (0..size).map(|ordinal| snapshot.slot(ordinal)).collect::<Vec<_>>();
        sorter.set_order(lex_order.as_slice());

        let orders = (0..objectives_count)
            .map(|objective| {
                let to = if objective == 0 { objectives_count } else { objective + 1 };
                sorter.sort(snapshot, objective, to);
                sorter.order().iter().map(|&slot| snapshot.ordinal(slot)).collect::<Vec<_>>()
            })
            .collect();

        Self {
            orders,
            better: vec![0; size],
            worse: vec![0; size],
            changed: vec![false; size],
            rank_changed: DominanceBitset::with_size(size),
            comparisons: 0,
        }
    }

    /// Returns total amount of objective value comparisons done by updates.
    pub fn comparisons(&self) -> u64 {
        self.comparisons
    }

    /// Replaces solution in the slot with new objective values, updates dominance bit-vectors and
    /// recomputes affected ranks. Returns amount of recomputed ranks.
    pub fn replace(
        &mut self,
        snapshot: &mut PopulationSnapshot,
        index: &mut DominanceBitsetIndex,
        slot: usize,
        values: &[Float],
    ) -> usize {
        let ordinal = snapshot.ordinal(slot);

        self.orders.iter_mut().for_each(|order| {
            if let Some(position) = order.iter().position(|&other| other == ordinal) {
                order.remove(position);
            }
        });
        snapshot.remove_from_class(ordinal);
        snapshot.set_objectives(slot, values);

        self.locate(snapshot, ordinal, values);
        self.update_dominance(snapshot, index, ordinal);

        self.update_ranks(index)
    }

    /// Inserts the ordinal into each objective order and computes dominance deltas.
    fn locate(&mut self, snapshot: &PopulationSnapshot, ordinal: usize, values: &[Float]) {
        let objectives_count = values.len();
        let mut comparisons = 0_u64;

        self.better.iter_mut().for_each(|count| *count = 0);
        self.worse.iter_mut().for_each(|count| *count = 0);

        for (objective, order) in self.orders.iter_mut().enumerate() {
            let value = values[objective];
            let mut compare = |other: usize| {
                comparisons += 1;
                compare_floats(snapshot.value(snapshot.slot(other), objective), value)
            };

            let lower = order.partition_point(|&other| compare(other) == Ordering::Less);
            let upper = lower + order[lower..].partition_point(|&other| compare(other) != Ordering::Greater);

            order[..lower].iter().for_each(|&other| self.worse[other] += 1);
            order[upper..].iter().for_each(|&other| self.better[other] += 1);

            let position = if objective == 0 {
                lower
                    + order[lower..upper].partition_point(|&other| {
                        let other = snapshot.objectives(snapshot.slot(other));
                        compare_lex(other, values, 1, objectives_count, &mut comparisons) != Ordering::Greater
                    })
            } else {
                upper
            };

            order.insert(position, ordinal);
        }

        self.comparisons += comparisons;
    }

    /// Moves the replaced ordinal bit in other bit-vectors and rebuilds its own bit-vector.
    fn update_dominance(
        &mut self,
        snapshot: &mut PopulationSnapshot,
        index: &mut DominanceBitsetIndex,
        ordinal: usize,
    ) {
        let mut duplicate_of = None;

        index.clear_dominators(ordinal);

        for other in (0..index.size()).filter(|&other| other != ordinal) {
            let (better, worse) = (self.better[other], self.worse[other]);

            let was_dominated = index.remove_dominator(other, ordinal);
            let is_dominated = worse == 0 && better > 0;

            if is_dominated {
                index.insert_dominator(other, ordinal);
            }
            self.changed[other] = was_dominated != is_dominated;

            match (better, worse) {
                (0, 0) => duplicate_of = duplicate_of.or(Some(other)),
                (0, _) => index.insert_dominator(ordinal, other),
                _ => {}
            }
        }

        self.changed[ordinal] = true;

        if let Some(other) = duplicate_of {
            snapshot.add_duplicate(ordinal, other);
        }
    }

    /// Recomputes ranks in lexicographic order, which is a topological order of dominance, for
    /// solutions with a changed bit-vector or with a dominator which rank has changed.
    fn update_ranks(&mut self, index: &mut DominanceBitsetIndex) -> usize {
        let mut recomputed = 0;

        index.refresh_rank_bounds();
        self.rank_changed.clear();

        for &ordinal in self.orders[0].iter() {
            if !self.changed[ordinal] && !index.has_dominator_in(ordinal, &self.rank_changed) {
                continue;
            }

            let old_rank = index.rank(ordinal);
            let new_rank = index.compute_rank(ordinal);
            recomputed += 1;

            if old_rank != new_rank {
                self.rank_changed.insert(ordinal, words_for(index.size()));
            }
        }

        self.changed.iter_mut().for_each(|changed| *changed = false);

        recomputed
    }
}
