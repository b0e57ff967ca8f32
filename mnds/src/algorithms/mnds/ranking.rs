#[cfg(test)]
#[path = "../../../tests/unit/algorithms/mnds/ranking_test.rs"]
mod ranking_test;

use crate::RankedSolution;
use crate::utils::GenericResult;

/// Keeps counters collected while ranking is computed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RankingStatistics {
    /// Total amount of objective value comparisons.
    pub comparisons: u64,
    /// Amount of objective passes where no dominance was left, so processing could stop early.
    pub early_detections: u64,
    /// Amount of solutions which rank was (re)computed by the last update.
    pub recomputed_ranks: usize,
}

/// A result of non-dominated sorting: rank of each solution and solutions grouped into fronts.
///
/// Solutions are referenced by their slot: a position in the input of the batch ranking.
#[derive(Clone, Debug, Default)]
pub struct Ranking {
    ranks: Vec<usize>,
    fronts: Vec<Vec<usize>>,
    statistics: RankingStatistics,
}

impl Ranking {
    /// Creates a new ranking from ranks keyed by slot.
    pub fn new(ranks: Vec<usize>, statistics: RankingStatistics) -> Self {
        let fronts_count = ranks.iter().max().map_or(0, |rank| rank + 1);
        let mut fronts = vec![Vec::new(); fronts_count];

        ranks.iter().enumerate().for_each(|(slot, &rank)| fronts[rank].push(slot));

        debug_assert!(fronts.iter().all(|front| !front.is_empty()));

        Self { ranks, fronts, statistics }
    }

    /// Returns rank of the solution in given slot.
    pub fn rank(&self, slot: usize) -> Option<usize> {
        self.ranks.get(slot).copied()
    }

    /// Returns ranks of all solutions keyed by slot.
    pub fn ranks(&self) -> &[usize] {
        self.ranks.as_slice()
    }

    /// Returns slots of solutions having given rank in ascending order.
    pub fn front(&self, rank: usize) -> GenericResult<&[usize]> {
        match self.fronts.get(rank) {
            Some(front) => Ok(front.as_slice()),
            None if self.fronts.is_empty() => Err(format!("invalid rank: {rank}, ranking is empty").into()),
            None => Err(format!("invalid rank: {rank}, max rank = {}", self.fronts.len() - 1).into()),
        }
    }

    /// Iterates over fronts in ascending rank order.
    pub fn fronts(&self) -> impl Iterator<Item = &[usize]> + '_ {
        self.fronts.iter().map(|front| front.as_slice())
    }

    /// Returns amount of fronts.
    pub fn fronts_count(&self) -> usize {
        self.fronts.len()
    }

    /// Returns amount of ranked solutions.
    pub fn size(&self) -> usize {
        self.ranks.len()
    }

    /// Returns true if no solution is ranked.
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// Returns counters collected by the last ranking operation.
    pub fn statistics(&self) -> &RankingStatistics {
        &self.statistics
    }

    /// Writes ranks into the rank attribute of solutions given in the same order as ranked ones.
    pub fn apply<S: RankedSolution>(&self, solutions: &mut [S]) {
        solutions.iter_mut().zip(self.ranks.iter()).for_each(|(solution, &rank)| solution.set_rank(rank));
    }
}
