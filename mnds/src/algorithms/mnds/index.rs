#[cfg(test)]
#[path = "../../../tests/unit/algorithms/mnds/index_test.rs"]
mod index_test;

use super::bitset::{DominanceBitset, N_BIT_ADDR, WORD_SIZE, words_for};

/// Keeps dominance bit-vectors and ranks of all solutions, both are addressed by solution ordinal.
///
/// Besides per solution bit-vectors, the index owns a shared incremental bit-vector of solutions
/// visited in the current objective order and a per word cache of maximum rank, which is used to
/// stop scanning a bit-vector once no higher rank can be found.
pub struct DominanceBitsetIndex {
    total_words: usize,
    bitsets: Vec<DominanceBitset>,
    incremental: DominanceBitset,
    ranks: Vec<usize>,
    word_ranks: Vec<usize>,
    max_rank: usize,
}

impl DominanceBitsetIndex {
    /// Creates a new instance of `DominanceBitsetIndex` for given amount of solutions.
    pub fn new(size: usize) -> Self {
        let total_words = words_for(size);

        Self {
            total_words,
            bitsets: vec![DominanceBitset::default(); size],
            incremental: DominanceBitset::with_size(size),
            ranks: vec![0; size],
            word_ranks: vec![0; total_words],
            max_rank: 0,
        }
    }

    /// Prepares the index for a new population of given size keeping allocated bit-vectors.
    pub fn reset(&mut self, size: usize) {
        self.total_words = words_for(size);

        self.bitsets.truncate(size);
        self.bitsets.iter_mut().for_each(|bitset| bitset.clear());
        self.bitsets.resize(size, DominanceBitset::default());
        self.incremental.clear();

        self.ranks.clear();
        self.ranks.resize(size, 0);
        self.word_ranks.clear();
        self.word_ranks.resize(self.total_words, 0);
        self.max_rank = 0;
    }

    /// Returns amount of solutions in the index.
    pub fn size(&self) -> usize {
        self.bitsets.len()
    }

    /// Returns bit-vector of solutions known to dominate given one.
    pub fn dominators(&self, ordinal: usize) -> &DominanceBitset {
        &self.bitsets[ordinal]
    }

    /// Checks whether `dominator` is known to dominate `ordinal`.
    pub fn is_dominated_by(&self, ordinal: usize, dominator: usize) -> bool {
        self.bitsets[ordinal].contains(dominator)
    }

    /// Returns current rank of the solution.
    pub fn rank(&self, ordinal: usize) -> usize {
        self.ranks[ordinal]
    }

    /// Marks solution as visited in the current objective order.
    pub fn visit(&mut self, ordinal: usize) {
        self.incremental.insert(ordinal, self.total_words);
    }

    /// Starts a new objective pass.
    pub fn clear_visited(&mut self) {
        self.incremental.clear();
    }

    /// Seeds solution's bit-vector with already visited solutions preceding it in lexicographic
    /// order. Returns true if the solution got at least one dominator.
    pub fn initialize(&mut self, ordinal: usize) -> bool {
        self.bitsets[ordinal].assign_prefix(&self.incremental, ordinal, self.total_words)
    }

    /// Removes from solution's bit-vector those solutions which were not visited yet in the current
    /// objective order. Returns true if the solution still has at least one dominator.
    pub fn intersect(&mut self, ordinal: usize) -> bool {
        self.bitsets[ordinal].intersect_with(&self.incremental)
    }

    /// Computes rank of the solution from its bit-vector: one more than the highest rank of its
    /// dominators. All dominators are expected to have a final rank already.
    pub fn compute_rank(&mut self, ordinal: usize) -> usize {
        let bitset = &self.bitsets[ordinal];
        let mut rank = 0;

        if let Some((first, last)) = bitset.range() {
            for index in first..=last {
                let mut word = bitset.word(index);
                let offset = index * WORD_SIZE;

                while word != 0 && rank <= self.word_ranks[index] {
                    let bit = word.trailing_zeros() as usize;
                    rank = rank.max(self.ranks[offset + bit] + 1);
                    word &= word - 1;
                }

                // no dominator can have rank higher than the max known one
                if rank > self.max_rank {
                    break;
                }
            }
        }

        self.set_rank(ordinal, rank);

        rank
    }

    /// Sets rank of the solution directly.
    pub fn set_rank(&mut self, ordinal: usize, rank: usize) {
        self.ranks[ordinal] = rank;
        self.max_rank = self.max_rank.max(rank);

        let word_rank = &mut self.word_ranks[ordinal >> N_BIT_ADDR];
        *word_rank = (*word_rank).max(rank);
    }

    /// Records that `dominator` dominates `ordinal`.
    pub fn insert_dominator(&mut self, ordinal: usize, dominator: usize) {
        self.bitsets[ordinal].insert(dominator, self.total_words);
    }

    /// Forgets that `dominator` dominates `ordinal`. Returns true if it was known before.
    pub fn remove_dominator(&mut self, ordinal: usize, dominator: usize) -> bool {
        self.bitsets[ordinal].remove(dominator)
    }

    /// Forgets all dominators of the solution.
    pub fn clear_dominators(&mut self, ordinal: usize) {
        self.bitsets[ordinal].clear();
    }

    /// Copies bit-vector and rank of `source` into `target`.
    pub fn copy_solution(&mut self, source: usize, target: usize) {
        self.bitsets[target] = self.bitsets[source].clone();
        self.set_rank(target, self.ranks[source]);
    }

    /// Checks whether any dominator of the solution is in `others`.
    pub fn has_dominator_in(&self, ordinal: usize, others: &DominanceBitset) -> bool {
        self.bitsets[ordinal].intersects(others)
    }

    /// Recomputes rank bounds from current ranks. Bounds have to be refreshed before ranks are
    /// recomputed after some of them were decreased.
    pub fn refresh_rank_bounds(&mut self) {
        self.word_ranks.iter_mut().for_each(|rank| *rank = 0);
        self.max_rank = 0;

        for (ordinal, &rank) in self.ranks.iter().enumerate() {
            let word_rank = &mut self.word_ranks[ordinal >> N_BIT_ADDR];
            *word_rank = (*word_rank).max(rank);
            self.max_rank = self.max_rank.max(rank);
        }
    }
}
