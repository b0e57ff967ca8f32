#[cfg(test)]
#[path = "../../../tests/unit/algorithms/mnds/sorter_test.rs"]
mod sorter_test;

use super::snapshot::PopulationSnapshot;
use crate::config::validate_insertion_threshold;
use crate::utils::{Float, GenericResult, compare_floats};
use std::cmp::Ordering;

/// Default size of a range below which insertion sort is used instead of merging.
pub const DEFAULT_INSERTION_THRESHOLD: usize = 7;

/// Sorts a permutation of snapshot slots by objective values using a stable merge sort.
///
/// The sorter owns two equally sized buffers: `order` keeps the current permutation and `work` is
/// a scratch copy used while merging. Both are reused between sorts of the same population.
pub struct ObjectiveSorter {
    threshold: usize,
    order: Vec<usize>,
    work: Vec<usize>,
    comparisons: u64,
}

impl ObjectiveSorter {
    /// Creates a new instance of `ObjectiveSorter` with an identity permutation of `size` slots.
    pub fn new(threshold: usize, size: usize) -> GenericResult<Self> {
        let threshold = validate_insertion_threshold(threshold)?;

        Ok(Self { threshold, order: (0..size).collect(), work: vec![0; size], comparisons: 0 })
    }

    /// Restores an identity permutation of `size` slots reusing allocated buffers.
    pub fn reset(&mut self, size: usize) {
        self.order.clear();
        self.order.extend(0..size);
        self.work.resize(size, 0);
        self.comparisons = 0;
    }

    /// Returns current permutation of slots.
    pub fn order(&self) -> &[usize] {
        self.order.as_slice()
    }

    /// Replaces current permutation.
    pub fn set_order(&mut self, order: &[usize]) {
        self.order.clear();
        self.order.extend_from_slice(order);
        self.work.resize(order.len(), 0);
    }

    /// Returns total amount of objective value comparisons done so far.
    pub fn comparisons(&self) -> u64 {
        self.comparisons
    }

    /// Sorts current permutation comparing objectives in `[from, to)` range lexicographically.
    /// Returns true if the permutation was already sorted, so no reordering happened.
    pub fn sort(&mut self, snapshot: &PopulationSnapshot, from: usize, to: usize) -> bool {
        self.work.copy_from_slice(&self.order);

        let mut merger = Merger { snapshot, from, to, threshold: self.threshold, comparisons: 0 };
        let is_sorted = merger.sort_into(&mut self.order, &mut self.work);

        self.comparisons += merger.comparisons;
        std::mem::swap(&mut self.order, &mut self.work);

        is_sorted
    }

    /// Compares two slots lexicographically over objectives in `[from, to)` range.
    pub fn compare(&mut self, snapshot: &PopulationSnapshot, a: usize, b: usize, from: usize, to: usize) -> Ordering {
        compare_lex(snapshot.objectives(a), snapshot.objectives(b), from, to, &mut self.comparisons)
    }
}

/// Compares two objective vectors lexicographically over `[from, to)` range counting comparisons.
pub(crate) fn compare_lex(a: &[Float], b: &[Float], from: usize, to: usize, comparisons: &mut u64) -> Ordering {
    for objective in from..to {
        *comparisons += 1;
        match compare_floats(a[objective], b[objective]) {
            Ordering::Equal => continue,
            ordering => return ordering,
        }
    }

    Ordering::Equal
}

struct Merger<'a> {
    snapshot: &'a PopulationSnapshot,
    from: usize,
    to: usize,
    threshold: usize,
    comparisons: u64,
}

impl Merger<'_> {
    /// Sorts `dest` using `src` as scratch: both slices must have the same content on entry.
    fn sort_into(&mut self, src: &mut [usize], dest: &mut [usize]) -> bool {
        let length = dest.len();
        if length < self.threshold {
            return self.insertion_sort(dest);
        }

        let mid = length / 2;
        let is_sorted = {
            let (src_low, src_high) = src.split_at_mut(mid);
            let (dest_low, dest_high) = dest.split_at_mut(mid);

            let is_low_sorted = self.sort_into(dest_low, src_low);
            let is_high_sorted = self.sort_into(dest_high, src_high);

            is_low_sorted && is_high_sorted
        };

        // halves are already in order, just copy them
        if self.compare(src[mid - 1], src[mid]) != Ordering::Greater {
            dest.copy_from_slice(src);
            return is_sorted;
        }

        let (mut i, mut j) = (0, mid);
        for item in dest.iter_mut() {
            if j >= length || (i < mid && self.compare(src[i], src[j]) != Ordering::Greater) {
                *item = src[i];
                i += 1;
            } else {
                *item = src[j];
                j += 1;
            }
        }

        false
    }

    fn insertion_sort(&mut self, dest: &mut [usize]) -> bool {
        let mut is_sorted = true;

        for i in 1..dest.len() {
            let mut j = i;
            while j > 0 && self.compare(dest[j - 1], dest[j]) == Ordering::Greater {
                dest.swap(j - 1, j);
                is_sorted = false;
                j -= 1;
            }
        }

        is_sorted
    }

    fn compare(&mut self, a: usize, b: usize) -> Ordering {
        compare_lex(self.snapshot.objectives(a), self.snapshot.objectives(b), self.from, self.to, &mut self.comparisons)
    }
}
