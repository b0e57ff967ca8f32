#[cfg(test)]
#[path = "../../../tests/unit/algorithms/mnds/snapshot_test.rs"]
mod snapshot_test;

use crate::RankedSolution;
use crate::utils::{Float, GenericResult};
use rustc_hash::FxHashMap;

/// A population snapshot kept as a structure of arrays.
///
/// Every array is keyed by *slot*: the position of a solution in the input of the last batch ranking.
/// A steady-state replacement puts the new solution into the evicted slot, so a slot is stable for
/// the lifetime of its solution in the snapshot. The *ordinal* is a position of the solution in the
/// lexicographic order of the last batch ranking and is used as a bit index by dominance bit-vectors.
pub struct PopulationSnapshot {
    objectives_count: usize,
    objectives: Vec<Float>,
    ordinals: Vec<usize>,
    slots: Vec<usize>,
    /// Maps a duplicate ordinal to its canonical ordinal.
    duplicates: FxHashMap<usize, usize>,
}

impl PopulationSnapshot {
    /// Creates a new snapshot from solutions copying their objective values.
    pub fn new<S: RankedSolution>(solutions: &[S]) -> GenericResult<Self> {
        let mut snapshot = Self {
            objectives_count: 0,
            objectives: Vec::new(),
            ordinals: Vec::new(),
            slots: Vec::new(),
            duplicates: FxHashMap::default(),
        };
        snapshot.reset(solutions)?;

        Ok(snapshot)
    }

    /// Replaces snapshot content with objective values of given solutions reusing allocated arrays.
    /// The snapshot is left untouched when solutions are invalid.
    pub fn reset<S: RankedSolution>(&mut self, solutions: &[S]) -> GenericResult<()> {
        let objectives_count = get_objectives_count(solutions)?;
        let size = solutions.len();

        if let Some((slot, solution)) =
            solutions.iter().enumerate().find(|(_, solution)| solution.objectives().len() != objectives_count)
        {
            return Err(format!(
                "solution at {slot} has {} objectives, expected {objectives_count}",
                solution.objectives().len()
            )
            .into());
        }

        self.objectives_count = objectives_count;
        self.objectives.clear();
        self.objectives.reserve(size * objectives_count);
        solutions.iter().for_each(|solution| self.objectives.extend_from_slice(solution.objectives()));

        self.ordinals.clear();
        self.ordinals.extend(0..size);
        self.slots.clear();
        self.slots.extend(0..size);
        self.duplicates.clear();

        Ok(())
    }

    /// Returns amount of solutions.
    pub fn size(&self) -> usize {
        self.ordinals.len()
    }

    /// Returns amount of objectives.
    pub fn objectives_count(&self) -> usize {
        self.objectives_count
    }

    /// Returns objective values of the solution in given slot.
    pub fn objectives(&self, slot: usize) -> &[Float] {
        let start = slot * self.objectives_count;
        &self.objectives[start..start + self.objectives_count]
    }

    /// Returns objective value of the solution in given slot.
    pub fn value(&self, slot: usize, objective: usize) -> Float {
        self.objectives[slot * self.objectives_count + objective]
    }

    /// Overwrites objective values of the solution in given slot.
    pub fn set_objectives(&mut self, slot: usize, values: &[Float]) {
        let start = slot * self.objectives_count;
        self.objectives[start..start + self.objectives_count].copy_from_slice(values);
    }

    /// Returns ordinal of the solution in given slot.
    pub fn ordinal(&self, slot: usize) -> usize {
        self.ordinals[slot]
    }

    /// Returns slot of the solution with given ordinal.
    pub fn slot(&self, ordinal: usize) -> usize {
        self.slots[ordinal]
    }

    /// Assigns ordinals from slots sorted in lexicographic order.
    pub fn assign_ordinals(&mut self, order: &[usize]) {
        debug_assert_eq!(order.len(), self.size());

        order.iter().enumerate().for_each(|(ordinal, &slot)| {
            self.ordinals[slot] = ordinal;
            self.slots[ordinal] = slot;
        });
    }

    /// Returns canonical ordinal of the equivalence class if given one is a duplicate.
    pub fn canonical(&self, ordinal: usize) -> Option<usize> {
        self.duplicates.get(&ordinal).copied()
    }

    /// Checks whether the solution is a duplicate of some other (canonical) solution.
    pub fn is_duplicate(&self, ordinal: usize) -> bool {
        self.duplicates.contains_key(&ordinal)
    }

    /// Adds a duplicate to the equivalence class of `other`.
    pub fn add_duplicate(&mut self, duplicate: usize, other: usize) {
        let canonical = self.canonical(other).unwrap_or(other);
        debug_assert_ne!(duplicate, canonical);

        self.duplicates.insert(duplicate, canonical);
    }

    /// Removes the solution from its equivalence class. If it was canonical, the lowest remaining
    /// duplicate becomes a new canonical one.
    pub fn remove_from_class(&mut self, ordinal: usize) {
        if self.duplicates.remove(&ordinal).is_some() {
            return;
        }

        let mut members = self
            .duplicates
            .iter()
            .filter(|(_, canonical)| **canonical == ordinal)
            .map(|(duplicate, _)| *duplicate)
            .collect::<Vec<_>>();
        members.sort_unstable();

        if let Some((&canonical, rest)) = members.split_first() {
            self.duplicates.remove(&canonical);
            rest.iter().for_each(|duplicate| {
                self.duplicates.insert(*duplicate, canonical);
            });
        }
    }

    /// Returns all `(duplicate, canonical)` ordinal pairs sorted by duplicate.
    pub fn duplicates(&self) -> Vec<(usize, usize)> {
        let mut duplicates: Vec<_> =
            self.duplicates.iter().map(|(&duplicate, &canonical)| (duplicate, canonical)).collect();
        duplicates.sort_unstable();

        duplicates
    }
}

/// Returns amount of objectives shared by all solutions.
pub(crate) fn get_objectives_count<S: RankedSolution>(solutions: &[S]) -> GenericResult<usize> {
    let objectives_count = solutions.first().map_or(0, |solution| solution.objectives().len());

    if objectives_count < 2 {
        return Err(format!("at least two objectives are required, got {objectives_count}").into());
    }

    Ok(objectives_count)
}
