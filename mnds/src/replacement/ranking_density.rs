#[cfg(test)]
#[path = "../../tests/unit/replacement/ranking_density_test.rs"]
mod ranking_density_test;

use super::RemovalPolicy;
use crate::RankedSolution;
use crate::algorithms::mnds::MergeNonDominatedSort;
use crate::config::RankingConfig;
use crate::density::DensityEstimator;
use crate::utils::{Float, GenericError, GenericResult, compare_floats};
use rustc_hash::FxHashSet;
use std::cmp::Ordering;

/// Selects survivors from population and offspring: fronts are taken in ascending rank order and
/// the first front which does not fit is truncated using a density estimator.
///
/// When exactly one offspring is given and population is the list of survivors returned by the
/// previous call, ranking is updated with a steady-state replacement of the evicted solution
/// instead of ranking the joint population from scratch.
pub struct RankingAndDensityReplacement<D> {
    engine: MergeNonDominatedSort,
    density: D,
    memory: Option<SteadyStateMemory>,
}

/// Engine slots of the last returned survivors and of the evicted solution.
struct SteadyStateMemory {
    survivors: Vec<usize>,
    evicted: usize,
}

impl<D> RankingAndDensityReplacement<D> {
    /// Creates a new instance of `RankingAndDensityReplacement`.
    pub fn new(config: RankingConfig, density: D) -> Self {
        Self { engine: MergeNonDominatedSort::new(config), density, memory: None }
    }

    /// Returns underlying ranking engine.
    pub fn engine(&self) -> &MergeNonDominatedSort {
        &self.engine
    }

    /// Checks whether the next call with a single offspring can use steady-state update.
    pub fn is_steady_state_ready(&self) -> bool {
        self.memory.is_some()
    }

    /// Forgets engine state and steady-state bookkeeping.
    pub fn clear(&mut self) {
        self.engine.clear();
        self.memory = None;
    }

    /// Returns exactly `population.len()` survivors of the joint population. Rank of each
    /// survivor is set via [`RankedSolution::set_rank`].
    pub fn replace<S>(&mut self, population: Vec<S>, offspring: Vec<S>) -> GenericResult<Vec<S>>
    where
        S: RankedSolution,
        D: DensityEstimator<S>,
    {
        let capacity = population.len();
        let offspring_size = offspring.len();
        let policy = self.engine.config().removal_policy;

        let steady_state_slots = self.get_steady_state_slots(population.as_slice(), offspring_size);
        self.memory = None;

        let pool = population.into_iter().chain(offspring).collect::<Vec<_>>();

        let (ranking, slots) = match steady_state_slots {
            Some(slots) => (self.engine.replace(slots[capacity], &pool[capacity])?, slots),
            None => (self.engine.compute_ranking(pool.as_slice())?, (0..pool.len()).collect()),
        };

        let mut positions = vec![0; slots.len()];
        slots.iter().enumerate().for_each(|(position, &slot)| positions[slot] = position);

        let mut selected = Vec::with_capacity(capacity);
        for front in ranking.fronts() {
            let remaining = capacity - selected.len();
            if remaining == 0 {
                break;
            }

            let members = front.iter().map(|&slot| positions[slot]).collect::<Vec<_>>();
            if members.len() <= remaining {
                selected.extend(members);
            } else {
                selected.extend(truncate_front(pool.as_slice(), members, remaining, &self.density, policy));
            }
        }

        if selected.len() != capacity {
            return Err(format!("replacement returned {} solutions, expected {capacity}", selected.len()).into());
        }

        let ranks = selected.iter().map(|&position| ranking.ranks()[slots[position]]).collect::<Vec<_>>();

        if offspring_size == 1 {
            let selected_set = selected.iter().copied().collect::<FxHashSet<_>>();
            let evicted = (0..pool.len()).filter(|position| !selected_set.contains(position)).collect::<Vec<_>>();

            match evicted.as_slice() {
                [evicted] => {
                    let survivors = selected.iter().map(|&position| slots[position]).collect();
                    self.memory = Some(SteadyStateMemory { survivors, evicted: slots[*evicted] });
                }
                _ => {
                    return Err(format!("expected exactly one evicted solution, found {}", evicted.len()).into());
                }
            }
        }

        let mut pool = pool.into_iter().map(Some).collect::<Vec<_>>();

        selected
            .iter()
            .zip(ranks)
            .map(|(&position, rank)| {
                let mut solution = pool[position]
                    .take()
                    .ok_or_else(|| GenericError::from(format!("solution at {position} is selected twice")))?;
                solution.set_rank(rank);

                Ok(solution)
            })
            .collect()
    }

    /// Returns engine slots of the joint population if steady-state update is applicable: slots
    /// of the previous survivors followed by the slot of evicted solution reused by the offspring.
    fn get_steady_state_slots<S>(&self, population: &[S], offspring_size: usize) -> Option<Vec<usize>>
    where
        S: RankedSolution,
    {
        let memory = self.memory.as_ref().filter(|_| offspring_size == 1)?;

        let is_same_population = memory.survivors.len() == population.len()
            && memory.survivors.iter().zip(population.iter()).all(|(&slot, solution)| {
                self.engine.objectives(slot).is_some_and(|known| is_same_objectives(known, solution.objectives()))
            });

        if !is_same_population {
            self.engine.config().log(|| {
                "population differs from the last survivors, fallback to batch ranking".to_string()
            });
            return None;
        }

        Some(memory.survivors.iter().copied().chain(std::iter::once(memory.evicted)).collect())
    }
}

fn is_same_objectives(a: &[Float], b: &[Float]) -> bool {
    a.len() == b.len() && a.iter().zip(b.iter()).all(|(a, b)| compare_floats(*a, *b) == Ordering::Equal)
}

/// Selects `remaining` members of the front, members are given as positions in the pool.
fn truncate_front<S, D>(
    pool: &[S],
    mut members: Vec<usize>,
    remaining: usize,
    density: &D,
    policy: RemovalPolicy,
) -> Vec<usize>
where
    D: DensityEstimator<S>,
{
    let estimate = |members: &[usize]| {
        let solutions = members.iter().map(|&position| &pool[position]).collect::<Vec<_>>();
        let estimates = density.estimate(solutions.as_slice());
        debug_assert_eq!(estimates.len(), members.len());

        estimates
    };

    match policy {
        RemovalPolicy::OneShot => {
            let estimates = estimate(members.as_slice());

            let mut order = (0..members.len()).collect::<Vec<_>>();
            order.sort_by(|&a, &b| density.compare(estimates[a], estimates[b]));

            order.into_iter().take(remaining).map(|idx| members[idx]).collect()
        }
        RemovalPolicy::Sequential => {
            while members.len() > remaining {
                let estimates = estimate(members.as_slice());

                // on ties, the later member is removed
                match (0..members.len()).max_by(|&a, &b| density.compare(estimates[a], estimates[b])) {
                    Some(idx) => {
                        members.remove(idx);
                    }
                    None => break,
                }
            }

            members
        }
    }
}
