#[cfg(test)]
#[path = "../../tests/unit/density/crowding_distance_test.rs"]
mod crowding_distance_test;

use super::DensityEstimator;
use crate::RankedSolution;
use crate::utils::{Float, compare_floats};

/// A crowding distance density estimator as defined by NSGA-II: a sum over objectives of distances
/// between the nearest neighbours. Extreme solutions of each objective get an infinite distance.
#[derive(Clone, Copy, Debug, Default)]
pub struct CrowdingDistance;

impl<S: RankedSolution> DensityEstimator<S> for CrowdingDistance {
    fn estimate(&self, solutions: &[&S]) -> Vec<Float> {
        let size = solutions.len();
        if size <= 2 {
            return vec![Float::INFINITY; size];
        }

        let objectives_count = solutions[0].objectives().len();
        let mut distances = vec![0.; size];
        let mut order = (0..size).collect::<Vec<_>>();

        for objective in 0..objectives_count {
            let value = |idx: usize| solutions[idx].objectives()[objective];

            // first, sort according to objective
            order.sort_by(|&a, &b| compare_floats(value(a), value(b)));

            let (first, last) = (order[0], order[size - 1]);
            distances[first] = Float::INFINITY;
            distances[last] = Float::INFINITY;

            // the distance between the "best" and "worst" solution according to objective
            let spread = (value(last) - value(first)).abs();

            if spread > 0. {
                let norm = 1. / (spread * objectives_count as Float);

                for i in 1..size - 1 {
                    let distance = (value(order[i + 1]) - value(order[i - 1])).abs();
                    distances[order[i]] += distance * norm;
                }
            }
        }

        distances
    }
}
