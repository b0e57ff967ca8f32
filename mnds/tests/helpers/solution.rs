use crate::RankedSolution;
use crate::utils::Float;

/// A solution which keeps an identity and a rank assigned by replacement.
#[derive(Clone, Debug, PartialEq)]
pub struct TestSolution {
    pub id: usize,
    pub objectives: Vec<Float>,
    pub rank: Option<usize>,
}

impl TestSolution {
    pub fn new(id: usize, objectives: Vec<Float>) -> Self {
        Self { id, objectives, rank: None }
    }
}

impl RankedSolution for TestSolution {
    fn objectives(&self) -> &[Float] {
        self.objectives.as_slice()
    }

    fn set_rank(&mut self, rank: usize) {
        self.rank = Some(rank);
    }
}

pub fn create_test_solutions(objectives: &[&[Float]]) -> Vec<TestSolution> {
    objectives.iter().enumerate().map(|(id, values)| TestSolution::new(id, values.to_vec())).collect()
}

pub fn get_ids(solutions: &[TestSolution]) -> Vec<usize> {
    solutions.iter().map(|solution| solution.id).collect()
}
