use super::*;
use crate::config::RankingConfigBuilder;
use crate::helpers::population::*;
use crate::helpers::solution::create_test_solutions;
use crate::utils::InfoLogger;
use rayon::prelude::*;
use std::sync::{Arc, Mutex};

fn create_engine(threshold: usize, early_detection: bool) -> MergeNonDominatedSort {
    let config = RankingConfigBuilder::default()
        .with_insertion_threshold(threshold)
        .with_early_detection(early_detection)
        .build()
        .expect("cannot build config");

    MergeNonDominatedSort::new(config)
}

fn get_ranking(population: &[Vec<Float>]) -> Ranking {
    MergeNonDominatedSort::default().compute_ranking(population).expect("cannot rank population").clone()
}

#[test]
fn can_rank_mutually_non_dominated_solutions() {
    let population = vec![vec![1., 5.], vec![2., 4.], vec![3., 3.], vec![4., 2.], vec![5., 1.]];

    let ranking = get_ranking(population.as_slice());

    assert_eq!(ranking.ranks(), &[0, 0, 0, 0, 0]);
    assert_eq!(ranking.fronts_count(), 1);
    assert_eq!(ranking.front(0), Ok(&[0, 1, 2, 3, 4][..]));
}

#[test]
fn can_rank_dominance_chain() {
    let population = vec![vec![1., 1.], vec![2., 2.], vec![3., 3.]];

    let ranking = get_ranking(population.as_slice());

    assert_eq!(ranking.ranks(), &[0, 1, 2]);
    assert_eq!(ranking.fronts().collect::<Vec<_>>(), vec![&[0][..], &[1][..], &[2][..]]);
    assert_eq!(ranking.front(3), Err("invalid rank: 3, max rank = 2".into()));
}

#[test]
fn can_rank_duplicates_in_first_front() {
    let population = vec![vec![1., 1.], vec![1., 1.], vec![2., 0.], vec![0., 2.]];
    let mut engine = MergeNonDominatedSort::default();

    let ranking = engine.compute_ranking(population.as_slice()).expect("cannot rank population");

    assert_eq!(ranking.ranks(), &[0, 0, 0, 0]);
    assert_eq!(engine.duplicates(), vec![(1, 0)]);
}

#[test]
fn can_keep_full_dominance_relation_for_duplicates() {
    let population = vec![vec![1., 1.], vec![2., 2.], vec![2., 2.], vec![3., 3.]];
    let mut engine = MergeNonDominatedSort::default();

    let ranking = engine.compute_ranking(population.as_slice()).expect("cannot rank population");

    assert_eq!(ranking.ranks(), &[0, 1, 1, 2]);
    assert_eq!(engine.dominators(0), Vec::<usize>::new());
    assert_eq!(engine.dominators(1), vec![0]);
    assert_eq!(engine.dominators(2), vec![0]);
    assert_eq!(engine.dominators(3), vec![0, 1, 2]);
    assert_eq!(engine.duplicates(), vec![(2, 1)]);
}

#[test]
fn can_rank_solutions_with_nan_objectives() {
    let population = vec![vec![Float::NAN, 1.], vec![1., 1.], vec![0., 0.]];

    let ranking = get_ranking(population.as_slice());

    assert_valid_ranking(population.as_slice(), &ranking);
    assert_eq!(ranking.ranks(), &[2, 1, 0]);
}

parameterized_test! {can_rank_random_population, (seed, size, objectives, max_value, threshold, early_detection), {
    can_rank_random_population_impl(seed, size, objectives, max_value, threshold, early_detection);
}}

can_rank_random_population! {
    case_01_two_objectives: (0, 50, 2, 10, 7, true),
    case_02_three_objectives: (1, 100, 3, 10, 7, true),
    case_03_many_duplicates: (2, 100, 3, 3, 7, true),
    case_04_many_objectives: (3, 150, 6, 20, 7, true),
    case_05_minimal_threshold: (4, 100, 4, 5, 2, true),
    case_06_no_early_detection: (5, 100, 4, 5, 7, false),
    case_07_several_words: (6, 300, 3, 50, 7, true),
    case_08_single_solution: (7, 1, 3, 10, 7, true),
    case_09_all_duplicates: (8, 20, 3, 1, 7, true),
}

fn can_rank_random_population_impl(
    seed: u64,
    size: usize,
    objectives: usize,
    max_value: i32,
    threshold: usize,
    early_detection: bool,
) {
    let population = create_random_population(seed, size, objectives, max_value);
    let mut engine = create_engine(threshold, early_detection);

    let ranking = engine.compute_ranking(population.as_slice()).expect("cannot rank population");

    assert_valid_ranking(population.as_slice(), ranking);
    assert_eq!(ranking.statistics().recomputed_ranks, size);
}

parameterized_test! {can_detect_non_domination_early, (population, early_detection, expected_ranks), {
    let mut engine = create_engine(7, early_detection);

    let ranking = engine.compute_ranking(population.as_slice()).expect("cannot rank population");

    assert_eq!(ranking.ranks(), expected_ranks.as_slice());
    assert_eq!(ranking.statistics().early_detections, 1);
}}

can_detect_non_domination_early! {
    case_01_after_second_objective: (create_non_dominated_population(10, 3), true, vec![0; 10]),
    case_02_after_second_objective_disabled: (create_non_dominated_population(10, 3), false, vec![0; 10]),
    case_03_after_third_objective: (vec![vec![0., 0., 1., 0.], vec![1., 1., 0., 0.]], true, vec![0, 0]),
    case_04_after_third_objective_disabled: (vec![vec![0., 0., 1., 0.], vec![1., 1., 0., 0.]], false, vec![0, 0]),
}

#[test]
fn can_skip_early_detection_for_dominated_population() {
    let population = create_chain_population(20, 4);

    let ranking = get_ranking(population.as_slice());

    assert_eq!(ranking.ranks(), (0..20).collect::<Vec<_>>().as_slice());
    assert_eq!(ranking.statistics().early_detections, 0);
    assert!(ranking.statistics().comparisons > 0);
}

#[test]
fn can_rank_solutions_with_rank_attribute() {
    let mut solutions = create_test_solutions(&[&[1., 2.], &[2., 3.], &[0., 4.]]);
    let mut engine = MergeNonDominatedSort::default();

    engine.compute_ranking(solutions.as_slice()).expect("cannot rank solutions").apply(solutions.as_mut_slice());

    assert_eq!(solutions.iter().map(|solution| solution.rank).collect::<Vec<_>>(), vec![Some(0), Some(1), Some(0)]);
}

#[test]
fn can_handle_empty_population() {
    let mut engine = MergeNonDominatedSort::default();

    let ranking = engine.compute_ranking(Vec::<Vec<Float>>::new().as_slice()).expect("cannot rank population");

    assert!(ranking.is_empty());
    assert_eq!(ranking.front(0), Err("invalid rank: 0, ranking is empty".into()));
    assert!(!engine.has_snapshot());
}

parameterized_test! {can_reject_invalid_population, (population, expected), {
    let mut engine = MergeNonDominatedSort::default();

    let result = engine.compute_ranking(population.as_slice()).map(|_| ());

    assert_eq!(result, Err(expected.into()));
    assert!(!engine.has_snapshot());
}}

can_reject_invalid_population! {
    case_01_single_objective: (vec![vec![1.], vec![2.]], "at least two objectives are required, got 1"),
    case_02_inconsistent: (vec![vec![1., 2.], vec![3.]], "solution at 1 has 1 objectives, expected 2"),
}

#[test]
fn can_reject_steady_state_update_without_batch_ranking() {
    let mut engine = MergeNonDominatedSort::default();

    let result = engine.replace(0, &vec![1., 2.]).map(|_| ());

    assert_eq!(result, Err("steady-state update requires batch ranking first".into()));
}

parameterized_test! {can_reject_invalid_steady_state_update, (slot, solution, expected), {
    let mut engine = MergeNonDominatedSort::default();
    engine.compute_ranking(vec![vec![1., 2.], vec![2., 1.]].as_slice()).expect("cannot rank population");

    let result = engine.replace(slot, &solution).map(|_| ());

    assert_eq!(result, Err(expected.into()));
}}

can_reject_invalid_steady_state_update! {
    case_01_invalid_slot: (2, vec![0., 0.], "invalid slot: 2, population size is 2"),
    case_02_invalid_objectives: (0, vec![0., 0., 0.], "new solution has 3 objectives, expected 2"),
}

#[test]
fn can_clear_engine() {
    let mut engine = MergeNonDominatedSort::default();
    engine.compute_ranking(vec![vec![1., 2.], vec![2., 3.]].as_slice()).expect("cannot rank population");
    assert!(engine.has_snapshot());
    assert_eq!(engine.objectives(1), Some(&[2., 3.][..]));

    engine.clear();

    assert!(!engine.has_snapshot());
    assert!(engine.ranking().is_empty());
    assert_eq!(engine.objectives(1), None);
    assert!(engine.dominators(1).is_empty());
}

#[test]
fn can_log_batch_ranking_summary() {
    let messages = Arc::new(Mutex::new(Vec::<String>::new()));
    let logger: InfoLogger = {
        let messages = messages.clone();
        Arc::new(move |message: &str| messages.lock().unwrap().push(message.to_string()))
    };
    let config = RankingConfigBuilder::default().with_logger(logger).build().expect("cannot build config");
    let mut engine = MergeNonDominatedSort::new(config);

    engine
        .compute_ranking(vec![vec![1., 1.], vec![2., 2.], vec![2., 2.], vec![3., 3.]].as_slice())
        .expect("cannot rank population");

    assert_eq!(
        messages.lock().unwrap().as_slice(),
        &["batch ranking of 4 solutions: 3 fronts, 1 duplicates, 0 early detections".to_string()]
    );
}

#[test]
fn can_rank_independent_populations_in_parallel() {
    fn assert_send<T: Send>() {}
    assert_send::<MergeNonDominatedSort>();

    (0..8_u64).into_par_iter().for_each(|seed| {
        let population = create_random_population(seed, 200, 3, 20);
        let mut engine = MergeNonDominatedSort::default();

        let ranking = engine.compute_ranking(population.as_slice()).expect("cannot rank population");

        assert_valid_ranking(population.as_slice(), ranking);
    });
}

#[test]
fn can_reuse_engine_for_populations_of_different_sizes() {
    let mut engine = create_engine(3, true);

    for (seed, size) in [(0, 150_usize), (1, 20), (2, 300), (3, 64), (4, 65), (5, 1)] {
        let population = create_random_population(seed, size, 3, 8);

        let mut fresh = create_engine(3, true);
        let expected = fresh.compute_ranking(population.as_slice()).expect("cannot rank population").clone();

        let ranking = engine.compute_ranking(population.as_slice()).expect("cannot rank population");

        assert_eq!(ranking.ranks(), get_brute_force_ranks(population.as_slice()).as_slice());
        assert_eq!(ranking.statistics(), expected.statistics());
        assert_eq!(engine.duplicates(), fresh.duplicates());
    }
}

#[test]
fn can_update_reused_engine_in_steady_state() {
    let mut engine = MergeNonDominatedSort::default();
    engine.compute_ranking(create_random_population(0, 200, 2, 10).as_slice()).expect("cannot rank population");
    let mut population = create_random_population(1, 70, 2, 10);
    engine.compute_ranking(population.as_slice()).expect("cannot rank population");

    population[69] = vec![0., 0.];
    let ranking = engine.replace(69, &population[69]).expect("cannot replace solution");

    assert_eq!(ranking.ranks(), get_brute_force_ranks(population.as_slice()).as_slice());
}

#[test]
fn can_reject_invalid_threshold_set_directly() {
    let config = RankingConfig { insertion_threshold: 1, ..RankingConfig::default() };
    let mut engine = MergeNonDominatedSort::new(config);

    let result = engine.compute_ranking(vec![vec![1., 2.], vec![2., 1.]].as_slice()).map(|_| ());

    assert_eq!(result, Err("insertion threshold should be at least 2, got 1".into()));
    assert!(!engine.has_snapshot());
}
