use super::*;
use std::sync::{Arc, Mutex};

#[test]
fn can_create_default_config() {
    let config = RankingConfig::default();

    assert_eq!(config.insertion_threshold, DEFAULT_INSERTION_THRESHOLD);
    assert!(config.early_detection);
    assert_eq!(config.removal_policy, RemovalPolicy::OneShot);
    assert!(config.logger.is_none());
}

#[test]
fn can_build_config() {
    let config = RankingConfigBuilder::default()
        .with_insertion_threshold(2)
        .with_early_detection(false)
        .with_removal_policy(RemovalPolicy::Sequential)
        .build()
        .expect("cannot build config");

    assert_eq!(config.insertion_threshold, 2);
    assert!(!config.early_detection);
    assert_eq!(config.removal_policy, RemovalPolicy::Sequential);
}

parameterized_test! {can_validate_insertion_threshold, (threshold, expected), {
    let result = RankingConfigBuilder::default()
        .with_insertion_threshold(threshold)
        .build()
        .map(|config| config.insertion_threshold);

    assert_eq!(result, expected.map_err(|err: &str| err.into()));
}}

can_validate_insertion_threshold! {
    case_01_zero: (0, Err("insertion threshold should be at least 2, got 0")),
    case_02_one: (1, Err("insertion threshold should be at least 2, got 1")),
    case_03_two: (2, Ok(2)),
    case_04_large: (64, Ok(64)),
}

#[test]
fn can_log_messages_lazily() {
    let messages = Arc::new(Mutex::new(Vec::<String>::new()));
    let logger: InfoLogger = {
        let messages = messages.clone();
        Arc::new(move |message: &str| messages.lock().unwrap().push(message.to_string()))
    };
    let silent = RankingConfig::default();
    let verbose = RankingConfigBuilder::default().with_logger(logger).build().expect("cannot build config");

    silent.log(|| unreachable!("message should not be built without logger"));
    verbose.log(|| "ranked".to_string());

    assert_eq!(messages.lock().unwrap().as_slice(), &["ranked".to_string()]);
}
