//! Specifies configuration of the ranking engine and replacement.

#[cfg(test)]
#[path = "../tests/unit/config_test.rs"]
mod config_test;

use crate::algorithms::mnds::DEFAULT_INSERTION_THRESHOLD;
use crate::replacement::RemovalPolicy;
use crate::utils::{GenericResult, InfoLogger};

/// A configuration which controls ranking and replacement behavior.
#[derive(Clone)]
pub struct RankingConfig {
    /// Size of a range below which merge sort falls back to insertion sort.
    pub insertion_threshold: usize,
    /// Stops objective passes as soon as no dominance is left in population.
    pub early_detection: bool,
    /// A policy used to truncate the last front which does not fit into population.
    pub removal_policy: RemovalPolicy,
    /// An optional logger.
    pub logger: Option<InfoLogger>,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            insertion_threshold: DEFAULT_INSERTION_THRESHOLD,
            early_detection: true,
            removal_policy: RemovalPolicy::default(),
            logger: None,
        }
    }
}

impl RankingConfig {
    /// Writes a message into logger, if it is set. The message is built only when it is needed.
    pub(crate) fn log<F: FnOnce() -> String>(&self, message_fn: F) {
        if let Some(logger) = &self.logger {
            (logger)(message_fn().as_str())
        }
    }
}

/// Provides configurable way to build ranking configuration using fluent interface style.
#[derive(Default)]
pub struct RankingConfigBuilder {
    insertion_threshold: Option<usize>,
    early_detection: Option<bool>,
    removal_policy: Option<RemovalPolicy>,
    logger: Option<InfoLogger>,
}

impl RankingConfigBuilder {
    /// Sets size of a range below which insertion sort is used. Default is 7, minimum is 2.
    pub fn with_insertion_threshold(mut self, threshold: usize) -> Self {
        self.insertion_threshold = Some(threshold);
        self
    }

    /// Enables or disables non-domination early detection. Default is enabled.
    pub fn with_early_detection(mut self, enabled: bool) -> Self {
        self.early_detection = Some(enabled);
        self
    }

    /// Sets removal policy used by replacement. Default is one-shot.
    pub fn with_removal_policy(mut self, policy: RemovalPolicy) -> Self {
        self.removal_policy = Some(policy);
        self
    }

    /// Sets logger.
    pub fn with_logger(mut self, logger: InfoLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Builds a configuration validating its parameters.
    pub fn build(self) -> GenericResult<RankingConfig> {
        let default = RankingConfig::default();

        let insertion_threshold =
            validate_insertion_threshold(self.insertion_threshold.unwrap_or(default.insertion_threshold))?;

        Ok(RankingConfig {
            insertion_threshold,
            early_detection: self.early_detection.unwrap_or(default.early_detection),
            removal_policy: self.removal_policy.unwrap_or(default.removal_policy),
            logger: self.logger,
        })
    }
}

/// Checks that insertion sort threshold leaves merge sort at least two elements to split.
pub(crate) fn validate_insertion_threshold(threshold: usize) -> GenericResult<usize> {
    if threshold < 2 {
        return Err(format!("insertion threshold should be at least 2, got {threshold}").into());
    }

    Ok(threshold)
}
