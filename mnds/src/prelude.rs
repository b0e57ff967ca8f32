//! This module reimports a common used types.

pub use crate::RankedSolution;

pub use crate::algorithms::mnds::MergeNonDominatedSort;
pub use crate::algorithms::mnds::Ranking;
pub use crate::algorithms::mnds::RankingStatistics;

pub use crate::config::RankingConfig;
pub use crate::config::RankingConfigBuilder;

pub use crate::density::CrowdingDistance;
pub use crate::density::DensityEstimator;

pub use crate::replacement::RankingAndDensityReplacement;
pub use crate::replacement::RemovalPolicy;

pub use crate::utils::compare_floats;
pub use crate::utils::dominance_order;
pub use crate::utils::Float;
pub use crate::utils::InfoLogger;
pub use crate::utils::{GenericError, GenericResult};
