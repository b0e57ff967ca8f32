//! This module contains a replacement which selects survivors of a joint population using
//! non-dominated sorting and a density estimator.

mod ranking_density;
pub use self::ranking_density::RankingAndDensityReplacement;

/// Specifies how the last front which does not fit into population is truncated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RemovalPolicy {
    /// Density is estimated once, front members are sorted by preference and a prefix is taken.
    #[default]
    OneShot,
    /// The least preferred member is removed and density is re-estimated until the front fits.
    Sequential,
}
