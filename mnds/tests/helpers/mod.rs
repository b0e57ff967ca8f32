
pub mod solution;
