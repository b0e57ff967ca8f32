//! This module contains ranking algorithms.

pub mod mnds;
