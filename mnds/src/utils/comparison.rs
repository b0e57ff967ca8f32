#[cfg(test)]
#[path = "../../tests/unit/utils/comparison_test.rs"]
mod comparison_test;

use crate::utils::Float;
use std::cmp::Ordering;

/// Compares floating point numbers. NaN is considered to be greater than any other value.
#[inline]
pub fn compare_floats(a: Float, b: Float) -> Ordering {
    match a.partial_cmp(&b) {
        Some(ordering) => ordering,
        None => match (a.is_nan(), b.is_nan()) {
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            _ => Ordering::Equal,
        },
    }
}

/// Calculates Pareto dominance order of two objective vectors where all objectives are minimized.
/// Returns `Ordering::Less` if `a` dominates `b`, `Ordering::Greater` if `b` dominates `a` and
/// `Ordering::Equal` if they are mutually non-dominated or equal.
pub fn dominance_order(a: &[Float], b: &[Float]) -> Ordering {
    let mut less_cnt = 0;
    let mut greater_cnt = 0;

    for (a, b) in a.iter().zip(b.iter()) {
        match compare_floats(*a, *b) {
            Ordering::Less => less_cnt += 1,
            Ordering::Greater => greater_cnt += 1,
            Ordering::Equal => {}
        }
    }

    if less_cnt > 0 && greater_cnt == 0 {
        Ordering::Less
    } else if greater_cnt > 0 && less_cnt == 0 {
        Ordering::Greater
    } else {
        debug_assert!((less_cnt > 0 && greater_cnt > 0) || (less_cnt == 0 && greater_cnt == 0));
        Ordering::Equal
    }
}
