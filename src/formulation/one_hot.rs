//! One-hot indicator families.
//!
//! A family of binaries of which exactly one is 1 encodes an index.
//! The same reduction appears twice: as a linear expression
//! `Σ_i w(i)·ind[i]` when building finish bounds, and as a value
//! `Σ_i i·ind[i]` when recovering a start period from a solved
//! assignment.

use crate::lp::{LinearExpr, VarId};

/// Indicator values at or above this count as set.
pub const SET_THRESHOLD: f64 = 0.5;

/// `Σ_i weight(i) · vars[i]`, with `i` the position in `vars`.
pub fn weighted_sum(vars: impl IntoIterator<Item = VarId>, weight: impl Fn(usize) -> f64) -> LinearExpr {
    let mut expr = LinearExpr::new();
    for (i, var) in vars.into_iter().enumerate() {
        expr.add_term(var, weight(i));
    }
    expr
}

/// Decoded indicator family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OneHot {
    /// Number of indicators at or above [`SET_THRESHOLD`].
    pub active: usize,
    /// `Σ_i i · round(ind[i])`.
    pub weighted_index: f64,
}

impl OneHot {
    /// Whether any indicator is set.
    #[inline]
    pub fn is_set(&self) -> bool {
        self.active > 0
    }

    /// The encoded index, when exactly one indicator is set.
    pub fn index(&self) -> Option<usize> {
        (self.active == 1).then_some(self.weighted_index as usize)
    }
}

/// Decodes solver values of an indicator family, in index order.
///
/// Values are rounded to the nearest integer first, so solver noise
/// around 0 and 1 does not leak into the index.
pub fn decode(values: &[f64]) -> OneHot {
    let mut active = 0;
    let mut weighted_index = 0.0;
    for (i, &value) in values.iter().enumerate() {
        if value >= SET_THRESHOLD {
            active += 1;
        }
        weighted_index += value.round() * i as f64;
    }
    OneHot {
        active,
        weighted_index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weighted_sum() {
        let expr = weighted_sum([VarId(4), VarId(5), VarId(6)], |i| i as f64 + 3.0);
        assert_eq!(expr.terms, vec![(VarId(4), 3.0), (VarId(5), 4.0), (VarId(6), 5.0)]);
        assert!((expr.constant - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_weighted_sum_drops_zero_weight() {
        let expr = weighted_sum([VarId(0), VarId(1)], |i| i as f64);
        assert_eq!(expr.terms, vec![(VarId(1), 1.0)]);
    }

    #[test]
    fn test_decode_single() {
        let hot = decode(&[0.0, 0.0, 1.0, 0.0]);
        assert!(hot.is_set());
        assert_eq!(hot.active, 1);
        assert_eq!(hot.index(), Some(2));
    }

    #[test]
    fn test_decode_noise() {
        let hot = decode(&[1e-9, 0.9999999, -1e-12, 2e-8]);
        assert_eq!(hot.index(), Some(1));
    }

    #[test]
    fn test_decode_empty_and_multiple() {
        let none = decode(&[0.0, 0.0]);
        assert!(!none.is_set());
        assert_eq!(none.index(), None);
        assert!((none.weighted_index - 0.0).abs() < 1e-10);

        let two = decode(&[0.0, 1.0, 1.0]);
        assert_eq!(two.active, 2);
        assert_eq!(two.index(), None);
        assert!((two.weighted_index - 3.0).abs() < 1e-10);
    }
}
