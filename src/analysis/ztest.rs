//! Pooled two-proportion z-test.

use statrs::distribution::{ContinuousCDF, Normal};

/// Outcome of one test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZTest {
    pub z: f64,
    /// Two-sided p-value.
    pub p_value: f64,
}

/// Compare `x1/n1` with `x2/n2` under the pooled-variance normal approximation.
///
/// Returns `None` when either sample is empty or the pooled standard error is
/// zero, since the statistic is undefined there.
#[must_use]
pub fn two_proportion_ztest(x1: f64, n1: f64, x2: f64, n2: f64) -> Option<ZTest> {
    if n1 <= 0.0 || n2 <= 0.0 {
        return None;
    }
    let p1 = x1 / n1;
    let p2 = x2 / n2;
    let pooled = (x1 + x2) / (n1 + n2);
    let se = (pooled * (1.0 - pooled) * (1.0 / n1 + 1.0 / n2)).sqrt();
    if !se.is_finite() || se <= 0.0 {
        return None;
    }

    let z = (p1 - p2) / se;
    let normal = Normal::new(0.0, 1.0).ok()?;
    let p_value = 2.0 * normal.sf(z.abs());
    Some(ZTest { z, p_value })
}

/// Whether the two proportions differ at level `alpha`.
///
/// Zero counts and samples smaller than `min_sample` are never significant.
#[must_use]
pub fn is_significant(x1: f64, n1: f64, x2: f64, n2: f64, alpha: f64, min_sample: f64) -> bool {
    if n1 < min_sample || n2 < min_sample {
        return false;
    }
    if [x1, n1, x2, n2].iter().any(|v| *v == 0.0) {
        return false;
    }
    two_proportion_ztest(x1, n1, x2, n2).is_some_and(|t| t.p_value < alpha)
}
