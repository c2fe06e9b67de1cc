//! Z-statistic family.
//!
//! For a cell with observed count `T`, expected count `P` and total `N`,
//! `t = T / N` and `p = P / N` are the observed and expected proportions.
//! See Voas & Williamson (2001), Geographical and Environmental Modelling
//! 5(2), 177-200.

use crate::schema::Matrix;

use super::{GoodnessOfFit, StatisticsError, ensure_same_shape, ensure_usable_total};

/// Z-score of one cell, with continuity correction.
///
/// An empty expected cell is scored against a proportion of `1 / N`
/// instead, without correction. Equal proportions score exactly 0.
pub fn z_score(observed: f64, expected: f64, total: f64) -> f64 {
    let t = observed / total;
    let p = expected / total;

    if p == 0.0 {
        let p = 1.0 / total;
        return t / (p * (1.0 - p) / total).sqrt();
    }

    let correction = 1.0 / (2.0 * total);
    let numerator = if t - p > 0.0 {
        (t - p) - correction
    } else if t - p < 0.0 {
        (t - p) + correction
    } else {
        return 0.0;
    };

    numerator / (p * (1.0 - p) / total).sqrt()
}

fn sum_scores(
    calib: &Matrix,
    test: &Matrix,
    total: f64,
    score: impl Fn(f64) -> f64,
) -> Result<f64, StatisticsError> {
    ensure_same_shape(calib, test)?;
    ensure_usable_total(total)?;

    let sum: f64 = calib
        .zip_cells(test)
        .map(|(c, t)| score(z_score(t, c, total)))
        .sum();

    // Cells with p == 1 divide zero by zero
    if sum.is_nan() { Ok(0.0) } else { Ok(sum) }
}

/// Sum of cell z-scores.
///
/// Signed, so over- and under-estimates cancel. No score is treated as perfect.
#[derive(Debug, Clone, Copy, Default)]
pub struct Z;

impl GoodnessOfFit for Z {
    fn name(&self) -> &'static str {
        "Z"
    }

    fn field_name(&self) -> &'static str {
        "Z"
    }

    fn test(&self, calib: &Matrix, test: &Matrix) -> Result<f64, StatisticsError> {
        self.test_with_total(calib, test, calib.total())
    }

    fn test_with_total(
        &self,
        calib: &Matrix,
        test: &Matrix,
        total: f64,
    ) -> Result<f64, StatisticsError> {
        sum_scores(calib, test, total, |z| z)
    }

    fn is_perfect(&self, _stat: f64) -> bool {
        false
    }
}

/// Sum of squared cell z-scores. No score is treated as perfect.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZSquared;

impl GoodnessOfFit for ZSquared {
    fn name(&self) -> &'static str {
        "Z squared"
    }

    fn field_name(&self) -> &'static str {
        "Z sq"
    }

    fn test(&self, calib: &Matrix, test: &Matrix) -> Result<f64, StatisticsError> {
        self.test_with_total(calib, test, calib.total())
    }

    fn test_with_total(
        &self,
        calib: &Matrix,
        test: &Matrix,
        total: f64,
    ) -> Result<f64, StatisticsError> {
        sum_scores(calib, test, total, |z| z * z)
    }

    fn is_perfect(&self, _stat: f64) -> bool {
        false
    }
}
