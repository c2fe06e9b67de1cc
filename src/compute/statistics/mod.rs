//! Goodness-of-fit statistics used as fitness evaluators.
//!
//! Each statistic compares a reference (calibration) matrix against a
//! candidate (test) matrix of the same shape and reduces the pair to one
//! scalar. Statistics declare their own optimisation direction through
//! [`GoodnessOfFit::lower_is_better`]; the engine never assumes one.
//!
//! # Catalog
//!
//! - `Srmse`: standardised root mean square error (default)
//! - `RSquared`: squared correlation, the only higher-is-better statistic
//! - `Tae`, `TotalError`, `Sae`: absolute error sums
//! - `PercentageError`, `CellPercentageError`: percentage errors
//! - `Z`, `ZSquared`: z-statistic family (Voas & Williamson, 2001)

use std::fmt;

use crate::schema::{Matrix, Statistic};

mod absolute;
mod deviation;
mod percentage;
mod zscore;

pub use absolute::{Sae, Tae, TotalError};
pub use deviation::{RSquared, Srmse};
pub use percentage::{CellPercentageError, PercentageError};
pub use zscore::{Z, ZSquared, z_score};

/// A goodness-of-fit statistic comparing two equal-shaped matrices.
///
/// Implementations are stateless and shared read-only across a run.
pub trait GoodnessOfFit: fmt::Debug + Send + Sync {
    /// Human readable name.
    fn name(&self) -> &'static str;

    /// Short column/field label.
    fn field_name(&self) -> &'static str;

    /// Score `test` against the reference `calib`.
    fn test(&self, calib: &Matrix, test: &Matrix) -> Result<f64, StatisticsError>;

    /// Score with a precomputed normalising total.
    ///
    /// Statistics that have no use for a total ignore it.
    fn test_with_total(
        &self,
        calib: &Matrix,
        test: &Matrix,
        total: f64,
    ) -> Result<f64, StatisticsError> {
        let _ = total;
        self.test(calib, test)
    }

    /// Whether smaller scores are better fits.
    fn lower_is_better(&self) -> bool {
        true
    }

    /// Whether a score represents a perfect fit.
    fn is_perfect(&self, stat: f64) -> bool;
}

impl Statistic {
    /// Instantiate the statistic.
    pub fn build(self) -> Box<dyn GoodnessOfFit> {
        match self {
            Statistic::Srmse => Box::new(Srmse),
            Statistic::RSquared => Box::new(RSquared),
            Statistic::Tae => Box::new(Tae),
            Statistic::TotalError => Box::new(TotalError),
            Statistic::Sae => Box::new(Sae),
            Statistic::PercentageError => Box::new(PercentageError),
            Statistic::CellPercentageError => Box::new(CellPercentageError),
            Statistic::Z => Box::new(Z),
            Statistic::ZSquared => Box::new(ZSquared),
        }
    }
}

/// Errors raised while computing a statistic.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StatisticsError {
    #[error("Matrix shapes differ: reference is {reference:?}, candidate is {candidate:?}")]
    ShapeMismatch {
        reference: (usize, usize),
        candidate: (usize, usize),
    },
    #[error("Normalising total {0} must be finite and positive")]
    DegenerateTotal(f64),
}

fn ensure_same_shape(calib: &Matrix, test: &Matrix) -> Result<(), StatisticsError> {
    if calib.shape() != test.shape() {
        return Err(StatisticsError::ShapeMismatch {
            reference: calib.shape(),
            candidate: test.shape(),
        });
    }
    Ok(())
}

fn ensure_usable_total(total: f64) -> Result<(), StatisticsError> {
    if total.is_finite() && total > 0.0 {
        Ok(())
    } else {
        Err(StatisticsError::DegenerateTotal(total))
    }
}

/// Sum of absolute cell differences and the reference total.
fn absolute_error_and_total(calib: &Matrix, test: &Matrix) -> (f64, f64) {
    calib
        .zip_cells(test)
        .fold((0.0, 0.0), |(error, total), (c, t)| {
            (error + (c - t).abs(), total + c)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn matrix(rows: Vec<Vec<f64>>) -> Matrix {
        Matrix::from_rows(rows).unwrap()
    }

    #[test]
    fn test_shape_mismatch_for_every_statistic() {
        let calib = matrix(vec![vec![1.0, 2.0]]);
        let test = matrix(vec![vec![1.0], vec![2.0]]);

        for statistic in Statistic::ALL {
            let gof = statistic.build();
            assert_eq!(
                gof.test(&calib, &test),
                Err(StatisticsError::ShapeMismatch {
                    reference: (1, 2),
                    candidate: (2, 1),
                }),
                "{} accepted mismatched shapes",
                gof.name()
            );
        }
    }

    #[test]
    fn test_only_r_squared_is_higher_better() {
        for statistic in Statistic::ALL {
            let gof = statistic.build();
            assert_eq!(
                gof.lower_is_better(),
                statistic != Statistic::RSquared,
                "{}",
                gof.field_name()
            );
        }
    }

    proptest! {
        #[test]
        fn prop_identical_matrices_score_zero(
            cells in prop::collection::vec(0u32..100, 1..16),
        ) {
            let mut data: Vec<f64> = cells.iter().map(|&c| c as f64).collect();
            data[0] += 1.0;
            let m = Matrix::from_vec(1, data.len(), data).unwrap();

            for statistic in Statistic::ALL {
                let gof = statistic.build();
                if gof.lower_is_better() {
                    let score = gof.test(&m, &m).unwrap();
                    prop_assert!(score.abs() < 1e-9, "{} scored {}", gof.name(), score);
                }
            }
        }

        #[test]
        fn prop_total_error_is_half_tae(
            pairs in prop::collection::vec((0.0f64..50.0, 0.0f64..50.0), 1..16),
        ) {
            let calib = Matrix::from_vec(pairs.len(), 1, pairs.iter().map(|p| p.0).collect()).unwrap();
            let test = Matrix::from_vec(pairs.len(), 1, pairs.iter().map(|p| p.1).collect()).unwrap();

            let tae = Tae.test(&calib, &test).unwrap();
            let te = TotalError.test(&calib, &test).unwrap();
            prop_assert!(tae >= 0.0);
            prop_assert!((tae - 2.0 * te).abs() < 1e-9);
        }
    }
}
