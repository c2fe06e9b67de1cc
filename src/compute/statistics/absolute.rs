//! Absolute error statistics.

use crate::schema::Matrix;

use super::{GoodnessOfFit, StatisticsError, absolute_error_and_total, ensure_same_shape};

/// Total absolute error: `Σ|C - T|`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tae;

impl GoodnessOfFit for Tae {
    fn name(&self) -> &'static str {
        "Total Absolute Error"
    }

    fn field_name(&self) -> &'static str {
        "TAE"
    }

    fn test(&self, calib: &Matrix, test: &Matrix) -> Result<f64, StatisticsError> {
        ensure_same_shape(calib, test)?;
        let (error, _) = absolute_error_and_total(calib, test);
        Ok(error)
    }

    fn is_perfect(&self, stat: f64) -> bool {
        stat == 0.0
    }
}

/// Total error: `Σ|C - T| / 2`.
///
/// Halving counts a misclassified unit once rather than once for the cell it
/// is missing from and again for the cell it was wrongly placed in.
#[derive(Debug, Clone, Copy, Default)]
pub struct TotalError;

impl GoodnessOfFit for TotalError {
    fn name(&self) -> &'static str {
        "Total Error"
    }

    fn field_name(&self) -> &'static str {
        "TE"
    }

    fn test(&self, calib: &Matrix, test: &Matrix) -> Result<f64, StatisticsError> {
        ensure_same_shape(calib, test)?;
        let (error, _) = absolute_error_and_total(calib, test);
        Ok(error / 2.0)
    }

    fn is_perfect(&self, stat: f64) -> bool {
        stat == 0.0
    }
}

/// Standardised absolute error: `Σ|C - T| / ΣC`.
///
/// Scores 0 when the reference total is zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sae;

impl GoodnessOfFit for Sae {
    fn name(&self) -> &'static str {
        "Standard Absolute Error"
    }

    fn field_name(&self) -> &'static str {
        "SAE"
    }

    fn test(&self, calib: &Matrix, test: &Matrix) -> Result<f64, StatisticsError> {
        ensure_same_shape(calib, test)?;
        let (error, total) = absolute_error_and_total(calib, test);
        if total > 0.0 && error > 0.0 {
            Ok(error / total)
        } else {
            Ok(0.0)
        }
    }

    fn is_perfect(&self, stat: f64) -> bool {
        stat == 0.0
    }
}
