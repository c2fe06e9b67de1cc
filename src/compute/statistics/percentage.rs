//! Percentage error statistics.

use crate::schema::Matrix;

use super::{GoodnessOfFit, StatisticsError, absolute_error_and_total, ensure_same_shape};

/// Percentage of misclassified counts: `(Σ|C - T| / 2) / ΣC * 100`.
///
/// A zero reference total with any error scores 100.
#[derive(Debug, Clone, Copy, Default)]
pub struct PercentageError;

impl GoodnessOfFit for PercentageError {
    fn name(&self) -> &'static str {
        "Percentage Error"
    }

    fn field_name(&self) -> &'static str {
        "PE"
    }

    fn test(&self, calib: &Matrix, test: &Matrix) -> Result<f64, StatisticsError> {
        ensure_same_shape(calib, test)?;
        let (error, total) = absolute_error_and_total(calib, test);
        let score = if total > 0.0 && error > 0.0 {
            (error / 2.0) / total * 100.0
        } else if total == 0.0 && error > 0.0 {
            100.0
        } else {
            0.0
        };
        Ok(score)
    }

    fn is_perfect(&self, stat: f64) -> bool {
        stat == 0.0
    }
}

/// Cell percentage error: `Σ|C - T| / ΣC * 100`.
///
/// A zero reference total with any error scores `Σ|C - T| * 100`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CellPercentageError;

impl GoodnessOfFit for CellPercentageError {
    fn name(&self) -> &'static str {
        "Cell Percentage Error"
    }

    fn field_name(&self) -> &'static str {
        "CPE"
    }

    fn test(&self, calib: &Matrix, test: &Matrix) -> Result<f64, StatisticsError> {
        ensure_same_shape(calib, test)?;
        let (error, total) = absolute_error_and_total(calib, test);
        let score = if total > 0.0 && error > 0.0 {
            error / total * 100.0
        } else if total == 0.0 && error > 0.0 {
            error * 100.0
        } else {
            0.0
        };
        Ok(score)
    }

    fn is_perfect(&self, stat: f64) -> bool {
        stat == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> (Matrix, Matrix) {
        (
            Matrix::from_rows(vec![vec![2.0, 0.0], vec![1.0, 1.0]]).unwrap(),
            Matrix::from_rows(vec![vec![1.0, 1.0], vec![1.0, 1.0]]).unwrap(),
        )
    }

    #[test]
    fn test_percentage_error() {
        let (calib, test) = pair();
        assert!((PercentageError.test(&calib, &test).unwrap() - 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_cell_percentage_error() {
        let (calib, test) = pair();
        assert!((CellPercentageError.test(&calib, &test).unwrap() - 50.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_reference_total() {
        let (_, test) = pair();
        let zeros = Matrix::zeros(2, 2);

        assert_eq!(PercentageError.test(&zeros, &test).unwrap(), 100.0);
        assert_eq!(CellPercentageError.test(&zeros, &test).unwrap(), 400.0);
        assert_eq!(PercentageError.test(&zeros, &zeros).unwrap(), 0.0);
        assert!(CellPercentageError.is_perfect(0.0));
    }
}
