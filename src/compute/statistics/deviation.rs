//! Squared-deviation statistics: SRMSE and R².

use crate::schema::Matrix;

use super::{GoodnessOfFit, StatisticsError, ensure_same_shape, ensure_usable_total};

/// Standardised root mean square error.
///
/// RMSE over all cells divided by the mean reference cell value.
#[derive(Debug, Clone, Copy, Default)]
pub struct Srmse;

impl GoodnessOfFit for Srmse {
    fn name(&self) -> &'static str {
        "Standardised Root Mean Square Error"
    }

    fn field_name(&self) -> &'static str {
        "SRMSE"
    }

    fn test(&self, calib: &Matrix, test: &Matrix) -> Result<f64, StatisticsError> {
        ensure_same_shape(calib, test)?;
        let total = calib.total();
        ensure_usable_total(total)?;

        let cells = calib.len() as f64;
        let squared: f64 = calib.zip_cells(test).map(|(c, t)| (c - t).powi(2)).sum();
        let rmse = (squared / cells).sqrt();

        Ok(rmse / (total / cells))
    }

    fn is_perfect(&self, stat: f64) -> bool {
        stat == 0.0
    }
}

/// Coefficient of determination (squared Pearson correlation).
///
/// Ranges over `[0, 1]`; higher is better. Scores 0 when either matrix has
/// no variance.
#[derive(Debug, Clone, Copy, Default)]
pub struct RSquared;

impl GoodnessOfFit for RSquared {
    fn name(&self) -> &'static str {
        "Coefficient of Determination"
    }

    fn field_name(&self) -> &'static str {
        "R2"
    }

    fn test(&self, calib: &Matrix, test: &Matrix) -> Result<f64, StatisticsError> {
        ensure_same_shape(calib, test)?;
        if calib.is_empty() {
            return Ok(0.0);
        }

        let cells = calib.len() as f64;
        let mean_c = calib.total() / cells;
        let mean_t = test.total() / cells;

        let (mut covariance, mut var_c, mut var_t) = (0.0, 0.0, 0.0);
        for (c, t) in calib.zip_cells(test) {
            let dc = c - mean_c;
            let dt = t - mean_t;
            covariance += dc * dt;
            var_c += dc * dc;
            var_t += dt * dt;
        }

        if var_c <= 0.0 || var_t <= 0.0 {
            return Ok(0.0);
        }

        let r = covariance / (var_c * var_t).sqrt();
        Ok(r * r)
    }

    fn lower_is_better(&self) -> bool {
        false
    }

    fn is_perfect(&self, stat: f64) -> bool {
        stat >= 1.0 - 1e-12
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_srmse() {
        let calib = Matrix::from_rows(vec![vec![2.0, 0.0], vec![1.0, 1.0]]).unwrap();
        let test = Matrix::from_rows(vec![vec![1.0, 1.0], vec![1.0, 1.0]]).unwrap();

        let srmse = Srmse.test(&calib, &test).unwrap();
        assert!((srmse - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
        assert!(Srmse.is_perfect(Srmse.test(&calib, &calib).unwrap()));
    }

    #[test]
    fn test_srmse_degenerate_reference() {
        let zeros = Matrix::zeros(2, 2);
        assert_eq!(
            Srmse.test(&zeros, &zeros),
            Err(StatisticsError::DegenerateTotal(0.0))
        );
    }

    #[test]
    fn test_r_squared() {
        let calib = Matrix::from_rows(vec![vec![1.0, 2.0, 3.0]]).unwrap();
        let test = Matrix::from_rows(vec![vec![1.0, 3.0, 2.0]]).unwrap();
        assert!((RSquared.test(&calib, &test).unwrap() - 0.25).abs() < 1e-12);

        let scaled = Matrix::from_rows(vec![vec![2.0, 4.0, 6.0]]).unwrap();
        let r2 = RSquared.test(&calib, &scaled).unwrap();
        assert!(RSquared.is_perfect(r2));
        assert!(!RSquared.lower_is_better());
    }

    #[test]
    fn test_r_squared_without_variance() {
        let calib = Matrix::from_rows(vec![vec![1.0, 2.0, 3.0]]).unwrap();
        let flat = Matrix::from_rows(vec![vec![5.0, 5.0, 5.0]]).unwrap();
        assert_eq!(RSquared.test(&calib, &flat).unwrap(), 0.0);
    }
}
