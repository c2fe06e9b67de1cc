//! Matrix calibration: evolve a count matrix towards a reference.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::schema::{CalibrationConfig, Matrix};

use super::{Candidate, EvolutionError, EvolutionRng, Gene, Problem};

/// A single non-negative cell count.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CountGene {
    value: u32,
    max: u32,
    spread: u32,
}

impl CountGene {
    /// `spread` is the standard deviation of a mutation step, in counts.
    pub fn new(value: u32, max: u32, spread: u32) -> Self {
        Self {
            value: value.min(max),
            max,
            spread: spread.max(1),
        }
    }

    pub fn value(&self) -> u32 {
        self.value
    }
}

impl Gene for CountGene {
    /// Gaussian step of at least one count, clamped to `[0, max]`.
    fn mutate(&mut self, rng: &mut EvolutionRng) {
        let mut step = (rng.gaussian() * self.spread as f64).round() as i64;
        if step == 0 {
            step = if rng.coin() { 1 } else { -1 };
        }
        self.value = (self.value as i64 + step).clamp(0, self.max as i64) as u32;
    }
}

/// Fit a matrix of counts, one gene per cell in row-major order.
#[derive(Debug, Clone)]
pub struct MatrixCalibration {
    reference: Matrix,
    max_count: u32,
    spread: u32,
}

impl MatrixCalibration {
    /// `mutation_strength` is the mutation step as a fraction of `max_count`.
    pub fn new(reference: Matrix, max_count: u32, mutation_strength: f64) -> Self {
        let spread = (max_count as f64 * mutation_strength).round().max(1.0) as u32;
        Self {
            reference,
            max_count,
            spread,
        }
    }

    pub fn from_config(config: &CalibrationConfig) -> Self {
        Self::new(
            config.reference.clone(),
            config.max_count,
            config.mutation_strength,
        )
    }
}

impl Problem for MatrixCalibration {
    type Gene = CountGene;

    fn populate(&self, rng: &mut EvolutionRng) -> Result<Vec<CountGene>, EvolutionError> {
        let genes = (0..self.reference.len())
            .map(|_| CountGene::new(rng.gen_range(0..=self.max_count), self.max_count, self.spread))
            .collect();
        Ok(genes)
    }

    fn assemble(&self, genes: Vec<CountGene>) -> Result<Candidate<CountGene>, EvolutionError> {
        if genes.len() != self.reference.len() {
            return Err(EvolutionError::construction(format!(
                "calibration genome needs {} genes, got {}",
                self.reference.len(),
                genes.len()
            )));
        }
        Ok(Candidate::new(genes))
    }

    fn reference(&self) -> &Matrix {
        &self.reference
    }

    fn project(&self, genes: &[CountGene]) -> Result<Matrix, EvolutionError> {
        let data = genes.iter().map(|g| g.value as f64).collect();
        Ok(Matrix::from_vec(
            self.reference.rows(),
            self.reference.cols(),
            data,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::statistics::Tae;

    fn problem() -> MatrixCalibration {
        let reference = Matrix::from_rows(vec![vec![3.0, 0.0], vec![1.0, 4.0]]).unwrap();
        MatrixCalibration::new(reference, 5, 0.2)
    }

    #[test]
    fn test_populate_matches_reference_shape() {
        let problem = problem();
        let mut rng = EvolutionRng::new(5);
        let genes = problem.populate(&mut rng).unwrap();

        assert_eq!(genes.len(), 4);
        assert!(genes.iter().all(|g| g.value() <= 5));
    }

    #[test]
    fn test_mutation_stays_in_bounds() {
        let mut rng = EvolutionRng::new(8);
        let mut gene = CountGene::new(0, 3, 10);
        for _ in 0..500 {
            let before = gene.value();
            gene.mutate(&mut rng);
            assert!(gene.value() <= 3);
            // Away from the bounds a mutation always moves the count
            if before > 0 && before < 3 {
                assert_ne!(gene.value(), before);
            }
        }
    }

    #[test]
    fn test_project_and_score() {
        let problem = problem();
        let genes: Vec<_> = [3, 1, 1, 4]
            .iter()
            .map(|&v| CountGene::new(v, 5, 1))
            .collect();

        let projected = problem.project(&genes).unwrap();
        assert_eq!(projected.as_slice(), &[3.0, 1.0, 1.0, 4.0]);

        let fitness = problem.calculate_fitness(&genes, &Tae).unwrap();
        assert!((fitness - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_assemble_rejects_wrong_length() {
        let problem = problem();
        let genes = vec![CountGene::new(1, 5, 1); 3];
        assert!(matches!(
            problem.assemble(genes),
            Err(EvolutionError::Construction(_))
        ));
    }

    #[test]
    fn test_project_rejects_wrong_length() {
        let problem = problem();
        let genes = vec![CountGene::new(1, 5, 1); 5];
        assert!(matches!(
            problem.project(&genes),
            Err(EvolutionError::Projection(_))
        ));
    }
}
