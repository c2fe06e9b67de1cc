//! Candidate solutions: a genome plus its memoized fitness.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::compute::statistics::GoodnessOfFit;

use super::{EvolutionError, EvolutionRng, Gene, Problem};

/// One member of the population.
///
/// Fitness is computed at most once. After it has been cached the genome
/// is frozen: [`Candidate::mutate`] refuses to run, so the cached score can
/// never go stale.
///
/// Equality and hashing compare genomes only, which is what selection
/// uses to keep duplicate genomes out of the elite pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate<G> {
    genes: Vec<G>,
    #[serde(default)]
    fitness: Option<f64>,
}

impl<G: Gene> Candidate<G> {
    /// Wrap a gene sequence. The candidate starts unevaluated.
    pub fn new(genes: Vec<G>) -> Self {
        Self {
            genes,
            fitness: None,
        }
    }

    pub fn genes(&self) -> &[G] {
        &self.genes
    }

    pub fn into_genes(self) -> Vec<G> {
        self.genes
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Cached fitness, if evaluated.
    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    /// Fitness of this candidate, computing and caching it on first call.
    pub fn evaluate<P>(
        &mut self,
        problem: &P,
        gof: &dyn GoodnessOfFit,
    ) -> Result<f64, EvolutionError>
    where
        P: Problem<Gene = G> + ?Sized,
    {
        if let Some(fitness) = self.fitness {
            return Ok(fitness);
        }
        let fitness = problem.calculate_fitness(&self.genes, gof)?;
        self.fitness = Some(fitness);
        Ok(fitness)
    }

    /// Assemble a child gene sequence from this candidate and `partner`.
    ///
    /// Every index below the shorter parent's length plus one is kept.
    /// Beyond that a coin flip per index may end the child early, so
    /// children of unequal parents lean towards the shorter length. At each
    /// kept index a second coin picks which parent's gene is preferred,
    /// falling back to the other parent where the preferred one is too
    /// short. Genes are cloned, never shared.
    pub fn crossover(&self, partner: &Self, rng: &mut EvolutionRng) -> Vec<G> {
        let min = self.genes.len().min(partner.genes.len());
        let max = self.genes.len().max(partner.genes.len());

        let mut genes = Vec::with_capacity(max);
        for i in 0..max {
            if i > min && rng.coin() {
                break;
            }

            let (preferred, fallback) = if rng.coin() {
                (&self.genes, &partner.genes)
            } else {
                (&partner.genes, &self.genes)
            };

            if let Some(gene) = preferred.get(i).or_else(|| fallback.get(i)) {
                genes.push(gene.clone());
            }
        }
        genes
    }

    /// Breed with `partner`, letting the problem build the child.
    ///
    /// The child is unevaluated.
    pub fn breed<P>(
        &self,
        partner: &Self,
        problem: &P,
        rng: &mut EvolutionRng,
    ) -> Result<Self, EvolutionError>
    where
        P: Problem<Gene = G> + ?Sized,
    {
        let genes = self.crossover(partner, rng);
        problem.assemble(genes)
    }

    /// Mutate one uniformly chosen gene. No-op on an empty genome.
    ///
    /// Fails with [`EvolutionError::AlreadyEvaluated`] once fitness has
    /// been cached.
    pub fn mutate(&mut self, rng: &mut EvolutionRng) -> Result<(), EvolutionError> {
        if self.is_evaluated() {
            return Err(EvolutionError::AlreadyEvaluated);
        }
        if !self.genes.is_empty() {
            let index = rng.index(self.genes.len());
            self.genes[index].mutate(rng);
        }
        Ok(())
    }
}

impl<G: PartialEq> PartialEq for Candidate<G> {
    fn eq(&self, other: &Self) -> bool {
        self.genes == other.genes
    }
}

impl<G: Eq> Eq for Candidate<G> {}

impl<G: Hash> Hash for Candidate<G> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.genes.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::statistics::Tae;
    use crate::schema::Matrix;
    use proptest::prelude::*;
    use std::cell::Cell;
    use std::collections::HashSet;

    /// Gene with heap storage so aliasing would be observable.
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    struct BoxedGene(Box<i64>);

    impl Gene for BoxedGene {
        fn mutate(&mut self, _rng: &mut EvolutionRng) {
            *self.0 += 1;
        }
    }

    struct SumProblem {
        reference: Matrix,
        calls: Cell<usize>,
    }

    impl SumProblem {
        fn new() -> Self {
            Self {
                reference: Matrix::zeros(1, 1),
                calls: Cell::new(0),
            }
        }
    }

    impl Problem for SumProblem {
        type Gene = BoxedGene;

        fn populate(&self, _rng: &mut EvolutionRng) -> Result<Vec<BoxedGene>, EvolutionError> {
            Ok(vec![BoxedGene(Box::new(0))])
        }

        fn reference(&self) -> &Matrix {
            &self.reference
        }

        fn project(&self, genes: &[BoxedGene]) -> Result<Matrix, EvolutionError> {
            self.calls.set(self.calls.get() + 1);
            let sum: i64 = genes.iter().map(|g| *g.0).sum();
            Ok(Matrix::from_vec(1, 1, vec![sum as f64])?)
        }
    }

    fn candidate(values: &[i64]) -> Candidate<BoxedGene> {
        Candidate::new(values.iter().map(|&v| BoxedGene(Box::new(v))).collect())
    }

    #[test]
    fn test_fitness_is_memoized() {
        let problem = SumProblem::new();
        let mut c = candidate(&[1, -4, 2]);

        assert!(!c.is_evaluated());
        let first = c.evaluate(&problem, &Tae).unwrap();
        let second = c.evaluate(&problem, &Tae).unwrap();

        assert_eq!(first.to_bits(), second.to_bits());
        assert!((first - 1.0).abs() < 1e-12);
        assert_eq!(problem.calls.get(), 1);
        assert_eq!(c.fitness(), Some(first));
    }

    #[test]
    fn test_mutate_after_evaluation_is_rejected() {
        let problem = SumProblem::new();
        let mut rng = EvolutionRng::new(1);
        let mut c = candidate(&[5]);

        c.mutate(&mut rng).unwrap();
        assert_eq!(*c.genes()[0].0, 6);

        c.evaluate(&problem, &Tae).unwrap();
        assert!(matches!(
            c.mutate(&mut rng),
            Err(EvolutionError::AlreadyEvaluated)
        ));
        assert_eq!(*c.genes()[0].0, 6);
    }

    #[test]
    fn test_mutate_empty_genome() {
        let mut rng = EvolutionRng::new(1);
        let mut c = candidate(&[]);
        assert!(c.mutate(&mut rng).is_ok());
        assert!(c.is_empty());
    }

    #[test]
    fn test_equal_length_parents() {
        let mut rng = EvolutionRng::new(3);
        let a = candidate(&[1, 2, 3, 4]);
        let b = candidate(&[10, 20, 30, 40]);

        for _ in 0..50 {
            let child = a.crossover(&b, &mut rng);
            assert_eq!(child.len(), 4);
            for (i, gene) in child.iter().enumerate() {
                assert!(*gene == a.genes()[i] || *gene == b.genes()[i]);
            }
        }
    }

    #[test]
    fn test_breeding_with_empty_partner() {
        let mut rng = EvolutionRng::new(9);
        let a = candidate(&[1, 2, 3]);
        let empty = candidate(&[]);

        for _ in 0..50 {
            let child = empty.crossover(&a, &mut rng);
            assert!(!child.is_empty());
            assert_eq!(child[..], a.genes()[..child.len()]);
        }
    }

    #[test]
    fn test_child_is_fresh_and_independent() {
        let problem = SumProblem::new();
        let mut rng = EvolutionRng::new(11);
        let mut a = candidate(&[1, 2]);
        a.evaluate(&problem, &Tae).unwrap();
        let b = candidate(&[3, 4]);

        let mut child = a.breed(&b, &problem, &mut rng).unwrap();
        assert!(!child.is_evaluated());

        child.mutate(&mut rng).unwrap();
        child.mutate(&mut rng).unwrap();
        assert_eq!(a, candidate(&[1, 2]));
        assert_eq!(b, candidate(&[3, 4]));
    }

    #[test]
    fn test_structural_equality_and_hash() {
        let problem = SumProblem::new();
        let mut a = candidate(&[1, 2]);
        let b = candidate(&[1, 2]);
        let c = candidate(&[1, 2, 0]);
        a.evaluate(&problem, &Tae).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    proptest! {
        #[test]
        fn prop_child_length_and_no_aliasing(
            left in prop::collection::vec(-100i64..100, 0..12),
            right in prop::collection::vec(-100i64..100, 0..12),
            seed in any::<u64>(),
        ) {
            prop_assume!(!left.is_empty() || !right.is_empty());
            let a = candidate(&left);
            let b = candidate(&right);
            let mut rng = EvolutionRng::new(seed);

            let child = a.crossover(&b, &mut rng);
            let min = left.len().min(right.len());
            let max = left.len().max(right.len());
            prop_assert!(child.len() >= min && child.len() <= max);

            for gene in &child {
                for parent in a.genes().iter().chain(b.genes()) {
                    prop_assert!(!std::ptr::eq(&*gene.0, &*parent.0));
                }
            }
        }
    }
}
