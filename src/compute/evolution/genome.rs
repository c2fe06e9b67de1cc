//! Genome contracts and the shared random source.
//!
//! A problem plugs into the engine by implementing [`Problem`] for a gene
//! type implementing [`Gene`]. All stochastic decisions in a run, including
//! gene mutation, draw from the engine's single [`EvolutionRng`].

use std::fmt;

use rand::prelude::*;
use rand_distr::StandardNormal;

use crate::compute::statistics::GoodnessOfFit;
use crate::schema::Matrix;

use super::{Candidate, EvolutionError};

/// Smallest mutable unit of a candidate's representation.
///
/// `Clone` must produce an independent value: mutating a clone never
/// affects the original. Equality must compare values, not identity.
pub trait Gene: Clone + PartialEq + fmt::Debug {
    /// Randomly change this gene's own value.
    fn mutate(&mut self, rng: &mut EvolutionRng);
}

/// Problem plug-in consumed by the engine.
///
/// Acts as the factory for candidates: the engine never builds a genome
/// itself, it asks the problem for a fresh one or hands it a bred gene
/// sequence to wrap.
pub trait Problem {
    type Gene: Gene;

    /// Produce the genes of one fresh candidate for the initial population.
    fn populate(&self, rng: &mut EvolutionRng) -> Result<Vec<Self::Gene>, EvolutionError>;

    /// Build a candidate from a bred gene sequence.
    ///
    /// Reject sequences the problem cannot represent with
    /// [`EvolutionError::Construction`].
    fn assemble(&self, genes: Vec<Self::Gene>) -> Result<Candidate<Self::Gene>, EvolutionError> {
        Ok(Candidate::new(genes))
    }

    /// Reference matrix candidates are scored against.
    fn reference(&self) -> &Matrix;

    /// Matrix represented by a gene sequence.
    fn project(&self, genes: &[Self::Gene]) -> Result<Matrix, EvolutionError>;

    /// Score a gene sequence with the run's statistic.
    fn calculate_fitness(
        &self,
        genes: &[Self::Gene],
        gof: &dyn GoodnessOfFit,
    ) -> Result<f64, EvolutionError> {
        let projected = self.project(genes)?;
        Ok(gof.test(self.reference(), &projected)?)
    }
}

/// Seeded random source shared by every stochastic decision in a run.
#[derive(Debug, Clone)]
pub struct EvolutionRng {
    rng: StdRng,
    seed: u64,
}

impl EvolutionRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create with a random seed. The seed stays readable for replay.
    pub fn random() -> Self {
        Self::new(rand::random())
    }

    /// Seed this source was created from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Unbiased coin flip.
    pub fn coin(&mut self) -> bool {
        self.rng.r#gen::<bool>()
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    /// True with the given probability: a uniform draw in `[0, 1)` below it.
    pub fn chance(&mut self, probability: f64) -> bool {
        self.rng.r#gen::<f64>() < probability
    }

    /// Standard normal sample.
    pub fn gaussian(&mut self) -> f64 {
        self.rng.sample(StandardNormal)
    }
}

impl RngCore for EvolutionRng {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}
