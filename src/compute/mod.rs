//! Compute module - Fitness statistics and the evolutionary engine.

pub mod evolution;
pub mod statistics;

pub use evolution::{
    Candidate, EvolutionError, EvolutionResult, EvolutionRng, Gene, GeneticAlgorithm, Problem,
};
pub use statistics::{GoodnessOfFit, StatisticsError};
