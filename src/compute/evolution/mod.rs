//! Elitist genetic algorithm for fitting matrices to a reference.
//!
//! # Overview
//!
//! The evolutionary search system consists of:
//!
//! - **Genome Contracts** (`genome`): [`Gene`], [`Problem`] and the shared [`EvolutionRng`]
//! - **Candidates** (`candidate`): Genome plus memoized fitness, crossover and mutation
//! - **Search** (`search`): The [`GeneticAlgorithm`] engine
//! - **Errors** (`errors`): Fatal run errors and error listeners
//! - **Calibration** (`calibration`): Ready-made problem fitting a count matrix
//!
//! # Example
//!
//! ```rust,no_run
//! use gof_ga::compute::evolution::{GeneticAlgorithm, MatrixCalibration};
//! use gof_ga::schema::{GeneticAlgorithmConfig, Matrix, Statistic};
//!
//! let reference = Matrix::from_rows(vec![vec![4.0, 1.0], vec![0.0, 3.0]]).unwrap();
//! let problem = MatrixCalibration::new(reference, 10, 0.1);
//!
//! let config = GeneticAlgorithmConfig {
//!     statistic: Statistic::Tae,
//!     random_seed: Some(7),
//!     ..Default::default()
//! };
//!
//! let mut engine = GeneticAlgorithm::new(problem, config).unwrap();
//! let result = engine
//!     .run_with_callback(|report| {
//!         println!("Generation {}: best fitness = {:.3}",
//!             report.generation, report.best_fitness);
//!     })
//!     .unwrap();
//!
//! println!("Best fitness: {:?}", result.stats.best_fitness);
//! ```

mod calibration;
mod candidate;
mod errors;
mod genome;
mod search;

pub use calibration::{CountGene, MatrixCalibration};
pub use candidate::Candidate;
pub use errors::{ErrorChannel, ErrorListener, EvolutionError, ListenerId};
pub use genome::{EvolutionRng, Gene, Problem};
pub use search::{EvolutionResult, GeneticAlgorithm};
