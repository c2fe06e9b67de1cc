//! GOF-GA - Elitist genetic algorithm driven by goodness-of-fit statistics.
//!
//! Candidates are gene sequences that project onto a matrix. Each one is
//! scored by comparing that matrix against a reference with a
//! goodness-of-fit statistic, and the best distinct candidates survive
//! from one generation to the next.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Configuration, matrices and run reporting types
//! - `compute`: Goodness-of-fit statistics and the evolutionary engine
//!
//! # Example
//!
//! ```rust,no_run
//! use gof_ga::{
//!     compute::evolution::{GeneticAlgorithm, MatrixCalibration},
//!     schema::CalibrationConfig,
//! };
//!
//! // Fit the default 3x3 reference
//! let config = CalibrationConfig::default();
//! let problem = MatrixCalibration::from_config(&config);
//!
//! let mut engine = GeneticAlgorithm::new(problem, config.genetic_algorithm).unwrap();
//! let result = engine.run().unwrap();
//!
//! println!("Best fitness after {} cycles: {:?}",
//!     result.stats.cycles_completed, result.stats.best_fitness);
//! ```

pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use compute::{Candidate, GeneticAlgorithm, GoodnessOfFit, Problem};
pub use schema::{GeneticAlgorithmConfig, Matrix, Statistic};
