//! Evolution reporting types: statistic selection, progress and run results.

use serde::{Deserialize, Serialize};

/// Built-in goodness-of-fit statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Statistic {
    /// Standardised root mean square error.
    #[default]
    Srmse,
    /// Squared Pearson correlation. Higher is better.
    RSquared,
    /// Total absolute error.
    Tae,
    /// Total absolute error halved (misclassified counts).
    TotalError,
    /// Total absolute error over the reference total.
    Sae,
    /// Misclassified counts as a percentage of the reference total.
    PercentageError,
    /// Total absolute error as a percentage of the reference total.
    CellPercentageError,
    /// Sum of cell z-scores.
    Z,
    /// Sum of squared cell z-scores.
    ZSquared,
}

impl Statistic {
    /// Every built-in statistic, in catalog order.
    pub const ALL: [Statistic; 9] = [
        Statistic::Srmse,
        Statistic::RSquared,
        Statistic::Tae,
        Statistic::TotalError,
        Statistic::Sae,
        Statistic::PercentageError,
        Statistic::CellPercentageError,
        Statistic::Z,
        Statistic::ZSquared,
    ];
}

/// Current phase of the engine state machine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum EvolutionPhase {
    /// Building the initial candidate pool.
    #[default]
    Initializing,
    /// Computing fitness for the candidate pool.
    Evaluating,
    /// Merging, sorting and truncating to the elite pool.
    Selecting,
    /// Creating offspring from the elite pool.
    Breeding,
    /// All cycles completed.
    Terminated,
    /// A fatal error stopped the run.
    Failed,
}

/// Progress snapshot emitted after every selection step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Zero-based cycle index.
    pub generation: usize,
    /// Total cycles in the run (`generations + 1`).
    pub total_cycles: usize,
    /// Fitness of the best elite.
    pub best_fitness: f64,
    /// Mean fitness over the merged candidate and elite pool.
    pub mean_fitness: f64,
    /// Number of distinct elites kept.
    pub elite_count: usize,
    /// Whether the best elite is a perfect fit for the statistic.
    pub perfect: bool,
}

/// Per-cycle fitness history.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EvolutionHistory {
    /// Best fitness per cycle.
    pub best_fitness: Vec<f64>,
    /// Mean fitness per cycle.
    pub mean_fitness: Vec<f64>,
}

/// Statistics from an evolution run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionStats {
    /// Completed evaluate/select cycles.
    pub cycles_completed: usize,
    /// Fitness evaluator invocations.
    pub total_evaluations: u64,
    /// Fitness of the best elite, if any were selected.
    pub best_fitness: Option<f64>,
    /// Whether the best elite is a perfect fit.
    pub perfect: bool,
    /// Seed of the run's random source.
    pub seed: u64,
    /// Time taken (in seconds).
    pub elapsed_seconds: f64,
    /// Reason for stopping.
    pub stop_reason: StopReason,
}

/// Reason evolution stopped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum StopReason {
    /// Not started, or still running.
    Pending,
    /// All cycles ran to completion.
    Completed,
    /// A fatal error ended the run.
    Failed(String),
}
