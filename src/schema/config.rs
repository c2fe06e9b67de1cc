//! Configuration types for genetic algorithm runs.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Matrix, Statistic};

fn default_generations() -> usize {
    200
}
fn default_elite_size() -> usize {
    25
}
fn default_population_size() -> usize {
    250
}
fn default_mutation_rate() -> f64 {
    0.25
}

/// Parameters of a single evolutionary run.
///
/// The engine takes its own copy at construction, so a configuration
/// cannot change while a run is in progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneticAlgorithmConfig {
    /// Number of bred generations. The run performs `generations + 1`
    /// evaluate/select cycles.
    #[serde(default = "default_generations")]
    pub generations: usize,
    /// Maximum size of the elite (breeding) pool.
    #[serde(default = "default_elite_size")]
    pub elite_size: usize,
    /// Number of candidates created or bred each generation.
    #[serde(default = "default_population_size")]
    pub population_size: usize,
    /// Probability (0.0-1.0) that an offspring receives one mutation.
    #[serde(default = "default_mutation_rate")]
    pub mutation_rate: f64,
    /// Random seed for reproducibility. Drawn from entropy when absent.
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Goodness-of-fit statistic used to score candidates.
    #[serde(default)]
    pub statistic: Statistic,
}

impl Default for GeneticAlgorithmConfig {
    fn default() -> Self {
        Self {
            generations: default_generations(),
            elite_size: default_elite_size(),
            population_size: default_population_size(),
            mutation_rate: default_mutation_rate(),
            random_seed: None,
            statistic: Statistic::default(),
        }
    }
}

impl GeneticAlgorithmConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::PopulationTooSmall);
        }
        if self.elite_size == 0 {
            return Err(ConfigError::EliteTooSmall);
        }
        if !self.mutation_rate.is_finite() || !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::InvalidMutationRate(self.mutation_rate));
        }
        Ok(())
    }
}

fn default_max_count() -> u32 {
    20
}
fn default_mutation_strength() -> f64 {
    0.1
}

/// Run description for calibrating a count matrix against a reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Genetic algorithm settings.
    #[serde(default)]
    pub genetic_algorithm: GeneticAlgorithmConfig,
    /// Observed matrix the candidates are fitted to.
    pub reference: Matrix,
    /// Largest count a single cell may take.
    #[serde(default = "default_max_count")]
    pub max_count: u32,
    /// Mutation step as a fraction of `max_count` (standard deviation).
    #[serde(default = "default_mutation_strength")]
    pub mutation_strength: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        let counts = [12.0, 3.0, 0.0, 4.0, 9.0, 2.0, 1.0, 5.0, 14.0];
        let mut reference = Matrix::zeros(3, 3);
        for (i, &count) in counts.iter().enumerate() {
            reference.set(i / 3, i % 3, count);
        }

        Self {
            genetic_algorithm: GeneticAlgorithmConfig::default(),
            reference,
            max_count: default_max_count(),
            mutation_strength: default_mutation_strength(),
        }
    }
}

impl CalibrationConfig {
    /// Load and validate a configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.genetic_algorithm.validate()?;

        if self.reference.is_empty() {
            return Err(ConfigError::EmptyReference);
        }
        if self.max_count == 0 {
            return Err(ConfigError::InvalidMaxCount);
        }
        if !self.mutation_strength.is_finite() || self.mutation_strength < 0.0 {
            return Err(ConfigError::InvalidMutationStrength(self.mutation_strength));
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Population size must be non-zero")]
    PopulationTooSmall,
    #[error("Elite pool size must be non-zero")]
    EliteTooSmall,
    #[error("Mutation rate {0} must lie within [0, 1]")]
    InvalidMutationRate(f64),
    #[error("Reference matrix has no cells")]
    EmptyReference,
    #[error("Maximum cell count must be non-zero")]
    InvalidMaxCount,
    #[error("Mutation strength {0} must be finite and non-negative")]
    InvalidMutationStrength(f64),
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = GeneticAlgorithmConfig::default();
        assert_eq!(config.generations, 200);
        assert_eq!(config.elite_size, 25);
        assert_eq!(config.population_size, 250);
        assert!((config.mutation_rate - 0.25).abs() < f64::EPSILON);
        assert!(config.random_seed.is_none());
        assert_eq!(config.statistic, Statistic::Srmse);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_configs() {
        let config = GeneticAlgorithmConfig {
            population_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PopulationTooSmall)
        ));

        let config = GeneticAlgorithmConfig {
            elite_size: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EliteTooSmall)));

        for rate in [-0.1, 1.5, f64::NAN] {
            let config = GeneticAlgorithmConfig {
                mutation_rate: rate,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidMutationRate(_))
            ));
        }
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: GeneticAlgorithmConfig =
            serde_json::from_str(r#"{ "generations": 5, "statistic": "tae" }"#).unwrap();
        assert_eq!(config.generations, 5);
        assert_eq!(config.population_size, 250);
        assert_eq!(config.statistic, Statistic::Tae);
    }

    #[test]
    fn test_serialization() {
        let config = CalibrationConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: CalibrationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.reference, config.reference);
        assert_eq!(
            parsed.genetic_algorithm.population_size,
            config.genetic_algorithm.population_size
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "genetic_algorithm": {{ "generations": 3, "random_seed": 7 }},
                "reference": [[1.0, 2.0], [3.0, 4.0]],
                "max_count": 10
            }}"#
        )
        .unwrap();

        let config = CalibrationConfig::load(file.path()).unwrap();
        assert_eq!(config.genetic_algorithm.generations, 3);
        assert_eq!(config.genetic_algorithm.random_seed, Some(7));
        assert_eq!(config.reference.shape(), (2, 2));
        assert_eq!(config.max_count, 10);
    }

    #[test]
    fn test_load_rejects_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "reference": [[1.0]], "max_count": 0 }}"#).unwrap();
        assert!(matches!(
            CalibrationConfig::load(file.path()),
            Err(ConfigError::InvalidMaxCount)
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            CalibrationConfig::load(file.path()),
            Err(ConfigError::Parse(_))
        ));

        assert!(matches!(
            CalibrationConfig::load("/nonexistent/gof-ga.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
