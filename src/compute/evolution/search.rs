//! The evolutionary loop: evaluation, elitist selection and breeding.

use std::cmp::Ordering;
use std::time::Instant;

use log::{debug, info, trace, warn};
use serde::Serialize;

use crate::compute::statistics::GoodnessOfFit;
use crate::schema::{
    EvolutionHistory, EvolutionPhase, EvolutionStats, GenerationReport, GeneticAlgorithmConfig,
    StopReason,
};

use super::errors::{ErrorChannel, ErrorListener, ListenerId};
use super::{Candidate, EvolutionError, EvolutionRng, Problem};

/// Final result of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct EvolutionResult<G> {
    /// Final elite pool, best first.
    pub elites: Vec<Candidate<G>>,
    /// Statistics from the run.
    pub stats: EvolutionStats,
    /// Full history for analysis.
    pub history: EvolutionHistory,
}

impl<G> EvolutionResult<G> {
    /// Best candidate found.
    pub fn best(&self) -> Option<&Candidate<G>> {
        self.elites.first()
    }
}

/// Single-population genetic algorithm with deduplicating elitist selection.
///
/// Each cycle evaluates the candidate pool, merges in the previous elites,
/// sorts by fitness in the statistic's preferred direction and keeps the
/// best distinct genomes as the new elite pool. Every cycle but the last
/// then breeds a fresh candidate pool from the elites.
///
/// A run is synchronous and owns all of its state. Concurrent runs need
/// separate engines.
pub struct GeneticAlgorithm<P: Problem> {
    config: GeneticAlgorithmConfig,
    problem: P,
    gof: Box<dyn GoodnessOfFit>,
    rng: EvolutionRng,
    candidates: Vec<Candidate<P::Gene>>,
    elites: Vec<Candidate<P::Gene>>,
    errors: ErrorChannel,
    phase: EvolutionPhase,
    history: EvolutionHistory,
    cycles_completed: usize,
    evaluations: u64,
    elapsed_seconds: f64,
    stop_reason: StopReason,
}

impl<P: Problem> GeneticAlgorithm<P> {
    /// Create an engine scoring with the configured statistic.
    pub fn new(problem: P, config: GeneticAlgorithmConfig) -> Result<Self, EvolutionError> {
        config.validate()?;

        let rng = match config.random_seed {
            Some(seed) => EvolutionRng::new(seed),
            None => EvolutionRng::random(),
        };
        let gof = config.statistic.build();

        Ok(Self {
            config,
            problem,
            gof,
            rng,
            candidates: Vec::new(),
            elites: Vec::new(),
            errors: ErrorChannel::default(),
            phase: EvolutionPhase::Initializing,
            history: EvolutionHistory::default(),
            cycles_completed: 0,
            evaluations: 0,
            elapsed_seconds: 0.0,
            stop_reason: StopReason::Pending,
        })
    }

    /// Score with a custom statistic instead of the configured one.
    pub fn with_statistic(mut self, gof: Box<dyn GoodnessOfFit>) -> Self {
        self.gof = gof;
        self
    }

    pub fn config(&self) -> &GeneticAlgorithmConfig {
        &self.config
    }

    pub fn problem(&self) -> &P {
        &self.problem
    }

    pub fn statistic(&self) -> &dyn GoodnessOfFit {
        self.gof.as_ref()
    }

    /// Seed of the run's random source.
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn phase(&self) -> EvolutionPhase {
        self.phase
    }

    /// Current elite pool, best first after a selection step.
    pub fn elites(&self) -> &[Candidate<P::Gene>] {
        &self.elites
    }

    /// Current candidate pool.
    pub fn candidates(&self) -> &[Candidate<P::Gene>] {
        &self.candidates
    }

    pub fn history(&self) -> &EvolutionHistory {
        &self.history
    }

    /// Register a listener for fatal errors.
    pub fn add_error_listener(&mut self, listener: impl ErrorListener + 'static) -> ListenerId {
        self.errors.subscribe(listener)
    }

    pub fn remove_error_listener(&mut self, id: ListenerId) -> bool {
        self.errors.unsubscribe(id)
    }

    pub fn clear_error_listeners(&mut self) {
        self.errors.clear();
    }

    /// Statistics for the current or most recent run.
    pub fn stats(&self) -> EvolutionStats {
        let best_fitness = self.elites.first().and_then(Candidate::fitness);
        EvolutionStats {
            cycles_completed: self.cycles_completed,
            total_evaluations: self.evaluations,
            best_fitness,
            perfect: best_fitness.is_some_and(|f| self.gof.is_perfect(f)),
            seed: self.rng.seed(),
            elapsed_seconds: self.elapsed_seconds,
            stop_reason: self.stop_reason.clone(),
        }
    }

    /// Run evolution (blocking).
    pub fn run(&mut self) -> Result<EvolutionResult<P::Gene>, EvolutionError> {
        self.run_with_callback(|_| {})
    }

    /// Run evolution, reporting after every selection step.
    ///
    /// A fatal error is delivered to the error listeners exactly once and
    /// returned. No further generation is produced after it; the elite pool
    /// from the last successful selection is left in place for inspection.
    pub fn run_with_callback<F>(
        &mut self,
        mut callback: F,
    ) -> Result<EvolutionResult<P::Gene>, EvolutionError>
    where
        F: FnMut(&GenerationReport),
    {
        let start_time = Instant::now();
        self.reset();

        info!(
            "Starting evolution: {} generations, population {}, elites {}, mutation rate {}, statistic {}, seed {}",
            self.config.generations,
            self.config.population_size,
            self.config.elite_size,
            self.config.mutation_rate,
            self.gof.field_name(),
            self.rng.seed()
        );

        let outcome = self.cycle(&mut callback);
        self.elapsed_seconds = start_time.elapsed().as_secs_f64();

        match outcome {
            Ok(()) => {
                self.phase = EvolutionPhase::Terminated;
                self.stop_reason = StopReason::Completed;
                let stats = self.stats();
                info!(
                    "Evolution complete: {} cycles, {} evaluations, best fitness {:?} in {:.2}s",
                    stats.cycles_completed,
                    stats.total_evaluations,
                    stats.best_fitness,
                    stats.elapsed_seconds
                );
                Ok(EvolutionResult {
                    elites: self.elites.clone(),
                    stats,
                    history: self.history.clone(),
                })
            }
            Err(err) => {
                self.phase = EvolutionPhase::Failed;
                self.stop_reason = StopReason::Failed(err.to_string());
                self.candidates.clear();
                self.errors.report(&err);
                Err(err)
            }
        }
    }

    /// Clear run state and rewind the random source to its seed.
    fn reset(&mut self) {
        self.rng = EvolutionRng::new(self.rng.seed());
        self.candidates.clear();
        self.elites.clear();
        self.history = EvolutionHistory::default();
        self.phase = EvolutionPhase::Initializing;
        self.cycles_completed = 0;
        self.evaluations = 0;
        self.elapsed_seconds = 0.0;
        self.stop_reason = StopReason::Pending;
    }

    fn cycle<F>(&mut self, callback: &mut F) -> Result<(), EvolutionError>
    where
        F: FnMut(&GenerationReport),
    {
        self.initialize()?;

        // The extra cycle selects elites from the last bred population
        let generations = self.config.generations;
        for generation in 0..=generations {
            self.evaluate()?;
            let mean_fitness = self.select();

            let report = self.report(generation, mean_fitness);
            self.history.best_fitness.push(report.best_fitness);
            self.history.mean_fitness.push(report.mean_fitness);
            self.cycles_completed += 1;

            debug!(
                "Generation {}/{}: best {:.6}, mean {:.6}, {} elites",
                generation, generations, report.best_fitness, report.mean_fitness, report.elite_count
            );
            callback(&report);

            if generation < generations {
                self.breed()?;
            }
        }

        Ok(())
    }

    /// Build the initial candidate pool.
    fn initialize(&mut self) -> Result<(), EvolutionError> {
        self.phase = EvolutionPhase::Initializing;

        for _ in 0..self.config.population_size {
            let genes = self.problem.populate(&mut self.rng)?;
            self.candidates.push(Candidate::new(genes));
        }
        Ok(())
    }

    /// Evaluate every candidate and elite that has no cached fitness.
    fn evaluate(&mut self) -> Result<(), EvolutionError> {
        self.phase = EvolutionPhase::Evaluating;

        for candidate in self.candidates.iter_mut().chain(self.elites.iter_mut()) {
            if !candidate.is_evaluated() {
                self.evaluations += 1;
            }
            candidate.evaluate(&self.problem, self.gof.as_ref())?;
        }
        Ok(())
    }

    /// Merge, sort and truncate to a distinct elite pool.
    ///
    /// Returns the mean fitness of the merged pool.
    fn select(&mut self) -> f64 {
        self.phase = EvolutionPhase::Selecting;

        let mut merged = std::mem::take(&mut self.candidates);
        merged.append(&mut self.elites);

        let lower_is_better = self.gof.lower_is_better();
        merged.sort_by(|a, b| {
            compare_fitness(
                a.fitness().unwrap_or(f64::NAN),
                b.fitness().unwrap_or(f64::NAN),
                lower_is_better,
            )
        });

        let mean_fitness = if merged.is_empty() {
            0.0
        } else {
            merged.iter().filter_map(Candidate::fitness).sum::<f64>() / merged.len() as f64
        };

        let mut rest = Vec::with_capacity(merged.len());
        for candidate in merged {
            if self.elites.len() < self.config.elite_size && !self.elites.contains(&candidate) {
                self.elites.push(candidate);
            } else {
                rest.push(candidate);
            }
        }
        self.candidates = rest;

        mean_fitness
    }

    /// Replace the candidate pool with offspring of the elites.
    fn breed(&mut self) -> Result<(), EvolutionError> {
        self.phase = EvolutionPhase::Breeding;
        self.candidates.clear();

        let elite_count = self.elites.len();
        if elite_count == 1 {
            warn!("Elite pool holds a single distinct candidate; it will breed with itself");
        }

        let mut counter = 0;
        for _ in 0..self.config.population_size {
            let partner = self.partner_index(counter, elite_count);

            let mut child =
                self.elites[counter].breed(&self.elites[partner], &self.problem, &mut self.rng)?;
            if self.rng.chance(self.config.mutation_rate) {
                child.mutate(&mut self.rng)?;
            }
            self.candidates.push(child);

            counter += 1;
            if counter == elite_count {
                counter = 0;
            }
        }
        Ok(())
    }

    /// Random breeding partner for the elite at `counter`, never itself
    /// unless it is the only elite.
    ///
    /// A collision moves the index one slot inwards at either end of the
    /// pool and one slot in a random direction elsewhere.
    fn partner_index(&mut self, counter: usize, elite_count: usize) -> usize {
        let index = self.rng.index(elite_count);
        if index != counter || elite_count == 1 {
            return index;
        }

        let nudged = if index == elite_count - 1 {
            index - 1
        } else if index == 0 {
            index + 1
        } else if self.rng.coin() {
            index + 1
        } else {
            index - 1
        };
        trace!("Partner index {} collided with breeder, using {}", index, nudged);
        nudged
    }

    fn report(&self, generation: usize, mean_fitness: f64) -> GenerationReport {
        let best_fitness = self
            .elites
            .first()
            .and_then(Candidate::fitness)
            .unwrap_or(f64::NAN);

        GenerationReport {
            generation,
            total_cycles: self.config.generations + 1,
            best_fitness,
            mean_fitness,
            elite_count: self.elites.len(),
            perfect: self.gof.is_perfect(best_fitness),
        }
    }
}

/// Three-way fitness comparison, best first. NaN sorts after every number.
fn compare_fitness(a: f64, b: f64, lower_is_better: bool) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        (false, false) => {}
    }

    let ascending = if a > b {
        Ordering::Greater
    } else if a < b {
        Ordering::Less
    } else {
        Ordering::Equal
    };

    if lower_is_better {
        ascending
    } else {
        ascending.reverse()
    }
}
