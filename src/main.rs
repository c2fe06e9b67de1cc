//! GOF-GA CLI - Calibrate a count matrix from JSON configuration.

use std::path::PathBuf;

use gof_ga::{
    compute::evolution::{CountGene, GeneticAlgorithm, MatrixCalibration},
    schema::CalibrationConfig,
};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json>", args[0]);
        eprintln!();
        eprintln!("Fit a count matrix to a reference with a genetic algorithm.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to calibration configuration file");
        eprintln!();
        eprintln!("Example configuration is generated with --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);
    let config = CalibrationConfig::load(&config_path).unwrap_or_else(|e| {
        eprintln!("Error loading config: {}", e);
        std::process::exit(1);
    });

    let ga = &config.genetic_algorithm;
    println!("GOF-GA Calibration");
    println!("==================");
    println!(
        "Reference: {}x{} (total {})",
        config.reference.rows(),
        config.reference.cols(),
        config.reference.total()
    );
    println!("Statistic: {:?}", ga.statistic);
    println!(
        "Generations: {}, population: {}, elites: {}",
        ga.generations, ga.population_size, ga.elite_size
    );
    println!("Mutation rate: {}", ga.mutation_rate);
    println!();

    let problem = MatrixCalibration::from_config(&config);
    let mut engine =
        GeneticAlgorithm::new(problem, config.genetic_algorithm.clone()).unwrap_or_else(|e| {
            eprintln!("Error creating engine: {}", e);
            std::process::exit(1);
        });
    println!("Seed: {}", engine.seed());

    // Print progress every 10%
    let interval = (config.genetic_algorithm.generations / 10).max(1);
    println!("Running evolution...");
    let result = engine
        .run_with_callback(|report| {
            if report.generation % interval == 0 || report.generation + 1 == report.total_cycles {
                println!(
                    "  Generation {}/{}: best={:.6}, mean={:.6}, elites={}",
                    report.generation,
                    report.total_cycles - 1,
                    report.best_fitness,
                    report.mean_fitness,
                    report.elite_count
                );
            }
        })
        .unwrap_or_else(|e| {
            eprintln!("Evolution failed: {}", e);
            std::process::exit(1);
        });

    let stats = &result.stats;
    println!();
    println!("Result:");
    println!("  Cycles: {}", stats.cycles_completed);
    println!("  Evaluations: {}", stats.total_evaluations);
    match stats.best_fitness {
        Some(fitness) => println!("  Best fitness: {:.6}", fitness),
        None => println!("  Best fitness: n/a"),
    }
    println!("  Perfect fit: {}", stats.perfect);
    println!("  Time: {:.2}s", stats.elapsed_seconds);

    if let Some(best) = result.best() {
        let cols = config.reference.cols();
        println!();
        println!("Best matrix:");
        for row in best.genes().chunks(cols.max(1)) {
            let cells: Vec<String> = row.iter().map(|g: &CountGene| g.value().to_string()).collect();
            println!("  [{}]", cells.join(", "));
        }

        match serde_json::to_string(best) {
            Ok(json) => {
                println!();
                println!("Best candidate (JSON):");
                println!("{}", json);
            }
            Err(e) => eprintln!("Error serializing best candidate: {}", e),
        }
    }
}

fn print_example_config() {
    let config = CalibrationConfig::default();

    match serde_json::to_string_pretty(&config) {
        Ok(json) => {
            println!("Example configuration (config.json):");
            println!("{}", json);
        }
        Err(e) => {
            eprintln!("Error serializing example config: {}", e);
            std::process::exit(1);
        }
    }
}
