//! Diffusion Scenario Simulator CLI
//!
//! Run deterministic diffusion scenarios across one or many seeds.

use clap::Parser;
use diffusion_core::RuleKind;
use diffusion_sim::scenarios::ScenarioId;
use diffusion_sim::{ScenarioResult, ScenarioRunner};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Diffusion Deterministic Simulation CLI
#[derive(Parser, Debug)]
#[command(name = "diffusion-sim")]
#[command(about = "Run deterministic diffusion scenarios", long_about = None)]
struct Args {
    /// Master seed for determinism (0 = random from time)
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Number of graph nodes
    #[arg(short, long, default_value = "50")]
    nodes: usize,

    /// Scenario to run (threshold_ring, cascade_path, weighted_cascade, determinism, marginal_gain, directed_threshold, all)
    #[arg(short = 'S', long, default_value = "all")]
    scenario: String,

    /// Number of consecutive seeds to test (for CI mode)
    #[arg(long, default_value = "1")]
    seeds: usize,

    /// Edge probability for random topologies
    #[arg(short = 'p', long, default_value = "0.1")]
    edge_probability: f64,

    /// Initial infected fraction for scenarios without explicit seeds
    #[arg(short = 'f', long, default_value = "0.1")]
    fraction_infected: f64,

    /// Rule replayed by the determinism scenario (threshold, ic, wc)
    #[arg(short, long, default_value = "independent_cascade")]
    rule: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// JSON output for CI parsing
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();

    // Initialize logging; RUST_LOG overrides --verbose
    let level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    if !args.json {
        info!("Diffusion Simulator v{}", env!("CARGO_PKG_VERSION"));
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }

    // Parse scenarios
    let scenarios: Vec<ScenarioId> = if args.scenario == "all" {
        ScenarioId::all()
    } else {
        vec![args.scenario.parse().unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            eprintln!("Available scenarios: threshold_ring, cascade_path, weighted_cascade, determinism, marginal_gain, directed_threshold, all");
            std::process::exit(1);
        })]
    };

    let rule: RuleKind = args.rule.parse().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        eprintln!("Available rules: threshold, independent_cascade, weighted_cascade");
        std::process::exit(1);
    });

    // Determine base seed
    let base_seed = if args.seed == 0 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42)
    } else {
        args.seed
    };

    let mut all_results: Vec<ScenarioResult> = Vec::new();
    let mut failed_count = 0;

    for seed_offset in 0..args.seeds {
        let seed = base_seed.wrapping_add(seed_offset as u64);

        let runner = ScenarioRunner::new(seed, args.nodes)
            .with_edge_probability(args.edge_probability)
            .with_fraction_infected(args.fraction_infected)
            .with_rule(rule);

        for scenario in &scenarios {
            let result = runner.run(*scenario);

            if !args.json {
                if result.passed {
                    info!(
                        "✓ {} (seed={}) PASSED - {} steps, {} active",
                        scenario.name(),
                        seed,
                        result.iterations,
                        result.final_active_set_size
                    );
                } else {
                    error!(
                        "✗ {} (seed={}) FAILED: {}",
                        scenario.name(),
                        seed,
                        result.failure_reason.as_deref().unwrap_or("unknown")
                    );
                }
            }

            if !result.passed {
                failed_count += 1;
            }

            all_results.push(result);
        }
    }

    // Summary
    let total = all_results.len();
    let passed = total - failed_count;

    if args.json {
        let summary = serde_json::json!({
            "total": total,
            "passed": passed,
            "failed": failed_count,
            "results": all_results,
        });
        match serde_json::to_string_pretty(&summary) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Failed to encode results: {}", e);
                std::process::exit(2);
            }
        }
    } else {
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

        if failed_count == 0 {
            info!("All {} scenario runs passed", total);
        } else {
            error!("{}/{} scenario runs failed", failed_count, total);

            for result in all_results.iter().filter(|r| !r.passed) {
                error!(
                    "  - {} seed={}: {}",
                    result.scenario.name(),
                    result.seed,
                    result.failure_reason.as_deref().unwrap_or("unknown")
                );
            }
        }
    }

    // Exit with proper code for CI
    if failed_count > 0 {
        std::process::exit(1);
    }
}
