// scripts/bermudan_bounds.rs
//! Lower and upper Monte Carlo bounds for a Bermudan call under Black-Scholes
//!
//! Usage: `bermudan_bounds [paths] [--csv]`
use bermudan_mc::analytics::bs_analytic;
use bermudan_mc::diagnostics::{ExerciseProfile, ValueSummary};
use bermudan_mc::math_utils::Timer;
use bermudan_mc::models::{BlackScholesConfig, BlackScholesSimulation};
use bermudan_mc::output::{summary_rows, write_exercise_profile_to_csv, write_summary_to_csv};
use bermudan_mc::products::{BermudanOption, BermudanValuation, ExerciseMethod};
use bermudan_mc::PricingResult;
use std::env;
use tracing_subscriber::EnvFilter;

const DEFAULT_PATHS: usize = 20_000;

#[derive(Debug)]
struct BoundResult {
    name: &'static str,
    time_ms: f64,
    summary: ValueSummary,
    lambda: Option<f64>,
    profile: ExerciseProfile,
}

fn run_bound(
    name: &'static str,
    option: &BermudanOption,
    model: &BlackScholesSimulation,
) -> PricingResult<BoundResult> {
    let timer = Timer::new();
    let BermudanValuation {
        value,
        exercise_time,
        lambda,
        ..
    } = option.valuation(0.0, model)?;
    let time_ms = timer.elapsed_ms();

    Ok(BoundResult {
        name,
        time_ms,
        summary: ValueSummary::from_path_vector(&value),
        lambda,
        profile: ExerciseProfile::from_exercise_times(option.schedule(), &exercise_time)?,
    })
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    let paths = args
        .iter()
        .skip(1)
        .find_map(|a| a.parse::<usize>().ok())
        .unwrap_or(DEFAULT_PATHS);
    let write_csv = args.iter().any(|a| a == "--csv");

    println!("bermudan-mc Bound Estimation");
    println!("============================\n");
    println!("  CPU Cores: {}", num_cpus::get());
    println!("  Rayon Threads: {}", rayon::current_num_threads());
    println!("  Paths: {}\n", paths);

    let dates: Vec<f64> = (1..=8).map(|i| 0.25 * i as f64).collect();
    let strike = 100.0;
    let (s0, r, sigma) = (100.0, 0.05, 0.2);

    let timer = Timer::new();
    let model = match BlackScholesSimulation::new(BlackScholesConfig {
        s0,
        r,
        sigma,
        times: dates.clone(),
        paths,
        ..Default::default()
    }) {
        Ok(model) => model,
        Err(e) => {
            eprintln!("Simulation failed: {}", e);
            std::process::exit(1);
        }
    };
    println!("Simulated {} paths in {:.2} ms", paths, timer.elapsed_ms());

    let n = dates.len();
    let mut results = Vec::new();
    for (name, method) in [
        ("Primal (regression)", ExerciseMethod::EstimateConditionalExpectation),
        ("Dual (martingale)", ExerciseMethod::UpperBoundMethod),
    ] {
        let outcome = BermudanOption::new(dates.clone(), vec![1.0; n], vec![strike; n], method)
            .and_then(|option| run_bound(name, &option, &model));
        match outcome {
            Ok(result) => results.push(result),
            Err(e) => {
                eprintln!("{} failed: {}", name, e);
                std::process::exit(1);
            }
        }
    }

    let european = bs_analytic::bs_call_price(s0, strike, r, sigma, dates[n - 1]);

    println!("\n{:=<80}", "");
    println!("BOUNDS");
    println!("{:=<80}", "");
    println!(
        "{:<22} {:>10} {:>10} {:>12} {:>10} {:>10}",
        "Method", "Value", "Std Err", "Time (ms)", "Lambda", "E[tau]"
    );
    println!("{:-<80}", "");
    for result in &results {
        println!(
            "{:<22} {:>10.4} {:>10.4} {:>12.2} {:>10} {:>10}",
            result.name,
            result.summary.mean,
            result.summary.standard_error,
            result.time_ms,
            result
                .lambda
                .map(|l| format!("{:.5}", l))
                .unwrap_or_else(|| "N/A".to_string()),
            result
                .profile
                .expected_exercise_date()
                .map(|t| format!("{:.3}", t))
                .unwrap_or_else(|| "N/A".to_string())
        );
    }
    println!("{:=<80}", "");
    println!("European reference (last date): {:.4}", european);
    if let [primal, dual] = results.as_slice() {
        println!("Duality gap: {:.4}", dual.summary.mean - primal.summary.mean);
    }

    if write_csv {
        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
        let mut rows: Vec<(String, String)> = vec![
            ("paths".to_string(), paths.to_string()),
            ("european_reference".to_string(), european.to_string()),
        ];
        for (result, label) in results.iter().zip(["primal", "dual"]) {
            rows.extend(summary_rows(label, &result.summary));
            let filename = format!("exercise_profile_{}_{}.csv", label, timestamp);
            if let Err(e) = write_exercise_profile_to_csv(&filename, &result.profile) {
                eprintln!("Could not write {}: {}", filename, e);
            } else {
                println!("Exercise profile written to {}", filename);
            }
        }
        let borrowed: Vec<(&str, String)> =
            rows.iter().map(|(k, v)| (k.as_str(), v.clone())).collect();
        let filename = format!("bermudan_bounds_{}.csv", timestamp);
        match write_summary_to_csv(&filename, &borrowed) {
            Ok(()) => println!("Summary written to {}", filename),
            Err(e) => eprintln!("Could not write {}: {}", filename, e),
        }
    }
}
