// demos/demo.rs
use bermudan_mc::analytics::bs_analytic;
use bermudan_mc::diagnostics::{ExerciseProfile, ValueSummary};
use bermudan_mc::math_utils::Timer;
use bermudan_mc::models::{BlackScholesConfig, BlackScholesSimulation};
use bermudan_mc::products::{
    AssetMonteCarloProduct, BermudanOption, EuropeanOption, ExerciseMethod,
};
use bermudan_mc::{BasisStrategy, RegressionConfig};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Running bermudan-mc Demo\n");

    let paths = 50_000;
    let s0 = 100.0;
    let k = 100.0;
    let r = 0.05;
    let sigma = 0.2;
    let dates = vec![0.25, 0.5, 0.75, 1.0];

    let mut timer = Timer::new();
    let model = BlackScholesSimulation::new(BlackScholesConfig {
        s0,
        r,
        sigma,
        times: dates.clone(),
        paths,
        seed: 12345,
        use_antithetic: true,
    })
    .expect("Valid configuration");
    println!("Simulated {} paths in {:.2} ms\n", paths, timer.elapsed_ms());

    // European reference: the last exercise date only
    let european = EuropeanOption::new(1.0, k, 1.0).expect("Valid option");
    let european_mc = european.average_value(0.0, &model).expect("European valuation");
    let european_bs = bs_analytic::bs_call_price(s0, k, r, sigma, 1.0);
    println!("--- European Call (T = 1) ---");
    println!("MC Price: {:.4}", european_mc);
    println!("Analytic Price: {:.4}", european_bs);
    println!("Absolute Error: {:.4}\n", (european_mc - european_bs).abs());

    let bases = [
        ("Monomials (order 4)", RegressionConfig::default()),
        (
            "Centred monomials",
            RegressionConfig {
                strategy: BasisStrategy::CenteredMonomials,
                ..Default::default()
            },
        ),
        (
            "Intrinsic value (order 2)",
            RegressionConfig {
                order: 2,
                intrinsic_value_as_basis: true,
                ..Default::default()
            },
        ),
        (
            "Binning (20 bins)",
            RegressionConfig {
                strategy: BasisStrategy::Binning { bins: 20 },
                ..Default::default()
            },
        ),
    ];

    println!("--- Bermudan Call, lower bound by regression basis ---");
    for (name, regression) in bases {
        let option = BermudanOption::with_conditional_expectation(
            dates.clone(),
            vec![1.0; dates.len()],
            vec![k; dates.len()],
        )
        .and_then(|o| o.with_regression(regression))
        .expect("Valid option");

        timer.restart();
        let result = option.valuation(0.0, &model).expect("Valuation");
        let summary = ValueSummary::from_path_vector(&result.value);
        let profile = ExerciseProfile::from_exercise_times(option.schedule(), &result.exercise_time)
            .expect("Exercise profile");
        println!(
            "{:<28} {:.4} ± {:.4}  exercised {:>6.2}%  ({:.2} ms)",
            name,
            summary.mean,
            summary.standard_error,
            100.0 * profile.exercised() as f64 / paths as f64,
            timer.elapsed_ms()
        );
    }

    println!("\n--- Bermudan Call, upper bound ---");
    let dual = BermudanOption::new(
        dates.clone(),
        vec![1.0; dates.len()],
        vec![k; dates.len()],
        ExerciseMethod::UpperBoundMethod,
    )
    .expect("Valid option");
    timer.restart();
    let result = dual.valuation(0.0, &model).expect("Valuation");
    let summary = ValueSummary::from_path_vector(&result.value);
    println!("Dual Price: {:.4} ± {:.4}", summary.mean, summary.standard_error);
    if let (Some(lambda), Some(search)) = (result.lambda, result.search) {
        println!(
            "lambda* = {:.6} after {} iterations ({} evaluations)",
            lambda, search.iterations, search.evaluations
        );
    }
    println!("Time: {:.2} ms", timer.elapsed_ms());

    println!("\nDemo finished.");
}
