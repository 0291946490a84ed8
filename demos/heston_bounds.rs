// demos/heston_bounds.rs
use bermudan_mc::diagnostics::{ExerciseProfile, ValueSummary};
use bermudan_mc::math_utils::Timer;
use bermudan_mc::models::{HestonConfig, HestonParams, HestonScheme, HestonSimulation};
use bermudan_mc::products::{BermudanOption, ExerciseMethod};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Bermudan bounds under Heston");
    println!("============================\n");

    let params = HestonParams {
        s0: 100.0,
        v0: 0.04,
        r: 0.03,
        kappa: 2.0,
        theta: 0.04,
        xi: 0.3,
        rho: -0.7,
    };
    let dates: Vec<f64> = (1..=6).map(|i| i as f64 / 6.0).collect();
    let n = dates.len();

    for scheme in [
        HestonScheme::FullTruncationEuler,
        HestonScheme::AndersenQE,
        HestonScheme::Alfonsi,
    ] {
        let timer = Timer::new();
        let model = match HestonSimulation::new(HestonConfig {
            params,
            scheme,
            times: dates.clone(),
            paths: 20_000,
            substeps: 10,
            seed: 2024,
            use_antithetic: true,
        }) {
            Ok(model) => model,
            Err(e) => {
                println!("{:?}: simulation failed: {}", scheme, e);
                continue;
            }
        };
        let simulation_ms = timer.elapsed_ms();

        println!("--- {} ---", model.heston().scheme_name());
        println!("Simulation: {:.2} ms", simulation_ms);

        for method in [
            ExerciseMethod::EstimateConditionalExpectation,
            ExerciseMethod::UpperBoundMethod,
        ] {
            let option = BermudanOption::new(dates.clone(), vec![1.0; n], vec![100.0; n], method)
                .expect("Valid schedule");
            let timer = Timer::new();
            match option.valuation(0.0, &model) {
                Ok(result) => {
                    let summary = ValueSummary::from_path_vector(&result.value);
                    let expected_date = ExerciseProfile::from_exercise_times(
                        option.schedule(),
                        &result.exercise_time,
                    )
                    .ok()
                    .and_then(|p| p.expected_exercise_date());
                    println!(
                        "{:?}: {:.4} ± {:.4}, lambda {:?}, E[tau | exercised] {:?}, {:.2} ms",
                        method,
                        summary.mean,
                        summary.standard_error,
                        result.lambda,
                        expected_date,
                        timer.elapsed_ms()
                    );
                }
                Err(e) => println!("{:?}: valuation failed: {}", method, e),
            }
        }
        println!();
    }
}
