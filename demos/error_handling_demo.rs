// demos/error_handling_demo.rs
use bermudan_mc::models::heston::Heston;
use bermudan_mc::models::{BlackScholesConfig, BlackScholesSimulation, HestonParams};
use bermudan_mc::products::{BermudanOption, ExerciseMethod};
use bermudan_mc::{CancellationFlag, DualSearchConfig, PricingError, RegressionConfig};

fn main() {
    println!("Error Handling Demo for bermudan-mc");
    println!("===================================\n");

    let model = BlackScholesSimulation::new(BlackScholesConfig {
        paths: 1_000,
        times: vec![0.5, 1.0],
        ..Default::default()
    })
    .expect("Valid configuration");

    // Test 1: Exercise dates out of order
    println!("1. Testing unordered exercise dates...");
    match BermudanOption::with_conditional_expectation(
        vec![1.0, 0.5],
        vec![1.0, 1.0],
        vec![100.0, 100.0],
    ) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }

    // Test 2: Schedule arrays of different length
    println!("\n2. Testing mismatched schedule arrays...");
    match BermudanOption::with_conditional_expectation(vec![0.5, 1.0], vec![1.0], vec![100.0]) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }

    // Test 3: Exercise date the model does not simulate
    println!("\n3. Testing an exercise date off the simulation grid...");
    let off_grid = BermudanOption::with_conditional_expectation(
        vec![0.5, 0.75],
        vec![1.0, 1.0],
        vec![100.0, 100.0],
    )
    .expect("Valid schedule");
    match off_grid.valuation(0.0, &model) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(PricingError::ModelEvaluation { quantity, time, .. }) => {
            println!("   ✓ Caught ModelEvaluation: {} at t = {}", quantity, time)
        }
        Err(other) => println!("   Unexpected error type: {}", other),
    }

    // Test 4: Invalid regression order
    println!("\n4. Testing an invalid regression configuration...");
    let option = BermudanOption::with_conditional_expectation(
        vec![0.5, 1.0],
        vec![1.0, 1.0],
        vec![100.0, 100.0],
    )
    .expect("Valid schedule");
    match option.clone().with_regression(RegressionConfig {
        order: 40,
        ..Default::default()
    }) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }

    // Test 5: Calibration budget too small
    println!("\n5. Testing dual calibration with too few iterations...");
    let dual = BermudanOption::new(
        vec![0.5, 1.0],
        vec![1.0, 1.0],
        vec![100.0, 100.0],
        ExerciseMethod::UpperBoundMethod,
    )
    .and_then(|o| {
        o.with_search(DualSearchConfig {
            max_iterations: 5,
            ..Default::default()
        })
    })
    .expect("Valid option");
    match dual.valuation(0.0, &model) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(PricingError::ConvergenceFailure {
            iterations,
            bracket_width,
            ..
        }) => println!(
            "   ✓ Caught ConvergenceFailure after {} iterations (bracket {:.2e})",
            iterations, bracket_width
        ),
        Err(other) => println!("   Unexpected error type: {}", other),
    }

    // Test 6: Cancellation
    println!("\n6. Testing cancellation...");
    let flag = CancellationFlag::new();
    let cancellable = option.clone().with_cancellation(flag.clone());
    flag.cancel();
    match cancellable.valuation(0.0, &model) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }

    // Test 7: Invalid Heston parameters
    println!("\n7. Testing invalid Heston parameters...");
    let bad_params = HestonParams {
        v0: -0.04,
        ..Default::default()
    };
    match Heston::new(bad_params) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(PricingError::InvalidParameters {
            parameter,
            value,
            constraint,
        }) => {
            println!("   ✓ Caught InvalidParameters: {} = {} ({})", parameter, value, constraint);
        }
        Err(other) => println!("   Unexpected error type: {}", other),
    }

    // Test 8: Valid valuation should work
    println!("\n8. Testing a valid valuation...");
    match option.valuation(0.0, &model) {
        Ok(result) => println!("   ✓ Success: Price = {:.4}", result.average()),
        Err(e) => println!("   Unexpected error: {}", e),
    }

    println!("\n✓ Error handling demo complete!");
    println!("All error cases were properly caught and handled.");
}
