//! Exercise-boundary regression: basis construction and least-squares
//! conditional expectation.

pub mod basis;
pub mod estimator;

pub use basis::basis_functions;
pub use estimator::ConditionalExpectationRegression;
