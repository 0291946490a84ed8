//! Asset simulations consumed by products.

pub mod black_scholes;
pub mod heston;
pub mod model;
pub mod scenario;

pub use black_scholes::{BlackScholesConfig, BlackScholesSimulation};
pub use heston::{HestonConfig, HestonParams, HestonScheme, HestonSimulation};
pub use model::{AssetModelSimulation, SimulatedPaths, TimeGrid};
pub use scenario::ScenarioSimulation;
