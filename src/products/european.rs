// src/products/european.rs
use super::AssetMonteCarloProduct;
use crate::error::{validation::*, PricingResult};
use crate::models::AssetModelSimulation;
use crate::random_variable::PathVector;

/// European call paying `notional * max(S(T) - K, 0)` at maturity `T`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EuropeanOption {
    maturity: f64,
    strike: f64,
    notional: f64,
}

impl EuropeanOption {
    pub fn new(maturity: f64, strike: f64, notional: f64) -> PricingResult<Self> {
        validate_finite("maturity", maturity)?;
        validate_finite("strike", strike)?;
        validate_finite("notional", notional)?;
        Ok(EuropeanOption {
            maturity,
            strike,
            notional,
        })
    }

    pub fn maturity(&self) -> f64 {
        self.maturity
    }

    pub fn strike(&self) -> f64 {
        self.strike
    }

    pub fn notional(&self) -> f64 {
        self.notional
    }
}

impl AssetMonteCarloProduct for EuropeanOption {
    fn value(
        &self,
        evaluation_time: f64,
        model: &dyn AssetModelSimulation,
    ) -> PricingResult<PathVector> {
        let underlying = model.asset_value(self.maturity, 0)?;
        let numeraire = model.numeraire(self.maturity)?;
        let weights = model.monte_carlo_weights(self.maturity)?;

        // numeraire-relative, probability weighted; same units as the Bermudan engine
        let payoff = (&(&underlying - self.strike) * self.notional).div(&numeraire)?.mul(&weights)?;
        let payoff = payoff.floor(0.0);

        let numeraire_at_evaluation = model.numeraire(evaluation_time)?;
        let weights_at_evaluation = model.monte_carlo_weights(evaluation_time)?;
        Ok(payoff
            .mul(&numeraire_at_evaluation)?
            .div(&weights_at_evaluation)?
            .with_time(evaluation_time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScenarioSimulation;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_pathwise_payoff() {
        let values = array![[100.0, 100.0, 100.0, 100.0], [90.0, 100.0, 110.0, 130.0]];
        let model = ScenarioSimulation::new(vec![0.0, 1.0], values).unwrap();
        let option = EuropeanOption::new(1.0, 100.0, 2.0).unwrap();

        let value = option.value(0.0, &model).unwrap();
        assert_eq!(value.time(), 0.0);
        assert_eq!(value.to_vec(), vec![0.0, 0.0, 20.0, 60.0]);
        assert_relative_eq!(option.average_value(0.0, &model).unwrap(), 20.0);
    }

    #[test]
    fn test_discounting_by_numeraire() {
        let values = array![[100.0, 100.0], [120.0, 120.0]];
        let model =
            ScenarioSimulation::with_numeraire(vec![0.0, 1.0], values, vec![1.0, 1.25]).unwrap();
        let option = EuropeanOption::new(1.0, 100.0, 1.0).unwrap();
        assert_relative_eq!(option.average_value(0.0, &model).unwrap(), 16.0, epsilon = 1e-12);
    }

    #[test]
    fn test_maturity_off_grid() {
        let model = ScenarioSimulation::deterministic(vec![0.0, 1.0], &[100.0, 100.0], 2).unwrap();
        let option = EuropeanOption::new(1.5, 100.0, 1.0).unwrap();
        assert!(option.value(0.0, &model).is_err());
    }
}
