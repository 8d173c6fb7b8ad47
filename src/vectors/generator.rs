use crate::errors::EngineResult;
use crate::models::black_scholes::BlackScholesEngine;
use crate::state::{ModelInputs, PricingResult};
use crate::vectors::scenarios::Scenario;
use crate::wad::{dollars_to_scaled, to_scaled};

/// WAD-scaled d1/d2 and Greeks, for consumers that also check sensitivities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct ScaledGreeks {
    pub d1: i128,
    pub d2: i128,
    pub delta_call: i128,
    pub delta_put: i128,
    pub gamma: i128,
    pub vega: i128,
    pub theta_call: i128,
    pub theta_put: i128,
    pub rho_call: i128,
    pub rho_put: i128,
}

impl ScaledGreeks {
    fn from_result(r: &PricingResult) -> EngineResult<Self> {
        Ok(Self {
            d1: to_scaled(r.d1)?,
            d2: to_scaled(r.d2)?,
            delta_call: to_scaled(r.delta_call)?,
            delta_put: to_scaled(r.delta_put)?,
            gamma: to_scaled(r.gamma)?,
            vega: to_scaled(r.vega)?,
            theta_call: to_scaled(r.theta_call)?,
            theta_put: to_scaled(r.theta_put)?,
            rho_call: to_scaled(r.rho_call)?,
            rho_put: to_scaled(r.rho_put)?,
        })
    }
}

/// One emitted test vector: the seven WAD integers the fixed-point suite
/// consumes, plus the float result they were derived from.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ReferenceVector {
    pub label: &'static str,
    pub spot_scaled: i128,
    pub strike_scaled: i128,
    pub time_scaled: i128,
    pub rate_scaled: i128,
    pub vol_scaled: i128,
    pub expected_call_scaled: i128,
    pub expected_put_scaled: i128,
    pub greeks_scaled: ScaledGreeks,
    pub inputs: ModelInputs,
    pub result: PricingResult,
}

/// Per-scenario outcome. A failed scenario carries its error, not a panic.
#[derive(Debug)]
pub struct ScenarioOutcome {
    pub scenario: Scenario,
    pub vector: EngineResult<ReferenceVector>,
}

/// Prices one scenario and converts everything to WAD.
pub fn build_vector(engine: &BlackScholesEngine, scenario: &Scenario) -> EngineResult<ReferenceVector> {
    let inputs = scenario.inputs();
    let result = engine.price(&inputs)?;

    Ok(ReferenceVector {
        label: scenario.label,
        spot_scaled: dollars_to_scaled(scenario.spot),
        strike_scaled: dollars_to_scaled(scenario.strike),
        time_scaled: to_scaled(scenario.time)?,
        rate_scaled: to_scaled(scenario.rate)?,
        vol_scaled: to_scaled(scenario.volatility)?,
        expected_call_scaled: to_scaled(result.call_price)?,
        expected_put_scaled: to_scaled(result.put_price)?,
        greeks_scaled: ScaledGreeks::from_result(&result)?,
        inputs,
        result,
    })
}

/// Runs every scenario in declaration order. No state crosses scenarios;
/// a failing scenario is logged and recorded, the rest still run.
pub fn generate(engine: &BlackScholesEngine, scenarios: &[Scenario]) -> Vec<ScenarioOutcome> {
    scenarios
        .iter()
        .map(|scenario| {
            let vector = build_vector(engine, scenario);
            match &vector {
                Ok(v) => tracing::debug!(
                    scenario = scenario.label,
                    call = v.result.call_price,
                    put = v.result.put_price,
                    "vector generated"
                ),
                Err(e) => tracing::warn!(scenario = scenario.label, error = %e, "scenario skipped"),
            }
            ScenarioOutcome {
                scenario: *scenario,
                vector,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EngineError;
    use crate::vectors::scenarios::{ATM, VECTOR_SCENARIOS};
    use crate::wad::WAD;

    #[test]
    fn test_atm_vector_fields() {
        let engine = BlackScholesEngine::default();
        let v = build_vector(&engine, &ATM).expect("ATM vector");
        assert_eq!(v.spot_scaled, 100 * WAD);
        assert_eq!(v.strike_scaled, 100 * WAD);
        assert_eq!(v.time_scaled, WAD);
        assert_eq!(v.rate_scaled, 50_000_000_000_000_000);
        assert_eq!(v.vol_scaled, 200_000_000_000_000_000);
        // Reference 10450583572185565184 / 5573526022256970752; allow a few ulps of CDF noise
        assert!((v.expected_call_scaled - 10_450_583_572_185_565_184).abs() < 1_000_000, "{}", v.expected_call_scaled);
        assert!((v.expected_put_scaled - 5_573_526_022_256_970_752).abs() < 1_000_000, "{}", v.expected_put_scaled);
        assert!(v.greeks_scaled.theta_call < 0);
        assert!(v.greeks_scaled.delta_put < 0 && v.greeks_scaled.delta_call > 0);
    }

    #[test]
    fn test_generate_preserves_order() {
        let engine = BlackScholesEngine::default();
        let outcomes = generate(&engine, VECTOR_SCENARIOS);
        assert_eq!(outcomes.len(), VECTOR_SCENARIOS.len());
        for (outcome, scenario) in outcomes.iter().zip(VECTOR_SCENARIOS) {
            assert_eq!(outcome.scenario.label, scenario.label);
            assert!(outcome.vector.is_ok(), "{} failed", scenario.label);
        }
    }

    #[test]
    fn test_bad_scenario_does_not_abort_batch() {
        let engine = BlackScholesEngine::default();
        let scenarios = [
            ATM,
            Scenario { label: "Expired", time: 0.0, ..ATM },
            Scenario { label: "Zero vol", volatility: 0.0, ..ATM },
            Scenario { label: "ITM", spot: 120, ..ATM },
        ];
        let outcomes = generate(&engine, &scenarios);
        assert_eq!(outcomes.len(), 4);
        assert!(outcomes[0].vector.is_ok());
        assert!(matches!(outcomes[1].vector, Err(EngineError::Domain { field: "time_to_expiry", .. })));
        assert!(matches!(outcomes[2].vector, Err(EngineError::Domain { field: "volatility", .. })));
        assert!(outcomes[3].vector.is_ok());
    }

    #[test]
    fn test_generation_is_deterministic() {
        let engine = BlackScholesEngine::default();
        let a = build_vector(&engine, &VECTOR_SCENARIOS[4]).expect("vector");
        let b = build_vector(&engine, &VECTOR_SCENARIOS[4]).expect("vector");
        assert_eq!(a.expected_call_scaled, b.expected_call_scaled);
        assert_eq!(a.greeks_scaled, b.greeks_scaled);
    }
}
