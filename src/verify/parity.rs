use crate::errors::{EngineError, EngineResult};
use crate::models::black_scholes::BlackScholesEngine;
use crate::state::{ModelInputs, PricingResult};

/// Absolute tolerance for C - P == S - K*e^(-rT).
pub const PARITY_TOLERANCE: f64 = 1e-10;

/// Outcome of one put-call parity check. Stack-allocated.
#[derive(Debug, Clone, Copy)]
pub struct ParityCheck {
    /// C - P
    pub lhs: f64,
    /// S - K*e^(-rT)
    pub rhs: f64,
    pub deviation: f64,
    pub tolerance: f64,
    pub holds: bool,
}

impl ParityCheck {
    /// Turns a failed check into a ToleranceViolation carrying both sides.
    pub fn into_result(self) -> EngineResult<Self> {
        if self.holds {
            Ok(self)
        } else {
            Err(EngineError::ToleranceViolation {
                check: "put-call parity".into(),
                computed: self.lhs,
                expected: self.rhs,
                deviation: self.deviation,
                tolerance: self.tolerance,
            })
        }
    }
}

/// Checks the engine's two price formulas against each other. Uses only the
/// engine output and the raw inputs; Phi/phi are never re-evaluated here.
pub fn verify_parity(inputs: &ModelInputs, result: &PricingResult, tolerance: f64) -> EngineResult<ParityCheck> {
    let lhs = result.call_price - result.put_price;
    let rhs = inputs.spot - inputs.discounted_strike()?;
    let deviation = (lhs - rhs).abs();
    Ok(ParityCheck {
        lhs,
        rhs,
        deviation,
        tolerance,
        holds: deviation < tolerance,
    })
}

/// Prices `inputs` and reports whether put-call parity holds within 1e-10.
pub fn check_parity(engine: &BlackScholesEngine, inputs: &ModelInputs) -> EngineResult<bool> {
    let result = engine.price(inputs)?;
    Ok(verify_parity(inputs, &result, PARITY_TOLERANCE)?.holds)
}
